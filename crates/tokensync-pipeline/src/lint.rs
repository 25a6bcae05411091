//! Advisory checks over the inputs and the collected palette.

use serde_json::json;
use std::collections::BTreeMap;
use tokensync_common::{Warning, WarningKind};
use tokensync_core::{join_path, TokenTree};
use tokensync_emitters::Palette;

/// Lint checks - each returns `lint` warnings and never blocks generation
pub struct Linter;

impl Linter {
    pub fn new() -> Self {
        Self
    }

    pub fn lint(&self, trees: &[(&str, &TokenTree)], palette: &Palette) -> Vec<Warning> {
        let mut warnings = Vec::new();
        for (label, tree) in trees {
            warnings.extend(self.empty_groups(label, tree));
        }
        warnings.extend(self.collisions(palette));
        warnings.extend(self.digit_prefixed(palette));
        warnings.extend(self.duplicate_hex(palette));
        warnings
    }

    fn empty_groups(&self, label: &str, tree: &TokenTree) -> Vec<Warning> {
        tree.empty_groups()
            .into_iter()
            .map(|path| {
                let joined = join_path(&path);
                Warning::new(
                    WarningKind::Lint,
                    format!("Empty group {} in {} tokens", joined, label),
                )
                .with_detail(json!({ "check": "empty-group", "tree": label, "path": joined }))
            })
            .collect()
    }

    /// Distinct tokens that end up with the same identifier words
    fn collisions(&self, palette: &Palette) -> Vec<Warning> {
        let mut names: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for primitive in &palette.primitives {
            names
                .entry(primitive.words.join("-"))
                .or_default()
                .push(primitive.key.clone());
        }
        for semantic in &palette.semantics {
            let key = join_path(&semantic.path);
            let sources = names.entry(semantic.words.join("-")).or_default();
            if !sources.contains(&key) {
                sources.push(key);
            }
        }

        names
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(identifier, sources)| {
                Warning::new(
                    WarningKind::Lint,
                    format!(
                        "Identifier {} is produced by {} tokens: {}",
                        identifier,
                        sources.len(),
                        sources.join(", ")
                    ),
                )
                .with_detail(json!({ "check": "collision", "identifier": identifier, "paths": sources }))
            })
            .collect()
    }

    /// Names that start with a digit get a `_` prefix in every code target
    fn digit_prefixed(&self, palette: &Palette) -> Vec<Warning> {
        let primitive_words = palette.primitives.iter().map(|p| (&p.words, p.key.clone()));
        let semantic_words = palette.semantics.iter().map(|s| (&s.words, join_path(&s.path)));
        primitive_words
            .chain(semantic_words)
            .filter(|(words, _)| {
                words
                    .first()
                    .and_then(|w| w.chars().next())
                    .is_some_and(|c| c.is_ascii_digit())
            })
            .map(|(words, path)| {
                Warning::new(
                    WarningKind::Lint,
                    format!("{} starts with a digit; generated identifiers are prefixed with _", path),
                )
                .with_detail(json!({ "check": "digit-prefix", "path": path, "identifier": words.join("-") }))
            })
            .collect()
    }

    /// Primitives with different names and the same color
    fn duplicate_hex(&self, palette: &Palette) -> Vec<Warning> {
        let mut by_hex: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for primitive in palette.primitives.iter().filter(|p| !p.promoted) {
            by_hex
                .entry(primitive.color.web_hex(false))
                .or_default()
                .push(primitive.words.join("-"));
        }
        by_hex
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(hex, names)| {
                Warning::new(
                    WarningKind::Lint,
                    format!("Primitives {} share the value {}", names.join(", "), hex),
                )
                .with_detail(json!({ "check": "duplicate-hex", "hex": hex, "names": names }))
            })
            .collect()
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokensync_core::{alias_extensions, ColorValue, TokenGraph, DEFAULT_MAX_DEPTH};
    use tokensync_emitters::PaletteSources;

    fn color(hex: &str) -> Value {
        json!({"$type": "color", "$value": ColorValue::from_hex(hex).unwrap().to_json()})
    }

    fn alias(target: &str, hex: &str) -> Value {
        json!({
            "$type": "color",
            "$value": ColorValue::from_hex(hex).unwrap().to_json(),
            "$extensions": alias_extensions(target)
        })
    }

    fn palette(light: &TokenTree, primitives: &TokenTree) -> Palette {
        let graph = TokenGraph::build(&[primitives, light]);
        Palette::collect(&PaletteSources {
            light,
            dark: light,
            primitives: Some(primitives),
            light_graph: &graph,
            dark_graph: &graph,
            max_depth: DEFAULT_MAX_DEPTH,
        })
        .0
    }

    fn checks(warnings: &[Warning]) -> Vec<String> {
        warnings
            .iter()
            .filter_map(|w| w.detail.as_ref()?.get("check")?.as_str().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_duplicate_hex_and_collision() {
        let primitives = TokenTree::from_json(&json!({
            "Colour": {
                "Grey": {"50": color("#f5f5f5")},
                "Mist": {"50": color("#f5f5f5")}
            },
            "grey-50": color("#eeeeee")
        }))
        .unwrap();
        let light = TokenTree::from_json(&json!({})).unwrap();
        let warnings = Linter::new().lint(&[], &palette(&light, &primitives));
        let found = checks(&warnings);
        assert!(found.contains(&"duplicate-hex".to_string()));
        assert!(found.contains(&"collision".to_string()));
    }

    #[test]
    fn test_digit_prefix_and_empty_groups() {
        let primitives = TokenTree::from_json(&json!({"Colour": {"Grey": {"50": color("#f5f5f5")}}})).unwrap();
        let light = TokenTree::from_json(&json!({
            "2xl": {"surface": alias("Colour/Grey/50", "#f5f5f5")},
            "Unused": {}
        }))
        .unwrap();
        let warnings = Linter::new().lint(&[("light", &light)], &palette(&light, &primitives));
        let found = checks(&warnings);
        assert_eq!(found, vec!["empty-group", "digit-prefix"]);
        assert!(warnings[0].message.contains("Unused"));
    }

    #[test]
    fn test_clean_palette_has_no_lint() {
        let primitives = TokenTree::from_json(&json!({"Colour": {"Grey": {"50": color("#f5f5f5")}}})).unwrap();
        let light = TokenTree::from_json(&json!({"Text": {"primary": alias("Colour/Grey/50", "#f5f5f5")}})).unwrap();
        assert!(Linter::new().lint(&[("light", &light)], &palette(&light, &primitives)).is_empty());
    }
}
