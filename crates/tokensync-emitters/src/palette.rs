//! Two-pass primitive/semantic collection shared by every color emitter.

use crate::naming::{is_numeric_segment, primitive_segments, words_from_path};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokensync_common::{Warning, WarningKind};
use tokensync_core::{join_path, ColorValue, TokenGraph, TokenNode, TokenTree, TokenType};
use tracing::debug;

/// Key prefix for literal colors promoted to primitives
const LITERAL: &str = "literal";

/// A base color with no further alias
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Graph path, or a `literal/...` key for promoted literals
    pub key: String,
    pub words: Vec<String>,
    pub family: Vec<String>,
    pub sort_key: u128,
    pub color: ColorValue,
    pub promoted: bool,
}

impl Primitive {
    fn from_path(key: String, path: &[String], color: ColorValue) -> Self {
        let segments = primitive_segments(path);
        let family_segments: Vec<&String> = segments
            .iter()
            .take_while(|segment| !is_numeric_segment(segment))
            .collect();
        let family = words_from_path(&family_segments);
        Self {
            key,
            words: words_from_path(&segments),
            family,
            sort_key: numeric_sort_key(&segments),
            color,
            promoted: false,
        }
    }

    fn literal(key: String, semantic_path: &[String], color: ColorValue) -> Self {
        let mut words = vec![LITERAL.to_string()];
        words.extend(words_from_path(semantic_path));
        Self {
            key,
            words,
            family: vec![LITERAL.to_string()],
            sort_key: numeric_sort_key(semantic_path),
            color,
            promoted: true,
        }
    }

    fn family_label(&self) -> String {
        self.family.join(" ").to_lowercase()
    }

    fn name_label(&self) -> String {
        self.words.join(" ").to_lowercase()
    }
}

/// Numeric path segments folded base-1000, most significant first
pub fn numeric_sort_key<S: AsRef<str>>(segments: &[S]) -> u128 {
    segments
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| is_numeric_segment(s))
        .filter_map(|s| s.split('.').next().and_then(|whole| whole.parse::<u128>().ok()))
        .fold(0u128, |key, n| key.saturating_mul(1000).saturating_add(n))
}

/// A role-named color aliasing a primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Semantic {
    pub path: Vec<String>,
    pub words: Vec<String>,
    pub light: String,
    /// `None` for mode-invariant (`static`) tokens
    pub dark: Option<String>,
    pub description: Option<String>,
}

impl Semantic {
    pub fn is_static(&self) -> bool {
        self.dark.is_none()
    }

    pub fn dark_key(&self) -> &str {
        self.dark.as_deref().unwrap_or(&self.light)
    }

    /// First path segment, used to split multi-file outputs
    pub fn category(&self) -> &str {
        if self.path.len() > 1 {
            &self.path[0]
        } else {
            "Base"
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Palette {
    pub primitives: Vec<Primitive>,
    pub semantics: Vec<Semantic>,
    index: HashMap<String, usize>,
}

/// Inputs the palette is collected from. Each mode resolves aliases through its own graph
/// (primitives plus that mode's tree) so a dark edge is never shadowed by a light one.
pub struct PaletteSources<'a> {
    pub light: &'a TokenTree,
    pub dark: &'a TokenTree,
    pub primitives: Option<&'a TokenTree>,
    pub light_graph: &'a TokenGraph,
    pub dark_graph: &'a TokenGraph,
    pub max_depth: usize,
}

impl Palette {
    pub fn collect(sources: &PaletteSources<'_>) -> (Self, Vec<Warning>) {
        let mut builder = Builder {
            light_graph: sources.light_graph,
            dark_graph: sources.dark_graph,
            max_depth: sources.max_depth,
            primitives: Vec::new(),
            index: HashMap::new(),
        };
        let mut warnings = Vec::new();

        // Pass 1: primitives
        match sources.primitives {
            Some(tree) => {
                for (path, node) in tree.leaves() {
                    let key = join_path(&path);
                    let color = node.value.as_color().cloned().or_else(|| {
                        sources
                            .light_graph
                            .resolve_token(&key, sources.max_depth)
                            .and_then(|terminal| terminal.value.as_color().cloned())
                    });
                    if let Some(color) = color {
                        builder.insert(Primitive::from_path(key, &path, color));
                    }
                }
            }
            None => {
                for (tree, graph) in [
                    (sources.light, sources.light_graph),
                    (sources.dark, sources.dark_graph),
                ] {
                    for (_, node) in tree.leaves() {
                        builder.register_lazy_target(graph, node);
                    }
                }
            }
        }

        // Pass 2: semantics
        let mut semantics = Vec::new();
        for (path, node) in sources.light.leaves() {
            if node.token_type != TokenType::Color {
                continue;
            }
            let Some(light) = builder.resolve_light(&path, node) else {
                if let Some(target) = &node.alias_target {
                    let joined = join_path(&path);
                    warnings.push(
                        Warning::new(
                            WarningKind::UnresolvedAlias,
                            format!("Omitted {}: alias to {} could not be resolved", joined, target),
                        )
                        .with_detail(serde_json::json!({ "path": joined, "target": target })),
                    );
                }
                continue;
            };

            let is_static = path.iter().any(|segment| segment.eq_ignore_ascii_case("static"));
            let dark = if is_static {
                None
            } else {
                let resolved = sources
                    .dark
                    .node_at(&path)
                    .filter(|dark_node| dark_node.token_type == TokenType::Color)
                    .and_then(|dark_node| builder.resolve_dark(dark_node));
                Some(resolved.unwrap_or_else(|| light.clone()))
            };

            semantics.push(Semantic {
                words: words_from_path(&path),
                path,
                light,
                dark,
                description: node.description.clone(),
            });
        }

        let mut primitives = builder.primitives;
        primitives.sort_by(compare_primitives);
        let index = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key.clone(), i))
            .collect();

        debug!(
            "Collected {} primitives and {} semantic colors",
            primitives.len(),
            semantics.len()
        );
        (
            Self {
                primitives,
                semantics,
                index,
            },
            warnings,
        )
    }

    pub fn primitive(&self, key: &str) -> Option<&Primitive> {
        self.index.get(key).map(|&i| &self.primitives[i])
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.semantics.is_empty()
    }

    /// Primitives referenced by at least one semantic, in palette order
    pub fn referenced_primitives(&self) -> Vec<&Primitive> {
        self.primitives
            .iter()
            .filter(|p| {
                self.semantics
                    .iter()
                    .any(|s| s.light == p.key || s.dark.as_deref() == Some(p.key.as_str()))
            })
            .collect()
    }

    /// Primitives grouped by family, preserving sort order
    pub fn families(&self) -> Vec<(&[String], Vec<&Primitive>)> {
        let mut groups: Vec<(&[String], Vec<&Primitive>)> = Vec::new();
        for primitive in &self.primitives {
            match groups.last_mut() {
                Some((family, members)) if *family == primitive.family.as_slice() => {
                    members.push(primitive)
                }
                _ => groups.push((primitive.family.as_slice(), vec![primitive])),
            }
        }
        groups
    }

    /// Semantics grouped by their first path segment, in first-seen order
    pub fn categories(&self) -> Vec<(&str, Vec<&Semantic>)> {
        let mut groups: Vec<(&str, Vec<&Semantic>)> = Vec::new();
        for semantic in &self.semantics {
            let category = semantic.category();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, members)) => members.push(semantic),
                None => groups.push((category, vec![semantic])),
            }
        }
        groups
    }
}

fn compare_primitives(a: &Primitive, b: &Primitive) -> Ordering {
    a.family_label()
        .cmp(&b.family_label())
        .then(a.sort_key.cmp(&b.sort_key))
        .then_with(|| a.name_label().cmp(&b.name_label()))
}

struct Builder<'a> {
    light_graph: &'a TokenGraph,
    dark_graph: &'a TokenGraph,
    max_depth: usize,
    primitives: Vec<Primitive>,
    index: HashMap<String, usize>,
}

impl Builder<'_> {
    fn insert(&mut self, primitive: Primitive) {
        if !self.index.contains_key(&primitive.key) {
            self.index.insert(primitive.key.clone(), self.primitives.len());
            self.primitives.push(primitive);
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Without a primitives tree every alias target becomes a primitive, valued from the
    /// target node when it was supplied and from the referencing leaf otherwise.
    fn register_lazy_target(&mut self, graph: &TokenGraph, node: &TokenNode) {
        if node.token_type != TokenType::Color {
            return;
        }
        let Some(target) = &node.alias_target else {
            return;
        };
        let Some(terminal) = graph.resolve_terminal_path(target, self.max_depth) else {
            return;
        };
        if self.contains(&terminal) {
            return;
        }
        let color = graph
            .nodes
            .get(&terminal)
            .and_then(|n| n.value.as_color().cloned())
            .or_else(|| node.value.as_color().cloned());
        if let Some(color) = color {
            let path: Vec<String> = terminal.split('/').map(str::to_string).collect();
            self.insert(Primitive::from_path(terminal, &path, color));
        }
    }

    fn known_terminal(&self, graph: &TokenGraph, node: &TokenNode) -> Option<String> {
        let target = node.alias_target.as_ref()?;
        graph
            .resolve_terminal_path(target, self.max_depth)
            .filter(|terminal| self.contains(terminal))
    }

    /// Light primitive of a semantic. Unresolvable aliases fall back to the leaf's own color,
    /// promoted to a literal primitive.
    fn resolve_light(&mut self, path: &[String], node: &TokenNode) -> Option<String> {
        if let Some(terminal) = self.known_terminal(self.light_graph, node) {
            return Some(terminal);
        }
        let color = node.value.as_color()?.clone();
        let key = format!("{}/{}", LITERAL, join_path(path));
        if !self.contains(&key) {
            self.insert(Primitive::literal(key.clone(), path, color));
        }
        Some(key)
    }

    /// Dark primitive of a semantic, only when the dark alias reaches a known primitive.
    /// Everything else falls back to the light primitive.
    fn resolve_dark(&self, node: &TokenNode) -> Option<String> {
        self.known_terminal(self.dark_graph, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn alias(target: &str, hex: &str) -> Value {
        json!({
            "$type": "color",
            "$value": hex,
            "$extensions": {"com.figma.aliasData": {"targetVariableName": target}}
        })
    }

    fn collect(light: Value, dark: Value, primitives: Option<Value>) -> (Palette, Vec<Warning>) {
        let light = TokenTree::from_json(&light).unwrap();
        let dark = TokenTree::from_json(&dark).unwrap();
        let primitives = primitives.map(|p| TokenTree::from_json(&p).unwrap());
        let mode_graph = |tree: &TokenTree| {
            let mut trees = Vec::new();
            if let Some(p) = &primitives {
                trees.push(p);
            }
            trees.push(tree);
            TokenGraph::build(&trees)
        };
        let light_graph = mode_graph(&light);
        let dark_graph = mode_graph(&dark);
        Palette::collect(&PaletteSources {
            light: &light,
            dark: &dark,
            primitives: primitives.as_ref(),
            light_graph: &light_graph,
            dark_graph: &dark_graph,
            max_depth: 20,
        })
    }

    #[test]
    fn test_lazy_primitives_from_alias_targets() {
        let (palette, warnings) = collect(
            json!({"Text": {"primary": alias("Colour/Grey/750", "#1d1d1d")}}),
            json!({"Text": {"primary": alias("Colour/Grey/50", "#f5f5f5")}}),
            None,
        );
        assert!(warnings.is_empty());
        let keys: Vec<&str> = palette.primitives.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["Colour/Grey/50", "Colour/Grey/750"]);
        assert_eq!(palette.primitives[0].words, vec!["grey", "50"]);
        assert_eq!(palette.primitives[0].family, vec!["grey"]);

        let semantic = &palette.semantics[0];
        assert_eq!(semantic.light, "Colour/Grey/750");
        assert_eq!(semantic.dark.as_deref(), Some("Colour/Grey/50"));
    }

    #[test]
    fn test_sort_order_is_numeric_within_family() {
        let (palette, _) = collect(
            json!({
                "a": alias("Colour/Grey/750", "#1d1d1d"),
                "b": alias("Colour/Grey/0", "#ffffff"),
                "c": alias("Colour/Blue/500", "#0a84ff"),
                "d": alias("Colour/Grey/50", "#f5f5f5")
            }),
            json!({}),
            None,
        );
        let names: Vec<String> = palette.primitives.iter().map(|p| p.words.join("-")).collect();
        assert_eq!(names, vec!["blue-500", "grey-0", "grey-50", "grey-750"]);
    }

    #[test]
    fn test_missing_dark_falls_back_to_light() {
        let (palette, warnings) = collect(
            json!({"Text": {"primary": alias("Colour/Grey/750", "#1d1d1d")}}),
            json!({}),
            None,
        );
        assert!(warnings.is_empty());
        assert_eq!(palette.semantics[0].dark.as_deref(), Some("Colour/Grey/750"));
    }

    #[test]
    fn test_static_segment_has_no_dark_branch() {
        let (palette, _) = collect(
            json!({"Static": {"white": alias("Colour/Grey/0", "#ffffff")}}),
            json!({"Static": {"white": alias("Colour/Grey/750", "#1d1d1d")}}),
            None,
        );
        assert!(palette.semantics[0].is_static());
    }

    #[test]
    fn test_literal_is_promoted() {
        let (palette, _) = collect(
            json!({"Brand": {"accent": {"$type": "color", "$value": "#ff3b30"}}}),
            json!({}),
            None,
        );
        let semantic = &palette.semantics[0];
        assert_eq!(semantic.light, "literal/Brand/accent");
        let primitive = palette.primitive(&semantic.light).unwrap();
        assert!(primitive.promoted);
        assert_eq!(primitive.words, vec!["literal", "brand", "accent"]);
    }

    #[test]
    fn test_dangling_alias_against_authoritative_primitives() {
        let (palette, warnings) = collect(
            json!({
                "Text": {
                    "primary": alias("Colour/Grey/750", "#1d1d1d"),
                    "ghost": {
                        "$type": "color",
                        "$extensions": {"com.figma.aliasData": {"targetVariableName": "Colour/Missing"}}
                    }
                }
            }),
            json!({}),
            Some(json!({"Colour": {"Grey": {"750": {"$type": "color", "$value": "#1d1d1d"}}}})),
        );
        assert_eq!(palette.semantics.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::UnresolvedAlias);
    }

    fn grey_primitives() -> Value {
        json!({"Colour": {"Grey": {
            "0": {"$type": "color", "$value": "#ffffff"},
            "750": {"$type": "color", "$value": "#1d1d1d"},
            "900": {"$type": "color", "$value": "#111111"}
        }}})
    }

    #[test]
    fn test_dark_chain_follows_dark_edges() {
        let (palette, warnings) = collect(
            json!({
                "Surface": {"primary": alias("Colour/Grey/0", "#ffffff")},
                "Button": {"bg": alias("Surface/primary", "#ffffff")}
            }),
            json!({
                "Surface": {"primary": alias("Colour/Grey/900", "#111111")},
                "Button": {"bg": alias("Surface/primary", "#111111")}
            }),
            Some(grey_primitives()),
        );
        assert!(warnings.is_empty());
        let button = palette.semantics.iter().find(|s| s.path == ["Button", "bg"]).unwrap();
        assert_eq!(button.light, "Colour/Grey/0");
        assert_eq!(button.dark.as_deref(), Some("Colour/Grey/900"));
    }

    #[test]
    fn test_unknown_dark_target_uses_light_primitive() {
        let (palette, warnings) = collect(
            json!({"Text": {"primary": alias("Colour/Grey/750", "#1d1d1d")}}),
            json!({"Text": {"primary": alias("Colour/Missing/1", "#ff0000")}}),
            Some(grey_primitives()),
        );
        assert!(warnings.is_empty());
        let semantic = &palette.semantics[0];
        assert_eq!(semantic.dark.as_deref(), Some("Colour/Grey/750"));
        assert!(palette.primitives.iter().all(|p| !p.promoted));
    }

    #[test]
    fn test_dark_cycle_uses_light_primitive() {
        let (palette, _) = collect(
            json!({"A": {"x": alias("Colour/Grey/0", "#ffffff")}}),
            json!({"A": {"x": alias("A/y", "#000000"), "y": alias("A/x", "#000000")}}),
            None,
        );
        let semantic = &palette.semantics[0];
        assert_eq!(semantic.light, "Colour/Grey/0");
        assert_eq!(semantic.dark.as_deref(), Some("Colour/Grey/0"));
    }

    #[test]
    fn test_cycle_falls_back_to_own_value() {
        let (palette, warnings) = collect(
            json!({"a": alias("b", "#111111"), "b": alias("a", "#222222")}),
            json!({}),
            None,
        );
        assert!(warnings.is_empty());
        assert_eq!(palette.semantics.len(), 2);
        assert!(palette.primitives.iter().all(|p| p.promoted));
    }
}
