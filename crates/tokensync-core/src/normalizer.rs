use crate::color::{is_hex_color, ColorValue};
use crate::types::alias_extensions;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

const MAX_REFERENCE_DEPTH: usize = 20;

/// Bookkeeping keys Tokens Studio writes next to token sets
const TOKENS_STUDIO_META_KEYS: &[&str] = &["$themes", "$metadata", "tokenSetOrder"];

/// Token document dialects the normalizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Figma variables export: `$value` color objects with components
    Canonical,
    W3cDtcg,
    TokensStudio,
    Unknown,
}

/// Detects the dialect by sampling leaves depth-first until one is decisive.
pub fn detect_format(tree: &Value) -> SourceFormat {
    fn visit(value: &Value) -> Option<SourceFormat> {
        let obj = value.as_object()?;
        if is_leaf(obj) {
            return classify_leaf(obj);
        }
        obj.iter()
            .filter(|(key, _)| !key.starts_with('$') && *key != "tokenSetOrder")
            .find_map(|(_, child)| visit(child))
    }
    visit(tree).unwrap_or(SourceFormat::Unknown)
}

fn is_leaf(obj: &Map<String, Value>) -> bool {
    obj.contains_key("$value") || obj.get("type").is_some_and(Value::is_string) && obj.contains_key("value")
}

fn classify_leaf(obj: &Map<String, Value>) -> Option<SourceFormat> {
    if obj.contains_key("value") && !obj.contains_key("$value") {
        return Some(SourceFormat::TokensStudio);
    }
    match obj.get("$value")? {
        Value::String(s) if parse_reference(s).is_some() || is_hex_color(s) => {
            Some(SourceFormat::W3cDtcg)
        }
        Value::Object(value) if value.contains_key("components") => Some(SourceFormat::Canonical),
        Value::Object(value) if ["r", "g", "b"].iter().all(|k| value.contains_key(*k)) => {
            Some(SourceFormat::Canonical)
        }
        _ => None,
    }
}

/// Rewrites a token document into the canonical shape. Never fails: leaves it
/// cannot interpret are left out, unknown documents pass through unchanged.
pub fn normalize(tree: &Value) -> Value {
    let format = detect_format(tree);
    debug!("Detected token source format: {:?}", format);
    match format {
        SourceFormat::Canonical | SourceFormat::Unknown => tree.clone(),
        SourceFormat::W3cDtcg => {
            let normalized = Normalizer::new(tree, Dialect::W3c).run();
            info!("Normalized W3C DTCG token document");
            normalized
        }
        SourceFormat::TokensStudio => {
            let normalized = Normalizer::new(tree, Dialect::TokensStudio).run();
            info!("Normalized Tokens Studio token document");
            normalized
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Dialect {
    W3c,
    TokensStudio,
}

impl Dialect {
    fn value_key(self) -> &'static str {
        match self {
            Dialect::W3c => "$value",
            Dialect::TokensStudio => "value",
        }
    }

    fn type_key(self) -> &'static str {
        match self {
            Dialect::W3c => "$type",
            Dialect::TokensStudio => "type",
        }
    }

    fn description_key(self) -> &'static str {
        match self {
            Dialect::W3c => "$description",
            Dialect::TokensStudio => "description",
        }
    }
}

/// Maps the Tokens Studio type vocabulary onto the canonical one
pub fn map_tokens_studio_type(studio_type: &str) -> &'static str {
    match studio_type {
        "color" => "color",
        "sizing" | "spacing" | "borderRadius" | "borderWidth" | "dimension" => "dimension",
        "boxShadow" => "shadow",
        "border" => "border",
        "typography" => "typography",
        "fontFamilies" | "fontFamily" => "fontFamily",
        "fontWeights" | "fontWeight" => "fontWeight",
        "fontSizes" | "fontSize" => "fontSize",
        "lineHeights" | "lineHeight" => "lineHeight",
        "letterSpacing" => "letterSpacing",
        "opacity" | "number" => "number",
        "duration" => "duration",
        "text" => "string",
        "boolean" => "boolean",
        _ => "other",
    }
}

/// Parses `{group.token}` into its path segments
pub fn parse_reference(input: &str) -> Option<Vec<String>> {
    let inner = input.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['{', '}']) {
        return None;
    }
    Some(inner.split('.').map(|s| s.trim().to_string()).collect())
}

struct Normalizer<'a> {
    source: &'a Value,
    dialect: Dialect,
}

impl<'a> Normalizer<'a> {
    fn new(source: &'a Value, dialect: Dialect) -> Self {
        Self { source, dialect }
    }

    fn run(&self) -> Value {
        match self.source.as_object() {
            Some(obj) => Value::Object(self.normalize_group(obj, None)),
            None => self.source.clone(),
        }
    }

    fn normalize_group(&self, obj: &Map<String, Value>, inherited_type: Option<&str>) -> Map<String, Value> {
        // W3C groups may declare a `$type` that their leaves inherit
        let group_type = match self.dialect {
            Dialect::W3c => obj.get("$type").and_then(Value::as_str).or(inherited_type),
            Dialect::TokensStudio => inherited_type,
        };

        let mut out = Map::new();
        for (key, child) in obj {
            if TOKENS_STUDIO_META_KEYS.contains(&key.as_str()) {
                continue;
            }
            if key.starts_with('$') {
                if key == "$description" {
                    out.insert(key.clone(), child.clone());
                }
                continue;
            }
            let Some(child_obj) = child.as_object() else {
                continue;
            };
            if self.is_dialect_leaf(child_obj) {
                if let Some(leaf) = self.normalize_leaf(child_obj, group_type) {
                    out.insert(key.clone(), leaf);
                }
            } else {
                out.insert(key.clone(), Value::Object(self.normalize_group(child_obj, group_type)));
            }
        }
        out
    }

    fn is_dialect_leaf(&self, obj: &Map<String, Value>) -> bool {
        obj.contains_key(self.dialect.value_key())
    }

    fn normalize_leaf(&self, obj: &Map<String, Value>, group_type: Option<&str>) -> Option<Value> {
        let raw_type = obj
            .get(self.dialect.type_key())
            .and_then(Value::as_str)
            .or(group_type)?;
        let canonical_type = match self.dialect {
            Dialect::W3c => raw_type.to_string(),
            Dialect::TokensStudio => map_tokens_studio_type(raw_type).to_string(),
        };
        let raw_value = obj.get(self.dialect.value_key())?;

        let mut leaf = Map::new();
        leaf.insert("$type".to_string(), json!(canonical_type));

        match raw_value.as_str().and_then(parse_reference) {
            Some(reference) => {
                let target = self.target_path(&reference);
                let resolved = self
                    .resolve_reference(&reference, 0)
                    .map(|value| self.convert_value(&canonical_type, &value, 0))
                    .unwrap_or(Value::Null);
                leaf.insert("$value".to_string(), resolved);
                leaf.insert("$extensions".to_string(), alias_extensions(&target));
            }
            None => {
                let converted = self.convert_value(&canonical_type, raw_value, 0);
                if canonical_type == "color" && converted.is_string() {
                    // Unparseable color string, nothing sensible to emit
                    return None;
                }
                leaf.insert("$value".to_string(), converted);
            }
        }

        if let Some(description) = obj.get(self.dialect.description_key()) {
            leaf.insert("$description".to_string(), description.clone());
        }
        if let Some(extensions) = obj.get("$extensions").and_then(Value::as_object) {
            let slot = leaf
                .entry("$extensions".to_string())
                .or_insert_with(|| json!({}));
            if let Some(slot) = slot.as_object_mut() {
                for (key, value) in extensions {
                    slot.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        Some(Value::Object(leaf))
    }

    /// Canonical value shape for a raw dialect value
    fn convert_value(&self, canonical_type: &str, raw: &Value, depth: usize) -> Value {
        if depth > MAX_REFERENCE_DEPTH {
            return Value::Null;
        }
        match raw {
            Value::String(s) => {
                if let Some(reference) = parse_reference(s) {
                    return self
                        .resolve_reference(&reference, depth + 1)
                        .map(|value| self.convert_value(canonical_type, &value, depth + 1))
                        .unwrap_or(Value::Null);
                }
                if canonical_type == "color" {
                    if let Some(color) = ColorValue::from_hex(s) {
                        return color.to_json();
                    }
                }
                raw.clone()
            }
            Value::Object(obj) => {
                if canonical_type == "color" {
                    if let Some(color) = ColorValue::from_json(raw) {
                        return color.to_json();
                    }
                }
                let mut out = Map::new();
                for (key, value) in obj {
                    let field_type = if key == "color" { "color" } else { "" };
                    out.insert(key.clone(), self.convert_value(field_type, value, depth + 1));
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.convert_value(canonical_type, item, depth + 1))
                    .collect(),
            ),
            _ => raw.clone(),
        }
    }

    /// Raw value of the referenced leaf, following reference chains.
    fn resolve_reference(&self, reference: &[String], depth: usize) -> Option<Value> {
        if depth > MAX_REFERENCE_DEPTH {
            return None;
        }
        let (_, leaf) = self.lookup(reference)?;
        let value = leaf.get(self.dialect.value_key())?;
        match value.as_str().and_then(parse_reference) {
            Some(next) => self.resolve_reference(&next, depth + 1),
            None => Some(value.clone()),
        }
    }

    /// Finds a referenced leaf from the root, or inside any top-level token set.
    fn lookup(&self, reference: &[String]) -> Option<(Option<String>, &'a Map<String, Value>)> {
        let root = self.source.as_object()?;
        if let Some(found) = descend(root, reference) {
            return Some((None, found));
        }
        root.iter()
            .filter(|(key, _)| !key.starts_with('$'))
            .find_map(|(set, child)| {
                descend(child.as_object()?, reference).map(|found| (Some(set.clone()), found))
            })
    }

    fn target_path(&self, reference: &[String]) -> String {
        let joined = reference.join("/");
        match self.lookup(reference) {
            Some((Some(set), _)) => format!("{}/{}", set, joined),
            _ => joined,
        }
    }
}

fn descend<'v>(root: &'v Map<String, Value>, path: &[String]) -> Option<&'v Map<String, Value>> {
    let mut current = root;
    for segment in path {
        current = current.get(segment)?.as_object()?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::TokenTree;

    fn figma_tree() -> Value {
        json!({
            "Text": {
                "primary": {
                    "$type": "color",
                    "$value": {"colorSpace": "srgb", "components": [0.11, 0.11, 0.11], "alpha": 1, "hex": "#1D1D1D"},
                    "$extensions": {"com.figma.aliasData": {"targetVariableName": "Colour/Grey/750"}}
                }
            }
        })
    }

    #[test]
    fn test_detects_each_dialect() {
        assert_eq!(detect_format(&figma_tree()), SourceFormat::Canonical);
        assert_eq!(
            detect_format(&json!({"a": {"$type": "color", "$value": "#ffffff"}})),
            SourceFormat::W3cDtcg
        );
        assert_eq!(
            detect_format(&json!({"global": {"a": {"type": "color", "value": "#ffffff"}}})),
            SourceFormat::TokensStudio
        );
        assert_eq!(detect_format(&json!({"a": {"b": 1}})), SourceFormat::Unknown);
    }

    #[test]
    fn test_detection_skips_indecisive_leaves() {
        let tree = json!({
            "space": {"$type": "number", "$value": 4},
            "brand": {"$type": "color", "$value": "#0a84ff"}
        });
        assert_eq!(detect_format(&tree), SourceFormat::W3cDtcg);
    }

    #[test]
    fn test_canonical_is_noop() {
        let tree = figma_tree();
        assert_eq!(normalize(&tree), tree);
    }

    #[test]
    fn test_w3c_hex_and_alias_conversion() {
        let tree = json!({
            "grey": {"$type": "color", "750": {"$value": "#1d1d1d"}},
            "text": {"primary": {"$type": "color", "$value": "{grey.750}"}}
        });
        let normalized = normalize(&tree);

        let primitive = &normalized["grey"]["750"];
        assert_eq!(primitive["$type"], "color");
        assert_eq!(primitive["$value"]["hex"], "#1D1D1D");

        let semantic = &normalized["text"]["primary"];
        assert_eq!(
            semantic["$extensions"]["com.figma.aliasData"]["targetVariableName"],
            "grey/750"
        );
        assert_eq!(semantic["$value"]["hex"], "#1D1D1D");
    }

    #[test]
    fn test_w3c_alias_target_is_the_full_path() {
        let tree = json!({
            "color": {
                "grey": {"750": {"$type": "color", "$value": "#1d1d1d"}},
                "blue": {"750": {"$type": "color", "$value": "#0a3d91"}}
            },
            "text": {
                "primary": {"$type": "color", "$value": "{color.grey.750}"},
                "link": {"$type": "color", "$value": "{color.blue.750}"}
            }
        });
        let normalized = normalize(&tree);
        let target = |name: &str| {
            normalized["text"][name]["$extensions"]["com.figma.aliasData"]["targetVariableName"].clone()
        };
        // Last segments collide, so the whole path is kept
        assert_eq!(target("primary"), "color/grey/750");
        assert_eq!(target("link"), "color/blue/750");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let tree = json!({
            "grey": {"750": {"$type": "color", "$value": "#1d1d1d"}},
            "text": {"primary": {"$type": "color", "$value": "{grey.750}"}},
            "space": {"md": {"$type": "dimension", "$value": "16px"}}
        });
        let once = normalize(&tree);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tokens_studio_types_and_sets() {
        let tree = json!({
            "global": {
                "grey": {"750": {"type": "color", "value": "#1d1d1d"}},
                "radius": {"md": {"type": "borderRadius", "value": "8"}},
                "elevation": {"type": "boxShadow", "value": {"color": "{grey.750}", "x": 0, "y": 2, "blur": 4, "spread": 0}}
            },
            "light": {
                "text": {"primary": {"type": "color", "value": "{grey.750}", "description": "Body copy"}}
            },
            "$themes": [],
            "$metadata": {"tokenSetOrder": ["global", "light"]}
        });
        let normalized = normalize(&tree);

        assert!(normalized.get("$themes").is_none());
        assert!(normalized.get("$metadata").is_none());
        assert_eq!(normalized["global"]["radius"]["md"]["$type"], "dimension");
        assert_eq!(normalized["global"]["elevation"]["$type"], "shadow");
        assert_eq!(
            normalized["global"]["elevation"]["$value"]["color"]["hex"],
            "#1D1D1D"
        );

        let semantic = &normalized["light"]["text"]["primary"];
        assert_eq!(semantic["$description"], "Body copy");
        assert_eq!(
            semantic["$extensions"]["com.figma.aliasData"]["targetVariableName"],
            "global/grey/750"
        );

        let parsed = TokenTree::from_json(&normalized).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.leaf_count(), 4);
    }

    #[test]
    fn test_malformed_leaves_are_dropped() {
        let tree = json!({
            "bad": {"$type": "color", "$value": "definitely-not-a-color"},
            "good": {"$type": "color", "$value": "#ffffff"}
        });
        let normalized = normalize(&tree);
        assert!(normalized.get("bad").is_none());
        assert!(normalized.get("good").is_some());
    }

    #[test]
    fn test_dangling_reference_keeps_alias_with_null_value() {
        let tree = json!({"text": {"$type": "color", "$value": "{missing.token}"}, "x": {"$type": "color", "$value": "#000"}});
        let normalized = normalize(&tree);
        assert_eq!(normalized["text"]["$value"], Value::Null);
        assert_eq!(
            normalized["text"]["$extensions"]["com.figma.aliasData"]["targetVariableName"],
            "missing/token"
        );
    }
}
