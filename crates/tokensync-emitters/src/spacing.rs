//! Spacing scale from the numeric section of the values tree.

use crate::composite::{is_opacity_path, kotlin_dp, number, path_contains, prefixed_words, px, CompositeKind};
use tokensync_common::ReferenceRole;
use tokensync_conventions::DetectedConventions;
use tokensync_core::{TokenNode, TokenValue};

/// Top-level sections that hold the spacing scale
const SECTIONS: &[&str] = &["integer", "spacing", "space"];

pub struct SpacingKind;

fn in_spacing_section(path: &[String]) -> bool {
    path.first()
        .is_some_and(|section| SECTIONS.contains(&section.to_ascii_lowercase().as_str()))
}

impl CompositeKind for SpacingKind {
    type Value = f64;

    fn word(&self) -> &'static str {
        "spacing"
    }

    fn classify(&self, path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<f64> {
        if !in_spacing_section(path) || is_opacity_path(path) || path_contains(path, "radius") {
            return None;
        }
        value.as_number()
    }

    /// The section segment is dropped: `Integer/16` becomes `spacing-16`.
    fn words(&self, path: &[String]) -> Vec<String> {
        let rest = if path.len() > 1 { &path[1..] } else { path };
        prefixed_words(self.word(), rest)
    }

    fn css(&self, value: &f64, _conventions: &DetectedConventions) -> String {
        px(*value)
    }

    fn ts(&self, value: &f64, _conventions: &DetectedConventions) -> String {
        number(*value)
    }

    fn swift(&self, value: &f64) -> String {
        format!("CGFloat({})", number(*value))
    }

    fn kotlin(&self, value: &f64) -> String {
        kotlin_dp(*value)
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &["androidx.compose.ui.unit.dp"]
    }

    fn css_role(&self) -> Option<ReferenceRole> {
        Some(ReferenceRole::WebSpacingCss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::{collect, emit_composite, CompositeSources};
    use crate::test_support::tree;
    use crate::EmitContext;
    use serde_json::json;
    use tokensync_common::Platform;
    use tokensync_core::{TokenGraph, DEFAULT_MAX_DEPTH};

    fn values() -> tokensync_core::TokenTree {
        tree(&json!({
            "Integer": {
                "0": {"$type": "number", "$value": 0},
                "16": {"$type": "number", "$value": 16},
                "overlay-opacity": {"$type": "number", "$value": 40},
                "radius-sm": {"$type": "number", "$value": 4}
            },
            "Elevation": {"Level1": {"opacity": {"$type": "number", "$value": 50}}}
        }))
    }

    #[test]
    fn test_spacing_excludes_opacity_and_radius() {
        let values = values();
        let graph = TokenGraph::build(&[&values]);
        let sources = CompositeSources {
            trees: vec![&values],
            graph: &graph,
            max_depth: DEFAULT_MAX_DEPTH,
        };
        let tokens = collect(&SpacingKind, &sources);
        let names: Vec<String> = tokens.iter().map(|t| t.words.join("-")).collect();
        assert_eq!(names, vec!["spacing-0", "spacing-16"]);
    }

    #[test]
    fn test_spacing_files() {
        let values = values();
        let graph = TokenGraph::build(&[&values]);
        let sources = CompositeSources {
            trees: vec![&values],
            graph: &graph,
            max_depth: DEFAULT_MAX_DEPTH,
        };
        let conventions = tokensync_conventions::DetectedConventions::best_practice();
        let files = emit_composite(&SpacingKind, &sources, &Platform::all(), &EmitContext::new(&conventions));

        let css = files.iter().find(|f| f.filename == "spacing.css").unwrap();
        assert_eq!(css.role, Some(ReferenceRole::WebSpacingCss));
        assert!(css.content.contains("  --spacing-0: 0;\n  --spacing-16: 16px;\n"));
        let ts = files.iter().find(|f| f.filename == "spacing.ts").unwrap();
        assert!(ts.content.contains("export const SPACING_16 = 16 as const;"));
        let kotlin = files.iter().find(|f| f.filename == "SpacingTokens.kt").unwrap();
        assert!(kotlin.content.contains("val Spacing16 = 16.dp"));
        let swift = files.iter().find(|f| f.filename == "SpacingTokens.swift").unwrap();
        assert!(swift.content.contains("static let spacing16 = CGFloat(16)"));
    }
}
