//! Source generators for every supported platform.
//!
//! Color emitters share one [`Palette`] per request; composite, typography and spacing emitters
//! scan the values and typography trees directly.

pub mod composite;
pub mod css;
pub mod header;
pub mod kotlin;
pub mod naming;
pub mod palette;
pub mod scss;
pub mod spacing;
pub mod swift;
pub mod typescript;
pub mod typography;
pub mod web;

pub use composite::{emit_composite, CompositeKind, CompositeSources, CompositeToken};
pub use css::CssEmitter;
pub use header::{file_header, strip_timestamp};
pub use kotlin::KotlinEmitter;
pub use palette::{Palette, PaletteSources, Primitive, Semantic};
pub use scss::ScssEmitter;
pub use spacing::SpacingKind;
pub use swift::SwiftEmitter;
pub use typescript::TypeScriptEmitter;
pub use typography::{resolve_font_weight, TextStyle, TypographyEmitter};

use tokensync_common::{GeneratedFile, OutputFormat, Platform};
use tokensync_conventions::DetectedConventions;

/// Everything an emitter reads besides the tokens themselves
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub conventions: &'a DetectedConventions,
    pub generated_at: Option<&'a str>,
}

impl<'a> EmitContext<'a> {
    pub fn new(conventions: &'a DetectedConventions) -> Self {
        Self {
            conventions,
            generated_at: None,
        }
    }

    pub fn with_timestamp(mut self, generated_at: Option<&'a str>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

/// A color emitter renders the shared palette for one output format.
pub trait ColorEmitter {
    fn format(&self) -> OutputFormat;

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile>;
}

/// Color emitters for one platform, in output order
pub fn color_emitters(platform: Platform) -> Vec<Box<dyn ColorEmitter>> {
    match platform {
        Platform::Web => vec![
            Box::new(ScssEmitter::new()),
            Box::new(CssEmitter::new()),
            Box::new(TypeScriptEmitter::new()),
        ],
        Platform::Ios => vec![Box::new(SwiftEmitter::new())],
        Platform::Android => vec![Box::new(KotlinEmitter::new())],
    }
}

/// Renders the palette for every requested platform.
pub fn emit_colors(palette: &Palette, platforms: &[Platform], ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    for platform in Platform::all() {
        if !platforms.contains(&platform) {
            continue;
        }
        for emitter in color_emitters(platform) {
            let emitted = emitter.emit(palette, ctx);
            tracing::debug!("{:?} emitter produced {} files", emitter.format(), emitted.len());
            files.extend(emitted);
        }
    }
    files
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::palette::{Palette, PaletteSources};
    use serde_json::{json, Value};
    use tokensync_core::{alias_extensions, ColorValue, TokenGraph, TokenTree, DEFAULT_MAX_DEPTH};

    pub fn alias_leaf(target: &str, hex: &str) -> Value {
        let color = ColorValue::from_hex(hex).map(|c| c.to_json()).unwrap_or(Value::Null);
        json!({
            "$type": "color",
            "$value": color,
            "$extensions": alias_extensions(target)
        })
    }

    pub fn scenario_light() -> Value {
        json!({"Text": {"primary": alias_leaf("Colour/Grey/750", "#1d1d1d")}})
    }

    pub fn scenario_dark() -> Value {
        json!({"Text": {"primary": alias_leaf("Colour/Grey/50", "#f5f5f5")}})
    }

    pub fn tree(value: &Value) -> TokenTree {
        TokenTree::from_json(value).unwrap()
    }

    pub fn palette_from(light: Value, dark: Value) -> Palette {
        let light = tree(&light);
        let dark = tree(&dark);
        let light_graph = TokenGraph::build(&[&light]);
        let dark_graph = TokenGraph::build(&[&dark]);
        let (palette, _) = Palette::collect(&PaletteSources {
            light: &light,
            dark: &dark,
            primitives: None,
            light_graph: &light_graph,
            dark_graph: &dark_graph,
            max_depth: DEFAULT_MAX_DEPTH,
        });
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{palette_from, scenario_dark, scenario_light};

    #[test]
    fn test_emit_colors_respects_platforms() {
        let palette = palette_from(scenario_light(), scenario_dark());
        let conventions = DetectedConventions::best_practice();
        let ctx = EmitContext::new(&conventions);

        let web = emit_colors(&palette, &[Platform::Web], &ctx);
        let names: Vec<&str> = web.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["Primitives.scss", "Colors.scss", "primitives.css", "colors.css", "primitives.ts", "colors.ts"]
        );

        let all = emit_colors(&palette, &Platform::all(), &ctx);
        assert!(all.iter().any(|f| f.filename == "ColorTokens.kt"));
        assert!(all.iter().any(|f| f.filename == "Colors.swift"));
    }

    #[test]
    fn test_no_dangling_primitive_references() {
        let palette = palette_from(scenario_light(), scenario_dark());
        let conventions = DetectedConventions::best_practice();
        let files = emit_colors(&palette, &[Platform::Web], &EmitContext::new(&conventions));
        let primitives = &files[0].content;
        for name in ["$grey-750", "$grey-50"] {
            assert!(files[1].content.contains(name));
            assert!(primitives.contains(&format!("{}:", name)));
        }
    }

    #[test]
    fn test_emission_is_idempotent() {
        let conventions = DetectedConventions::best_practice();
        let ctx = EmitContext::new(&conventions).with_timestamp(Some("2026-01-01T00:00:00Z"));
        let first = emit_colors(&palette_from(scenario_light(), scenario_dark()), &Platform::all(), &ctx);
        let ctx = EmitContext::new(&conventions).with_timestamp(Some("2026-02-02T00:00:00Z"));
        let second = emit_colors(&palette_from(scenario_light(), scenario_dark()), &Platform::all(), &ctx);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a.content, b.content);
            assert_eq!(strip_timestamp(&a.content), strip_timestamp(&b.content));
        }
    }
}
