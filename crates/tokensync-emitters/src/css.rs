use crate::header::file_header;
use crate::palette::Palette;
use crate::scss::ResolvedNames;
use crate::web::{family_blocks, property_block, web_color, web_identifier};
use crate::{ColorEmitter, EmitContext};
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole};
use tokensync_conventions::{DetectedConventions, ScssColorStructure};

/// Plain CSS custom-property emitter producing `primitives.css` and `colors.css`
pub struct CssEmitter;

impl CssEmitter {
    pub fn new() -> Self {
        Self
    }

    fn primitives_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let indent = &conventions.web_indent;
        let mut out = file_header(OutputFormat::Css, "Primitive color palette", ctx.generated_at);
        out.push_str("\n:root {\n");
        let blocks = family_blocks(
            palette,
            |title| format!("{}/* {} */\n", indent, title),
            |primitive| {
                format!(
                    "{}--{}: {};\n",
                    indent,
                    web_identifier(&primitive.words, conventions),
                    web_color(&primitive.color, conventions)
                )
            },
        );
        out.push_str(&blocks.join("\n"));
        out.push_str("}\n");
        out
    }

    fn colors_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let indent = &conventions.web_indent;
        let mut out = file_header(OutputFormat::Css, "Semantic colors", ctx.generated_at);
        out.push_str("\n@import url('./primitives.css');\n\n");

        let tokens: Vec<ResolvedNames> = palette
            .semantics
            .iter()
            .filter_map(|semantic| ResolvedNames::new(palette, semantic, conventions))
            .collect();

        match conventions.scss_structure {
            ScssColorStructure::Modern => {
                for token in &tokens {
                    let initial = palette
                        .primitive(&token.semantic.light)
                        .map(|p| web_color(&p.color, conventions))
                        .unwrap_or_else(|| "transparent".to_string());
                    out.push_str(&property_block(&token.name, &initial, indent));
                    out.push('\n');
                }
                out.push_str(":root {\n");
                out.push_str(&format!("{}color-scheme: light dark;\n", indent));
                for token in &tokens {
                    let value = match &token.dark {
                        Some(dark) => format!("light-dark(var(--{}), var(--{}))", token.light, dark),
                        None => format!("var(--{})", token.light),
                    };
                    out.push_str(&format!("{}--{}: {};\n", indent, token.name, value));
                }
                out.push_str("}\n");
            }
            // Plain CSS has no variable layer, so the inline layout maps onto media queries
            ScssColorStructure::MediaQuery | ScssColorStructure::Inline => {
                out.push_str(&media_query_css(&tokens, conventions));
            }
        }
        out
    }
}

fn media_query_css(tokens: &[ResolvedNames<'_>], conventions: &DetectedConventions) -> String {
    let indent = &conventions.web_indent;
    let mut out = String::from(":root {\n");
    for token in tokens {
        out.push_str(&format!("{}--{}: var(--{});\n", indent, token.name, token.light));
    }
    out.push_str("}\n");

    let themed: Vec<_> = tokens.iter().filter(|t| t.dark.is_some()).collect();
    if !themed.is_empty() {
        out.push_str("\n@media (prefers-color-scheme: dark) {\n");
        out.push_str(&format!("{}:root {{\n", indent));
        for token in themed {
            if let Some(dark) = &token.dark {
                out.push_str(&format!("{i}{i}--{}: var(--{});\n", token.name, dark, i = indent));
            }
        }
        out.push_str(&format!("{}}}\n}}\n", indent));
    }
    out
}

impl Default for CssEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEmitter for CssEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Css
    }

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if palette.is_empty() {
            return Vec::new();
        }
        vec![
            GeneratedFile::new("primitives.css", self.primitives_file(palette, ctx), OutputFormat::Css)
                .with_role(ReferenceRole::WebPrimitivesCss),
            GeneratedFile::new("colors.css", self.colors_file(palette, ctx), OutputFormat::Css)
                .with_role(ReferenceRole::WebColorsCss),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{palette_from, scenario_dark, scenario_light};

    fn emit_with(conventions: &DetectedConventions) -> Vec<GeneratedFile> {
        let palette = palette_from(scenario_light(), scenario_dark());
        let ctx = EmitContext {
            conventions,
            generated_at: None,
        };
        CssEmitter::new().emit(&palette, &ctx)
    }

    #[test]
    fn test_primitives_are_custom_properties() {
        let files = emit_with(&DetectedConventions::best_practice());
        assert!(files[0].content.contains(":root {\n  /* Grey */\n  --grey-50: #f5f5f5;"));
        assert!(!files[0].content.contains('$'));
    }

    #[test]
    fn test_modern_colors_use_light_dark() {
        let files = emit_with(&DetectedConventions::best_practice());
        assert!(files[1]
            .content
            .contains("--text-primary: light-dark(var(--grey-750), var(--grey-50));"));
        assert!(files[1].content.contains("@property --text-primary"));
    }

    #[test]
    fn test_inline_maps_to_media_query() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.scss_structure = ScssColorStructure::Inline;
        let colors = &emit_with(&conventions)[1].content;
        assert!(colors.contains("--text-primary: var(--grey-750);"));
        assert!(colors.contains("@media (prefers-color-scheme: dark)"));
        assert!(colors.contains("    --text-primary: var(--grey-50);"));
    }
}
