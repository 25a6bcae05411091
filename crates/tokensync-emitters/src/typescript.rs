use crate::header::file_header;
use crate::naming::code_identifier;
use crate::palette::Palette;
use crate::web::{family_blocks, web_color, web_identifier};
use crate::{ColorEmitter, EmitContext};
use std::collections::BTreeSet;
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole};
use tokensync_conventions::{DetectedConventions, NamingCase};

/// TypeScript emitter producing `primitives.ts` and `colors.ts`
pub struct TypeScriptEmitter;

impl TypeScriptEmitter {
    pub fn new() -> Self {
        Self
    }

    fn primitives_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let mut out = file_header(OutputFormat::TypeScript, "Primitive color palette", ctx.generated_at);
        out.push('\n');
        let blocks = family_blocks(
            palette,
            |title| format!("// {}\n", title),
            |primitive| {
                let value = format!("'{}'", web_color(&primitive.color, conventions));
                declaration(&ts_identifier(&primitive.words, conventions), &value, conventions)
            },
        );
        out.push_str(&blocks.join("\n"));
        out
    }

    fn colors_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let mut out = file_header(OutputFormat::TypeScript, "Semantic colors", ctx.generated_at);
        out.push('\n');

        let mut imports = BTreeSet::new();
        let mut lines = Vec::new();
        for semantic in &palette.semantics {
            let Some(light) = palette.primitive(&semantic.light) else {
                continue;
            };
            let light_name = ts_identifier(&light.words, conventions);
            let css_name = web_identifier(&semantic.words, conventions);
            let template = match semantic.dark.as_deref().and_then(|key| palette.primitive(key)) {
                Some(dark) => {
                    let dark_name = ts_identifier(&dark.words, conventions);
                    let value = format!(
                        "`var(--{}, light-dark(${{{}}}, ${{{}}}))`",
                        css_name, light_name, dark_name
                    );
                    imports.insert(dark_name);
                    value
                }
                None => format!("`var(--{}, ${{{}}})`", css_name, light_name),
            };
            imports.insert(light_name);
            lines.push(declaration(
                &ts_identifier(&semantic.words, conventions),
                &template,
                conventions,
            ));
        }

        if !imports.is_empty() {
            out.push_str("import {\n");
            for name in &imports {
                out.push_str(&format!("{}{},\n", conventions.web_indent, name));
            }
            out.push_str("} from './primitives';\n\n");
        }
        out.push_str(&lines.concat());
        out
    }
}

/// Kebab case cannot name a TypeScript binding, so it falls back to snake case.
pub(crate) fn ts_identifier(words: &[String], conventions: &DetectedConventions) -> String {
    let case = match conventions.naming_case {
        NamingCase::Kebab => NamingCase::Snake,
        case => case,
    };
    code_identifier(words, case)
}

pub(crate) fn declaration(name: &str, value: &str, conventions: &DetectedConventions) -> String {
    let annotation = if conventions.type_annotations { ": string" } else { "" };
    let marker = if conventions.as_const { " as const" } else { "" };
    format!("export const {}{} = {}{};\n", name, annotation, value, marker)
}

impl Default for TypeScriptEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEmitter for TypeScriptEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::TypeScript
    }

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if palette.is_empty() {
            return Vec::new();
        }
        vec![
            GeneratedFile::new("primitives.ts", self.primitives_file(palette, ctx), OutputFormat::TypeScript)
                .with_role(ReferenceRole::WebPrimitivesTs),
            GeneratedFile::new("colors.ts", self.colors_file(palette, ctx), OutputFormat::TypeScript)
                .with_role(ReferenceRole::WebColorsTs),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{palette_from, scenario_dark, scenario_light};
    use tokensync_conventions::HexCase;

    fn emit_with(conventions: &DetectedConventions) -> Vec<GeneratedFile> {
        let palette = palette_from(scenario_light(), scenario_dark());
        let ctx = EmitContext {
            conventions,
            generated_at: None,
        };
        TypeScriptEmitter::new().emit(&palette, &ctx)
    }

    #[test]
    fn test_best_practice_typescript() {
        let files = emit_with(&DetectedConventions::best_practice());
        assert!(files[0]
            .content
            .contains("export const GREY_750 = '#1d1d1d' as const;"));
        let colors = &files[1].content;
        assert!(colors.contains("import {\n  GREY_50,\n  GREY_750,\n} from './primitives';"));
        assert!(colors.contains(
            "export const TEXT_PRIMARY = `var(--text-primary, light-dark(${GREY_750}, ${GREY_50}))` as const;"
        ));
    }

    #[test]
    fn test_annotations_case_and_hex() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.naming_case = NamingCase::Camel;
        conventions.type_annotations = true;
        conventions.as_const = false;
        conventions.hex_case = HexCase::Upper;
        let files = emit_with(&conventions);
        assert!(files[0]
            .content
            .contains("export const grey750: string = '#1D1D1D';\n"));
        assert!(files[1].content.contains("export const textPrimary: string = `var(--text-primary"));
    }
}
