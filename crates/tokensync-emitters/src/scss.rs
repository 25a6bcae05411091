use crate::header::file_header;
use crate::palette::{Palette, Semantic};
use crate::web::{family_blocks, primitive_name, property_block, scss_import, web_color, web_identifier};
use crate::{ColorEmitter, EmitContext};
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole};
use tokensync_conventions::{DetectedConventions, ScssColorStructure};

/// SCSS color emitter producing `Primitives.scss` and `Colors.scss`
pub struct ScssEmitter;

impl ScssEmitter {
    pub fn new() -> Self {
        Self
    }

    fn primitives_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let mut out = file_header(OutputFormat::Scss, "Primitive color palette", ctx.generated_at);
        out.push('\n');
        let blocks = family_blocks(
            palette,
            |title| format!("// {}\n", title),
            |primitive| {
                format!(
                    "${}: {};\n",
                    web_identifier(&primitive.words, conventions),
                    web_color(&primitive.color, conventions)
                )
            },
        );
        out.push_str(&blocks.join("\n"));
        out
    }

    fn colors_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> String {
        let conventions = ctx.conventions;
        let mut out = file_header(OutputFormat::Scss, "Semantic colors", ctx.generated_at);
        out.push('\n');
        out.push_str(scss_import(conventions.import_style));
        out.push_str("\n\n");

        let tokens: Vec<ResolvedNames> = palette
            .semantics
            .iter()
            .filter_map(|semantic| ResolvedNames::new(palette, semantic, conventions))
            .collect();

        let body = match conventions.scss_structure {
            ScssColorStructure::Modern => modern_body(palette, &tokens, conventions),
            ScssColorStructure::MediaQuery => media_query_body(&tokens, conventions),
            ScssColorStructure::Inline => inline_body(&tokens),
        };
        out.push_str(&body);
        out
    }
}

impl Default for ScssEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEmitter for ScssEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Scss
    }

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if palette.is_empty() {
            return Vec::new();
        }
        vec![
            GeneratedFile::new("Primitives.scss", self.primitives_file(palette, ctx), OutputFormat::Scss)
                .with_role(ReferenceRole::WebPrimitivesScss),
            GeneratedFile::new("Colors.scss", self.colors_file(palette, ctx), OutputFormat::Scss)
                .with_role(ReferenceRole::WebColorsScss),
        ]
    }
}

/// Web identifiers of one semantic and the primitives it points at
pub(crate) struct ResolvedNames<'a> {
    pub semantic: &'a Semantic,
    pub name: String,
    pub light: String,
    pub dark: Option<String>,
}

impl<'a> ResolvedNames<'a> {
    pub(crate) fn new(palette: &Palette, semantic: &'a Semantic, conventions: &DetectedConventions) -> Option<Self> {
        let light = primitive_name(palette, &semantic.light, conventions)?;
        let dark = match &semantic.dark {
            Some(key) => Some(primitive_name(palette, key, conventions)?),
            None => None,
        };
        Some(Self {
            semantic,
            name: web_identifier(&semantic.words, conventions),
            light,
            dark,
        })
    }
}

fn aliases(tokens: &[ResolvedNames<'_>]) -> String {
    tokens
        .iter()
        .map(|t| format!("${}: var(--{});\n", t.name, t.name))
        .collect()
}

fn modern_body(palette: &Palette, tokens: &[ResolvedNames<'_>], conventions: &DetectedConventions) -> String {
    let indent = &conventions.web_indent;
    let mut out = String::new();

    for token in tokens {
        let initial = palette
            .primitive(&token.semantic.light)
            .map(|p| web_color(&p.color, conventions))
            .unwrap_or_else(|| "transparent".to_string());
        out.push_str(&property_block(&token.name, &initial, indent));
        out.push('\n');
    }

    out.push_str(":root {\n");
    out.push_str(&format!("{}color-scheme: light dark;\n", indent));
    for token in tokens {
        let value = match &token.dark {
            Some(dark) => format!("light-dark(#{{${}}}, #{{${}}})", token.light, dark),
            None => format!("#{{${}}}", token.light),
        };
        out.push_str(&format!("{}--{}: {};\n", indent, token.name, value));
    }
    out.push_str("}\n\n");
    out.push_str(&aliases(tokens));
    out
}

fn media_query_body(tokens: &[ResolvedNames<'_>], conventions: &DetectedConventions) -> String {
    let indent = &conventions.web_indent;
    let mut out = String::from(":root {\n");
    for token in tokens {
        out.push_str(&format!("{}--{}: #{{${}}};\n", indent, token.name, token.light));
    }
    out.push_str("}\n\n");

    let themed: Vec<&ResolvedNames<'_>> = tokens.iter().filter(|t| t.dark.is_some()).collect();
    if !themed.is_empty() {
        out.push_str("@media (prefers-color-scheme: dark) {\n");
        out.push_str(&format!("{}:root {{\n", indent));
        for token in themed {
            if let Some(dark) = &token.dark {
                out.push_str(&format!("{i}{i}--{}: #{{${}}};\n", token.name, dark, i = indent));
            }
        }
        out.push_str(&format!("{}}}\n", indent));
        out.push_str("}\n\n");
    }
    out.push_str(&aliases(tokens));
    out
}

fn inline_body(tokens: &[ResolvedNames<'_>]) -> String {
    tokens
        .iter()
        .map(|t| match &t.dark {
            Some(dark) => format!(
                "${}: var(--{}, light-dark(${}, ${}));\n",
                t.name, t.name, t.light, dark
            ),
            None => format!("${}: var(--{}, ${});\n", t.name, t.name, t.light),
        })
        .collect()
}
