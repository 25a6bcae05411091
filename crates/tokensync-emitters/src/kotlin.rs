use crate::header::file_header;
use crate::naming::{code_identifier, title_case, words_from_path};
use crate::palette::{Palette, Primitive, Semantic};
use crate::{ColorEmitter, EmitContext};
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole};
use tokensync_conventions::{KotlinArchitecture, NamingCase};
use tokensync_core::ColorValue;

/// Jetpack Compose emitter. Single-file writes `ColorTokens.kt`; multi-file writes
/// `Primitives.kt` plus one `R<Category>Colors.kt` per semantic category.
pub struct KotlinEmitter;

impl KotlinEmitter {
    pub fn new() -> Self {
        Self
    }

    fn preamble(&self, ctx: &EmitContext<'_>, description: &str, imports: &[&str]) -> String {
        let mut out = file_header(OutputFormat::Kotlin, description, ctx.generated_at);
        out.push_str(&format!("\npackage {}\n\n", ctx.conventions.kotlin_package));
        for import in imports {
            out.push_str(&format!("import {}\n", import));
        }
        out.push('\n');
        out
    }

    fn primitives_object(&self, palette: &Palette, i: &str) -> String {
        let blocks: Vec<String> = palette
            .families()
            .into_iter()
            .map(|(family, members)| {
                let mut block = format!("{}// {}\n", i, title_case(family));
                for primitive in members {
                    block.push_str(&format!(
                        "{}val {} = {}\n",
                        i,
                        kotlin_identifier(&primitive.words),
                        color_literal(&primitive.color)
                    ));
                }
                block
            })
            .collect();
        format!("object Primitives {{\n{}}}\n", blocks.join("\n"))
    }

    fn single_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> GeneratedFile {
        let i = &ctx.conventions.kotlin_indent;
        let mut out = self.preamble(ctx, "Color tokens", &["androidx.compose.ui.graphics.Color"]);
        out.push_str(&self.primitives_object(palette, i));

        for (object, dark) in [("LightColorTokens", false), ("DarkColorTokens", true)] {
            out.push_str(&format!("\nobject {} {{\n", object));
            for semantic in &palette.semantics {
                let key = if dark { semantic.dark_key() } else { &semantic.light };
                if let Some(primitive) = palette.primitive(key) {
                    out.push_str(&format!(
                        "{}val {} = Primitives.{}\n",
                        i,
                        kotlin_identifier(&semantic.words),
                        kotlin_identifier(&primitive.words)
                    ));
                }
            }
            out.push_str("}\n");
        }

        GeneratedFile::new("ColorTokens.kt", out, OutputFormat::Kotlin)
            .with_role(ReferenceRole::AndroidColorsKotlin)
    }

    fn multi_file(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        let i = &ctx.conventions.kotlin_indent;
        let mut primitives = self.preamble(ctx, "Primitive color palette", &["androidx.compose.ui.graphics.Color"]);
        primitives.push_str(&self.primitives_object(palette, i));

        let mut files = vec![GeneratedFile::new("Primitives.kt", primitives, OutputFormat::Kotlin)
            .with_role(ReferenceRole::AndroidPrimitivesKotlin)];

        for (category, semantics) in palette.categories() {
            let members: Vec<Member> = semantics
                .into_iter()
                .filter_map(|semantic| Member::new(palette, semantic))
                .collect();
            if members.is_empty() {
                continue;
            }
            let class_name = format!("R{}Colors", code_identifier(&words_from_path(&[category]), NamingCase::Pascal));
            let content = self.category_file(ctx, &class_name, &members);
            files.push(
                GeneratedFile::new(format!("{}.kt", class_name), content, OutputFormat::Kotlin)
                    .with_role(ReferenceRole::AndroidColorsKotlin),
            );
        }
        files
    }

    fn category_file(&self, ctx: &EmitContext<'_>, class_name: &str, members: &[Member]) -> String {
        let i = &ctx.conventions.kotlin_indent;
        let token_enum = format!("{}Token", class_name.trim_end_matches('s'));
        let local_name = format!("Local{}", class_name);
        let accessor = lower_first(class_name);
        let mut out = self.preamble(
            ctx,
            &format!("{} color scheme", class_name),
            &[
                "androidx.compose.material3.MaterialTheme",
                "androidx.compose.runtime.Composable",
                "androidx.compose.runtime.ReadOnlyComposable",
                "androidx.compose.runtime.Stable",
                "androidx.compose.runtime.compositionLocalOf",
                "androidx.compose.runtime.getValue",
                "androidx.compose.runtime.mutableStateOf",
                "androidx.compose.runtime.setValue",
                "androidx.compose.ui.graphics.Color",
            ],
        );

        out.push_str(&format!("enum class {} {{\n", token_enum));
        for member in members {
            out.push_str(&format!("{}{},\n", i, member.entry));
        }
        out.push_str("}\n\n");

        out.push_str(&format!("@Stable\nclass {}(\n", class_name));
        for member in members {
            out.push_str(&format!("{}{}: Color,\n", i, member.property));
        }
        out.push_str(") {\n");
        for member in members {
            out.push_str(&format!(
                "{i}var {p} by mutableStateOf({p})\n{i}{i}private set\n",
                p = member.property
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "{i}operator fun get(token: {}): Color = when (token) {{\n",
            token_enum
        ));
        for member in members {
            out.push_str(&format!(
                "{i}{i}{}.{} -> {}\n",
                token_enum, member.entry, member.property
            ));
        }
        out.push_str(&format!("{i}}}\n}}\n"));

        for (prefix, dark) in [("light", false), ("dark", true)] {
            out.push_str(&format!("\nfun {}{}() = {}(\n", prefix, class_name, class_name));
            for member in members {
                let value = if dark { &member.dark } else { &member.light };
                out.push_str(&format!("{}{} = Primitives.{},\n", i, member.property, value));
            }
            out.push_str(")\n");
        }

        out.push_str(&format!(
            "\nval {} = compositionLocalOf {{ light{}() }}\n",
            local_name, class_name
        ));
        out.push_str(&format!(
            "\nval MaterialTheme.{}: {}\n{i}@Composable\n{i}@ReadOnlyComposable\n{i}get() = {}.current\n",
            accessor, class_name, local_name
        ));
        out
    }
}

/// One semantic color inside a multi-file category class
struct Member {
    entry: String,
    property: String,
    light: String,
    dark: String,
}

impl Member {
    fn new(palette: &Palette, semantic: &Semantic) -> Option<Self> {
        let light = palette.primitive(&semantic.light)?;
        let dark = palette.primitive(semantic.dark_key())?;
        let local_words = if semantic.path.len() > 1 {
            words_from_path(&semantic.path[1..])
        } else {
            semantic.words.clone()
        };
        Some(Self {
            entry: code_identifier(&local_words, NamingCase::Pascal),
            property: code_identifier(&local_words, NamingCase::Camel),
            light: primitive_name(light),
            dark: primitive_name(dark),
        })
    }
}

fn primitive_name(primitive: &Primitive) -> String {
    kotlin_identifier(&primitive.words)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn kotlin_identifier(words: &[String]) -> String {
    code_identifier(words, NamingCase::Pascal)
}

/// `Color(0xAARRGGBB)`, alpha byte leading
pub fn color_literal(color: &ColorValue) -> String {
    format!("Color(0x{})", color.argb_digits())
}

impl Default for KotlinEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorEmitter for KotlinEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Kotlin
    }

    fn emit(&self, palette: &Palette, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if palette.is_empty() {
            return Vec::new();
        }
        match ctx.conventions.kotlin_architecture {
            KotlinArchitecture::SingleFile => vec![self.single_file(palette, ctx)],
            KotlinArchitecture::MultiFile => self.multi_file(palette, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{palette_from, scenario_dark, scenario_light};
    use tokensync_conventions::DetectedConventions;

    fn emit_with(conventions: &DetectedConventions) -> Vec<GeneratedFile> {
        let palette = palette_from(scenario_light(), scenario_dark());
        let ctx = EmitContext {
            conventions,
            generated_at: None,
        };
        KotlinEmitter::new().emit(&palette, &ctx)
    }

    #[test]
    fn test_single_file_layout() {
        let files = emit_with(&DetectedConventions::best_practice());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "ColorTokens.kt");
        let content = &files[0].content;
        assert!(content.contains("package com.design.tokens\n"));
        assert!(content.contains("object Primitives {\n    // Grey\n    val Grey50 = Color(0xFFF5F5F5)\n"));
        assert!(content.contains("object LightColorTokens {\n    val TextPrimary = Primitives.Grey750\n}"));
        assert!(content.contains("object DarkColorTokens {\n    val TextPrimary = Primitives.Grey50\n}"));
    }

    #[test]
    fn test_multi_file_layout() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.kotlin_architecture = KotlinArchitecture::MultiFile;
        conventions.kotlin_package = "com.acme.theme".to_string();
        let files = emit_with(&conventions);
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["Primitives.kt", "RTextColors.kt"]);

        let text = &files[1].content;
        assert!(text.contains("package com.acme.theme"));
        assert!(text.contains("enum class RTextColorToken {\n    Primary,\n}"));
        assert!(text.contains("@Stable\nclass RTextColors(\n    primary: Color,\n) {"));
        assert!(text.contains("fun lightRTextColors() = RTextColors(\n    primary = Primitives.Grey750,\n)"));
        assert!(text.contains("fun darkRTextColors() = RTextColors(\n    primary = Primitives.Grey50,\n)"));
        assert!(text.contains("val LocalRTextColors = compositionLocalOf { lightRTextColors() }"));
        assert!(text.contains("val MaterialTheme.rTextColors: RTextColors"));
    }

    #[test]
    fn test_alpha_byte_leads() {
        let c = 29.0 / 255.0;
        let color = ColorValue::from_components([c, c, c], 0.5);
        assert_eq!(color_literal(&color), "Color(0x801D1D1D)");
    }
}
