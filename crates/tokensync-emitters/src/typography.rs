//! Text styles from `typography` composites and from groups of per-property leaves.

use crate::composite::{number, px, CompositeSources};
use crate::header::file_header;
use crate::kotlin::kotlin_identifier;
use crate::naming::{code_identifier, words_from_path};
use crate::swift::swift_identifier;
use crate::typescript::ts_identifier;
use crate::web::web_identifier;
use crate::EmitContext;
use std::collections::HashSet;
use tokensync_common::{GeneratedFile, OutputFormat, Platform, ReferenceRole, Warning, WarningKind};
use tokensync_conventions::NamingCase;
use tokensync_core::{join_path, Dimension, FontWeightValue, TokenType, TokenValue, TypographyValue};
use tracing::debug;

const DEFAULT_WEIGHT: u16 = 400;
const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Named weights, compared after lowercasing and dropping separators
const WEIGHT_NAMES: &[(&str, u16)] = &[
    ("thin", 100),
    ("hairline", 100),
    ("extralight", 200),
    ("ultralight", 200),
    ("light", 300),
    ("normal", 400),
    ("regular", 400),
    ("book", 400),
    ("medium", 500),
    ("semibold", 600),
    ("demibold", 600),
    ("bold", 700),
    ("extrabold", 800),
    ("ultrabold", 800),
    ("heavy", 900),
    ("black", 900),
];

/// Numeric CSS weight for a token value. The flag is set when an unrecognised value fell back
/// to 400; a missing weight is plain 400.
pub fn resolve_font_weight(weight: Option<&FontWeightValue>) -> (u16, bool) {
    match weight {
        None => (DEFAULT_WEIGHT, false),
        Some(FontWeightValue::Numeric(n)) => (n.round().clamp(1.0, 1000.0) as u16, false),
        Some(FontWeightValue::Named(name)) => {
            if let Ok(n) = name.trim().parse::<f64>() {
                return (n.round().clamp(1.0, 1000.0) as u16, false);
            }
            let key: String = name
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            WEIGHT_NAMES
                .iter()
                .find(|(known, _)| *known == key)
                .map(|(_, weight)| (*weight, false))
                .unwrap_or((DEFAULT_WEIGHT, true))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub path: Vec<String>,
    pub words: Vec<String>,
    pub font_family: Option<String>,
    pub font_size: Option<Dimension>,
    pub font_weight: u16,
    pub line_height: Option<Dimension>,
    pub letter_spacing: Option<Dimension>,
}

impl TextStyle {
    fn size_px(&self) -> f64 {
        self.font_size.as_ref().map(Dimension::to_px).unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Line height in points; unitless and percentage heights scale with the font size
    pub fn line_height_px(&self) -> Option<f64> {
        let height = self.line_height.as_ref()?;
        Some(match height.unit.as_str() {
            "" => height.value * self.size_px(),
            "%" => height.value / 100.0 * self.size_px(),
            _ => height.to_px(),
        })
    }

    pub fn letter_spacing_px(&self) -> f64 {
        match &self.letter_spacing {
            None => 0.0,
            Some(spacing) => match spacing.unit.as_str() {
                "%" => spacing.value / 100.0 * self.size_px(),
                "em" => spacing.value * self.size_px(),
                _ => spacing.to_px(),
            },
        }
    }

    /// `(property, value)` pairs for web output, in declaration order
    fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();
        if let Some(family) = &self.font_family {
            props.push(("font-family", format!("'{}'", family)));
        }
        if let Some(size) = &self.font_size {
            props.push(("font-size", css_dimension(size)));
        }
        props.push(("font-weight", self.font_weight.to_string()));
        if let Some(height) = &self.line_height {
            props.push(("line-height", css_dimension(height)));
        }
        if let Some(spacing) = &self.letter_spacing {
            props.push(("letter-spacing", css_dimension(spacing)));
        }
        props
    }
}

fn css_dimension(dimension: &Dimension) -> String {
    match dimension.unit.as_str() {
        "" => number(dimension.value),
        "px" => px(dimension.value),
        unit => format!("{}{}", number(dimension.value), unit),
    }
}

fn dimension_of(value: &TokenValue, default_unit: &str) -> Option<Dimension> {
    match value {
        TokenValue::Dimension(d) => Some(d.clone()),
        TokenValue::Number(n) if default_unit.is_empty() && *n >= 4.0 => Some(Dimension::new(*n, "px")),
        TokenValue::Number(n) => Some(Dimension::new(*n, default_unit)),
        _ => None,
    }
}

/// Property leaves gathered under one group path
#[derive(Default)]
struct PropertyGroup {
    value: TypographyValue,
    seen: bool,
}

impl PropertyGroup {
    fn apply(&mut self, token_type: &TokenType, value: &TokenValue) {
        match (token_type, value) {
            (TokenType::FontFamily, TokenValue::FontFamily(family)) => {
                self.value.font_family = Some(family.clone())
            }
            (TokenType::FontFamily, TokenValue::Text(family)) => self.value.font_family = Some(family.clone()),
            (TokenType::FontWeight, TokenValue::FontWeight(weight)) => {
                self.value.font_weight = Some(weight.clone())
            }
            (TokenType::FontWeight, TokenValue::Number(n)) => {
                self.value.font_weight = Some(FontWeightValue::Numeric(*n))
            }
            (TokenType::FontSize, value) => self.value.font_size = dimension_of(value, "px"),
            (TokenType::LineHeight, value) => self.value.line_height = dimension_of(value, ""),
            (TokenType::LetterSpacing, value) => self.value.letter_spacing = dimension_of(value, "px"),
            _ => return,
        }
        self.seen = true;
    }
}

pub struct TypographyEmitter;

impl TypographyEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Text styles in tree order plus a warning for every weight that needed the fallback
    pub fn collect(&self, sources: &CompositeSources<'_>) -> (Vec<TextStyle>, Vec<Warning>) {
        let mut raw: Vec<(Vec<String>, TypographyValue)> = Vec::new();
        let mut groups: Vec<(Vec<String>, PropertyGroup)> = Vec::new();

        for tree in &sources.trees {
            for (path, node) in tree.leaves() {
                let value = sources.resolved_value(&path, node);
                if let TokenValue::Typography(typography) = value {
                    raw.push((path, typography.clone()));
                } else if node.token_type.is_typography_property() && path.len() > 1 {
                    let parent = path[..path.len() - 1].to_vec();
                    let index = match groups.iter().position(|(p, _)| *p == parent) {
                        Some(index) => index,
                        None => {
                            groups.push((parent, PropertyGroup::default()));
                            groups.len() - 1
                        }
                    };
                    groups[index].1.apply(&node.token_type, value);
                }
            }
        }
        raw.extend(
            groups
                .into_iter()
                .filter(|(_, group)| group.seen)
                .map(|(path, group)| (path, group.value)),
        );

        let mut seen = HashSet::new();
        let mut styles = Vec::new();
        let mut warnings = Vec::new();
        for (path, value) in raw {
            let words = words_from_path(&path);
            if !seen.insert(words.clone()) {
                continue;
            }
            let (font_weight, fell_back) = resolve_font_weight(value.font_weight.as_ref());
            if fell_back {
                let joined = join_path(&path);
                warnings.push(
                    Warning::new(
                        WarningKind::FontWeightFallback,
                        format!("Unrecognised font weight on {}, using 400", joined),
                    )
                    .with_detail(serde_json::json!({ "path": joined, "weight": value.font_weight })),
                );
            }
            styles.push(TextStyle {
                path,
                words,
                font_family: value.font_family,
                font_size: value.font_size,
                font_weight,
                line_height: value.line_height,
                letter_spacing: value.letter_spacing,
            });
        }
        debug!("Collected {} text styles", styles.len());
        (styles, warnings)
    }

    pub fn emit(
        &self,
        sources: &CompositeSources<'_>,
        platforms: &[Platform],
        ctx: &EmitContext<'_>,
    ) -> (Vec<GeneratedFile>, Vec<Warning>) {
        let (styles, warnings) = self.collect(sources);
        if styles.is_empty() {
            return (Vec::new(), warnings);
        }
        let mut files = Vec::new();
        if platforms.contains(&Platform::Web) {
            files.push(self.scss_file(&styles, ctx));
            files.push(self.css_file(&styles, ctx));
            files.push(self.ts_file(&styles, ctx));
        }
        if platforms.contains(&Platform::Ios) {
            files.push(self.swift_file(&styles, ctx));
        }
        if platforms.contains(&Platform::Android) {
            files.push(self.kotlin_file(&styles, ctx));
        }
        (files, warnings)
    }

    fn css_rules(&self, styles: &[TextStyle], ctx: &EmitContext<'_>, selector: impl Fn(&str) -> String) -> String {
        let indent = &ctx.conventions.web_indent;
        let rules: Vec<String> = styles
            .iter()
            .map(|style| {
                let mut rule = format!("{} {{\n", selector(&web_identifier(&style.words, ctx.conventions)));
                for (property, value) in style.css_properties() {
                    rule.push_str(&format!("{}{}: {};\n", indent, property, value));
                }
                rule.push_str("}\n");
                rule
            })
            .collect();
        rules.join("\n")
    }

    fn scss_file(&self, styles: &[TextStyle], ctx: &EmitContext<'_>) -> GeneratedFile {
        let mut out = file_header(OutputFormat::Scss, "Text styles", ctx.generated_at);
        out.push('\n');
        out.push_str(&self.css_rules(styles, ctx, |name| format!("@mixin {}", name)));
        GeneratedFile::new("Typography.scss", out, OutputFormat::Scss).with_role(ReferenceRole::WebTypographyScss)
    }

    fn css_file(&self, styles: &[TextStyle], ctx: &EmitContext<'_>) -> GeneratedFile {
        let mut out = file_header(OutputFormat::Css, "Text styles", ctx.generated_at);
        out.push('\n');
        out.push_str(&self.css_rules(styles, ctx, |name| format!(".{}", name)));
        GeneratedFile::new("typography.css", out, OutputFormat::Css)
    }

    fn ts_file(&self, styles: &[TextStyle], ctx: &EmitContext<'_>) -> GeneratedFile {
        let conventions = ctx.conventions;
        let indent = &conventions.web_indent;
        let marker = if conventions.as_const { " as const" } else { "" };
        let mut out = file_header(OutputFormat::TypeScript, "Text styles", ctx.generated_at);
        out.push('\n');
        for style in styles {
            out.push_str(&format!(
                "export const {} = {{\n",
                ts_identifier(&style.words, conventions)
            ));
            for (property, value) in style.css_properties() {
                let key = code_identifier(&words_from_path(&[property]), NamingCase::Camel);
                let value = match property {
                    "font-weight" | "font-family" => value,
                    _ => format!("'{}'", value),
                };
                out.push_str(&format!("{}{}: {},\n", indent, key, value));
            }
            out.push_str(&format!("}}{};\n", marker));
        }
        GeneratedFile::new("typography.ts", out, OutputFormat::TypeScript)
    }

    fn swift_file(&self, styles: &[TextStyle], ctx: &EmitContext<'_>) -> GeneratedFile {
        let i = &ctx.conventions.swift_indent;
        let mut out = file_header(OutputFormat::Swift, "Text styles", ctx.generated_at);
        out.push_str("\nimport SwiftUI\n\n");
        out.push_str(&format!(
            "struct TextStyle {{\n{i}let font: Font\n{i}let lineHeight: CGFloat?\n{i}let tracking: CGFloat\n}}\n\n"
        ));
        out.push_str("enum Typography {\n");
        for style in styles {
            let size = number(style.size_px());
            let weight = swift_weight(style.font_weight);
            let font = match &style.font_family {
                Some(family) => format!(".custom(\"{}\", size: {}).weight(.{})", family, size, weight),
                None => format!(".system(size: {}, weight: .{})", size, weight),
            };
            let line_height = style
                .line_height_px()
                .map(number)
                .unwrap_or_else(|| "nil".to_string());
            out.push_str(&format!(
                "{}static let {} = TextStyle(font: {}, lineHeight: {}, tracking: {})\n",
                i,
                swift_identifier(&style.words),
                font,
                line_height,
                number(style.letter_spacing_px())
            ));
        }
        out.push_str("}\n");
        GeneratedFile::new("Typography.swift", out, OutputFormat::Swift).with_role(ReferenceRole::IosTypographySwift)
    }

    fn kotlin_file(&self, styles: &[TextStyle], ctx: &EmitContext<'_>) -> GeneratedFile {
        let i = &ctx.conventions.kotlin_indent;
        let mut out = file_header(OutputFormat::Kotlin, "Text styles", ctx.generated_at);
        out.push_str(&format!("\npackage {}\n\n", ctx.conventions.kotlin_package));
        for import in [
            "androidx.compose.ui.text.TextStyle",
            "androidx.compose.ui.text.font.FontWeight",
            "androidx.compose.ui.unit.sp",
        ] {
            out.push_str(&format!("import {}\n", import));
        }
        out.push_str("\nobject TypographyTokens {\n");
        let blocks: Vec<String> = styles
            .iter()
            .map(|style| {
                let mut block = String::new();
                // Custom families need font resources, so only the name is recorded
                if let Some(family) = &style.font_family {
                    block.push_str(&format!("{}// Font family: {}\n", i, family));
                }
                block.push_str(&format!("{}val {} = TextStyle(\n", i, kotlin_identifier(&style.words)));
                block.push_str(&format!("{i}{i}fontSize = {}.sp,\n", number(style.size_px())));
                block.push_str(&format!("{i}{i}fontWeight = FontWeight({}),\n", style.font_weight));
                if let Some(height) = style.line_height_px() {
                    block.push_str(&format!("{i}{i}lineHeight = {}.sp,\n", number(height)));
                }
                block.push_str(&format!("{i}{i}letterSpacing = {}.sp,\n", number(style.letter_spacing_px())));
                block.push_str(&format!("{})\n", i));
                block
            })
            .collect();
        out.push_str(&blocks.join("\n"));
        out.push_str("}\n");
        GeneratedFile::new("Typography.kt", out, OutputFormat::Kotlin).with_role(ReferenceRole::AndroidTypographyKotlin)
    }
}

/// SwiftUI `Font.Weight` case for the nearest hundred
fn swift_weight(weight: u16) -> &'static str {
    match (weight + 50) / 100 {
        0 | 1 => "ultraLight",
        2 => "thin",
        3 => "light",
        4 => "regular",
        5 => "medium",
        6 => "semibold",
        7 => "bold",
        8 => "heavy",
        _ => "black",
    }
}

impl Default for TypographyEmitter {
    fn default() -> Self {
        Self::new()
    }
}
