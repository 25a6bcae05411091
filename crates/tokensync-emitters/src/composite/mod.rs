//! Composite token emitters (shadow, border, radius, opacity, gradient, motion).
//!
//! Every kind implements [`CompositeKind`]; [`emit_composite`] does the scanning, naming and
//! per-platform file layout once for all of them.

mod border;
mod gradient;
mod motion;
mod opacity;
mod radius;
mod shadow;

pub use border::BorderKind;
pub use gradient::GradientKind;
pub use motion::{MotionKind, MotionValue};
pub use opacity::{is_opacity_path, normalize_opacity, OpacityKind};
pub use radius::RadiusKind;
pub use shadow::ShadowKind;

use crate::header::file_header;
use crate::kotlin::kotlin_identifier;
use crate::naming::{pascal_case, words_from_path};
use crate::swift::swift_identifier;
use crate::typescript::{declaration, ts_identifier};
use crate::web::web_identifier;
use crate::EmitContext;
use std::collections::HashSet;
use tokensync_common::{GeneratedFile, OutputFormat, Platform, ReferenceRole};
use tokensync_conventions::DetectedConventions;
use tokensync_core::{join_path, ColorValue, TokenGraph, TokenNode, TokenTree, TokenValue};
use tracing::debug;

/// One kind of composite token and how it renders on each platform.
pub trait CompositeKind {
    type Value;

    /// Singular kind word, used for file names and identifier prefixes
    fn word(&self) -> &'static str;

    /// Extracts this kind's value from a leaf. `value` is the leaf's value with aliases resolved.
    fn classify(&self, path: &[String], node: &TokenNode, value: &TokenValue) -> Option<Self::Value>;

    fn css(&self, value: &Self::Value, conventions: &DetectedConventions) -> String;

    fn ts(&self, value: &Self::Value, conventions: &DetectedConventions) -> String {
        format!("'{}'", self.css(value, conventions))
    }

    fn swift(&self, value: &Self::Value) -> String;

    fn kotlin(&self, value: &Self::Value) -> String;

    /// Identifier words for a token path
    fn words(&self, path: &[String]) -> Vec<String> {
        prefixed_words(self.word(), path)
    }

    /// Supporting Swift declarations placed before the token enum
    fn swift_support(&self, _indent: &str) -> Option<String> {
        None
    }

    /// Supporting Kotlin declarations placed before the token object
    fn kotlin_support(&self, _indent: &str) -> Option<String> {
        None
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &[]
    }

    fn css_role(&self) -> Option<ReferenceRole> {
        None
    }
}

/// Trees scanned by composite emitters plus the graph used to resolve aliased values
pub struct CompositeSources<'a> {
    pub trees: Vec<&'a TokenTree>,
    pub graph: &'a TokenGraph,
    pub max_depth: usize,
}

impl CompositeSources<'_> {
    /// The leaf's value, following its alias when the leaf carries none of its own
    pub fn resolved_value<'n>(&'n self, path: &[String], node: &'n TokenNode) -> &'n TokenValue {
        if matches!(node.value, TokenValue::Null) && node.alias_target.is_some() {
            if let Some(terminal) = self.graph.resolve_token(&join_path(path), self.max_depth) {
                return &terminal.value;
            }
        }
        &node.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeToken<V> {
    pub path: Vec<String>,
    pub words: Vec<String>,
    pub value: V,
}

/// Prepends the kind word unless the path already says it
pub fn prefixed_words(word: &str, path: &[String]) -> Vec<String> {
    let words = words_from_path(path);
    if words.iter().any(|w| w == word) {
        words
    } else {
        std::iter::once(word.to_string()).chain(words).collect()
    }
}

/// Every leaf of the given kind, first definition per identifier winning
pub fn collect<K: CompositeKind>(kind: &K, sources: &CompositeSources<'_>) -> Vec<CompositeToken<K::Value>> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for tree in &sources.trees {
        for (path, node) in tree.leaves() {
            let value = sources.resolved_value(&path, node);
            let Some(value) = kind.classify(&path, node, value) else {
                continue;
            };
            let words = kind.words(&path);
            if seen.insert(words.clone()) {
                tokens.push(CompositeToken { path, words, value });
            }
        }
    }
    tokens
}

/// Scans the sources for one kind and renders it for every requested platform.
pub fn emit_composite<K: CompositeKind>(
    kind: &K,
    sources: &CompositeSources<'_>,
    platforms: &[Platform],
    ctx: &EmitContext<'_>,
) -> Vec<GeneratedFile> {
    let tokens = collect(kind, sources);
    if tokens.is_empty() {
        return Vec::new();
    }
    debug!("Collected {} {} tokens", tokens.len(), kind.word());

    let mut files = Vec::new();
    if platforms.contains(&Platform::Web) {
        files.push(scss_file(kind, &tokens, ctx));
        files.push(css_file(kind, &tokens, ctx));
        files.push(ts_file(kind, &tokens, ctx));
    }
    if platforms.contains(&Platform::Ios) {
        files.push(swift_file(kind, &tokens, ctx));
    }
    if platforms.contains(&Platform::Android) {
        files.push(kotlin_file(kind, &tokens, ctx));
    }
    files
}

fn title(kind: &impl CompositeKind) -> String {
    pascal_case(&[kind.word().to_string()])
}

fn scss_file<K: CompositeKind>(kind: &K, tokens: &[CompositeToken<K::Value>], ctx: &EmitContext<'_>) -> GeneratedFile {
    let conventions = ctx.conventions;
    let mut out = file_header(OutputFormat::Scss, &format!("{} tokens", title(kind)), ctx.generated_at);
    out.push('\n');
    for token in tokens {
        out.push_str(&format!(
            "${}: {};\n",
            web_identifier(&token.words, conventions),
            kind.css(&token.value, conventions)
        ));
    }
    GeneratedFile::new(format!("{}.scss", title(kind)), out, OutputFormat::Scss)
}

fn css_file<K: CompositeKind>(kind: &K, tokens: &[CompositeToken<K::Value>], ctx: &EmitContext<'_>) -> GeneratedFile {
    let conventions = ctx.conventions;
    let indent = &conventions.web_indent;
    let mut out = file_header(OutputFormat::Css, &format!("{} tokens", title(kind)), ctx.generated_at);
    out.push_str("\n:root {\n");
    for token in tokens {
        out.push_str(&format!(
            "{}--{}: {};\n",
            indent,
            web_identifier(&token.words, conventions),
            kind.css(&token.value, conventions)
        ));
    }
    out.push_str("}\n");
    let file = GeneratedFile::new(format!("{}.css", kind.word()), out, OutputFormat::Css);
    match kind.css_role() {
        Some(role) => file.with_role(role),
        None => file,
    }
}

fn ts_file<K: CompositeKind>(kind: &K, tokens: &[CompositeToken<K::Value>], ctx: &EmitContext<'_>) -> GeneratedFile {
    let conventions = ctx.conventions;
    let mut out = file_header(OutputFormat::TypeScript, &format!("{} tokens", title(kind)), ctx.generated_at);
    out.push('\n');
    for token in tokens {
        out.push_str(&declaration(
            &ts_identifier(&token.words, conventions),
            &kind.ts(&token.value, conventions),
            conventions,
        ));
    }
    GeneratedFile::new(format!("{}.ts", kind.word()), out, OutputFormat::TypeScript)
}

fn swift_file<K: CompositeKind>(kind: &K, tokens: &[CompositeToken<K::Value>], ctx: &EmitContext<'_>) -> GeneratedFile {
    let i = &ctx.conventions.swift_indent;
    let type_name = format!("{}Tokens", title(kind));
    let mut out = file_header(OutputFormat::Swift, &format!("{} tokens", title(kind)), ctx.generated_at);
    out.push_str("\nimport SwiftUI\n\n");
    if let Some(support) = kind.swift_support(i) {
        out.push_str(&support);
        out.push('\n');
    }
    out.push_str(&format!("enum {} {{\n", type_name));
    for token in tokens {
        out.push_str(&format!(
            "{}static let {} = {}\n",
            i,
            swift_identifier(&token.words),
            kind.swift(&token.value)
        ));
    }
    out.push_str("}\n");
    GeneratedFile::new(format!("{}.swift", type_name), out, OutputFormat::Swift)
}

fn kotlin_file<K: CompositeKind>(kind: &K, tokens: &[CompositeToken<K::Value>], ctx: &EmitContext<'_>) -> GeneratedFile {
    let i = &ctx.conventions.kotlin_indent;
    let type_name = format!("{}Tokens", title(kind));
    let mut out = file_header(OutputFormat::Kotlin, &format!("{} tokens", title(kind)), ctx.generated_at);
    out.push_str(&format!("\npackage {}\n\n", ctx.conventions.kotlin_package));
    let imports = kind.kotlin_imports();
    for import in imports {
        out.push_str(&format!("import {}\n", import));
    }
    if !imports.is_empty() {
        out.push('\n');
    }
    if let Some(support) = kind.kotlin_support(i) {
        out.push_str(&support);
        out.push('\n');
    }
    out.push_str(&format!("object {} {{\n", type_name));
    for token in tokens {
        out.push_str(&format!(
            "{}val {} = {}\n",
            i,
            kotlin_identifier(&token.words),
            kind.kotlin(&token.value)
        ));
    }
    out.push_str("}\n");
    GeneratedFile::new(format!("{}.kt", type_name), out, OutputFormat::Kotlin)
}

/// Shortest decimal form, rounded to four places (`2`, `0.5`, `1.25`)
pub fn number(n: f64) -> String {
    let rounded = (n * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// CSS length in pixels, bare `0` for zero
pub fn px(n: f64) -> String {
    match number(n).as_str() {
        "0" => "0".to_string(),
        digits => format!("{}px", digits),
    }
}

/// Hex when opaque, `rgba()` otherwise
pub fn css_color(color: &ColorValue, conventions: &DetectedConventions) -> String {
    if color.is_opaque() {
        return color.web_hex(conventions.hex_case.is_upper());
    }
    let [r, g, b] = color.rgb_bytes();
    format!("rgba({}, {}, {}, {})", r, g, b, number(color.alpha))
}

/// Self-contained SwiftUI color expression
pub fn swift_color(color: &ColorValue) -> String {
    let [r, g, b] = color.components;
    format!(
        "Color(.sRGB, red: {}, green: {}, blue: {}, opacity: {})",
        number(r),
        number(g),
        number(b),
        number(color.alpha)
    )
}

/// Kotlin float literal (`0.5f`, `2f`)
pub fn kotlin_float(n: f64) -> String {
    format!("{}f", number(n))
}

/// Kotlin density-independent pixels (`8.dp`)
pub fn kotlin_dp(n: f64) -> String {
    format!("{}.dp", number(n))
}

pub(crate) fn path_contains(path: &[String], needle: &str) -> bool {
    path.iter().any(|segment| segment.to_ascii_lowercase().contains(needle))
}
