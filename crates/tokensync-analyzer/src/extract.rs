//! Declaration extraction from generated or reference source text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tokensync_common::OutputFormat;
use tokensync_emitters::naming::words_from_path;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid extraction regex"))
        }
    };
}

cached_regex!(scss_decl_re, r"(?m)^\s*\$([A-Za-z0-9_-]+)\s*:\s*([^;]+);");
cached_regex!(css_decl_re, r"--([A-Za-z0-9_-]+)\s*:\s*([^;]+);");
cached_regex!(
    ts_decl_re,
    r"export\s+const\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?::\s*[^=]+?)?\s*=\s*([^;]+);"
);
cached_regex!(
    swift_decl_re,
    r"(?m)^\s*(?:public\s+|private\s+)?static\s+(?:let|var)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[A-Za-z0-9_.\[\]?]+)?\s*(?:=\s*(.+?)|\{\s*(.+?)\s*\})\s*$"
);
cached_regex!(
    kotlin_decl_re,
    r"(?m)^\s*(?:private\s+|internal\s+)?va[lr]\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[A-Za-z0-9_.<>?]+)?\s*=\s*(.+?)\s*$"
);
cached_regex!(web_hex_re, r"#([0-9A-Fa-f]{8}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3,4})\b");
cached_regex!(int_hex_re, r"0x([0-9A-Fa-f]{8}|[0-9A-Fa-f]{6})\b");

/// One named declaration found in a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Identifier as written
    pub name: String,
    /// Lowercase words joined by `-`, comparable across platforms
    pub canonical: String,
    pub value: String,
    /// `#rrggbb` or `#rrggbbaa` when the value is a color literal
    pub color: Option<String>,
}

/// Cross-platform comparable form of an identifier (`GREY_750`, `grey750`, `Grey750` all
/// become `grey-750`)
pub fn canonical_name(name: &str) -> String {
    words_from_path(&[name]).join("-")
}

/// Declarations in file order, first one per canonical name
pub fn extract_declarations(content: &str, format: OutputFormat) -> Vec<Declaration> {
    let re = match format {
        OutputFormat::Scss => scss_decl_re(),
        OutputFormat::Css => css_decl_re(),
        OutputFormat::TypeScript => ts_decl_re(),
        OutputFormat::Swift => swift_decl_re(),
        OutputFormat::Kotlin => kotlin_decl_re(),
    };

    let mut seen = HashSet::new();
    let mut declarations = Vec::new();
    for caps in re.captures_iter(content) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Some(raw) = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()) else {
            continue;
        };
        let value = clean_value(raw);
        let canonical = canonical_name(name);
        if canonical.is_empty() || !seen.insert(canonical.clone()) {
            continue;
        }
        declarations.push(Declaration {
            name: name.to_string(),
            color: normalized_color(&value, format),
            canonical,
            value,
        });
    }
    declarations
}

fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(',').trim_end();
    trimmed
        .strip_suffix("as const")
        .map(str::trim_end)
        .unwrap_or(trimmed)
        .to_string()
}

/// Canonical `#rrggbb[aa]` for the first color literal in a value. Swift integer literals are
/// RGBA, Kotlin ones ARGB. An opaque alpha is dropped.
pub fn normalized_color(value: &str, format: OutputFormat) -> Option<String> {
    if let Some(caps) = web_hex_re().captures(value) {
        return Some(canonical_hex(&expand_short_hex(caps.get(1)?.as_str())));
    }
    let digits = int_hex_re().captures(value)?.get(1)?.as_str().to_ascii_lowercase();
    let rgba = match (format, digits.len()) {
        (OutputFormat::Kotlin, 8) => format!("{}{}", &digits[2..], &digits[..2]),
        _ => digits,
    };
    Some(canonical_hex(&rgba))
}

fn expand_short_hex(digits: &str) -> String {
    if digits.len() <= 4 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    }
}

fn canonical_hex(digits: &str) -> String {
    let lower = digits.to_ascii_lowercase();
    match lower.strip_suffix("ff") {
        Some(rgb) if lower.len() == 8 => format!("#{}", rgb),
        _ => format!("#{}", lower),
    }
}
