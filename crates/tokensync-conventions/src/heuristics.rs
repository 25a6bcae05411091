//! Regex-count heuristics, one pure function per stylistic dimension.
//!
//! Each function scores a single dimension over concatenated reference text and returns a
//! [`Detection`]. These are pattern counts, not parsers; minified or adversarial input can
//! mislead them.

use crate::conventions::{
    Detection, HexCase, ImportStyle, KotlinArchitecture, NamingCase, ScssColorStructure, Separator,
    SwiftContainer, SwiftPrimitiveFormat, SwiftSemanticFormat,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid heuristic regex"))
        }
    };
}

cached_regex!(web_identifier_re, r"(?:\$|--)([A-Za-z][A-Za-z0-9_-]*)");
cached_regex!(const_decl_re, r"\bconst\s+([A-Za-z_$][A-Za-z0-9_$]*)");
cached_regex!(screaming_re, r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*$");
cached_regex!(pascal_re, r"^[A-Z][a-zA-Z0-9]*$");
cached_regex!(camel_re, r"^[a-z][a-zA-Z0-9]*$");
cached_regex!(hex_literal_re, r"#([0-9A-Fa-f]{8}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3,4})\b");
cached_regex!(use_re, r"@use\s+['\x22]");
cached_regex!(import_re, r"@import\s+['\x22]");
cached_regex!(dark_media_re, r"@media\s*\(\s*prefers-color-scheme\s*:\s*dark\s*\)");
cached_regex!(annotated_const_re, r"\bconst\s+[A-Za-z_$][A-Za-z0-9_$]*\s*:\s*string\s*=");
cached_regex!(as_const_re, r"\bas\s+const\b");
cached_regex!(extension_color_re, r"\bextension\s+Color\b");
cached_regex!(enum_decl_re, r"\benum\s+[A-Z][A-Za-z0-9]*");
cached_regex!(swift_hex_init_re, r"Color\(\s*hex:\s*0x[0-9A-Fa-f]+");
cached_regex!(swift_string_hex_re, r##""#[0-9A-Fa-f]{6,8}""##);
cached_regex!(swift_light_dark_const_re, r"\b(?:static\s+)?(?:let|var)\s+[a-z][A-Za-z0-9]*(?:Light|Dark)\b");
cached_regex!(swift_dynamic_init_re, r"\blight:\s*[^,\n]+,\s*dark:");
cached_regex!(kotlin_multi_re, r"\bcompositionLocalOf\b|\bclass\s+R[A-Z][A-Za-z]*Colors\b");
cached_regex!(kotlin_single_re, r"\bobject\s+(?:LightColorTokens|DarkColorTokens|Primitives)\b");
cached_regex!(kotlin_package_re, r"(?m)^\s*package\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)");

/// Majority vote between two counted alternatives. Ties go to `first`.
fn vote<T>(first: (T, usize), second: (T, usize), fallback: T) -> Detection<T> {
    let total = first.1 + second.1;
    if total == 0 {
        return Detection::no_signal(fallback);
    }
    if first.1 >= second.1 {
        Detection::new(first.0, first.1 as f64 / total as f64)
    } else {
        Detection::new(second.0, second.1 as f64 / total as f64)
    }
}

/// Counts `$name` / `--name` identifiers containing `-` vs `_`.
pub fn detect_separator(text: &str) -> Detection<Separator> {
    let mut hyphen = 0;
    let mut underscore = 0;
    for caps in web_identifier_re().captures_iter(text) {
        let name = &caps[1];
        if name.contains('-') {
            hyphen += 1;
        }
        if name.contains('_') {
            underscore += 1;
        }
    }
    vote(
        (Separator::Hyphen, hyphen),
        (Separator::Underscore, underscore),
        Separator::Hyphen,
    )
}

/// Tests every `const` identifier against three overlapping case patterns.
pub fn detect_naming_case(text: &str) -> Detection<NamingCase> {
    let mut screaming = 0;
    let mut pascal = 0;
    let mut camel = 0;
    for caps in const_decl_re().captures_iter(text) {
        let name = &caps[1];
        if screaming_re().is_match(name) {
            screaming += 1;
        }
        if pascal_re().is_match(name) {
            pascal += 1;
        }
        if camel_re().is_match(name) {
            camel += 1;
        }
    }

    let total = screaming + pascal + camel;
    if total == 0 {
        return Detection::no_signal(NamingCase::ScreamingSnake);
    }
    // Precedence order settles ties
    let ranked = [
        (NamingCase::ScreamingSnake, screaming),
        (NamingCase::Pascal, pascal),
        (NamingCase::Camel, camel),
    ];
    let mut winner = ranked[0];
    for candidate in &ranked[1..] {
        if candidate.1 > winner.1 {
            winner = *candidate;
        }
    }
    Detection::new(winner.0, winner.1 as f64 / total as f64)
}

/// Hex literals whose letters are all upper vs all lower, quoted (TS, Swift) or bare values
/// (SCSS, CSS). Digit-only literals carry no signal, and CSS id selectors such as `#fade {`
/// are not literals.
pub fn detect_hex_case(text: &str) -> Detection<HexCase> {
    let mut upper = 0;
    let mut lower = 0;
    for caps in hex_literal_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let glued = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        let selector = text[whole.end()..].trim_start().starts_with(['{', ',']);
        if glued || selector {
            continue;
        }
        let digits = &caps[1];
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        match (has_upper, has_lower) {
            (true, false) => upper += 1,
            (false, true) => lower += 1,
            _ => {}
        }
    }
    vote((HexCase::Lower, lower), (HexCase::Upper, upper), HexCase::Lower)
}

/// Any `@use` selects the module system. No statement at all falls back to `@import`.
pub fn detect_import_style(scss: &str) -> Detection<ImportStyle> {
    let uses = use_re().find_iter(scss).count();
    let imports = import_re().find_iter(scss).count();
    if uses > 0 {
        Detection::new(ImportStyle::Use, uses as f64 / (uses + imports) as f64)
    } else if imports > 0 {
        Detection::new(ImportStyle::Import, 1.0)
    } else {
        Detection::no_signal(ImportStyle::Import)
    }
}

pub fn detect_scss_structure(scss: &str) -> Detection<ScssColorStructure> {
    let has_root = scss.contains(":root");
    let has_dark_media = dark_media_re().is_match(scss);
    let has_light_dark = scss.contains("light-dark(");

    if has_root && has_dark_media {
        Detection::new(ScssColorStructure::MediaQuery, 1.0)
    } else if has_light_dark && !has_root {
        Detection::new(ScssColorStructure::Inline, 1.0)
    } else if has_root {
        Detection::new(ScssColorStructure::Modern, 1.0)
    } else {
        Detection::no_signal(ScssColorStructure::Inline)
    }
}

/// `const X: string =` declarations against all `const` declarations
pub fn detect_type_annotations(ts: &str) -> Detection<bool> {
    let annotated = annotated_const_re().find_iter(ts).count();
    let total = const_decl_re().find_iter(ts).count();
    vote((true, annotated), (false, total.saturating_sub(annotated)), false)
}

pub fn detect_as_const(ts: &str) -> Detection<bool> {
    let marked = as_const_re().find_iter(ts).count();
    let total = const_decl_re().find_iter(ts).count().max(marked);
    vote((true, marked), (false, total - marked), true)
}

pub fn detect_swift_container(swift: &str) -> Detection<SwiftContainer> {
    let extensions = extension_color_re().find_iter(swift).count();
    let enums = enum_decl_re().find_iter(swift).count();
    vote(
        (SwiftContainer::Enum, enums),
        (SwiftContainer::Extension, extensions),
        SwiftContainer::Enum,
    )
}

pub fn detect_swift_primitive_format(swift: &str) -> Detection<SwiftPrimitiveFormat> {
    let literals = swift_hex_init_re().find_iter(swift).count();
    let strings = swift_string_hex_re().find_iter(swift).count();
    vote(
        (SwiftPrimitiveFormat::HexLiteral, literals),
        (SwiftPrimitiveFormat::StringHex, strings),
        SwiftPrimitiveFormat::HexLiteral,
    )
}

pub fn detect_swift_semantic_format(swift: &str) -> Detection<SwiftSemanticFormat> {
    let dynamic = swift_dynamic_init_re().find_iter(swift).count();
    let constants = swift_light_dark_const_re().find_iter(swift).count();
    vote(
        (SwiftSemanticFormat::DynamicInit, dynamic),
        (SwiftSemanticFormat::LightDarkConstants, constants),
        SwiftSemanticFormat::DynamicInit,
    )
}

/// Presence of a `ColorStyle` API. Absence is not evidence.
pub fn detect_swift_color_style(swift: &str) -> Detection<bool> {
    if swift.contains("ColorStyle") {
        Detection::new(true, 1.0)
    } else {
        Detection::no_signal(false)
    }
}

pub fn detect_kotlin_architecture(kotlin: &str) -> Detection<KotlinArchitecture> {
    let multi = kotlin_multi_re().find_iter(kotlin).count();
    let single = kotlin_single_re().find_iter(kotlin).count();
    vote(
        (KotlinArchitecture::SingleFile, single),
        (KotlinArchitecture::MultiFile, multi),
        KotlinArchitecture::SingleFile,
    )
}

/// First `package a.b.c` statement
pub fn detect_kotlin_package(kotlin: &str) -> Option<String> {
    kotlin_package_re()
        .captures(kotlin)
        .map(|caps| caps[1].to_string())
}

/// Most common indentation unit among indented lines: a tab, or the smallest space run
/// that occurs frequently.
pub fn detect_indent(text: &str, fallback: &str) -> Detection<String> {
    let mut tab_lines = 0usize;
    let mut space_runs: BTreeMap<usize, usize> = BTreeMap::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            tab_lines += 1;
            continue;
        }
        let spaces = line.len() - line.trim_start_matches(' ').len();
        // Block comment continuation lines (` * foo`) are not indentation
        if spaces > 0 && !line.trim_start().starts_with('*') {
            *space_runs.entry(spaces).or_insert(0) += 1;
        }
    }

    let space_lines: usize = space_runs.values().sum();
    let total = tab_lines + space_lines;
    if total == 0 {
        return Detection::no_signal(fallback.to_string());
    }
    if tab_lines > space_lines {
        return Detection::new("\t".to_string(), tab_lines as f64 / total as f64);
    }

    let most_frequent = space_runs.values().copied().max().unwrap_or(0);
    let unit = space_runs
        .iter()
        .find(|(_, count)| **count * 5 >= most_frequent)
        .map(|(width, _)| *width)
        .unwrap_or(2);
    let consistent: usize = space_runs
        .iter()
        .filter(|(width, _)| *width % unit == 0)
        .map(|(_, count)| count)
        .sum();
    Detection::new(" ".repeat(unit), consistent as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_majority_and_confidence() {
        let text = "$grey-750: #1d1d1d;\n$grey-50: #f5f5f5;\n--text-primary: red;\n$blue_500: blue;";
        let detection = detect_separator(text);
        assert_eq!(detection.value, Separator::Hyphen);
        assert_eq!(detection.confidence, Some(0.75));
    }

    #[test]
    fn test_separator_without_signal() {
        let detection = detect_separator("$grey: #fff;");
        assert_eq!(detection.value, Separator::Hyphen);
        assert_eq!(detection.confidence, None);
    }

    #[test]
    fn test_naming_case_unanimous_is_full_confidence() {
        let ts = "export const GREY_750 = '#1d1d1d';\nexport const BLUE_500 = '#0a84ff';";
        let detection = detect_naming_case(ts);
        assert_eq!(detection.value, NamingCase::ScreamingSnake);
        assert_eq!(detection.confidence, Some(1.0));
    }

    #[test]
    fn test_naming_case_even_split_is_half_confidence() {
        let ts = "const GREY_750 = 'a';\nconst BLUE_500 = 'b';\nconst grey750 = 'c';\nconst blue500 = 'd';";
        let detection = detect_naming_case(ts);
        assert_eq!(detection.value, NamingCase::ScreamingSnake);
        assert_eq!(detection.confidence, Some(0.5));
    }

    #[test]
    fn test_naming_case_tie_prefers_pascal_over_camel() {
        let ts = "const TextPrimary = 'a';\nconst textPrimary = 'b';";
        assert_eq!(detect_naming_case(ts).value, NamingCase::Pascal);
    }

    #[test]
    fn test_hex_case_ignores_digit_only_literals() {
        let detection = detect_hex_case("'#1D1D1D' '#F5F5F5' '#000000' '#0a84ff'");
        assert_eq!(detection.value, HexCase::Upper);
        assert!((detection.confidence.unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_hex_case_skips_id_selectors() {
        let scss = "#fade {\n  color: red;\n}\n#BEAD, #CAFE {}\n$grey-750: #1d1d1d;\n$grey-50: #f5f5f5;";
        let detection = detect_hex_case(scss);
        assert_eq!(detection.value, HexCase::Lower);
        assert_eq!(detection.confidence, Some(1.0));
    }

    #[test]
    fn test_import_style_asymmetric_default() {
        assert_eq!(detect_import_style("@use './Primitives.scss' as *;").value, ImportStyle::Use);
        assert_eq!(detect_import_style("@import './Primitives';").value, ImportStyle::Import);
        let none = detect_import_style("$a: 1;");
        assert_eq!(none.value, ImportStyle::Import);
        assert_eq!(none.confidence, None);
    }

    #[test]
    fn test_scss_structure_variants() {
        let media = ":root { --a: #fff; }\n@media (prefers-color-scheme: dark) { :root { --a: #000; } }";
        assert_eq!(detect_scss_structure(media).value, ScssColorStructure::MediaQuery);
        let inline = "$text-primary: var(--text-primary, light-dark($grey-750, $grey-50));";
        assert_eq!(detect_scss_structure(inline).value, ScssColorStructure::Inline);
        let modern = ":root { --text-primary: light-dark(#1d1d1d, #f5f5f5); }";
        assert_eq!(detect_scss_structure(modern).value, ScssColorStructure::Modern);
        let nothing = detect_scss_structure("$a: 1;");
        assert_eq!(nothing.value, ScssColorStructure::Inline);
        assert_eq!(nothing.confidence, None);
    }

    #[test]
    fn test_typescript_markers() {
        let ts = "export const GREY: string = '#fff';\nexport const BLUE: string = '#00f';";
        assert!(detect_type_annotations(ts).value);
        assert!(!detect_as_const(ts).value);
        let marked = "export const GREY = '#fff' as const;";
        assert!(detect_as_const(marked).value);
        assert!(!detect_type_annotations(marked).value);
    }

    #[test]
    fn test_swift_dimensions() {
        let swift = r##"
extension Color {
    static let grey750 = "#1D1D1D"
    static let textPrimaryLight = "#1D1D1D"
    static let textPrimaryDark = "#F5F5F5"
}
"##;
        assert_eq!(detect_swift_container(swift).value, SwiftContainer::Extension);
        assert_eq!(detect_swift_primitive_format(swift).value, SwiftPrimitiveFormat::StringHex);
        assert_eq!(
            detect_swift_semantic_format(swift).value,
            SwiftSemanticFormat::LightDarkConstants
        );
        assert_eq!(detect_swift_color_style(swift).confidence, None);

        let dynamic = "enum Colors {\n    static let textPrimary = Color(light: ColorPrimitives.grey750, dark: ColorPrimitives.grey50)\n}";
        assert_eq!(detect_swift_semantic_format(dynamic).value, SwiftSemanticFormat::DynamicInit);
        assert_eq!(detect_swift_container(dynamic).value, SwiftContainer::Enum);
    }

    #[test]
    fn test_kotlin_dimensions() {
        let multi = "package com.acme.theme\n\nval LocalRTextColors = compositionLocalOf { lightRTextColors() }\nclass RTextColors {}";
        assert_eq!(detect_kotlin_architecture(multi).value, KotlinArchitecture::MultiFile);
        assert_eq!(detect_kotlin_package(multi).as_deref(), Some("com.acme.theme"));

        let single = "object Primitives {}\nobject LightColorTokens {}";
        assert_eq!(detect_kotlin_architecture(single).value, KotlinArchitecture::SingleFile);
        assert_eq!(detect_kotlin_package(single), None);
    }

    #[test]
    fn test_indent_detection() {
        let four = "enum A {\n    static let a = 1\n    enum B {\n        static let b = 2\n    }\n}";
        let detection = detect_indent(four, "  ");
        assert_eq!(detection.value, "    ");
        assert_eq!(detection.confidence, Some(1.0));

        let tabs = "object A {\n\tval a = 1\n\tval b = 2\n}";
        assert_eq!(detect_indent(tabs, "    ").value, "\t");

        let flat = detect_indent("a\nb", "  ");
        assert_eq!(flat.value, "  ");
        assert_eq!(flat.confidence, None);
    }
}
