//! Identifier construction shared by every emitter.
//!
//! Token paths are first split into lowercase words; each platform then joins those words
//! with its own casing rules.

use tokensync_conventions::{NamingCase, Separator};

/// Leading path segments that only say "this is a color" and are dropped from primitive names
const COLOR_PREFIXES: &[&str] = &["colour", "color", "colors", "colours", "primitives", "palette"];

/// Splits path segments into lowercase words on separators, spaces and case/digit boundaries.
pub fn words_from_path<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    path.iter().flat_map(|segment| split_words(segment.as_ref())).collect()
}

pub fn split_words(segment: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in segment.chars() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let boundary = (p.is_lowercase() && c.is_uppercase())
                || (p.is_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_alphabetic());
            if boundary {
                flush(&mut current, &mut words);
            }
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Primitive path with its color-collection prefix removed, unless that would leave
/// nothing but numbers.
pub fn primitive_segments<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    let segments: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
    if segments.len() > 1 && COLOR_PREFIXES.contains(&segments[0].to_ascii_lowercase().as_str()) {
        let rest = &segments[1..];
        if rest.first().is_some_and(|s| !is_numeric_segment(s)) {
            return rest.to_vec();
        }
    }
    segments
}

pub fn is_numeric_segment(segment: &str) -> bool {
    let trimmed = segment.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Web identifier body: lowercase words joined by the separator (`grey-750`)
pub fn web_name(words: &[String], separator: Separator) -> String {
    words.join(separator.as_str())
}

pub fn camel_case(words: &[String]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn pascal_case(words: &[String]) -> String {
    words.iter().map(|w| capitalize(w)).collect()
}

pub fn apply_case(words: &[String], case: NamingCase) -> String {
    match case {
        NamingCase::ScreamingSnake => words.join("_").to_uppercase(),
        NamingCase::Snake => words.join("_"),
        NamingCase::Camel => camel_case(words),
        NamingCase::Pascal => pascal_case(words),
        NamingCase::Kebab => words.join("-"),
    }
}

/// Prefixes identifiers that would start with a digit. Returns whether it had to.
pub fn ensure_identifier(name: String) -> (String, bool) {
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        (format!("_{}", name), true)
    } else if name.is_empty() {
        ("_".to_string(), true)
    } else {
        (name, false)
    }
}

/// Code identifier (TypeScript/Swift/Kotlin) that is always valid
pub fn code_identifier(words: &[String], case: NamingCase) -> String {
    ensure_identifier(apply_case(words, case)).0
}

/// Display title for a family comment (`["cool", "grey"]` -> `Cool Grey`)
pub fn title_case(words: &[String]) -> String {
    if words.is_empty() {
        return "Other".to_string();
    }
    words.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ")
}
