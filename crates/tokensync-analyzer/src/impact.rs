use serde::{Deserialize, Serialize};
use tokensync_common::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactKind {
    Removed,
    Renamed,
}

/// A reference identifier the generated file no longer declares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEntry {
    pub identifier: String,
    pub kind: ImpactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Uses in the reference codebase besides the declaration
    pub usages: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub entries: Vec<ImpactEntry>,
    pub total_usages: usize,
}

impl ImpactReport {
    pub fn push(&mut self, entry: ImpactEntry) {
        self.total_usages += entry.usages;
        self.entries.push(entry);
    }

    /// True when a removed identifier is still used somewhere
    pub fn is_breaking(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == ImpactKind::Removed && e.usages > 0)
    }
}

/// How an identifier is spelled at a use site
pub fn usage_form(identifier: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Scss => format!("${}", identifier),
        OutputFormat::Css => format!("--{}", identifier),
        _ => identifier.to_string(),
    }
}

/// Occurrences of `needle` in `text` not embedded in a longer identifier
pub fn count_occurrences(text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    let first_is_sigil = needle.starts_with(['$', '-']);
    text.match_indices(needle)
        .filter(|(start, _)| {
            let before_ok = first_is_sigil
                || text[..*start]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !is_ident(c) && c != '$');
            let after_ok = text[start + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_ident(c) && c != '-');
            before_ok && after_ok
        })
        .count()
}

/// Uses of a declared identifier, discounting its own declaration
pub fn usages_of(identifier: &str, format: OutputFormat, reference_text: &str) -> usize {
    count_occurrences(reference_text, &usage_form(identifier, format)).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_whole_identifiers_only() {
        let text = "$grey-7: #111;\n$grey-750: #1d1d1d;\n$text: $grey-750;\n$border: $grey-7;\n";
        assert_eq!(usages_of("grey-750", OutputFormat::Scss, text), 1);
        assert_eq!(usages_of("grey-7", OutputFormat::Scss, text), 1);
        assert_eq!(usages_of("grey-75", OutputFormat::Scss, text), 0);
    }

    #[test]
    fn test_css_and_bare_usage_forms() {
        let css = ":root {\n  --grey-50: #fff;\n  --bg: var(--grey-50);\n  --bg-2: var(--grey-50);\n}";
        assert_eq!(usages_of("grey-50", OutputFormat::Css, css), 2);

        let kotlin = "val Grey50 = Color(0xFFF5F5F5)\nval Bg = Primitives.Grey50\nval Grey500 = Grey50x\n";
        assert_eq!(usages_of("Grey50", OutputFormat::Kotlin, kotlin), 1);
    }

    #[test]
    fn test_breaking_only_for_used_removals() {
        let mut report = ImpactReport::default();
        report.push(ImpactEntry {
            identifier: "a".into(),
            kind: ImpactKind::Renamed,
            replacement: Some("b".into()),
            usages: 3,
        });
        assert!(!report.is_breaking());
        report.push(ImpactEntry {
            identifier: "c".into(),
            kind: ImpactKind::Removed,
            replacement: None,
            usages: 1,
        });
        assert!(report.is_breaking());
        assert_eq!(report.total_usages, 4);
    }
}
