use crate::extract::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which reference tokens survive in a generated file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Canonical names present in both
    pub matched: Vec<String>,
    /// Matched names whose value differs
    pub changed: Vec<ValueChange>,
    /// Only in the generated file
    pub added: Vec<String>,
    /// Only in the reference
    pub removed: Vec<String>,
    /// `matched / reference total`, 1.0 for an empty reference
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub name: String,
    pub before: String,
    pub after: String,
}

impl CoverageReport {
    pub fn compute(generated: &[Declaration], reference: &[Declaration]) -> Self {
        let by_name: HashMap<&str, &Declaration> =
            generated.iter().map(|d| (d.canonical.as_str(), d)).collect();
        let reference_names: HashMap<&str, &Declaration> =
            reference.iter().map(|d| (d.canonical.as_str(), d)).collect();

        let mut report = Self::default();
        for old in reference {
            match by_name.get(old.canonical.as_str()) {
                Some(new) => {
                    report.matched.push(old.canonical.clone());
                    if !same_value(old, new) {
                        report.changed.push(ValueChange {
                            name: old.canonical.clone(),
                            before: old.value.clone(),
                            after: new.value.clone(),
                        });
                    }
                }
                None => report.removed.push(old.canonical.clone()),
            }
        }
        report.added = generated
            .iter()
            .filter(|d| !reference_names.contains_key(d.canonical.as_str()))
            .map(|d| d.canonical.clone())
            .collect();
        report.coverage = if reference.is_empty() {
            1.0
        } else {
            report.matched.len() as f64 / reference.len() as f64
        };
        report
    }
}

/// Colors compare by normalized hex; everything else by whitespace-insensitive text
fn same_value(a: &Declaration, b: &Declaration) -> bool {
    match (&a.color, &b.color) {
        (Some(x), Some(y)) => x == y,
        _ => squash(&a.value) == squash(&b.value),
    }
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_declarations;
    use tokensync_common::OutputFormat;

    #[test]
    fn test_coverage_counts() {
        let reference = extract_declarations(
            "$grey-50: #F5F5F5;\n$grey-750: #1d1d1d;\n$red-500: #ff0000;\n$blue-500: #0000ff;\n",
            OutputFormat::Scss,
        );
        let generated = extract_declarations(
            "$grey-50: #f5f5f5;\n$grey-750: #222222;\n$green-500: #00ff00;\n",
            OutputFormat::Scss,
        );
        let report = CoverageReport::compute(&generated, &reference);
        assert_eq!(report.matched, vec!["grey-50", "grey-750"]);
        assert_eq!(report.changed.len(), 1);
        assert_eq!(report.changed[0].name, "grey-750");
        assert_eq!(report.added, vec!["green-500"]);
        assert_eq!(report.removed, vec!["red-500", "blue-500"]);
        assert!((report.coverage - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_reference_is_fully_covered() {
        let generated = extract_declarations("$a: 1px;", OutputFormat::Scss);
        let report = CoverageReport::compute(&generated, &[]);
        assert_eq!(report.coverage, 1.0);
        assert_eq!(report.added, vec!["a"]);
    }
}
