use crate::extract::extract_declarations;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokensync_common::{GeneratedFile, Platform};

/// A token whose color differs between generated files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    pub name: String,
    /// Color per file, `#rrggbb[aa]`
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Color tokens declared by more than one platform
    pub checked: usize,
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compares every color declaration across the generated files by canonical name.
pub fn check_consistency(files: &[GeneratedFile]) -> ConsistencyReport {
    let mut by_name: BTreeMap<String, Vec<(Platform, String, String)>> = BTreeMap::new();
    for file in files {
        for decl in extract_declarations(&file.content, file.format) {
            if let Some(color) = decl.color {
                by_name
                    .entry(decl.canonical)
                    .or_default()
                    .push((file.platform, file.filename.clone(), color));
            }
        }
    }

    let mut report = ConsistencyReport::default();
    for (name, sightings) in by_name {
        let spans_platforms = sightings.iter().any(|(p, _, _)| *p != sightings[0].0);
        if !spans_platforms {
            continue;
        }
        report.checked += 1;
        if sightings.iter().all(|(_, _, color)| *color == sightings[0].2) {
            continue;
        }
        let values = sightings
            .into_iter()
            .map(|(_, filename, color)| (filename, color))
            .collect();
        report.issues.push(ConsistencyIssue { name, values });
    }
    tracing::debug!(
        "consistency: {} shared color tokens, {} mismatches",
        report.checked,
        report.issues.len()
    );
    report
}
