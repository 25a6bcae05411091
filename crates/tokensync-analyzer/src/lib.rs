//! Diff and analysis over generated sources and the reference files they replace.

pub mod consistency;
pub mod coverage;
pub mod extract;
pub mod impact;
pub mod renames;

pub use consistency::{check_consistency, ConsistencyIssue, ConsistencyReport};
pub use coverage::{CoverageReport, ValueChange};
pub use extract::{canonical_name, extract_declarations, normalized_color, Declaration};
pub use impact::{ImpactEntry, ImpactKind, ImpactReport};
pub use renames::{cluster_family_renames, detect_renames, FamilyRename, Rename};

use serde::{Deserialize, Serialize};
use tokensync_common::{GeneratedFile, OutputFormat, ReferenceRole, ReferenceSet};

/// Analysis of one generated file against its reference content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub filename: String,
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ReferenceRole>,
    pub coverage: CoverageReport,
    pub renames: Vec<Rename>,
    pub family_renames: Vec<FamilyRename>,
    pub impact: ImpactReport,
}

impl FileAnalysis {
    pub fn has_changes(&self) -> bool {
        !self.coverage.added.is_empty()
            || !self.coverage.removed.is_empty()
            || !self.coverage.changed.is_empty()
    }
}

/// Diff analyzer - compares generated output with the files it replaces
pub struct DiffAnalyzer;

impl DiffAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze one generated file. `None` when it carries no reference content.
    pub fn analyze_file(&self, file: &GeneratedFile, references: &ReferenceSet) -> Option<FileAnalysis> {
        let reference = file.reference_content.as_deref().filter(|r| !r.trim().is_empty())?;
        let generated = extract_declarations(&file.content, file.format);
        let previous = extract_declarations(reference, file.format);

        let mut coverage = CoverageReport::compute(&generated, &previous);
        let renames = detect_renames(&coverage.removed, &coverage.added, &generated, &previous);
        let family_renames = cluster_family_renames(&renames);

        // Renamed tokens are reported as renames, not as an add plus a removal.
        coverage.removed.retain(|name| !renames.iter().any(|r| &r.from == name));
        coverage.added.retain(|name| !renames.iter().any(|r| &r.to == name));

        let codebase = match references.text_for_format(file.format) {
            text if text.trim().is_empty() => reference.to_string(),
            text => text,
        };
        let impact = self.impact(&coverage, &renames, &previous, &generated, file.format, &codebase);

        tracing::debug!(
            "{}: coverage {:.2}, {} renames, {} removed",
            file.filename,
            coverage.coverage,
            renames.len(),
            coverage.removed.len()
        );

        Some(FileAnalysis {
            filename: file.filename.clone(),
            format: file.format,
            role: file.role,
            coverage,
            renames,
            family_renames,
            impact,
        })
    }

    /// Analyze every file that carries reference content, in file order.
    pub fn analyze_files(&self, files: &[GeneratedFile], references: &ReferenceSet) -> Vec<FileAnalysis> {
        files
            .iter()
            .filter_map(|file| self.analyze_file(file, references))
            .collect()
    }

    pub fn analyze_consistency(&self, files: &[GeneratedFile]) -> ConsistencyReport {
        check_consistency(files)
    }

    fn impact(
        &self,
        coverage: &CoverageReport,
        renames: &[Rename],
        previous: &[Declaration],
        generated: &[Declaration],
        format: OutputFormat,
        codebase: &str,
    ) -> ImpactReport {
        let spelled = |decls: &[Declaration], canonical: &str| {
            decls
                .iter()
                .find(|d| d.canonical == canonical)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| canonical.to_string())
        };

        let mut report = ImpactReport::default();
        for name in &coverage.removed {
            let identifier = spelled(previous, name.as_str());
            report.push(ImpactEntry {
                usages: impact::usages_of(&identifier, format, codebase),
                identifier,
                kind: ImpactKind::Removed,
                replacement: None,
            });
        }
        for rename in renames {
            let identifier = spelled(previous, rename.from.as_str());
            report.push(ImpactEntry {
                usages: impact::usages_of(&identifier, format, codebase),
                identifier,
                kind: ImpactKind::Renamed,
                replacement: Some(spelled(generated, rename.to.as_str())),
            });
        }
        report
    }
}

impl Default for DiffAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitives_file(content: &str, reference: Option<&str>) -> GeneratedFile {
        let mut file = GeneratedFile::new("Primitives.scss", content.to_string(), OutputFormat::Scss)
            .with_role(ReferenceRole::WebPrimitivesScss);
        file.reference_content = reference.map(str::to_string);
        file
    }

    #[test]
    fn test_no_reference_no_analysis() {
        let analyzer = DiffAnalyzer::new();
        let file = primitives_file("$a: #fff;", None);
        assert!(analyzer.analyze_file(&file, &ReferenceSet::new()).is_none());
        let blank = primitives_file("$a: #fff;", Some("  \n"));
        assert!(analyzer.analyze_file(&blank, &ReferenceSet::new()).is_none());
    }

    #[test]
    fn test_renames_leave_added_and_removed() {
        let reference = "$grey-50: #f5f5f5;\n$grey-750: #1d1d1d;\n$red-500: #ff0000;\n";
        let refs = ReferenceSet::new()
            .with(ReferenceRole::WebPrimitivesScss, reference)
            .with(
                ReferenceRole::WebColorsScss,
                "$text: $grey-750;\n$danger: $red-500;\n$danger-bg: $red-500;\n",
            );
        let file = primitives_file("$gray-50: #f5f5f5;\n$gray-750: #1d1d1d;\n", Some(reference));

        let analysis = DiffAnalyzer::new().analyze_file(&file, &refs).unwrap();
        assert_eq!(analysis.role, Some(ReferenceRole::WebPrimitivesScss));
        assert_eq!(analysis.renames.len(), 2);
        assert!(analysis.coverage.added.is_empty());
        assert_eq!(analysis.coverage.removed, vec!["red-500"]);
        assert_eq!(analysis.family_renames[0].from, "grey");
        assert!(analysis.has_changes());

        let removed = &analysis.impact.entries[0];
        assert_eq!(removed.identifier, "red-500");
        assert_eq!(removed.usages, 2);
        assert!(analysis.impact.is_breaking());
        let renamed = &analysis.impact.entries[1];
        assert_eq!(renamed.kind, ImpactKind::Renamed);
        assert_eq!(renamed.replacement.as_deref(), Some("gray-50"));
        assert_eq!(renamed.usages, 0);
    }

    #[test]
    fn test_unchanged_file() {
        let content = "$grey-50: #f5f5f5;\n";
        let file = primitives_file(content, Some(content));
        let analysis = DiffAnalyzer::new().analyze_file(&file, &ReferenceSet::new()).unwrap();
        assert!(!analysis.has_changes());
        assert_eq!(analysis.coverage.coverage, 1.0);
        assert!(analysis.impact.entries.is_empty());
    }
}
