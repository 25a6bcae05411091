use crate::conventions::{ConventionDimension, ConventionSource, DetectedConventions, Detection};
use crate::heuristics::*;
use tokensync_common::{OutputFormat, ReferenceRole, ReferenceSet};
use tracing::{debug, info};

/// Convention detector - infers stylistic choices from reference source files
pub struct ConventionDetector;

impl ConventionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the best-practice descriptor when forced or when no reference text is
    /// present; otherwise scores every dimension over the relevant reference texts.
    pub fn detect(&self, references: &ReferenceSet, force_best_practice: bool) -> DetectedConventions {
        if force_best_practice || references.is_empty() {
            debug!(
                "Using best-practice conventions (forced: {})",
                force_best_practice
            );
            return DetectedConventions::best_practice();
        }

        let scss = references.text_for_format(OutputFormat::Scss);
        let css = references.text_for_format(OutputFormat::Css);
        let ts = references.text_for_format(OutputFormat::TypeScript);
        let swift = references.text_for_format(OutputFormat::Swift);
        let kotlin = references.text_for_format(OutputFormat::Kotlin);
        let all = references.all_text();

        let mut conventions = DetectedConventions::best_practice();
        conventions.source = ConventionSource::Detected;
        let mut scores = Scores::default();

        let web_style_text = join_nonblank(&[&scss, &css]);
        conventions.separator = scores.take(ConventionDimension::Separator, detect_separator(&web_style_text));
        conventions.hex_case = scores.take(ConventionDimension::HexCase, detect_hex_case(&all));

        if !ts.trim().is_empty() {
            conventions.naming_case = scores.take(ConventionDimension::NamingCase, detect_naming_case(&ts));
            conventions.type_annotations =
                scores.take(ConventionDimension::TypeAnnotations, detect_type_annotations(&ts));
            conventions.as_const = scores.take(ConventionDimension::AsConst, detect_as_const(&ts));
        }

        if !scss.trim().is_empty() {
            conventions.import_style = scores.take(ConventionDimension::ImportStyle, detect_import_style(&scss));
        }
        if let Some(structure_text) = Self::structure_text(references, &scss, &css) {
            conventions.scss_structure =
                scores.take(ConventionDimension::ScssStructure, detect_scss_structure(&structure_text));
        }

        if !swift.trim().is_empty() {
            conventions.swift_container =
                scores.take(ConventionDimension::SwiftContainer, detect_swift_container(&swift));
            conventions.swift_primitive_format = scores.take(
                ConventionDimension::SwiftPrimitiveFormat,
                detect_swift_primitive_format(&swift),
            );
            conventions.swift_semantic_format = scores.take(
                ConventionDimension::SwiftSemanticFormat,
                detect_swift_semantic_format(&swift),
            );
            conventions.swift_color_style =
                scores.take(ConventionDimension::SwiftColorStyle, detect_swift_color_style(&swift));
            conventions.swift_indent = scores.take(
                ConventionDimension::SwiftIndent,
                detect_indent(&swift, &conventions.swift_indent),
            );
        }

        if !kotlin.trim().is_empty() {
            conventions.kotlin_architecture = scores.take(
                ConventionDimension::KotlinArchitecture,
                detect_kotlin_architecture(&kotlin),
            );
            if let Some(package) = detect_kotlin_package(&kotlin) {
                conventions.kotlin_package =
                    scores.take(ConventionDimension::KotlinPackage, Detection::new(package, 1.0));
            }
            conventions.kotlin_indent = scores.take(
                ConventionDimension::KotlinIndent,
                detect_indent(&kotlin, &conventions.kotlin_indent),
            );
        }

        let web_text = join_nonblank(&[&scss, &css, &ts]);
        if !web_text.is_empty() {
            conventions.web_indent = scores.take(
                ConventionDimension::WebIndent,
                detect_indent(&web_text, &conventions.web_indent),
            );
        }

        conventions.overall_confidence = scores.overall();
        conventions.confidence = scores.by_dimension;

        info!(
            "Detected conventions from {} reference file(s): separator {:?}, naming {:?}, structure {:?}, overall confidence {:.2}",
            references.files.len(),
            conventions.separator,
            conventions.naming_case,
            conventions.scss_structure,
            conventions.overall_confidence
        );
        conventions
    }

    /// SCSS colors text, then any SCSS, then CSS colors, then any CSS
    fn structure_text(references: &ReferenceSet, scss: &str, css: &str) -> Option<String> {
        let candidates = [
            references.get(ReferenceRole::WebColorsScss).unwrap_or(""),
            scss,
            references.get(ReferenceRole::WebColorsCss).unwrap_or(""),
            css,
        ];
        candidates
            .iter()
            .find(|text| !text.trim().is_empty())
            .map(|text| text.to_string())
    }
}

impl Default for ConventionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Scores {
    by_dimension: std::collections::BTreeMap<ConventionDimension, f64>,
}

impl Scores {
    fn take<T>(&mut self, dimension: ConventionDimension, detection: Detection<T>) -> T {
        if let Some(confidence) = detection.confidence {
            self.by_dimension.insert(dimension, confidence);
        }
        detection.value
    }

    /// Minimum over dimensions with signal; 1.0 when none had any
    fn overall(&self) -> f64 {
        self.by_dimension
            .values()
            .copied()
            .fold(None, |min: Option<f64>, score| {
                Some(min.map_or(score, |m| m.min(score)))
            })
            .unwrap_or(1.0)
    }
}

fn join_nonblank(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::*;

    #[test]
    fn test_forced_best_practice_ignores_references() {
        let refs = ReferenceSet::new().with(ReferenceRole::WebPrimitivesScss, "$grey_750: #1D1D1D;");
        let conventions = ConventionDetector::new().detect(&refs, true);
        assert_eq!(conventions, DetectedConventions::best_practice());
    }

    #[test]
    fn test_empty_references_yield_best_practice() {
        let conventions = ConventionDetector::new().detect(&ReferenceSet::new(), false);
        assert!(conventions.is_best_practice());
        assert_eq!(conventions.import_style, ImportStyle::Use);
    }

    #[test]
    fn test_scss_reference_drives_web_dimensions() {
        let refs = ReferenceSet::new()
            .with(
                ReferenceRole::WebPrimitivesScss,
                "// Grey\n$grey_750: #1D1D1D;\n$grey_50: #F5F5F5;\n",
            )
            .with(
                ReferenceRole::WebColorsScss,
                "@import './Primitives';\n\n:root {\n    --text_primary: #{$grey_750};\n}\n\n@media (prefers-color-scheme: dark) {\n    :root {\n        --text_primary: #{$grey_50};\n    }\n}\n",
            );
        let conventions = ConventionDetector::new().detect(&refs, false);
        assert_eq!(conventions.source, ConventionSource::Detected);
        assert_eq!(conventions.separator, Separator::Underscore);
        assert_eq!(conventions.hex_case, HexCase::Upper);
        assert_eq!(conventions.import_style, ImportStyle::Import);
        assert_eq!(conventions.scss_structure, ScssColorStructure::MediaQuery);
        assert_eq!(conventions.web_indent, "    ");
        assert_eq!(conventions.overall_confidence, 1.0);
        // No Swift reference, so Swift keeps its defaults
        assert_eq!(conventions.swift_container, SwiftContainer::Enum);
        assert!(!conventions.confidence.contains_key(&ConventionDimension::SwiftContainer));
    }

    #[test]
    fn test_overall_confidence_is_minimum_with_signal() {
        let refs = ReferenceSet::new().with(
            ReferenceRole::WebPrimitivesTs,
            "export const GREY_750 = '#1d1d1d';\nexport const grey50 = '#f5f5f5';\n",
        );
        let conventions = ConventionDetector::new().detect(&refs, false);
        assert_eq!(conventions.confidence.get(&ConventionDimension::NamingCase), Some(&0.5));
        assert_eq!(conventions.overall_confidence, 0.5);
    }

    #[test]
    fn test_kotlin_and_swift_references() {
        let refs = ReferenceSet::new()
            .with(
                ReferenceRole::AndroidColorsKotlin,
                "package com.acme.design\n\nval LocalRTextColors = compositionLocalOf { lightRTextColors() }\n",
            )
            .with(
                ReferenceRole::IosColorStyleSwift,
                "public enum ColorStyle {\n  static var textPrimary: Color { color(\"textPrimary\") }\n}\n",
            );
        let conventions = ConventionDetector::new().detect(&refs, false);
        assert_eq!(conventions.kotlin_architecture, KotlinArchitecture::MultiFile);
        assert_eq!(conventions.kotlin_package, "com.acme.design");
        assert!(conventions.swift_color_style);
        assert_eq!(conventions.swift_indent, "  ");
    }
}
