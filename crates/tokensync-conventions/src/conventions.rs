use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Word separator used in web identifiers (`$grey-750` vs `$grey_750`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Separator {
    Hyphen,
    Underscore,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Hyphen => "-",
            Separator::Underscore => "_",
        }
    }
}

/// Identifier casing for TypeScript constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingCase {
    ScreamingSnake,
    Snake,
    Camel,
    Pascal,
    Kebab,
}

impl NamingCase {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "screaming-snake" | "screaming" | "constant" => Some(NamingCase::ScreamingSnake),
            "snake" => Some(NamingCase::Snake),
            "camel" => Some(NamingCase::Camel),
            "pascal" => Some(NamingCase::Pascal),
            "kebab" => Some(NamingCase::Kebab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStyle {
    /// `@use './Primitives.scss' as *;`
    Use,
    /// `@import './Primitives';`
    Import,
}

/// Layout of the SCSS (and CSS) colors file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScssColorStructure {
    Modern,
    Inline,
    MediaQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexCase {
    Upper,
    Lower,
}

impl HexCase {
    pub fn is_upper(&self) -> bool {
        matches!(self, HexCase::Upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwiftContainer {
    /// `enum ColorPrimitives { static let ... }`
    Enum,
    /// `extension Color { static let ... }`
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwiftPrimitiveFormat {
    /// `Color(hex: 0x1D1D1DFF)`
    HexLiteral,
    /// `"#1D1D1D"`
    StringHex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwiftSemanticFormat {
    /// `Color(light: ..., dark: ...)`
    DynamicInit,
    /// Separate `textPrimaryLight` / `textPrimaryDark` constants
    LightDarkConstants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KotlinArchitecture {
    SingleFile,
    MultiFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConventionSource {
    BestPractice,
    Detected,
}

/// A stylistic dimension the detector scores independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConventionDimension {
    Separator,
    NamingCase,
    HexCase,
    ImportStyle,
    ScssStructure,
    TypeAnnotations,
    AsConst,
    SwiftContainer,
    SwiftPrimitiveFormat,
    SwiftSemanticFormat,
    SwiftColorStyle,
    KotlinArchitecture,
    KotlinPackage,
    WebIndent,
    SwiftIndent,
    KotlinIndent,
}

impl fmt::Display for ConventionDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&name)
    }
}

/// Result of one heuristic. `confidence` is `None` when the text carried no signal for the
/// dimension, which is distinct from unanimous evidence (`Some(1.0)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Detection<T> {
    pub value: T,
    pub confidence: Option<f64>,
}

impl<T> Detection<T> {
    pub fn new(value: T, confidence: f64) -> Self {
        Self {
            value,
            confidence: Some(confidence),
        }
    }

    pub fn no_signal(value: T) -> Self {
        Self {
            value,
            confidence: None,
        }
    }
}

/// Stylistic choices every emitter reads. Built once per request, read-only afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedConventions {
    pub separator: Separator,
    pub naming_case: NamingCase,
    pub import_style: ImportStyle,
    pub scss_structure: ScssColorStructure,
    pub hex_case: HexCase,
    pub type_annotations: bool,
    pub as_const: bool,
    pub swift_container: SwiftContainer,
    pub swift_primitive_format: SwiftPrimitiveFormat,
    pub swift_semantic_format: SwiftSemanticFormat,
    pub swift_color_style: bool,
    pub kotlin_architecture: KotlinArchitecture,
    pub kotlin_package: String,
    pub web_indent: String,
    pub swift_indent: String,
    pub kotlin_indent: String,
    /// Only dimensions that had signal appear here
    pub confidence: BTreeMap<ConventionDimension, f64>,
    pub overall_confidence: f64,
    pub source: ConventionSource,
}

impl DetectedConventions {
    /// Fixed opinionated defaults used when no reference is available or when forced.
    pub fn best_practice() -> Self {
        Self {
            separator: Separator::Hyphen,
            naming_case: NamingCase::ScreamingSnake,
            import_style: ImportStyle::Use,
            scss_structure: ScssColorStructure::Modern,
            hex_case: HexCase::Lower,
            type_annotations: false,
            as_const: true,
            swift_container: SwiftContainer::Enum,
            swift_primitive_format: SwiftPrimitiveFormat::HexLiteral,
            swift_semantic_format: SwiftSemanticFormat::DynamicInit,
            swift_color_style: false,
            kotlin_architecture: KotlinArchitecture::SingleFile,
            kotlin_package: "com.design.tokens".to_string(),
            web_indent: "  ".to_string(),
            swift_indent: "    ".to_string(),
            kotlin_indent: "    ".to_string(),
            confidence: BTreeMap::new(),
            overall_confidence: 1.0,
            source: ConventionSource::BestPractice,
        }
    }

    pub fn is_best_practice(&self) -> bool {
        self.source == ConventionSource::BestPractice
    }

    /// Dimensions whose confidence falls below `threshold`, weakest first
    pub fn weak_dimensions(&self, threshold: f64) -> Vec<(ConventionDimension, f64)> {
        let mut weak: Vec<_> = self
            .confidence
            .iter()
            .filter(|(_, score)| **score < threshold)
            .map(|(dimension, score)| (*dimension, *score))
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1));
        weak
    }
}

impl Default for DetectedConventions {
    fn default() -> Self {
        Self::best_practice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_practice_defaults() {
        let conventions = DetectedConventions::best_practice();
        assert_eq!(conventions.separator, Separator::Hyphen);
        assert_eq!(conventions.naming_case, NamingCase::ScreamingSnake);
        assert_eq!(conventions.import_style, ImportStyle::Use);
        assert_eq!(conventions.kotlin_package, "com.design.tokens");
        assert_eq!(conventions.overall_confidence, 1.0);
        assert!(conventions.is_best_practice());
    }

    #[test]
    fn test_weak_dimensions_sorted() {
        let mut conventions = DetectedConventions::best_practice();
        conventions.confidence.insert(ConventionDimension::Separator, 0.6);
        conventions.confidence.insert(ConventionDimension::HexCase, 0.5);
        conventions.confidence.insert(ConventionDimension::NamingCase, 0.9);
        let weak = conventions.weak_dimensions(0.7);
        assert_eq!(weak.len(), 2);
        assert_eq!(weak[0].0, ConventionDimension::HexCase);
    }

    #[test]
    fn test_dimension_display_is_kebab() {
        assert_eq!(ConventionDimension::SwiftColorStyle.to_string(), "swift-color-style");
    }

    #[test]
    fn test_naming_case_from_name() {
        assert_eq!(NamingCase::from_name("screaming_snake"), Some(NamingCase::ScreamingSnake));
        assert_eq!(NamingCase::from_name("Camel"), Some(NamingCase::Camel));
        assert_eq!(NamingCase::from_name("title"), None);
    }
}
