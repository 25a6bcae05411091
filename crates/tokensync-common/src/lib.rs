use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target platform of a generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Ios,
    Android,
}

impl Platform {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "web" => Some(Platform::Web),
            "ios" | "swift" => Some(Platform::Ios),
            "android" | "kotlin" => Some(Platform::Android),
            _ => None,
        }
    }

    pub fn all() -> [Platform; 3] {
        [Platform::Web, Platform::Ios, Platform::Android]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Web => "web",
            Platform::Ios => "ios",
            Platform::Android => "android",
        };
        f.write_str(name)
    }
}

/// Source language of a generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Scss,
    Css,
    TypeScript,
    Swift,
    Kotlin,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "scss" => Some(OutputFormat::Scss),
            "css" => Some(OutputFormat::Css),
            "ts" | "tsx" => Some(OutputFormat::TypeScript),
            "swift" => Some(OutputFormat::Swift),
            "kt" | "kts" => Some(OutputFormat::Kotlin),
            _ => None,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            OutputFormat::Scss | OutputFormat::Css | OutputFormat::TypeScript => Platform::Web,
            OutputFormat::Swift => Platform::Ios,
            OutputFormat::Kotlin => Platform::Android,
        }
    }

    /// Line comment prefix used for generated headers
    pub fn line_comment(&self) -> &'static str {
        match self {
            OutputFormat::Css => "/*",
            _ => "//",
        }
    }
}

/// The slot a reference file (or a generated file) fills in a codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceRole {
    WebPrimitivesScss,
    WebColorsScss,
    WebPrimitivesCss,
    WebColorsCss,
    WebSpacingCss,
    WebPrimitivesTs,
    WebColorsTs,
    WebTypographyScss,
    IosPrimitivesSwift,
    IosColorsSwift,
    IosColorStyleSwift,
    IosTypographySwift,
    AndroidColorsKotlin,
    AndroidPrimitivesKotlin,
    AndroidTypographyKotlin,
}

impl ReferenceRole {
    pub fn all() -> &'static [ReferenceRole] {
        &[
            ReferenceRole::WebPrimitivesScss,
            ReferenceRole::WebColorsScss,
            ReferenceRole::WebPrimitivesCss,
            ReferenceRole::WebColorsCss,
            ReferenceRole::WebSpacingCss,
            ReferenceRole::WebPrimitivesTs,
            ReferenceRole::WebColorsTs,
            ReferenceRole::WebTypographyScss,
            ReferenceRole::IosPrimitivesSwift,
            ReferenceRole::IosColorsSwift,
            ReferenceRole::IosColorStyleSwift,
            ReferenceRole::IosTypographySwift,
            ReferenceRole::AndroidColorsKotlin,
            ReferenceRole::AndroidPrimitivesKotlin,
            ReferenceRole::AndroidTypographyKotlin,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ReferenceRole::WebPrimitivesScss => "web-primitives-scss",
            ReferenceRole::WebColorsScss => "web-colors-scss",
            ReferenceRole::WebPrimitivesCss => "web-primitives-css",
            ReferenceRole::WebColorsCss => "web-colors-css",
            ReferenceRole::WebSpacingCss => "web-spacing-css",
            ReferenceRole::WebPrimitivesTs => "web-primitives-ts",
            ReferenceRole::WebColorsTs => "web-colors-ts",
            ReferenceRole::WebTypographyScss => "web-typography-scss",
            ReferenceRole::IosPrimitivesSwift => "ios-primitives-swift",
            ReferenceRole::IosColorsSwift => "ios-colors-swift",
            ReferenceRole::IosColorStyleSwift => "ios-color-style-swift",
            ReferenceRole::IosTypographySwift => "ios-typography-swift",
            ReferenceRole::AndroidColorsKotlin => "android-colors-kotlin",
            ReferenceRole::AndroidPrimitivesKotlin => "android-primitives-kotlin",
            ReferenceRole::AndroidTypographyKotlin => "android-typography-kotlin",
        }
    }

    /// Accepts both `web-primitives-scss` and the spaced `web primitives scss` form.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::all().iter().copied().find(|role| role.key() == normalized)
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            ReferenceRole::WebPrimitivesScss
            | ReferenceRole::WebColorsScss
            | ReferenceRole::WebTypographyScss => OutputFormat::Scss,
            ReferenceRole::WebPrimitivesCss
            | ReferenceRole::WebColorsCss
            | ReferenceRole::WebSpacingCss => OutputFormat::Css,
            ReferenceRole::WebPrimitivesTs | ReferenceRole::WebColorsTs => OutputFormat::TypeScript,
            ReferenceRole::IosPrimitivesSwift
            | ReferenceRole::IosColorsSwift
            | ReferenceRole::IosColorStyleSwift
            | ReferenceRole::IosTypographySwift => OutputFormat::Swift,
            ReferenceRole::AndroidColorsKotlin
            | ReferenceRole::AndroidPrimitivesKotlin
            | ReferenceRole::AndroidTypographyKotlin => OutputFormat::Kotlin,
        }
    }

    pub fn platform(&self) -> Platform {
        self.format().platform()
    }
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reference source texts keyed by the role they play in the target codebase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub files: BTreeMap<ReferenceRole, String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: ReferenceRole, content: impl Into<String>) -> Self {
        self.insert(role, content);
        self
    }

    pub fn insert(&mut self, role: ReferenceRole, content: impl Into<String>) {
        self.files.insert(role, content.into());
    }

    pub fn get(&self, role: ReferenceRole) -> Option<&str> {
        self.files.get(&role).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(|content| content.trim().is_empty())
    }

    /// Concatenated text of every reference written in `format`
    pub fn text_for_format(&self, format: OutputFormat) -> String {
        self.files
            .iter()
            .filter(|(role, _)| role.format() == format)
            .map(|(_, content)| content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Concatenated text of every reference file
    pub fn all_text(&self) -> String {
        self.files
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A generated source artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
    pub format: OutputFormat,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ReferenceRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_content: Option<String>,
}

impl GeneratedFile {
    pub fn new(filename: impl Into<String>, content: String, format: OutputFormat) -> Self {
        Self {
            filename: filename.into(),
            content,
            format,
            platform: format.platform(),
            role: None,
            reference_content: None,
        }
    }

    pub fn with_role(mut self, role: ReferenceRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Category of a non-fatal diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    Cycle,
    Lint,
    MissingCategory,
    UnknownType,
    LowConfidence,
    UnresolvedAlias,
    FontWeightFallback,
    SkippedToken,
}

/// A structured, non-fatal diagnostic surfaced to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Common error types
#[derive(thiserror::Error, Debug)]
pub enum TokenSyncError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TokenSyncError>;
