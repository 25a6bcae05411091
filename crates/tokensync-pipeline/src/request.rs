use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokensync_analyzer::{ConsistencyReport, FileAnalysis};
use tokensync_common::{GeneratedFile, Platform, ReferenceSet, Warning};
use tokensync_conventions::DetectedConventions;
use tokensync_core::DEFAULT_MAX_DEPTH;

/// Output category a caller can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Colors,
    Typography,
    Spacing,
    /// Shadow, border, radius, opacity, gradient and motion tokens
    Effects,
}

impl Category {
    pub fn all() -> [Category; 4] {
        [Category::Colors, Category::Typography, Category::Spacing, Category::Effects]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "colors" | "colours" | "color" => Some(Category::Colors),
            "typography" | "type" => Some(Category::Typography),
            "spacing" => Some(Category::Spacing),
            "effects" | "effect" => Some(Category::Effects),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Colors => "colors",
            Category::Typography => "typography",
            Category::Spacing => "spacing",
            Category::Effects => "effects",
        };
        f.write_str(name)
    }
}

/// Generation tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Detected conventions below this overall confidence produce an advisory warning
    pub confidence_threshold: f64,
    /// Longest alias chain followed before giving up
    pub max_alias_depth: usize,
    /// Overrides the detected or default Kotlin package
    pub kotlin_package: Option<String>,
    /// Write the request's `generated_at` into file headers
    pub include_timestamp: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            max_alias_depth: DEFAULT_MAX_DEPTH,
            kotlin_package: None,
            include_timestamp: true,
        }
    }
}

/// One generation run's inputs. Token trees are raw JSON in any supported dialect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub light: Value,
    pub dark: Value,
    pub values: Value,
    #[serde(default)]
    pub typography: Option<Value>,
    #[serde(default)]
    pub primitives: Option<Value>,
    #[serde(default)]
    pub references: ReferenceSet,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<Platform>,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub force_best_practice: bool,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub config: GenerationConfig,
}

fn default_platforms() -> Vec<Platform> {
    Platform::all().to_vec()
}

fn default_categories() -> Vec<Category> {
    Category::all().to_vec()
}

impl GenerationRequest {
    pub fn new(light: Value, dark: Value, values: Value) -> Self {
        Self {
            light,
            dark,
            values,
            typography: None,
            primitives: None,
            references: ReferenceSet::new(),
            platforms: default_platforms(),
            categories: default_categories(),
            force_best_practice: false,
            generated_at: None,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_typography(mut self, typography: Value) -> Self {
        self.typography = Some(typography);
        self
    }

    pub fn with_primitives(mut self, primitives: Value) -> Self {
        self.primitives = Some(primitives);
        self
    }

    pub fn with_references(mut self, references: ReferenceSet) -> Self {
        self.references = references;
        self
    }

    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn wants(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub files: Vec<GeneratedFile>,
    pub warnings: Vec<Warning>,
    pub conventions: DetectedConventions,
    /// One entry per file that had reference content
    pub analysis: Vec<FileAnalysis>,
    pub consistency: ConsistencyReport,
}

impl GenerationOutput {
    pub fn file(&self, filename: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.filename == filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults_from_json() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "light": {}, "dark": {}, "values": {}
        }))
        .unwrap();
        assert_eq!(request.platforms, Platform::all().to_vec());
        assert_eq!(request.categories.len(), 4);
        assert_eq!(request.config.confidence_threshold, 0.7);
        assert_eq!(request.config.max_alias_depth, 20);
        assert!(!request.force_best_practice);
    }

    #[test]
    fn test_partial_config() {
        let config: GenerationConfig =
            serde_json::from_value(json!({"kotlin_package": "com.acme"})).unwrap();
        assert_eq!(config.kotlin_package.as_deref(), Some("com.acme"));
        assert!(config.include_timestamp);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::from_name("Colours"), Some(Category::Colors));
        assert_eq!(Category::from_name("effects"), Some(Category::Effects));
        assert_eq!(Category::from_name("sound"), None);
        assert_eq!(Category::Spacing.to_string(), "spacing");
    }
}
