use super::{kotlin_float, number, path_contains, CompositeKind};
use tokensync_conventions::DetectedConventions;
use tokensync_core::{TokenNode, TokenValue};

/// Opacities share the plain `number` type with spacing, so the path decides.
pub struct OpacityKind;

/// Percentages above 1 are scaled into `0..=1`
pub fn normalize_opacity(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

pub fn is_opacity_path(path: &[String]) -> bool {
    path_contains(path, "opacity")
}

impl CompositeKind for OpacityKind {
    type Value = f64;

    fn word(&self) -> &'static str {
        "opacity"
    }

    fn classify(&self, path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<f64> {
        if !is_opacity_path(path) {
            return None;
        }
        value.as_number().map(normalize_opacity)
    }

    fn css(&self, value: &f64, _conventions: &DetectedConventions) -> String {
        number(*value)
    }

    fn ts(&self, value: &f64, _conventions: &DetectedConventions) -> String {
        number(*value)
    }

    fn swift(&self, value: &f64) -> String {
        format!("Double({})", number(*value))
    }

    fn kotlin(&self, value: &f64) -> String {
        kotlin_float(*value)
    }
}
