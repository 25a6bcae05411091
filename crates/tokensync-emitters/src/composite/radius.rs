use super::{kotlin_dp, number, path_contains, px, CompositeKind};
use tokensync_conventions::DetectedConventions;
use tokensync_core::{TokenNode, TokenValue};

/// Corner radii: any number or dimension whose path mentions `radius`
pub struct RadiusKind;

impl CompositeKind for RadiusKind {
    type Value = f64;

    fn word(&self) -> &'static str {
        "radius"
    }

    fn classify(&self, path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<f64> {
        if !path_contains(path, "radius") {
            return None;
        }
        value.as_number()
    }

    fn css(&self, value: &f64, _conventions: &DetectedConventions) -> String {
        px(*value)
    }

    fn swift(&self, value: &f64) -> String {
        format!("CGFloat({})", number(*value))
    }

    fn kotlin(&self, value: &f64) -> String {
        kotlin_dp(*value)
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &["androidx.compose.ui.unit.dp"]
    }
}
