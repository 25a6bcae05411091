use super::{css_color, kotlin_float, number, swift_color, CompositeKind};
use crate::kotlin::color_literal;
use tokensync_conventions::DetectedConventions;
use tokensync_core::{GradientValue, TokenNode, TokenValue};

/// Linear gradients. Native outputs keep the stops; the angle is web-only.
pub struct GradientKind;

impl CompositeKind for GradientKind {
    type Value = GradientValue;

    fn word(&self) -> &'static str {
        "gradient"
    }

    fn classify(&self, _path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<GradientValue> {
        match value {
            TokenValue::Gradient(gradient) => Some(gradient.clone()),
            _ => None,
        }
    }

    fn css(&self, value: &GradientValue, conventions: &DetectedConventions) -> String {
        let stops: Vec<String> = value
            .stops
            .iter()
            .map(|stop| {
                format!(
                    "{} {}%",
                    css_color(&stop.color, conventions),
                    number(stop.position * 100.0)
                )
            })
            .collect();
        format!("linear-gradient({}deg, {})", number(value.angle), stops.join(", "))
    }

    fn swift(&self, value: &GradientValue) -> String {
        let stops: Vec<String> = value
            .stops
            .iter()
            .map(|stop| {
                format!(
                    ".init(color: {}, location: {})",
                    swift_color(&stop.color),
                    number(stop.position)
                )
            })
            .collect();
        format!("Gradient(stops: [{}])", stops.join(", "))
    }

    fn kotlin(&self, value: &GradientValue) -> String {
        let stops: Vec<String> = value
            .stops
            .iter()
            .map(|stop| format!("{} to {}", kotlin_float(stop.position), color_literal(&stop.color)))
            .collect();
        format!("Brush.linearGradient({})", stops.join(", "))
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &["androidx.compose.ui.graphics.Brush", "androidx.compose.ui.graphics.Color"]
    }
}
