use super::{css_color, kotlin_dp, number, px, swift_color, CompositeKind};
use crate::kotlin::color_literal;
use tokensync_conventions::DetectedConventions;
use tokensync_core::{BorderValue, TokenNode, TokenValue};

pub struct BorderKind;

impl CompositeKind for BorderKind {
    type Value = BorderValue;

    fn word(&self) -> &'static str {
        "border"
    }

    fn classify(&self, _path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<BorderValue> {
        match value {
            TokenValue::Border(border) => Some(border.clone()),
            _ => None,
        }
    }

    fn css(&self, value: &BorderValue, conventions: &DetectedConventions) -> String {
        format!("{} {} {}", px(value.width), value.style, css_color(&value.color, conventions))
    }

    // Native strokes have no dash style; only width and color carry over
    fn swift(&self, value: &BorderValue) -> String {
        format!(
            "BorderToken(width: {}, color: {})",
            number(value.width),
            swift_color(&value.color)
        )
    }

    fn kotlin(&self, value: &BorderValue) -> String {
        format!("BorderStroke({}, {})", kotlin_dp(value.width), color_literal(&value.color))
    }

    fn swift_support(&self, indent: &str) -> Option<String> {
        Some(format!(
            "struct BorderToken {{\n{i}let width: CGFloat\n{i}let color: Color\n}}\n",
            i = indent
        ))
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &[
            "androidx.compose.foundation.BorderStroke",
            "androidx.compose.ui.graphics.Color",
            "androidx.compose.ui.unit.dp",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensync_core::ColorValue;

    #[test]
    fn test_border_renderings() {
        let border = BorderValue {
            color: ColorValue::from_components([1.0, 0.0, 0.0], 1.0),
            width: 2.0,
            style: "dashed".to_string(),
        };
        let conventions = DetectedConventions::best_practice();
        assert_eq!(BorderKind.css(&border, &conventions), "2px dashed #ff0000");
        assert_eq!(BorderKind.kotlin(&border), "BorderStroke(2.dp, Color(0xFFFF0000))");
        assert!(BorderKind.swift(&border).starts_with("BorderToken(width: 2, color: Color(.sRGB, red: 1"));
    }
}
