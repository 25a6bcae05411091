use super::{css_color, kotlin_dp, number, px, swift_color, CompositeKind};
use crate::kotlin::color_literal;
use tokensync_conventions::DetectedConventions;
use tokensync_core::{ShadowLayer, TokenNode, TokenValue};

/// Drop and inner shadows, one or more layers each
pub struct ShadowKind;

impl CompositeKind for ShadowKind {
    type Value = Vec<ShadowLayer>;

    fn word(&self) -> &'static str {
        "shadow"
    }

    fn classify(&self, _path: &[String], _node: &TokenNode, value: &TokenValue) -> Option<Self::Value> {
        match value {
            TokenValue::Shadow(layers) => Some(layers.clone()),
            _ => None,
        }
    }

    fn css(&self, value: &Self::Value, conventions: &DetectedConventions) -> String {
        value
            .iter()
            .map(|layer| {
                let inset = if layer.inset { "inset " } else { "" };
                format!(
                    "{}{} {} {} {} {}",
                    inset,
                    px(layer.offset_x),
                    px(layer.offset_y),
                    px(layer.blur),
                    px(layer.spread),
                    css_color(&layer.color, conventions)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    // SwiftUI shadows take a blur radius, half the CSS blur length
    fn swift(&self, value: &Self::Value) -> String {
        let layers: Vec<String> = value
            .iter()
            .map(|layer| {
                format!(
                    "ShadowToken(color: {}, radius: {}, x: {}, y: {})",
                    swift_color(&layer.color),
                    number(layer.blur / 2.0),
                    number(layer.offset_x),
                    number(layer.offset_y)
                )
            })
            .collect();
        format!("[{}]", layers.join(", "))
    }

    fn kotlin(&self, value: &Self::Value) -> String {
        let layers: Vec<String> = value
            .iter()
            .map(|layer| {
                format!(
                    "ShadowToken({}, {}, {}, {}, {})",
                    color_literal(&layer.color),
                    kotlin_dp(layer.offset_x),
                    kotlin_dp(layer.offset_y),
                    kotlin_dp(layer.blur),
                    kotlin_dp(layer.spread)
                )
            })
            .collect();
        format!("listOf({})", layers.join(", "))
    }

    fn swift_support(&self, indent: &str) -> Option<String> {
        Some(format!(
            "struct ShadowToken {{\n{i}let color: Color\n{i}let radius: CGFloat\n{i}let x: CGFloat\n{i}let y: CGFloat\n}}\n",
            i = indent
        ))
    }

    fn kotlin_support(&self, indent: &str) -> Option<String> {
        Some(format!(
            "data class ShadowToken(\n{i}val color: Color,\n{i}val offsetX: Dp,\n{i}val offsetY: Dp,\n{i}val blur: Dp,\n{i}val spread: Dp,\n)\n",
            i = indent
        ))
    }

    fn kotlin_imports(&self) -> &'static [&'static str] {
        &[
            "androidx.compose.ui.graphics.Color",
            "androidx.compose.ui.unit.Dp",
            "androidx.compose.ui.unit.dp",
        ]
    }
}
