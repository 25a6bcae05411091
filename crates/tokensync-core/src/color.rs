use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Canonical color value: sRGB components in 0..1, alpha in 0..1 and a `#RRGGBB` hex string.
///
/// The hex string is the identity used for de-duplication and diffing. When a node supplies
/// both hex and components the hex digits decide the RGB bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub color_space: String,
    pub components: [f64; 3],
    pub alpha: f64,
    pub hex: String,
}

impl ColorValue {
    pub fn from_components(components: [f64; 3], alpha: f64) -> Self {
        let components = components.map(|c| c.clamp(0.0, 1.0));
        let bytes = components.map(unit_to_byte);
        Self {
            color_space: "srgb".to_string(),
            components,
            alpha: alpha.clamp(0.0, 1.0),
            hex: format!("#{:02X}{:02X}{:02X}", bytes[0], bytes[1], bytes[2]),
        }
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
    pub fn from_hex(input: &str) -> Option<Self> {
        let digits = input.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };
        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
        let alpha = if expanded.len() == 8 {
            f64::from(byte(6)?) / 255.0
        } else {
            1.0
        };
        Some(Self {
            color_space: "srgb".to_string(),
            components: [r, g, b].map(|c| f64::from(c) / 255.0),
            alpha,
            hex: format!("#{:02X}{:02X}{:02X}", r, g, b),
        })
    }

    /// Reads the canonical object, a W3C `{r,g,b,a}` object, or a hex string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_hex(s),
            Value::Object(obj) => {
                let alpha = obj
                    .get("alpha")
                    .or_else(|| obj.get("a"))
                    .and_then(Value::as_f64);

                if let Some(components) = obj.get("components").and_then(Value::as_array) {
                    let parsed: Vec<f64> = components.iter().filter_map(Value::as_f64).collect();
                    if parsed.len() < 3 {
                        return None;
                    }
                    let mut color =
                        Self::from_components([parsed[0], parsed[1], parsed[2]], alpha.unwrap_or(1.0));
                    if let Some(hex) = obj.get("hex").and_then(Value::as_str) {
                        if let Some(from_hex) = Self::from_hex(hex) {
                            // Components that round to other bytes are replaced so both forms agree
                            if color.components.map(unit_to_byte) != from_hex.components.map(unit_to_byte) {
                                color.components = from_hex.components;
                            }
                            color.hex = from_hex.hex;
                            if alpha.is_none() {
                                color.alpha = from_hex.alpha;
                            }
                        }
                    }
                    if let Some(space) = obj.get("colorSpace").and_then(Value::as_str) {
                        color.color_space = space.to_string();
                    }
                    return Some(color);
                }

                let r = obj.get("r").and_then(Value::as_f64)?;
                let g = obj.get("g").and_then(Value::as_f64)?;
                let b = obj.get("b").and_then(Value::as_f64)?;
                // Some exporters write 0..255 channels
                let scale = if r > 1.0 || g > 1.0 || b > 1.0 { 255.0 } else { 1.0 };
                Some(Self::from_components(
                    [r / scale, g / scale, b / scale],
                    alpha.unwrap_or(1.0),
                ))
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "colorSpace": self.color_space,
            "components": self.components,
            "alpha": self.alpha,
            "hex": self.hex,
        })
    }

    pub fn rgb_bytes(&self) -> [u8; 3] {
        let digits = self.hex.trim_start_matches('#');
        let parse = |i: usize| digits.get(i..i + 2).and_then(|d| u8::from_str_radix(d, 16).ok());
        match (parse(0), parse(2), parse(4)) {
            (Some(r), Some(g), Some(b)) => [r, g, b],
            _ => self.components.map(unit_to_byte),
        }
    }

    pub fn alpha_byte(&self) -> u8 {
        unit_to_byte(self.alpha)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha_byte() == 0xFF
    }

    /// `#rrggbb`, or `#rrggbbaa` when translucent
    pub fn web_hex(&self, uppercase: bool) -> String {
        let [r, g, b] = self.rgb_bytes();
        let out = if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, self.alpha_byte())
        };
        if uppercase {
            out.to_uppercase()
        } else {
            out
        }
    }

    /// `RRGGBBAA` digits, alpha byte trailing (Swift `Color(hex:)` order)
    pub fn rgba_digits(&self) -> String {
        let [r, g, b] = self.rgb_bytes();
        format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, self.alpha_byte())
    }

    /// `AARRGGBB` digits, alpha byte leading (Android `Color(Long)` order)
    pub fn argb_digits(&self) -> String {
        let [r, g, b] = self.rgb_bytes();
        format!("{:02X}{:02X}{:02X}{:02X}", self.alpha_byte(), r, g, b)
    }
}

fn unit_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn is_hex_color(input: &str) -> bool {
    ColorValue::from_hex(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing_variants() {
        let short = ColorValue::from_hex("#fff").unwrap();
        assert_eq!(short.hex, "#FFFFFF");
        assert_eq!(short.alpha, 1.0);

        let translucent = ColorValue::from_hex("#1d1d1d80").unwrap();
        assert_eq!(translucent.hex, "#1D1D1D");
        assert_eq!(translucent.alpha_byte(), 0x80);

        assert!(ColorValue::from_hex("1d1d1d").is_none());
        assert!(ColorValue::from_hex("#12345").is_none());
        assert!(ColorValue::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_byte_orders_for_translucent_color() {
        let c = 29.0 / 255.0;
        let color = ColorValue::from_components([c, c, c], 0.5);
        assert_eq!(color.argb_digits(), "801D1D1D");
        assert_eq!(color.rgba_digits(), "1D1D1D80");
        assert_eq!(color.web_hex(false), "#1d1d1d80");
    }

    #[test]
    fn test_hex_wins_over_components() {
        let value = json!({
            "colorSpace": "srgb",
            "components": [0.0, 0.0, 0.0],
            "alpha": 1,
            "hex": "#F5F5F5"
        });
        let color = ColorValue::from_json(&value).unwrap();
        assert_eq!(color.rgb_bytes(), [0xF5, 0xF5, 0xF5]);
        assert_eq!(color.web_hex(false), "#f5f5f5");
        assert_eq!(color.components.map(unit_to_byte), [0xF5, 0xF5, 0xF5]);

        let red = ColorValue::from_json(&json!({"components": [0, 0, 0], "hex": "#FF0000"})).unwrap();
        assert_eq!(red.components, [1.0, 0.0, 0.0]);
        assert_eq!(red.hex, "#FF0000");
    }

    #[test]
    fn test_matching_hex_keeps_precise_components() {
        let c = 29.0 / 255.0 + 0.001;
        let value = json!({"components": [c, c, c], "hex": "#1D1D1D"});
        let color = ColorValue::from_json(&value).unwrap();
        assert_eq!(color.components, [c, c, c]);
    }

    #[test]
    fn test_rgb_object_in_255_range() {
        let color = ColorValue::from_json(&json!({"r": 255, "g": 0, "b": 0, "a": 1})).unwrap();
        assert_eq!(color.hex, "#FF0000");
    }

    #[test]
    fn test_canonical_json_round_trip_keeps_hex() {
        let color = ColorValue::from_hex("#0A84FF").unwrap();
        let back = ColorValue::from_json(&color.to_json()).unwrap();
        assert_eq!(back.hex, "#0A84FF");
        assert!(back.is_opaque());
    }
}
