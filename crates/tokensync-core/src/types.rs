use crate::color::ColorValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Extension key Figma uses to record which variable a token aliases
pub const ALIAS_EXTENSION: &str = "com.figma.aliasData";

/// Canonical token type vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenType {
    Color,
    Number,
    Shadow,
    Border,
    Typography,
    Gradient,
    Transition,
    CubicBezier,
    Duration,
    Dimension,
    FontFamily,
    FontWeight,
    FontSize,
    LineHeight,
    LetterSpacing,
    String,
    Boolean,
    Other,
    /// A type string outside the vocabulary. Reported, never rejected.
    Unknown(String),
}

impl TokenType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "color" => TokenType::Color,
            "number" => TokenType::Number,
            "shadow" => TokenType::Shadow,
            "border" => TokenType::Border,
            "typography" => TokenType::Typography,
            "gradient" => TokenType::Gradient,
            "transition" => TokenType::Transition,
            "cubic-bezier" | "cubicBezier" => TokenType::CubicBezier,
            "duration" => TokenType::Duration,
            "dimension" => TokenType::Dimension,
            "fontFamily" => TokenType::FontFamily,
            "fontWeight" => TokenType::FontWeight,
            "fontSize" => TokenType::FontSize,
            "lineHeight" => TokenType::LineHeight,
            "letterSpacing" => TokenType::LetterSpacing,
            "string" => TokenType::String,
            "boolean" => TokenType::Boolean,
            "other" => TokenType::Other,
            unknown => TokenType::Unknown(unknown.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TokenType::Color => "color",
            TokenType::Number => "number",
            TokenType::Shadow => "shadow",
            TokenType::Border => "border",
            TokenType::Typography => "typography",
            TokenType::Gradient => "gradient",
            TokenType::Transition => "transition",
            TokenType::CubicBezier => "cubic-bezier",
            TokenType::Duration => "duration",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::FontSize => "fontSize",
            TokenType::LineHeight => "lineHeight",
            TokenType::LetterSpacing => "letterSpacing",
            TokenType::String => "string",
            TokenType::Boolean => "boolean",
            TokenType::Other => "other",
            TokenType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TokenType::Unknown(_))
    }

    /// Types that describe one property of a text style
    pub fn is_typography_property(&self) -> bool {
        matches!(
            self,
            TokenType::FontFamily
                | TokenType::FontWeight
                | TokenType::FontSize
                | TokenType::LineHeight
                | TokenType::LetterSpacing
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: String,
}

impl Dimension {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    /// Value converted to pixels when the unit allows it (`rem`/`em` at 16px)
    pub fn to_px(&self) -> f64 {
        match self.unit.as_str() {
            "rem" | "em" => self.value * 16.0,
            _ => self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowLayer {
    pub color: ColorValue,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub inset: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderValue {
    pub color: ColorValue,
    pub width: f64,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FontWeightValue {
    Numeric(f64),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypographyValue {
    pub font_family: Option<String>,
    pub font_size: Option<Dimension>,
    pub font_weight: Option<FontWeightValue>,
    pub line_height: Option<Dimension>,
    pub letter_spacing: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: ColorValue,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientValue {
    pub angle: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionValue {
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub easing: [f64; 4],
}

/// Parsed token value, one arm per shape the emitters understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    Color(ColorValue),
    Number(f64),
    Dimension(Dimension),
    Shadow(Vec<ShadowLayer>),
    Border(BorderValue),
    Typography(TypographyValue),
    Gradient(GradientValue),
    Transition(TransitionValue),
    CubicBezier([f64; 4]),
    /// Milliseconds
    Duration(f64),
    FontFamily(String),
    FontWeight(FontWeightValue),
    Text(String),
    Boolean(bool),
    /// Alias leaf whose resolved value was not exported
    Null,
    /// Value that does not fit its declared type
    Other(Value),
}

impl TokenValue {
    pub fn as_color(&self) -> Option<&ColorValue> {
        match self {
            TokenValue::Color(color) => Some(color),
            _ => None,
        }
    }

    /// Numeric view used by number-like emitters (spacing, opacity, radius)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            TokenValue::Dimension(d) => Some(d.to_px()),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, TokenValue::Other(_))
    }

    /// Parses a raw `$value` for the given type. Values that do not match the
    /// type's shape come back as `Other`.
    pub fn parse(token_type: &TokenType, raw: &Value) -> Self {
        if raw.is_null() {
            return TokenValue::Null;
        }
        let parsed = match token_type {
            TokenType::Color => ColorValue::from_json(raw).map(TokenValue::Color),
            TokenType::Number => parse_number(raw).map(TokenValue::Number),
            TokenType::Dimension | TokenType::FontSize | TokenType::LetterSpacing => {
                parse_dimension(raw, "px").map(TokenValue::Dimension)
            }
            TokenType::LineHeight => parse_line_height(raw).map(TokenValue::Dimension),
            TokenType::Shadow => parse_shadow(raw).map(TokenValue::Shadow),
            TokenType::Border => parse_border(raw).map(TokenValue::Border),
            TokenType::Typography => parse_typography(raw).map(TokenValue::Typography),
            TokenType::Gradient => parse_gradient(raw).map(TokenValue::Gradient),
            TokenType::Transition => parse_transition(raw).map(TokenValue::Transition),
            TokenType::CubicBezier => parse_cubic_bezier(raw).map(TokenValue::CubicBezier),
            TokenType::Duration => parse_duration(raw).map(TokenValue::Duration),
            TokenType::FontFamily => parse_font_family(raw).map(TokenValue::FontFamily),
            TokenType::FontWeight => parse_font_weight(raw).map(TokenValue::FontWeight),
            TokenType::String => raw.as_str().map(|s| TokenValue::Text(s.to_string())),
            TokenType::Boolean => raw.as_bool().map(TokenValue::Boolean),
            TokenType::Other | TokenType::Unknown(_) => None,
        };
        parsed.unwrap_or_else(|| TokenValue::Other(raw.clone()))
    }
}

/// A canonical token leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenNode {
    pub token_type: TokenType,
    pub value: TokenValue,
    pub alias_target: Option<String>,
    pub description: Option<String>,
}

impl TokenNode {
    /// Reads a canonical leaf object. Returns `None` when the object has no usable
    /// `$type`, or has neither a `$value` nor an alias.
    pub fn from_json(obj: &serde_json::Map<String, Value>) -> Option<Self> {
        let token_type = TokenType::from_name(obj.get("$type")?.as_str()?);
        let alias_target = alias_target_of(obj);
        let raw = obj.get("$value");
        if raw.is_none() && alias_target.is_none() {
            return None;
        }
        let value = raw
            .map(|raw| TokenValue::parse(&token_type, raw))
            .unwrap_or(TokenValue::Null);
        let description = obj
            .get("$description")
            .and_then(Value::as_str)
            .filter(|d| !d.trim().is_empty())
            .map(str::to_string);

        Some(Self {
            token_type,
            value,
            alias_target,
            description,
        })
    }

    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }
}

/// Alias target recorded in the Figma alias extension, if any
pub fn alias_target_of(obj: &serde_json::Map<String, Value>) -> Option<String> {
    obj.get("$extensions")?
        .get(ALIAS_EXTENSION)?
        .get("targetVariableName")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `$extensions` object recording an alias to `target`
pub fn alias_extensions(target: &str) -> Value {
    let mut alias = serde_json::Map::new();
    alias.insert("targetVariableName".to_string(), Value::String(target.to_string()));
    let mut extensions = serde_json::Map::new();
    extensions.insert(ALIAS_EXTENSION.to_string(), Value::Object(alias));
    Value::Object(extensions)
}

fn number_unit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(-?(?:\d+\.?\d*|\.\d+))\s*([a-zA-Z%]*)\s*$").expect("valid number regex")
    })
}

fn split_number_unit(input: &str) -> Option<(f64, String)> {
    let caps = number_unit_regex().captures(input)?;
    let number = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((number, unit))
}

pub fn parse_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => split_number_unit(s).map(|(n, _)| n),
        Value::Object(obj) => obj.get("value").and_then(parse_number),
        _ => None,
    }
}

pub fn parse_dimension(raw: &Value, default_unit: &str) -> Option<Dimension> {
    match raw {
        Value::Number(n) => n.as_f64().map(|v| Dimension::new(v, default_unit)),
        Value::String(s) => split_number_unit(s).map(|(value, unit)| {
            let unit = if unit.is_empty() { default_unit.to_string() } else { unit };
            Dimension { value, unit }
        }),
        Value::Object(obj) => {
            let value = obj.get("value").and_then(parse_number)?;
            let unit = obj
                .get("unit")
                .and_then(Value::as_str)
                .unwrap_or(default_unit);
            Some(Dimension::new(value, unit))
        }
        _ => None,
    }
}

/// Plain numbers below 4 are multipliers, anything larger is pixels.
fn parse_line_height(raw: &Value) -> Option<Dimension> {
    let dim = parse_dimension(raw, "")?;
    if dim.unit.is_empty() && dim.value >= 4.0 {
        return Some(Dimension::new(dim.value, "px"));
    }
    Some(dim)
}

fn parse_duration(raw: &Value) -> Option<f64> {
    let dim = parse_dimension(raw, "ms")?;
    match dim.unit.as_str() {
        "ms" => Some(dim.value),
        "s" => Some(dim.value * 1000.0),
        _ => None,
    }
}

fn parse_cubic_bezier(raw: &Value) -> Option<[f64; 4]> {
    let values: Vec<f64> = match raw {
        Value::Array(items) => items.iter().filter_map(parse_number).collect(),
        Value::String(s) => s
            .trim()
            .trim_start_matches("cubic-bezier(")
            .trim_end_matches(')')
            .split(',')
            .filter_map(|part| part.trim().parse::<f64>().ok())
            .collect(),
        _ => return None,
    };
    match values.as_slice() {
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

fn parse_font_family(raw: &Value) -> Option<String> {
    let family = match raw {
        Value::String(s) => s
            .split(',')
            .next()
            .map(|f| f.trim().trim_matches(['"', '\'']).to_string()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    family.filter(|family| !family.is_empty())
}

fn parse_font_weight(raw: &Value) -> Option<FontWeightValue> {
    match raw {
        Value::Number(n) => n.as_f64().map(FontWeightValue::Numeric),
        Value::String(s) if !s.trim().is_empty() => Some(FontWeightValue::Named(s.trim().to_string())),
        _ => None,
    }
}

fn field<'a>(obj: &'a serde_json::Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

fn parse_shadow_layer(raw: &Value) -> Option<ShadowLayer> {
    let obj = raw.as_object()?;
    let color = ColorValue::from_json(field(obj, &["color"])?)?;
    let px = |names: &[&str]| {
        field(obj, names)
            .and_then(|v| parse_dimension(v, "px"))
            .map(|d| d.to_px())
            .unwrap_or(0.0)
    };
    let inset = obj.get("inset").and_then(Value::as_bool).unwrap_or(false)
        || obj.get("type").and_then(Value::as_str) == Some("innerShadow");
    Some(ShadowLayer {
        color,
        offset_x: px(&["offsetX", "x"]),
        offset_y: px(&["offsetY", "y"]),
        blur: px(&["blur", "radius"]),
        spread: px(&["spread"]),
        inset,
    })
}

fn parse_shadow(raw: &Value) -> Option<Vec<ShadowLayer>> {
    match raw {
        Value::Array(layers) => {
            let parsed: Option<Vec<ShadowLayer>> = layers.iter().map(parse_shadow_layer).collect();
            parsed.filter(|layers| !layers.is_empty())
        }
        Value::Object(_) => parse_shadow_layer(raw).map(|layer| vec![layer]),
        _ => None,
    }
}

fn parse_border(raw: &Value) -> Option<BorderValue> {
    let obj = raw.as_object()?;
    let color = ColorValue::from_json(obj.get("color")?)?;
    let width = obj
        .get("width")
        .and_then(|w| parse_dimension(w, "px"))
        .map(|d| d.to_px())
        .unwrap_or(1.0);
    let style = obj
        .get("style")
        .and_then(Value::as_str)
        .unwrap_or("solid")
        .to_string();
    Some(BorderValue { color, width, style })
}

fn parse_typography(raw: &Value) -> Option<TypographyValue> {
    let obj = raw.as_object()?;
    let typography = TypographyValue {
        font_family: obj.get("fontFamily").and_then(parse_font_family),
        font_size: obj.get("fontSize").and_then(|v| parse_dimension(v, "px")),
        font_weight: obj.get("fontWeight").and_then(parse_font_weight),
        line_height: obj.get("lineHeight").and_then(parse_line_height),
        letter_spacing: obj.get("letterSpacing").and_then(|v| parse_dimension(v, "px")),
    };
    if typography == TypographyValue::default() {
        return None;
    }
    Some(typography)
}

fn parse_gradient(raw: &Value) -> Option<GradientValue> {
    let (angle, stops_raw) = match raw {
        Value::Array(stops) => (180.0, stops),
        Value::Object(obj) => {
            let angle = obj.get("angle").and_then(parse_number).unwrap_or(180.0);
            (angle, obj.get("stops")?.as_array()?)
        }
        _ => return None,
    };
    let count = stops_raw.len();
    let mut stops = Vec::with_capacity(count);
    for (index, stop) in stops_raw.iter().enumerate() {
        let obj = stop.as_object()?;
        let color = ColorValue::from_json(obj.get("color")?)?;
        let position = obj
            .get("position")
            .and_then(parse_number)
            .unwrap_or_else(|| if count > 1 { index as f64 / (count - 1) as f64 } else { 0.0 });
        stops.push(GradientStop { color, position });
    }
    if stops.len() < 2 {
        return None;
    }
    Some(GradientValue { angle, stops })
}

fn parse_transition(raw: &Value) -> Option<TransitionValue> {
    let obj = raw.as_object()?;
    let duration_ms = parse_duration(obj.get("duration")?)?;
    let delay_ms = obj.get("delay").and_then(parse_duration).unwrap_or(0.0);
    let easing = obj
        .get("timingFunction")
        .and_then(parse_cubic_bezier)
        .unwrap_or([0.0, 0.0, 1.0, 1.0]);
    Some(TransitionValue {
        duration_ms,
        delay_ms,
        easing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_type_is_kept() {
        let node = TokenNode::from_json(
            json!({"$type": "sparkle", "$value": 3}).as_object().unwrap(),
        )
        .unwrap();
        assert_eq!(node.token_type, TokenType::Unknown("sparkle".to_string()));
        assert!(!node.token_type.is_known());
    }

    #[test]
    fn test_alias_without_value_parses_as_null() {
        let node = TokenNode::from_json(
            json!({
                "$type": "color",
                "$extensions": {"com.figma.aliasData": {"targetVariableName": "Colour/Grey/750"}}
            })
            .as_object()
            .unwrap(),
        )
        .unwrap();
        assert_eq!(node.value, TokenValue::Null);
        assert_eq!(node.alias_target.as_deref(), Some("Colour/Grey/750"));
    }

    #[test]
    fn test_missing_value_and_alias_is_malformed() {
        assert!(TokenNode::from_json(json!({"$type": "color"}).as_object().unwrap()).is_none());
    }

    #[test]
    fn test_dimension_and_duration_parsing() {
        assert_eq!(
            parse_dimension(&json!("1.5rem"), "px"),
            Some(Dimension::new(1.5, "rem"))
        );
        assert_eq!(
            TokenValue::parse(&TokenType::Duration, &json!("0.2s")),
            TokenValue::Duration(200.0)
        );
        assert_eq!(
            TokenValue::parse(&TokenType::LineHeight, &json!(24)),
            TokenValue::Dimension(Dimension::new(24.0, "px"))
        );
        assert_eq!(
            TokenValue::parse(&TokenType::LineHeight, &json!(1.5)),
            TokenValue::Dimension(Dimension::new(1.5, ""))
        );
    }

    #[test]
    fn test_shadow_accepts_single_layer_object() {
        let value = TokenValue::parse(
            &TokenType::Shadow,
            &json!({"color": "#00000040", "offsetX": "0px", "offsetY": "4px", "blur": 8, "spread": 0}),
        );
        match value {
            TokenValue::Shadow(layers) => {
                assert_eq!(layers.len(), 1);
                assert_eq!(layers[0].offset_y, 4.0);
                assert_eq!(layers[0].color.alpha_byte(), 0x40);
            }
            other => panic!("expected shadow, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_value_becomes_other() {
        let value = TokenValue::parse(&TokenType::Color, &json!("not a color"));
        assert!(value.is_malformed());
    }
}
