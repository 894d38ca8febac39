//! Per-block style overrides.
//!
//! Every field is optional: an absent field means "inherit the global
//! default for this node type". Overrides are read leniently, one field at a
//! time, so a single malformed value never discards the rest of the object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Four-sided spacing in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum FontWeight {
    Regular,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
}

impl FontWeight {
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
        }
    }
}

impl TryFrom<u16> for FontWeight {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            400 => Ok(FontWeight::Regular),
            500 => Ok(FontWeight::Medium),
            600 => Ok(FontWeight::SemiBold),
            700 => Ok(FontWeight::Bold),
            800 => Ok(FontWeight::ExtraBold),
            other => Err(format!("unsupported font weight {}", other)),
        }
    }
}

impl From<FontWeight> for u16 {
    fn from(weight: FontWeight) -> Self {
        weight.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
    None,
}

impl BorderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    Block,
    InlineBlock,
}

impl Display {
    pub fn as_str(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::InlineBlock => "inline-block",
        }
    }
}

/// Height: pixels or the literal `"auto"`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeightRepr", into = "HeightRepr")]
pub enum Height {
    Px(f64),
    Auto,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HeightRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<HeightRepr> for Height {
    type Error = String;

    fn try_from(repr: HeightRepr) -> Result<Self, Self::Error> {
        match repr {
            HeightRepr::Number(px) => Ok(Height::Px(px)),
            HeightRepr::Keyword(keyword) if keyword == "auto" => Ok(Height::Auto),
            HeightRepr::Keyword(keyword) => Err(format!("unsupported height {:?}", keyword)),
        }
    }
}

impl From<Height> for HeightRepr {
    fn from(height: Height) -> Self {
        match height {
            Height::Px(px) => HeightRepr::Number(px),
            Height::Auto => HeightRepr::Keyword("auto".to_string()),
        }
    }
}

/// Block-level style override
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Height>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
}

impl BlockStyles {
    /// Read an override from an arbitrary JSON value.
    ///
    /// Unknown keys are ignored and each malformed field is dropped on its
    /// own; a non-object value yields an empty override.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self {
            background_color: lenient(map, "backgroundColor"),
            text_color: lenient(map, "textColor"),
            font_size: lenient(map, "fontSize"),
            font_weight: lenient(map, "fontWeight"),
            line_height: lenient(map, "lineHeight"),
            text_align: lenient(map, "textAlign"),
            text_decoration: lenient(map, "textDecoration"),
            font_family: lenient(map, "fontFamily"),
            border_radius: lenient(map, "borderRadius"),
            border_width: lenient(map, "borderWidth"),
            border_style: lenient(map, "borderStyle"),
            border_color: lenient(map, "borderColor"),
            padding: lenient(map, "padding"),
            width: lenient(map, "width"),
            height: lenient(map, "height"),
            display: lenient(map, "display"),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn lenient<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key).filter(|v| !v.is_null())?;
    if let Value::String(s) = value {
        if s.is_empty() {
            return None;
        }
    }
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_all_fields() {
        let styles = BlockStyles::from_value(&json!({
            "backgroundColor": "#fafafa",
            "textColor": "#111111",
            "fontSize": 18,
            "fontWeight": 600,
            "lineHeight": 1.4,
            "textAlign": "center",
            "textDecoration": "line-through",
            "fontFamily": "Georgia, serif",
            "borderRadius": 6,
            "borderWidth": 1,
            "borderStyle": "dashed",
            "borderColor": "#cccccc",
            "padding": { "top": 1, "right": 2, "bottom": 3, "left": 4 },
            "width": 300,
            "height": "auto",
            "display": "inline-block"
        }));

        assert_eq!(styles.font_size, Some(18.0));
        assert_eq!(styles.font_weight, Some(FontWeight::SemiBold));
        assert_eq!(styles.text_decoration, Some(TextDecoration::LineThrough));
        assert_eq!(styles.padding, Some(Padding::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(styles.height, Some(Height::Auto));
        assert_eq!(styles.display, Some(Display::InlineBlock));
    }

    #[test]
    fn test_from_value_drops_invalid_fields_only() {
        let styles = BlockStyles::from_value(&json!({
            "fontWeight": 450,
            "textAlign": "middle",
            "height": "tall",
            "textColor": "",
            "fontSize": 20
        }));

        assert_eq!(styles.font_weight, None);
        assert_eq!(styles.text_align, None);
        assert_eq!(styles.height, None);
        assert_eq!(styles.text_color, None);
        assert_eq!(styles.font_size, Some(20.0));
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(BlockStyles::from_value(&json!("bold")).is_empty());
        assert!(BlockStyles::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let styles = BlockStyles {
            text_color: Some("#ff0000".to_string()),
            height: Some(Height::Px(120.0)),
            ..Default::default()
        };
        assert_eq!(
            styles.to_value(),
            json!({ "textColor": "#ff0000", "height": 120.0 })
        );
    }
}
