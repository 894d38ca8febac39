//! Template-wide style defaults.
//!
//! `GlobalStyles` is always fully populated. Deserialisation backfills any
//! missing section or field from the defaults, and updates go through
//! `GlobalStylesPatch`, which merges section by section over this closed
//! schema instead of replacing the whole object.

use crate::styles::{Padding, TextDecoration};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTAINER_WIDTH: f64 = 600.0;
pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.55;
pub const DEFAULT_FONT_FAMILY: &str =
    "system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Horizontal padding keeps content off the container edges on mobile clients
pub const DEFAULT_PADDING: Padding = Padding {
    top: 0.0,
    right: 16.0,
    bottom: 0.0,
    left: 16.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Outer email body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyStyles {
    pub background_color: String,
    pub align: Align,
    pub border_color: String,
}

impl Default for BodyStyles {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            align: Align::Center,
            border_color: "#000000".to_string(),
        }
    }
}

/// Inner content container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStyles {
    pub width: f64,
    pub align: Align,
    pub padding: Padding,
    pub background_color: String,
}

impl Default for ContainerStyles {
    fn default() -> Self {
        Self {
            width: DEFAULT_CONTAINER_WIDTH,
            align: Align::Center,
            padding: DEFAULT_PADDING,
            background_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyStyles {
    pub font_family: String,
    pub font_size: f64,
    /// Unitless ratio
    pub line_height: f64,
    pub color: String,
}

impl Default for TypographyStyles {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStyles {
    pub color: String,
    pub text_decoration: TextDecoration,
}

impl Default for LinkStyles {
    fn default() -> Self {
        Self {
            color: "#2563eb".to_string(),
            text_decoration: TextDecoration::Underline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStyles {
    pub border_radius: f64,
}

impl Default for ImageStyles {
    fn default() -> Self {
        Self { border_radius: 8.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyles {
    pub background_color: String,
    pub text_color: String,
    pub border_radius: f64,
    pub padding: Padding,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            background_color: "#000000".to_string(),
            text_color: "#ffffff".to_string(),
            border_radius: 4.0,
            padding: Padding::symmetric(12.0, 24.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeBlockStyles {
    pub background_color: String,
    pub border_radius: f64,
    pub padding: Padding,
}

impl Default for CodeBlockStyles {
    fn default() -> Self {
        Self {
            background_color: "#f3f4f6".to_string(),
            border_radius: 4.0,
            padding: Padding::uniform(16.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InlineCodeStyles {
    pub background_color: String,
    pub text_color: String,
    pub border_radius: f64,
}

impl Default for InlineCodeStyles {
    fn default() -> Self {
        Self {
            background_color: "#f3f4f6".to_string(),
            text_color: "#000000".to_string(),
            border_radius: 4.0,
        }
    }
}

/// Template-wide style defaults, grouped by concern
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStyles {
    pub body: BodyStyles,
    pub container: ContainerStyles,
    pub typography: TypographyStyles,
    pub link: LinkStyles,
    pub image: ImageStyles,
    pub button: ButtonStyles,
    pub code_block: CodeBlockStyles,
    pub inline_code: InlineCodeStyles,
    #[serde(rename = "customCSS", skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

impl GlobalStyles {
    /// Recursively merge a partial update into these styles
    pub fn merge(&mut self, patch: &GlobalStylesPatch) {
        if let Some(body) = &patch.body {
            body.apply(&mut self.body);
        }
        if let Some(container) = &patch.container {
            container.apply(&mut self.container);
        }
        if let Some(typography) = &patch.typography {
            typography.apply(&mut self.typography);
        }
        if let Some(link) = &patch.link {
            link.apply(&mut self.link);
        }
        if let Some(image) = &patch.image {
            image.apply(&mut self.image);
        }
        if let Some(button) = &patch.button {
            button.apply(&mut self.button);
        }
        if let Some(code_block) = &patch.code_block {
            code_block.apply(&mut self.code_block);
        }
        if let Some(inline_code) = &patch.inline_code {
            inline_code.apply(&mut self.inline_code);
        }
        if let Some(custom_css) = &patch.custom_css {
            self.custom_css = if custom_css.trim().is_empty() {
                None
            } else {
                Some(custom_css.clone())
            };
        }
    }

    /// Copy with a patch applied
    pub fn merged(&self, patch: &GlobalStylesPatch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingPatch {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl PaddingPatch {
    pub fn apply(&self, target: &mut Padding) {
        set(&mut target.top, &self.top);
        set(&mut target.right, &self.right);
        set(&mut target.bottom, &self.bottom);
        set(&mut target.left, &self.left);
    }
}

impl From<Padding> for PaddingPatch {
    fn from(padding: Padding) -> Self {
        Self {
            top: Some(padding.top),
            right: Some(padding.right),
            bottom: Some(padding.bottom),
            left: Some(padding.left),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyStylesPatch {
    pub background_color: Option<String>,
    pub align: Option<Align>,
    pub border_color: Option<String>,
}

impl BodyStylesPatch {
    pub fn apply(&self, target: &mut BodyStyles) {
        set(&mut target.background_color, &self.background_color);
        set(&mut target.align, &self.align);
        set(&mut target.border_color, &self.border_color);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStylesPatch {
    pub width: Option<f64>,
    pub align: Option<Align>,
    pub padding: Option<PaddingPatch>,
    pub background_color: Option<String>,
}

impl ContainerStylesPatch {
    pub fn apply(&self, target: &mut ContainerStyles) {
        set(&mut target.width, &self.width);
        set(&mut target.align, &self.align);
        if let Some(padding) = &self.padding {
            padding.apply(&mut target.padding);
        }
        set(&mut target.background_color, &self.background_color);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyStylesPatch {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub color: Option<String>,
}

impl TypographyStylesPatch {
    pub fn apply(&self, target: &mut TypographyStyles) {
        set(&mut target.font_family, &self.font_family);
        set(&mut target.font_size, &self.font_size);
        set(&mut target.line_height, &self.line_height);
        set(&mut target.color, &self.color);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStylesPatch {
    pub color: Option<String>,
    pub text_decoration: Option<TextDecoration>,
}

impl LinkStylesPatch {
    pub fn apply(&self, target: &mut LinkStyles) {
        set(&mut target.color, &self.color);
        set(&mut target.text_decoration, &self.text_decoration);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStylesPatch {
    pub border_radius: Option<f64>,
}

impl ImageStylesPatch {
    pub fn apply(&self, target: &mut ImageStyles) {
        set(&mut target.border_radius, &self.border_radius);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStylesPatch {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub border_radius: Option<f64>,
    pub padding: Option<PaddingPatch>,
}

impl ButtonStylesPatch {
    pub fn apply(&self, target: &mut ButtonStyles) {
        set(&mut target.background_color, &self.background_color);
        set(&mut target.text_color, &self.text_color);
        set(&mut target.border_radius, &self.border_radius);
        if let Some(padding) = &self.padding {
            padding.apply(&mut target.padding);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeBlockStylesPatch {
    pub background_color: Option<String>,
    pub border_radius: Option<f64>,
    pub padding: Option<PaddingPatch>,
}

impl CodeBlockStylesPatch {
    pub fn apply(&self, target: &mut CodeBlockStyles) {
        set(&mut target.background_color, &self.background_color);
        set(&mut target.border_radius, &self.border_radius);
        if let Some(padding) = &self.padding {
            padding.apply(&mut target.padding);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InlineCodeStylesPatch {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub border_radius: Option<f64>,
}

impl InlineCodeStylesPatch {
    pub fn apply(&self, target: &mut InlineCodeStyles) {
        set(&mut target.background_color, &self.background_color);
        set(&mut target.text_color, &self.text_color);
        set(&mut target.border_radius, &self.border_radius);
    }
}

/// Partial update of `GlobalStyles`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalStylesPatch {
    pub body: Option<BodyStylesPatch>,
    pub container: Option<ContainerStylesPatch>,
    pub typography: Option<TypographyStylesPatch>,
    pub link: Option<LinkStylesPatch>,
    pub image: Option<ImageStylesPatch>,
    pub button: Option<ButtonStylesPatch>,
    pub code_block: Option<CodeBlockStylesPatch>,
    pub inline_code: Option<InlineCodeStylesPatch>,
    /// An empty string clears the custom CSS
    #[serde(rename = "customCSS")]
    pub custom_css: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_width_patch_leaves_other_fields() {
        let mut styles = GlobalStyles::default();
        let before = styles.clone();

        styles.merge(&GlobalStylesPatch {
            container: Some(ContainerStylesPatch {
                width: Some(640.0),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(styles.container.width, 640.0);
        assert_eq!(styles.container.padding, before.container.padding);
        assert_eq!(styles.container.align, before.container.align);
        assert_eq!(styles.typography, before.typography);
        assert_eq!(styles.button, before.button);
    }

    #[test]
    fn test_padding_merges_per_side() {
        let mut styles = GlobalStyles::default();
        let patch: GlobalStylesPatch = serde_json::from_value(json!({
            "button": { "padding": { "top": 20 } }
        }))
        .unwrap();

        styles.merge(&patch);

        assert_eq!(styles.button.padding, Padding::new(20.0, 24.0, 12.0, 24.0));
    }

    #[test]
    fn test_custom_css_set_and_clear() {
        let mut styles = GlobalStyles::default();
        styles.merge(&GlobalStylesPatch {
            custom_css: Some("p { margin: 0 }".to_string()),
            ..Default::default()
        });
        assert_eq!(styles.custom_css.as_deref(), Some("p { margin: 0 }"));

        styles.merge(&GlobalStylesPatch {
            custom_css: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(styles.custom_css, None);
    }

    #[test]
    fn test_deserialize_backfills_missing_sections() {
        let styles: GlobalStyles = serde_json::from_value(json!({
            "typography": { "color": "#112233" },
            "customCSS": ".x{}"
        }))
        .unwrap();

        assert_eq!(styles.typography.color, "#112233");
        assert_eq!(styles.typography.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(styles.body, BodyStyles::default());
        assert_eq!(styles.custom_css.as_deref(), Some(".x{}"));
    }

    #[test]
    fn test_serialized_defaults_use_camel_case() {
        let value = serde_json::to_value(GlobalStyles::default()).unwrap();
        assert_eq!(value["codeBlock"]["backgroundColor"], "#f3f4f6");
        assert_eq!(value["link"]["textDecoration"], "underline");
        assert!(value.get("customCSS").is_none());
    }
}
