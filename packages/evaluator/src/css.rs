//! `BlockStyles` → CSS declarations.
//!
//! The conversion is total and deterministic: every field that is present
//! yields its declaration(s) in a fixed order, and nothing else is emitted.
//! Numbers get a `px` unit except `font-weight` and `line-height`.

use indexmap::IndexMap;
use mailcraft_document::{BlockStyles, Height, Padding, TextAlign};

/// Ordered CSS property map (`kebab-case` name → value)
pub type CssProperties = IndexMap<String, String>;

/// Conversion context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssContext {
    /// Images are inline-level: alignment becomes block display plus
    /// auto margins instead of `text-align`
    pub is_image: bool,
}

impl CssContext {
    pub fn image() -> Self {
        Self { is_image: true }
    }
}

pub fn px(value: f64) -> String {
    format!("{}px", value)
}

pub fn number(value: f64) -> String {
    format!("{}", value)
}

pub fn insert_padding(css: &mut CssProperties, padding: &Padding) {
    css.insert("padding-top".into(), px(padding.top));
    css.insert("padding-right".into(), px(padding.right));
    css.insert("padding-bottom".into(), px(padding.bottom));
    css.insert("padding-left".into(), px(padding.left));
}

/// Convert an effective style into CSS properties
pub fn to_css_properties(styles: &BlockStyles, context: CssContext) -> CssProperties {
    let mut css = CssProperties::new();

    if let Some(background) = &styles.background_color {
        css.insert("background-color".into(), background.clone());
    }

    if let Some(color) = &styles.text_color {
        css.insert("color".into(), color.clone());
    }
    if let Some(size) = styles.font_size {
        css.insert("font-size".into(), px(size));
    }
    if let Some(weight) = styles.font_weight {
        css.insert("font-weight".into(), weight.value().to_string());
    }
    if let Some(line_height) = styles.line_height {
        css.insert("line-height".into(), number(line_height));
    }
    if let Some(family) = &styles.font_family {
        css.insert("font-family".into(), family.clone());
    }

    if let Some(display) = styles.display {
        css.insert("display".into(), display.as_str().into());
    }
    if let Some(align) = styles.text_align {
        if context.is_image {
            insert_image_alignment(&mut css, align);
        } else {
            css.insert("text-align".into(), align.as_str().into());
        }
    }
    if let Some(decoration) = styles.text_decoration {
        css.insert("text-decoration".into(), decoration.as_str().into());
    }

    if let Some(padding) = &styles.padding {
        insert_padding(&mut css, padding);
    }

    if let Some(width) = styles.width {
        css.insert("width".into(), px(width));
    }
    match styles.height {
        Some(Height::Px(height)) => {
            css.insert("height".into(), px(height));
        }
        Some(Height::Auto) => {
            css.insert("height".into(), "auto".into());
        }
        None => {}
    }

    if let Some(radius) = styles.border_radius {
        css.insert("border-radius".into(), px(radius));
    }
    if let Some(width) = styles.border_width {
        css.insert("border-width".into(), px(width));
    }
    if let Some(style) = styles.border_style {
        css.insert("border-style".into(), style.as_str().into());
    }
    if let Some(color) = &styles.border_color {
        css.insert("border-color".into(), color.clone());
    }

    css
}

fn insert_image_alignment(css: &mut CssProperties, align: TextAlign) {
    let (left, right) = match align {
        TextAlign::Center => ("auto", "auto"),
        TextAlign::Right => ("auto", "0"),
        TextAlign::Left | TextAlign::Justify => ("0", "auto"),
    };
    css.insert("display".into(), "block".into());
    css.insert("margin-left".into(), left.into());
    css.insert("margin-right".into(), right.into());
}

/// Serialize declarations as a `style` attribute value
pub fn to_style_string(css: &CssProperties) -> String {
    css.iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Inline CSS for the live editing surface
pub fn to_inline_css(styles: &BlockStyles, context: CssContext) -> String {
    to_style_string(&to_css_properties(styles, context))
}
