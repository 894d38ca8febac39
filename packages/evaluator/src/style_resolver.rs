//! # Style Resolver
//!
//! Block override → global default → node-type fallback.
//!
//! | Node type                          | Inherited when unset                               |
//! |------------------------------------|----------------------------------------------------|
//! | paragraph, heading, blockquote, lists | typography: color, size, line height, family    |
//! | image                              | image: border radius                               |
//! | codeBlock                          | codeBlock: background, radius, padding; typography: color, family |
//! | anything else                      | nothing                                            |

use crate::css::{insert_padding, px, to_css_properties, CssContext, CssProperties};
use mailcraft_document::{Align, BlockStyles, GlobalStyles, Node, NodeType};

/// Default font size per heading level
pub fn heading_font_size(level: u8) -> f64 {
    match level {
        1 => 32.0,
        2 => 24.0,
        3 => 20.0,
        4 => 16.0,
        5 => 14.0,
        _ => 12.0,
    }
}

/// Merge a block override with the global defaults its type inherits
pub fn resolve_effective_style(
    block: &BlockStyles,
    globals: &GlobalStyles,
    node_type: &NodeType,
) -> BlockStyles {
    let mut effective = block.clone();

    if node_type.is_text_bearing() {
        let typography = &globals.typography;
        inherit(&mut effective.text_color, || typography.color.clone());
        inherit(&mut effective.font_size, || typography.font_size);
        inherit(&mut effective.line_height, || typography.line_height);
        inherit(&mut effective.font_family, || typography.font_family.clone());
        return effective;
    }

    match node_type {
        NodeType::Image => {
            inherit(&mut effective.border_radius, || globals.image.border_radius);
        }
        NodeType::CodeBlock => {
            let code = &globals.code_block;
            inherit(&mut effective.background_color, || code.background_color.clone());
            inherit(&mut effective.border_radius, || code.border_radius);
            inherit(&mut effective.padding, || code.padding);
            inherit(&mut effective.text_color, || globals.typography.color.clone());
            inherit(&mut effective.font_family, || {
                globals.typography.font_family.clone()
            });
        }
        _ => {}
    }

    effective
}

fn inherit<T>(slot: &mut Option<T>, default: impl FnOnce() -> T) {
    if slot.is_none() {
        *slot = Some(default());
    }
}

/// CSS for a node in the HTML output path.
///
/// Adds the computed heading and button defaults on top of the converted
/// effective style. The live editing path does not use these.
pub fn node_css(node: &Node, globals: &GlobalStyles) -> CssProperties {
    let block = node.styles();
    let effective = resolve_effective_style(&block, globals, &node.node_type);
    let context = CssContext {
        is_image: node.node_type == NodeType::Image,
    };
    let mut css = to_css_properties(&effective, context);

    match node.node_type {
        NodeType::Heading => apply_heading_defaults(&mut css, &block, heading_level(node)),
        NodeType::ButtonBlock => apply_button_defaults(&mut css, &block, globals),
        _ => {}
    }

    css
}

/// Heading level attribute, defaulting to 1 when absent
pub fn heading_level(node: &Node) -> u8 {
    node.attr_f64("level")
        .filter(|level| (1.0..=6.0).contains(level))
        .map(|level| level as u8)
        .unwrap_or(1)
}

fn apply_heading_defaults(css: &mut CssProperties, block: &BlockStyles, level: u8) {
    if block.font_size.is_none() {
        css.insert("font-size".into(), px(heading_font_size(level)));
        if block.font_weight.is_none() {
            css.insert("font-weight".into(), "700".into());
        }
    }
}

fn apply_button_defaults(css: &mut CssProperties, block: &BlockStyles, globals: &GlobalStyles) {
    let button = &globals.button;

    css.entry("display".into())
        .or_insert_with(|| "inline-block".into());
    css.entry("text-decoration".into())
        .or_insert_with(|| "none".into());
    css.insert("cursor".into(), "pointer".into());

    if block.background_color.is_none() {
        css.insert("background-color".into(), button.background_color.clone());
    }
    if block.text_color.is_none() {
        css.insert("color".into(), button.text_color.clone());
    }
    if block.padding.is_none() {
        insert_padding(css, &button.padding);
    }
    if block.border_radius.is_none() {
        css.insert("border-radius".into(), px(button.border_radius));
    }
}

/// Styles of the outer `<body>`
pub fn body_css(globals: &GlobalStyles) -> CssProperties {
    let typography = &globals.typography;
    let mut css = CssProperties::new();
    css.insert("background-color".into(), globals.body.background_color.clone());
    css.insert("margin".into(), "0".into());
    css.insert("padding".into(), "0".into());
    css.insert("font-family".into(), typography.font_family.clone());
    css.insert("font-size".into(), px(typography.font_size));
    css.insert("line-height".into(), typography.line_height.to_string());
    css.insert("color".into(), typography.color.clone());
    css
}

/// Styles of the width-constrained content container
pub fn container_css(globals: &GlobalStyles) -> CssProperties {
    let container = &globals.container;
    let mut css = CssProperties::new();
    css.insert("max-width".into(), px(container.width));
    css.insert("background-color".into(), container.background_color.clone());
    insert_padding(&mut css, &container.padding);

    match container.align {
        Align::Center => {
            css.insert("margin-left".into(), "auto".into());
            css.insert("margin-right".into(), "auto".into());
        }
        Align::Right => {
            css.insert("margin-left".into(), "auto".into());
        }
        Align::Left => {}
    }

    css
}
