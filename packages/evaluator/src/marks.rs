//! # Mark Transformer
//!
//! A text run and its marks become nested inline elements. Marks are sorted
//! by a fixed priority before wrapping so the nesting does not depend on the
//! order the editor applied them:
//!
//! 1. `bold`, `italic`, `underline`, `strike` (innermost)
//! 2. `code`
//! 3. `textStyle`, `highlight`
//! 4. `link` (outermost)
//!
//! Equal priorities keep their original relative order. Unknown marks sort
//! first and render as nothing.

use crate::css::{px, CssProperties};
use crate::vdom::VNode;
use mailcraft_document::{GlobalStyles, Mark, MarkType, Node, NodeType};
use tracing::debug;

pub const DEFAULT_HIGHLIGHT: &str = "#ffeb3b";

pub fn mark_priority(mark_type: &MarkType) -> u8 {
    match mark_type {
        MarkType::Bold | MarkType::Italic | MarkType::Underline | MarkType::Strike => 1,
        MarkType::Code => 2,
        MarkType::TextStyle | MarkType::Highlight => 3,
        MarkType::Link => 4,
        MarkType::Unknown(_) => 0,
    }
}

/// Marks in wrapping order, innermost first
pub fn sort_marks(marks: &[Mark]) -> Vec<&Mark> {
    let mut sorted: Vec<&Mark> = marks.iter().collect();
    sorted.sort_by_key(|mark| mark_priority(&mark.mark_type));
    sorted
}

/// Wrap a text run in its marks
pub fn apply_marks(text: &str, marks: &[Mark], globals: &GlobalStyles) -> VNode {
    sort_marks(marks)
        .into_iter()
        .fold(VNode::text(text), |inner, mark| wrap(inner, mark, globals))
}

fn wrap(inner: VNode, mark: &Mark, globals: &GlobalStyles) -> VNode {
    match &mark.mark_type {
        MarkType::Bold => VNode::element("strong").with_child(inner),
        MarkType::Italic => VNode::element("em").with_child(inner),
        MarkType::Underline => VNode::element("u").with_child(inner),
        MarkType::Strike => VNode::element("s").with_child(inner),
        MarkType::Code => VNode::element("code")
            .with_styles(inline_code_css(globals))
            .with_child(inner),
        MarkType::TextStyle => match mark.attr_str("color") {
            Some(color) => VNode::element("span")
                .with_style("color", color)
                .with_child(inner),
            None => inner,
        },
        MarkType::Highlight => VNode::element("span")
            .with_style(
                "background-color",
                mark.attr_str("color").unwrap_or(DEFAULT_HIGHLIGHT),
            )
            .with_child(inner),
        MarkType::Link => VNode::element("a")
            .with_attr("href", mark.attr_str("href").unwrap_or("#"))
            .with_styles(link_css(globals))
            .with_child(inner),
        MarkType::Unknown(name) => {
            debug!(mark = %name, "Ignoring unknown mark");
            inner
        }
    }
}

pub fn inline_code_css(globals: &GlobalStyles) -> CssProperties {
    let code = &globals.inline_code;
    let mut css = CssProperties::new();
    css.insert("background-color".into(), code.background_color.clone());
    css.insert("color".into(), code.text_color.clone());
    css.insert("border-radius".into(), px(code.border_radius));
    css.insert("padding".into(), "2px 4px".into());
    css.insert("font-family".into(), "monospace".into());
    css.insert("font-size".into(), "0.9em".into());
    css
}

pub fn link_css(globals: &GlobalStyles) -> CssProperties {
    let mut css = CssProperties::new();
    css.insert("color".into(), globals.link.color.clone());
    css.insert(
        "text-decoration".into(),
        globals.link.text_decoration.as_str().into(),
    );
    css
}

/// Transform the inline children of a textblock
pub fn transform_inline(content: &[Node], globals: &GlobalStyles) -> Vec<VNode> {
    content
        .iter()
        .filter_map(|node| match &node.node_type {
            NodeType::HardBreak => Some(VNode::element("br")),
            NodeType::Text => Some(apply_marks(
                node.text.as_deref().unwrap_or_default(),
                &node.marks,
                globals,
            )),
            other => {
                debug!(node_type = %other, "Non-text inline node, keeping text only");
                node.text.as_deref().map(VNode::text)
            }
        })
        .collect()
}
