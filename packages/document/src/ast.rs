//! # Document Tree
//!
//! The block/mark tree emitted by the editing surface, in its JSON shape:
//!
//! ```text
//! { "type": "paragraph",
//!   "attrs": { "uid": "…", "styles": { … } },
//!   "content": [ { "type": "text", "text": "Hi", "marks": [ { "type": "bold" } ] } ] }
//! ```
//!
//! Node and mark types form a closed set. Anything the pipeline does not
//! know is preserved as `Unknown` so a tree always round-trips, and the
//! transformer can skip it without failing the rest of the document.

use crate::id_generator::UID_ATTR;
use crate::styles::BlockStyles;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Node attributes (`attrs` object)
pub type Attrs = Map<String, Value>;

/// Node types understood by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    CodeBlock,
    BulletList,
    OrderedList,
    ListItem,
    Image,
    Youtube,
    Twitter,
    HorizontalRule,
    ButtonBlock,
    SocialLinksBlock,
    UnsubscribeFooterBlock,
    Text,
    HardBreak,
    Unknown(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::CodeBlock => "codeBlock",
            NodeType::BulletList => "bulletList",
            NodeType::OrderedList => "orderedList",
            NodeType::ListItem => "listItem",
            NodeType::Image => "image",
            NodeType::Youtube => "youtube",
            NodeType::Twitter => "twitter",
            NodeType::HorizontalRule => "horizontalRule",
            NodeType::ButtonBlock => "buttonBlock",
            NodeType::SocialLinksBlock => "socialLinksBlock",
            NodeType::UnsubscribeFooterBlock => "unsubscribeFooterBlock",
            NodeType::Text => "text",
            NodeType::HardBreak => "hardBreak",
            NodeType::Unknown(name) => name,
        }
    }

    /// Inline content (lives inside a textblock)
    pub fn is_inline(&self) -> bool {
        matches!(self, NodeType::Text | NodeType::HardBreak)
    }

    /// Types that inherit typography from the global defaults
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Blockquote
                | NodeType::BulletList
                | NodeType::OrderedList
        )
    }

    /// Types that receive a stable `uid` when created
    pub fn carries_uid(&self) -> bool {
        matches!(
            self,
            NodeType::Paragraph
                | NodeType::Heading
                | NodeType::Blockquote
                | NodeType::CodeBlock
                | NodeType::BulletList
                | NodeType::OrderedList
                | NodeType::Image
                | NodeType::Youtube
                | NodeType::Twitter
                | NodeType::HorizontalRule
                | NodeType::ButtonBlock
                | NodeType::SocialLinksBlock
                | NodeType::UnsubscribeFooterBlock
        )
    }

    /// Nodes without a content hole. They occupy a single position in the
    /// live editor.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeType::Image
                | NodeType::Youtube
                | NodeType::Twitter
                | NodeType::HorizontalRule
                | NodeType::ButtonBlock
                | NodeType::SocialLinksBlock
                | NodeType::HardBreak
        )
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        match name {
            "doc" => NodeType::Doc,
            "paragraph" => NodeType::Paragraph,
            "heading" => NodeType::Heading,
            "blockquote" => NodeType::Blockquote,
            "codeBlock" => NodeType::CodeBlock,
            "bulletList" => NodeType::BulletList,
            "orderedList" => NodeType::OrderedList,
            "listItem" => NodeType::ListItem,
            "image" => NodeType::Image,
            "youtube" => NodeType::Youtube,
            "twitter" => NodeType::Twitter,
            "horizontalRule" => NodeType::HorizontalRule,
            "buttonBlock" => NodeType::ButtonBlock,
            "socialLinksBlock" => NodeType::SocialLinksBlock,
            "unsubscribeFooterBlock" => NodeType::UnsubscribeFooterBlock,
            "text" => NodeType::Text,
            "hardBreak" => NodeType::HardBreak,
            other => NodeType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::from(name.as_str())
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline mark types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkType {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    TextStyle,
    Highlight,
    Link,
    Unknown(String),
}

impl MarkType {
    pub fn as_str(&self) -> &str {
        match self {
            MarkType::Bold => "bold",
            MarkType::Italic => "italic",
            MarkType::Underline => "underline",
            MarkType::Strike => "strike",
            MarkType::Code => "code",
            MarkType::TextStyle => "textStyle",
            MarkType::Highlight => "highlight",
            MarkType::Link => "link",
            MarkType::Unknown(name) => name,
        }
    }
}

impl From<String> for MarkType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bold" => MarkType::Bold,
            "italic" => MarkType::Italic,
            "underline" => MarkType::Underline,
            "strike" => MarkType::Strike,
            "code" => MarkType::Code,
            "textStyle" => MarkType::TextStyle,
            "highlight" => MarkType::Highlight,
            "link" => MarkType::Link,
            _ => MarkType::Unknown(name),
        }
    }
}

impl From<MarkType> for String {
    fn from(mark_type: MarkType) -> Self {
        mark_type.as_str().to_string()
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline formatting annotation on a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(mark_type: MarkType) -> Self {
        Self {
            mark_type,
            attrs: Attrs::new(),
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(MarkType::Link).with_attr("href", href.into())
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self::new(MarkType::TextStyle).with_attr("color", color.into())
    }

    pub fn highlight(color: impl Into<String>) -> Self {
        Self::new(MarkType::Highlight).with_attr("color", color.into())
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Non-empty string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(node_type: impl Into<NodeType>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: Attrs::new(),
            content: Vec::new(),
            marks: Vec::new(),
            text: None,
        }
    }

    pub fn doc(content: Vec<Node>) -> Self {
        Self::new(NodeType::Doc).with_children(content)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeType::Text)
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let node = Self::new(NodeType::Paragraph);
        if text.is_empty() {
            node
        } else {
            node.with_child(Self::text(text))
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(NodeType::Heading)
            .with_attr("level", level)
            .with_child(Self::text(text))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_uid(self, uid: impl Into<String>) -> Self {
        self.with_attr(UID_ATTR, uid.into())
    }

    pub fn with_styles(mut self, styles: &BlockStyles) -> Self {
        self.attrs.insert("styles".to_string(), styles.to_value());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.content.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.content.extend(children);
        self
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.push(mark);
        self
    }

    pub fn uid(&self) -> Option<&str> {
        self.attr_str(UID_ATTR)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key).filter(|v| !v.is_null())
    }

    /// Non-empty string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Numeric attribute; numeric strings (`"300"`) are accepted as well
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        match self.attr(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Block style override stored in `attrs.styles`, read leniently
    pub fn styles(&self) -> BlockStyles {
        self.attr("styles")
            .map(BlockStyles::from_value)
            .unwrap_or_default()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        self.collect_text(&mut buffer);
        buffer
    }

    fn collect_text(&self, buffer: &mut String) {
        if let Some(text) = &self.text {
            buffer.push_str(text);
        }
        for child in &self.content {
            child.collect_text(buffer);
        }
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }
}
