//! # Mailcraft Evaluator
//!
//! Transforms an `EmailTemplate` into an [`EmailDocument`]: a virtual DOM of
//! email-safe elements with inline styles, plus the title, preview text and
//! body/container styles the HTML compiler wraps around it.
//!
//! ## Determinism
//!
//! The same `(content, globalStyles, options)` always yields an identical
//! document. Style maps are insertion-ordered and nothing reads the clock,
//! the environment or a random source.
//!
//! ## Partial failure
//!
//! Every block is transformed independently. A node of unknown type is
//! skipped with a warning. A node whose handler fails (bad `level`, image
//! without `src`, …) is logged with its type and uid and dropped. Neither
//! affects its siblings. Embeds whose reference cannot be resolved render as
//! nothing, without a warning.

use crate::embeds::{
    social_links, youtube_thumbnail_url, youtube_video_id, youtube_watch_url, SOCIAL_ICON_SIZE,
};
use crate::marks::{apply_marks, link_css, transform_inline};
use crate::style_resolver::{body_css, container_css, node_css};
use crate::vdom::{EmailDocument, VNode};
use mailcraft_document::{EmailTemplate, GlobalStyles, Mark, Node, NodeType, TextAlign};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{node_type} is missing required attribute '{attr}'")]
    MissingAttribute {
        node_type: String,
        attr: &'static str,
    },

    #[error("{node_type} has invalid attribute '{attr}': {reason}")]
    InvalidAttribute {
        node_type: String,
        attr: &'static str,
        reason: String,
    },

    #[error("{0} is not valid at block level")]
    UnexpectedNode(String),

    #[error("no asset base URL configured; {0} would reference relative icon paths")]
    MissingAssetBaseUrl(String),
}

/// Transformation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalOptions {
    /// Base URL that email-bound asset paths (social icons) are joined to
    pub asset_base_url: Option<String>,
    /// Fail social link blocks instead of emitting relative icon paths when
    /// no base URL is configured
    pub strict_asset_urls: bool,
}

impl EvalOptions {
    pub fn with_asset_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.asset_base_url = Some(base_url.into());
        self
    }

    fn base_url(&self) -> Option<&str> {
        self.asset_base_url
            .as_deref()
            .map(str::trim)
            .filter(|base| !base.is_empty())
    }
}

const DEFAULT_TITLE: &str = "Email";
const DEFAULT_BUTTON_TEXT: &str = "Click me";
const MUTED_BORDER: &str = "1px solid #e5e7eb";
const UNSUBSCRIBE_NOTICE: &str = "You are receiving this email because you opted in via our site. ";

/// Document transformer
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Transform a whole template
    #[instrument(skip(self, template), fields(template_id = %template.id, blocks = template.content.content.len()))]
    pub fn evaluate(&self, template: &EmailTemplate) -> EmailDocument {
        info!("Starting template transformation");

        let globals = &template.global_styles;
        let nodes = self.transform_content(&template.content, globals);

        let title = match template.header.subject.trim() {
            "" => DEFAULT_TITLE.to_string(),
            subject => subject.to_string(),
        };

        let document = EmailDocument {
            title,
            preview: template.header.preview.clone(),
            body_styles: body_css(globals),
            container_styles: container_css(globals),
            custom_css: globals.custom_css.clone(),
            nodes,
        };

        info!(nodes = document.nodes.len(), "Template transformation complete");
        document
    }

    /// Transform the children of a document root
    pub fn transform_content(&self, content: &Node, globals: &GlobalStyles) -> Vec<VNode> {
        if content.node_type != NodeType::Doc {
            warn!(node_type = %content.node_type, "Content root is not a doc, transforming its children anyway");
        }
        self.transform_blocks(&content.content, globals)
    }

    /// Transform sibling blocks; failures stay local to the failing node
    pub fn transform_blocks(&self, nodes: &[Node], globals: &GlobalStyles) -> Vec<VNode> {
        nodes
            .iter()
            .filter_map(|node| match self.transform_node(node, globals) {
                Ok(vnode) => vnode,
                Err(err) => {
                    warn!(
                        node_type = %node.node_type,
                        uid = node.uid().unwrap_or_default(),
                        error = %err,
                        "Node transformation failed, skipping"
                    );
                    None
                }
            })
            .collect()
    }

    /// Transform one block. `Ok(None)` means "renders as nothing".
    pub fn transform_node(&self, node: &Node, globals: &GlobalStyles) -> EvalResult<Option<VNode>> {
        debug!(node_type = %node.node_type, uid = node.uid().unwrap_or_default(), "Transforming node");

        let vnode = match &node.node_type {
            NodeType::Paragraph => self.textblock("p", node, globals),
            NodeType::Heading => {
                let level = validated_heading_level(node)?;
                self.textblock(&format!("h{}", level), node, globals)
            }
            NodeType::Blockquote => self.blockquote(node, globals),
            NodeType::CodeBlock => self.code_block(node, globals),
            NodeType::BulletList => self.container("ul", node, globals),
            NodeType::OrderedList => self.container("ol", node, globals),
            NodeType::ListItem => self.container("li", node, globals),
            NodeType::Image => self.image(node, globals)?,
            NodeType::Youtube => match self.youtube(node, globals) {
                Some(vnode) => vnode,
                None => return Ok(None),
            },
            NodeType::Twitter => match self.twitter(node, globals) {
                Some(vnode) => vnode,
                None => return Ok(None),
            },
            NodeType::HorizontalRule => self.horizontal_rule(node, globals),
            NodeType::ButtonBlock => self.button(node, globals),
            NodeType::SocialLinksBlock => match self.social_links(node, globals)? {
                Some(vnode) => vnode,
                None => return Ok(None),
            },
            NodeType::UnsubscribeFooterBlock => self.unsubscribe_footer(node, globals),
            NodeType::HardBreak => VNode::element("br"),
            NodeType::Text => {
                apply_marks(node.text.as_deref().unwrap_or_default(), &node.marks, globals)
            }
            NodeType::Doc => return Err(EvalError::UnexpectedNode("nested doc".to_string())),
            NodeType::Unknown(name) => {
                warn!(node_type = %name, uid = node.uid().unwrap_or_default(), "Unsupported node type, skipping");
                return Ok(None);
            }
        };

        Ok(Some(vnode.with_key(node.uid())))
    }

    fn textblock(&self, tag: &str, node: &Node, globals: &GlobalStyles) -> VNode {
        VNode::element(tag)
            .with_styles(node_css(node, globals))
            .with_children(transform_inline(&node.content, globals))
    }

    fn container(&self, tag: &str, node: &Node, globals: &GlobalStyles) -> VNode {
        VNode::element(tag)
            .with_styles(node_css(node, globals))
            .with_children(self.transform_blocks(&node.content, globals))
    }

    fn blockquote(&self, node: &Node, globals: &GlobalStyles) -> VNode {
        VNode::element("blockquote")
            .with_style("margin", "16px 0")
            .with_style("border-left", "4px solid #e5e7eb")
            .with_style("padding-left", "16px")
            .with_style("font-style", "italic")
            .with_styles(node_css(node, globals))
            .with_children(self.transform_blocks(&node.content, globals))
    }

    fn code_block(&self, node: &Node, globals: &GlobalStyles) -> VNode {
        // <pre> keeps the inherited family; <code> only falls back to
        // monospace when the block sets no family of its own
        let code_font = if node.styles().font_family.is_some() {
            "inherit"
        } else {
            "monospace"
        };

        let text = code_block_text(node);
        VNode::element("pre")
            .with_style("margin", "16px 0")
            .with_style("white-space", "pre-wrap")
            .with_styles(node_css(node, globals))
            .with_child(
                VNode::element("code")
                    .with_style("font-family", code_font)
                    .with_child(VNode::text(text)),
            )
    }

    fn image(&self, node: &Node, globals: &GlobalStyles) -> EvalResult<VNode> {
        let src = node.attr_str("src").ok_or_else(|| missing(node, "src"))?;

        let width = dimension(node, "width")?;
        let height = dimension(node, "height")?;

        let mut img = VNode::element("img")
            .with_attr("src", src)
            .with_attr("alt", node.attr_str("alt").unwrap_or_default());
        if let Some(title) = node.attr_str("title") {
            img = img.with_attr("title", title);
        }
        if let Some(width) = width {
            img = img.with_attr("width", width.to_string());
        }
        if let Some(height) = height {
            img = img.with_attr("height", height.to_string());
        }

        // Block styles win over the fluid fallback
        let mut css = node_css(node, globals);
        if width.is_none() && height.is_none() {
            css.entry("max-width".into()).or_insert_with(|| "100%".into());
            css.entry("height".into()).or_insert_with(|| "auto".into());
        }

        Ok(img.with_style("border", "0").with_styles(css))
    }

    fn youtube(&self, node: &Node, globals: &GlobalStyles) -> Option<VNode> {
        let url = embed_url(node)?;
        let Some(id) = youtube_video_id(url) else {
            debug!(url, "No video id in youtube url, rendering nothing");
            return None;
        };

        let thumbnail = VNode::element("img")
            .with_attr("src", youtube_thumbnail_url(&id))
            .with_attr("alt", node.attr_str("title").unwrap_or("YouTube video"))
            .with_style("display", "block")
            .with_style("max-width", "100%")
            .with_style("height", "auto")
            .with_style("border", "0")
            .with_styles(node_css(node, globals));

        Some(
            VNode::element("a")
                .with_attr("href", youtube_watch_url(&id))
                .with_style("display", "block")
                .with_child(thumbnail),
        )
    }

    fn twitter(&self, node: &Node, globals: &GlobalStyles) -> Option<VNode> {
        let url = embed_url(node)?;
        let link = VNode::element("a")
            .with_attr("href", url)
            .with_styles(link_css(globals))
            .with_child(VNode::text("View post on X"));

        Some(
            VNode::element("p")
                .with_styles(node_css(node, globals))
                .with_child(link),
        )
    }

    fn horizontal_rule(&self, node: &Node, globals: &GlobalStyles) -> VNode {
        VNode::element("hr")
            .with_style("border", "none")
            .with_style("border-top", MUTED_BORDER)
            .with_style("margin", "24px 0")
            .with_styles(node_css(node, globals))
    }

    fn button(&self, node: &Node, globals: &GlobalStyles) -> VNode {
        let align = node.styles().text_align.unwrap_or(TextAlign::Left);
        let mut css = node_css(node, globals);
        css.shift_remove("text-align");

        let anchor = VNode::element("a")
            .with_attr("href", node.attr_str("href").unwrap_or("#"))
            .with_styles(css)
            .with_child(VNode::text(
                node.attr_str("text").unwrap_or(DEFAULT_BUTTON_TEXT),
            ));

        VNode::element("div")
            .with_style("text-align", align.as_str())
            .with_style("margin", "16px 0")
            .with_child(anchor)
    }

    fn social_links(&self, node: &Node, globals: &GlobalStyles) -> EvalResult<Option<VNode>> {
        let links = social_links(node.attr("links"));
        if links.is_empty() {
            debug!(uid = node.uid().unwrap_or_default(), "Social links block has no usable links");
            return Ok(None);
        }

        let base_url = self.options.base_url();
        if base_url.is_none() {
            if self.options.strict_asset_urls {
                return Err(EvalError::MissingAssetBaseUrl(node.node_type.to_string()));
            }
            warn!(
                uid = node.uid().unwrap_or_default(),
                "No asset base URL configured, social icons use relative paths that will not load in email clients"
            );
        }

        let align = node.styles().text_align.unwrap_or(TextAlign::Center);
        let size = format!("{}px", SOCIAL_ICON_SIZE);

        let anchors = links.iter().map(|link| {
            let icon = VNode::element("img")
                .with_attr("src", link.platform.icon_url(base_url))
                .with_attr("alt", link.platform.label())
                .with_attr("width", SOCIAL_ICON_SIZE.to_string())
                .with_attr("height", SOCIAL_ICON_SIZE.to_string())
                .with_style("display", "block")
                .with_style("border", "0")
                .with_style("width", size.as_str())
                .with_style("height", size.as_str());

            VNode::element("a")
                .with_attr("href", link.url.as_str())
                .with_style("display", "inline-block")
                .with_style("margin", "0 4px")
                .with_child(icon)
        });

        Ok(Some(
            VNode::element("div")
                .with_style("text-align", align.as_str())
                .with_style("margin", "16px 0")
                .with_styles(node_css(node, globals))
                .with_children(anchors.collect()),
        ))
    }

    fn unsubscribe_footer(&self, node: &Node, globals: &GlobalStyles) -> VNode {
        let children = if node.content.is_empty() {
            transform_inline(&default_unsubscribe_content(), globals)
        } else {
            transform_inline(&node.content, globals)
        };

        VNode::element("p")
            .with_style("font-size", "12px")
            .with_style("color", "#6b7280")
            .with_style("text-align", "center")
            .with_style("border-top", MUTED_BORDER)
            .with_style("padding-top", "16px")
            .with_style("margin-top", "32px")
            .with_styles(node_css(node, globals))
            .with_children(children)
    }
}

/// Inline content of a freshly inserted unsubscribe footer
pub fn default_unsubscribe_content() -> Vec<Node> {
    vec![
        Node::text(UNSUBSCRIBE_NOTICE),
        Node::text("Unsubscribe").with_mark(Mark::link("{{unsubscribe_url}}")),
    ]
}

/// Convenience wrapper: transform with default options
pub fn transform_template(template: &EmailTemplate) -> EmailDocument {
    Evaluator::new().evaluate(template)
}

/// Text runs of a code block, one per line
pub fn code_block_text(node: &Node) -> String {
    node.content
        .iter()
        .filter(|child| child.is_text())
        .map(|child| child.text.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n")
}

fn validated_heading_level(node: &Node) -> EvalResult<u8> {
    match node.attr("level") {
        None => Ok(1),
        Some(_) => match node.attr_f64("level") {
            Some(level) if level.fract() == 0.0 && (1.0..=6.0).contains(&level) => {
                Ok(level as u8)
            }
            _ => Err(EvalError::InvalidAttribute {
                node_type: node.node_type.to_string(),
                attr: "level",
                reason: "expected an integer between 1 and 6".to_string(),
            }),
        },
    }
}

fn dimension(node: &Node, attr: &'static str) -> EvalResult<Option<f64>> {
    match node.attr(attr) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(_) => match node.attr_f64(attr) {
            Some(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
            _ => Err(EvalError::InvalidAttribute {
                node_type: node.node_type.to_string(),
                attr,
                reason: "expected a positive number".to_string(),
            }),
        },
    }
}

fn embed_url(node: &Node) -> Option<&str> {
    node.attr_str("src").or_else(|| node.attr_str("url"))
}

fn missing(node: &Node, attr: &'static str) -> EvalError {
    EvalError::MissingAttribute {
        node_type: node.node_type.to_string(),
        attr,
    }
}
