use mailcraft_evaluator::{to_style_string, EmailDocument, VNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Invalid attribute name {attr:?} on <{tag}>")]
    InvalidAttributeName { tag: String, attr: String },

    #[error("Compilation error: {0}")]
    Generic(String),
}

impl From<String> for CompileError {
    fn from(s: String) -> Self {
        CompileError::Generic(s)
    }
}

impl From<&str> for CompileError {
    fn from(s: &str) -> Self {
        CompileError::Generic(s.to_string())
    }
}

/// Inbox clients show at most this many characters of preview text
pub const PREVIEW_MAX_LENGTH: usize = 150;

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Emit `data-uid` on elements rendered from uid-bearing blocks
    pub block_ids: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            block_ids: false,
        }
    }
}

impl CompileOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.add(text);
        self.newline();
    }

    fn add_indent(&mut self) {
        if !self.options.pretty {
            return;
        }
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile an evaluated email document to a complete HTML page
#[instrument(skip(document, options), fields(nodes = document.nodes.len(), pretty = options.pretty))]
pub fn compile_email(
    document: &EmailDocument,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    compile_head(document, &mut ctx);
    compile_node(&body_node(document), &mut ctx)?;

    ctx.dedent();
    ctx.add_line("</html>");

    let html = ctx.get_output();
    debug!(bytes = html.len(), "compiled email");
    Ok(html)
}

/// Compile nodes without the surrounding page, e.g. for an editor preview
pub fn compile_fragment(nodes: &[VNode], options: CompileOptions) -> Result<String, CompileError> {
    let mut ctx = Context::new(options);
    for node in nodes {
        compile_node(node, &mut ctx)?;
    }
    Ok(ctx.get_output())
}

fn compile_head(document: &EmailDocument, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line("<meta name=\"x-apple-disable-message-reformatting\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(&document.title)));

    if let Some(css) = document
        .custom_css
        .as_deref()
        .map(str::trim)
        .filter(|css| !css.is_empty())
    {
        ctx.add_line("<style>");
        ctx.indent();
        for line in css.lines() {
            ctx.add_line(&escape_style_text(line));
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }

    ctx.dedent();
    ctx.add_line("</head>");
}

/// `<body>` wrapping the hidden preview text and the width-constrained container
fn body_node(document: &EmailDocument) -> VNode {
    let mut body = VNode::element("body").with_styles(document.body_styles.clone());

    let preview: String = document
        .preview
        .trim()
        .chars()
        .take(PREVIEW_MAX_LENGTH)
        .collect();
    if !preview.is_empty() {
        body = body.with_child(
            VNode::element("div")
                .with_style("display", "none")
                .with_style("overflow", "hidden")
                .with_style("line-height", "1px")
                .with_style("opacity", "0")
                .with_style("max-height", "0")
                .with_style("max-width", "0")
                .with_attr("data-skip-in-text", "true")
                .with_child(VNode::text(preview)),
        );
    }

    body.with_child(
        VNode::element("div")
            .with_styles(document.container_styles.clone())
            .with_children(document.nodes.clone()),
    )
}

/// Writes a node on its own line(s). Elements holding block children get
/// one child per line; anything else is written inline so no whitespace
/// leaks into rendered text.
fn compile_node(node: &VNode, ctx: &mut Context) -> Result<(), CompileError> {
    match node {
        VNode::Text { content } => {
            ctx.add_line(&escape_html(content));
            Ok(())
        }
        VNode::Comment { content } => {
            ctx.add_line(&comment(content));
            Ok(())
        }
        VNode::Element { tag, children, .. } => {
            ctx.add_indent();
            compile_open_tag(node, ctx)?;

            if children.is_empty() && is_self_closing(tag) {
                ctx.newline();
                return Ok(());
            }

            if ctx.options.pretty && lays_out_blocks(children) {
                ctx.newline();
                ctx.indent();
                for child in children {
                    compile_node(child, ctx)?;
                }
                ctx.dedent();
                ctx.add_indent();
            } else {
                for child in children {
                    compile_inline(child, ctx)?;
                }
            }

            ctx.add(&format!("</{}>", tag));
            ctx.newline();
            Ok(())
        }
    }
}

fn compile_inline(node: &VNode, ctx: &mut Context) -> Result<(), CompileError> {
    match node {
        VNode::Text { content } => ctx.add(&escape_html(content)),
        VNode::Comment { content } => ctx.add(&comment(content)),
        VNode::Element { tag, children, .. } => {
            compile_open_tag(node, ctx)?;
            if children.is_empty() && is_self_closing(tag) {
                return Ok(());
            }
            for child in children {
                compile_inline(child, ctx)?;
            }
            ctx.add(&format!("</{}>", tag));
        }
    }
    Ok(())
}

fn compile_open_tag(node: &VNode, ctx: &mut Context) -> Result<(), CompileError> {
    let VNode::Element {
        tag,
        attributes,
        styles,
        children,
        key,
    } = node
    else {
        return Ok(());
    };

    if !is_valid_name(tag) {
        return Err(CompileError::InvalidTagName(tag.clone()));
    }

    ctx.add(&format!("<{}", tag));

    for (name, value) in attributes {
        if !is_valid_name(name) {
            return Err(CompileError::InvalidAttributeName {
                tag: tag.clone(),
                attr: name.clone(),
            });
        }
        if name == "style" && !styles.is_empty() {
            continue;
        }
        ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
    }

    if ctx.options.block_ids {
        if let Some(uid) = key {
            ctx.add(&format!(" data-uid=\"{}\"", escape_html(uid)));
        }
    }

    if !styles.is_empty() {
        ctx.add(&format!(" style=\"{}\"", escape_html(&to_style_string(styles))));
    }

    if children.is_empty() && is_self_closing(tag) {
        ctx.add(" />");
    } else {
        ctx.add(">");
    }
    Ok(())
}

/// Replace every literal `{{name}}` with its value. Values are inserted as-is;
/// unknown placeholders are left untouched.
pub fn substitute_variables(html: &str, variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .fold(html.to_string(), |html, (name, value)| {
            html.replace(&format!("{{{{{}}}}}", name), value)
        })
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_style_text(css: &str) -> String {
    css.replace("</style", "<\\/style")
}

fn comment(content: &str) -> String {
    format!("<!-- {} -->", content.replace("--", "- -"))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "br" | "hr" | "meta" | "link" | "area" | "base" | "col" | "wbr"
    )
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "body"
            | "div"
            | "p"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "blockquote"
            | "pre"
            | "hr"
            | "table"
            | "tr"
            | "td"
    )
}

/// One child per line only when there is no loose text to disturb
fn lays_out_blocks(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, VNode::Element { tag, .. } if is_block_tag(tag)))
        && !children.iter().any(|child| matches!(child, VNode::Text { .. }))
}
