/// Per-node-type transformation tests
///
/// Each test feeds a small document through the evaluator and checks the
/// element structure and inline styles of the result.
use crate::evaluator::{EvalOptions, Evaluator};
use crate::vdom::VNode;
use mailcraft_document::{EmailTemplate, GlobalStyles, Node};
use serde_json::{json, Value};

fn template_with(content: Value) -> EmailTemplate {
    let mut template = EmailTemplate::new();
    template.content = serde_json::from_value(content).expect("valid document");
    template
}

fn transform(content: Value) -> Vec<VNode> {
    Evaluator::new().evaluate(&template_with(content)).nodes
}

fn single(content: Value) -> VNode {
    let mut nodes = transform(json!({ "type": "doc", "content": [content] }));
    assert_eq!(nodes.len(), 1, "expected exactly one node, got {:?}", nodes);
    nodes.remove(0)
}

#[test]
fn test_paragraph_with_inherited_typography() {
    let node = single(json!({
        "type": "paragraph",
        "attrs": { "uid": "p1", "styles": { "textAlign": "center" } },
        "content": [{ "type": "text", "text": "Hello" }]
    }));

    assert_eq!(node.tag(), Some("p"));
    assert_eq!(node.key(), Some("p1"));
    assert_eq!(node.style("color"), Some("#000000"));
    assert_eq!(node.style("font-size"), Some("14px"));
    assert_eq!(node.style("line-height"), Some("1.55"));
    assert_eq!(node.style("text-align"), Some("center"));
    assert_eq!(node.text_content(), "Hello");
}

#[test]
fn test_heading_levels() {
    let h3 = single(json!({
        "type": "heading",
        "attrs": { "level": 3 },
        "content": [{ "type": "text", "text": "Section" }]
    }));
    assert_eq!(h3.tag(), Some("h3"));
    assert_eq!(h3.style("font-size"), Some("20px"));
    assert_eq!(h3.style("font-weight"), Some("700"));

    let no_level = single(json!({
        "type": "heading",
        "content": [{ "type": "text", "text": "Title" }]
    }));
    assert_eq!(no_level.tag(), Some("h1"));
    assert_eq!(no_level.style("font-size"), Some("32px"));
}

#[test]
fn test_lists_nest() {
    let list = single(json!({
        "type": "orderedList",
        "attrs": { "uid": "ol", "styles": { "textColor": "#333333" } },
        "content": [
            { "type": "listItem", "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] }
            ] },
            { "type": "listItem", "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] },
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "nested" }] }
                    ] }
                ] }
            ] }
        ]
    }));

    assert_eq!(list.tag(), Some("ol"));
    assert_eq!(list.style("color"), Some("#333333"));
    assert_eq!(list.children().len(), 2);
    assert_eq!(list.children()[0].tag(), Some("li"));
    assert!(list.children()[1].find_tag("ul").is_some());
    assert_eq!(list.text_content(), "onetwonested");
}

#[test]
fn test_blockquote_fixed_styles_merge_with_resolved() {
    let quote = single(json!({
        "type": "blockquote",
        "attrs": { "styles": { "textColor": "#555555" } },
        "content": [
            { "type": "paragraph", "content": [{ "type": "text", "text": "Quoted" }] }
        ]
    }));

    assert_eq!(quote.tag(), Some("blockquote"));
    assert_eq!(quote.style("border-left"), Some("4px solid #e5e7eb"));
    assert_eq!(quote.style("padding-left"), Some("16px"));
    assert_eq!(quote.style("font-style"), Some("italic"));
    assert_eq!(quote.style("color"), Some("#555555"));
    assert_eq!(quote.children()[0].tag(), Some("p"));
}

#[test]
fn test_code_block_joins_runs_with_newline() {
    let pre = single(json!({
        "type": "codeBlock",
        "content": [
            { "type": "text", "text": "let a = 1;" },
            { "type": "text", "text": "let b = 2;" }
        ]
    }));

    assert_eq!(pre.tag(), Some("pre"));
    assert_eq!(pre.style("background-color"), Some("#f3f4f6"));
    assert_eq!(pre.style("padding-top"), Some("16px"));
    assert_eq!(pre.style("border-radius"), Some("4px"));

    let code = pre.find_tag("code").expect("code element");
    assert_eq!(code.style("font-family"), Some("monospace"));
    assert_eq!(code.text_content(), "let a = 1;\nlet b = 2;");
}

#[test]
fn test_code_block_inherits_typography_family() {
    let mut template = template_with(json!({
        "type": "doc",
        "content": [{ "type": "codeBlock", "content": [{ "type": "text", "text": "x" }] }]
    }));
    template.global_styles.typography.font_family = "Georgia, serif".to_string();

    let nodes = Evaluator::new().evaluate(&template).nodes;
    assert_eq!(nodes[0].style("font-family"), Some("Georgia, serif"));
    let code = nodes[0].find_tag("code").expect("code element");
    assert_eq!(code.style("font-family"), Some("monospace"));

    let own = single(json!({
        "type": "codeBlock",
        "attrs": { "styles": { "fontFamily": "Courier New" } },
        "content": [{ "type": "text", "text": "x" }]
    }));
    assert_eq!(own.style("font-family"), Some("Courier New"));
    let code = own.find_tag("code").expect("code element");
    assert_eq!(code.style("font-family"), Some("inherit"));
}

#[test]
fn test_image_fallback_only_without_dimensions() {
    let fluid = single(json!({
        "type": "image",
        "attrs": { "src": "https://cdn.example.com/a.png", "alt": "A" }
    }));
    assert_eq!(fluid.tag(), Some("img"));
    assert_eq!(fluid.style("max-width"), Some("100%"));
    assert_eq!(fluid.style("height"), Some("auto"));
    assert_eq!(fluid.style("border-radius"), Some("8px"));
    assert_eq!(fluid.attr("alt"), Some("A"));

    let sized = single(json!({
        "type": "image",
        "attrs": { "src": "https://cdn.example.com/a.png", "width": 300, "height": 150 }
    }));
    assert_eq!(sized.style("max-width"), None);
    assert_eq!(sized.style("height"), None);
    assert_eq!(sized.attr("width"), Some("300"));
    assert_eq!(sized.attr("height"), Some("150"));
}

#[test]
fn test_image_block_styles_beat_fluid_fallback() {
    let img = single(json!({
        "type": "image",
        "attrs": { "src": "https://cdn.example.com/a.png", "styles": { "width": 300, "height": 200 } }
    }));

    assert_eq!(img.attr("width"), None);
    assert_eq!(img.attr("height"), None);
    assert_eq!(img.style("width"), Some("300px"));
    assert_eq!(img.style("height"), Some("200px"));
    assert_eq!(img.style("max-width"), Some("100%"));

    let only_height = single(json!({
        "type": "image",
        "attrs": { "src": "a.png", "styles": { "height": 120 } }
    }));
    assert_eq!(only_height.style("height"), Some("120px"));
}

#[test]
fn test_image_alignment_margins() {
    let img = single(json!({
        "type": "image",
        "attrs": { "src": "a.png", "styles": { "textAlign": "center" } }
    }));

    assert_eq!(img.style("text-align"), None);
    assert_eq!(img.style("display"), Some("block"));
    assert_eq!(img.style("margin-left"), Some("auto"));
    assert_eq!(img.style("margin-right"), Some("auto"));
}

#[test]
fn test_youtube_degrades_to_thumbnail() {
    let link = single(json!({
        "type": "youtube",
        "attrs": { "src": "https://youtu.be/abc123" }
    }));

    assert_eq!(link.tag(), Some("a"));
    assert_eq!(link.attr("href"), Some("https://www.youtube.com/watch?v=abc123"));
    let thumb = link.find_tag("img").expect("thumbnail");
    assert_eq!(
        thumb.attr("src"),
        Some("https://img.youtube.com/vi/abc123/hqdefault.jpg")
    );

    let nothing = transform(json!({
        "type": "doc",
        "content": [{ "type": "youtube", "attrs": { "src": "https://example.com" } }]
    }));
    assert!(nothing.is_empty());
}

#[test]
fn test_twitter_degrades_to_link() {
    let mut template = template_with(json!({
        "type": "doc",
        "content": [{ "type": "twitter", "attrs": { "src": "https://x.com/acme/status/1" } }]
    }));
    template.global_styles.link.color = "#ff00ff".into();

    let nodes = Evaluator::new().evaluate(&template).nodes;
    let link = nodes[0].find_tag("a").expect("link");
    assert_eq!(link.attr("href"), Some("https://x.com/acme/status/1"));
    assert_eq!(link.style("color"), Some("#ff00ff"));
    assert_eq!(link.text_content(), "View post on X");
}

#[test]
fn test_horizontal_rule() {
    let hr = single(json!({ "type": "horizontalRule", "attrs": { "uid": "hr1" } }));
    assert_eq!(hr.tag(), Some("hr"));
    assert_eq!(hr.key(), Some("hr1"));
    assert!(hr.children().is_empty());
}

#[test]
fn test_button_wrapper_and_defaults() {
    let wrapper = single(json!({
        "type": "buttonBlock",
        "attrs": { "text": "Buy now", "href": "https://shop.example.com" }
    }));

    assert_eq!(wrapper.tag(), Some("div"));
    assert_eq!(wrapper.style("text-align"), Some("left"));

    let anchor = wrapper.find_tag("a").expect("anchor");
    assert_eq!(anchor.attr("href"), Some("https://shop.example.com"));
    assert_eq!(anchor.style("display"), Some("inline-block"));
    assert_eq!(anchor.style("background-color"), Some("#000000"));
    assert_eq!(anchor.style("color"), Some("#ffffff"));
    assert_eq!(anchor.style("padding-right"), Some("24px"));
    assert_eq!(anchor.text_content(), "Buy now");

    let centered = single(json!({
        "type": "buttonBlock",
        "attrs": { "styles": { "textAlign": "center" } }
    }));
    assert_eq!(centered.style("text-align"), Some("center"));
    let anchor = centered.find_tag("a").expect("anchor");
    assert_eq!(anchor.attr("href"), Some("#"));
    assert_eq!(anchor.style("text-align"), None);
    assert_eq!(anchor.text_content(), "Click me");
}

#[test]
fn test_unsubscribe_footer() {
    let footer = single(json!({
        "type": "unsubscribeFooterBlock",
        "content": [
            { "type": "text", "text": "Bye. " },
            { "type": "text", "text": "Unsubscribe",
              "marks": [{ "type": "link", "attrs": { "href": "{{unsubscribe_url}}" } }] }
        ]
    }));

    assert_eq!(footer.style("font-size"), Some("12px"));
    assert_eq!(footer.style("text-align"), Some("center"));
    assert_eq!(footer.style("border-top"), Some("1px solid #e5e7eb"));
    assert_eq!(
        footer.find_tag("a").and_then(|a| a.attr("href")),
        Some("{{unsubscribe_url}}")
    );

    let empty = single(json!({ "type": "unsubscribeFooterBlock" }));
    assert!(empty.text_content().starts_with("You are receiving this email"));
}

#[test]
fn test_social_links_absolute_icons() {
    let template = template_with(json!({
        "type": "doc",
        "content": [{
            "type": "socialLinksBlock",
            "attrs": { "links": [
                { "platform": "x", "url": "https://x.com/acme" },
                { "platform": "linkedin", "url": "https://linkedin.com/company/acme" },
                { "platform": "myspace", "url": "https://myspace.com/acme" }
            ] }
        }]
    }));

    let evaluator = Evaluator::with_options(
        EvalOptions::default().with_asset_base_url("https://assets.example.com/"),
    );
    let nodes = evaluator.evaluate(&template).nodes;
    let block = &nodes[0];

    assert_eq!(block.style("text-align"), Some("center"));
    let anchors = block.children();
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors[0].attr("href"), Some("https://linkedin.com/company/acme"));

    let icon = anchors[0].find_tag("img").expect("icon");
    assert_eq!(
        icon.attr("src"),
        Some("https://assets.example.com/social-links/social-linkedin.png")
    );
    assert_eq!(icon.attr("width"), Some("48"));
    assert_eq!(icon.style("height"), Some("48px"));
}

#[test]
fn test_social_links_relative_fallback_and_strict_mode() {
    let template = template_with(json!({
        "type": "doc",
        "content": [{
            "type": "socialLinksBlock",
            "attrs": { "links": [{ "platform": "facebook", "url": "https://fb.com/acme" }] }
        }]
    }));

    let relaxed = Evaluator::new().evaluate(&template).nodes;
    let icon = relaxed[0].find_tag("img").expect("icon");
    assert_eq!(icon.attr("src"), Some("/social-links/social-facebook.png"));

    let strict = Evaluator::with_options(EvalOptions {
        strict_asset_urls: true,
        ..Default::default()
    })
    .evaluate(&template)
    .nodes;
    assert!(strict.is_empty());
}

#[test]
fn test_document_frame() {
    let mut template = template_with(json!({ "type": "doc", "content": [] }));
    template.header.subject = "Welcome aboard".into();
    template.header.preview = "Your account is ready".into();

    let document = Evaluator::new().evaluate(&template);
    assert_eq!(document.title, "Welcome aboard");
    assert_eq!(document.preview, "Your account is ready");
    assert_eq!(document.container_styles["max-width"], "600px");
    assert_eq!(document.body_styles["background-color"], "#ffffff");
    assert!(document.nodes.is_empty());

    template.header.subject.clear();
    assert_eq!(Evaluator::new().evaluate(&template).title, "Email");
}

#[test]
fn test_transform_blocks_directly() {
    let evaluator = Evaluator::new();
    let globals = GlobalStyles::default();
    let nodes = evaluator.transform_blocks(
        &[Node::paragraph("a"), Node::paragraph("b")],
        &globals,
    );
    assert_eq!(nodes.len(), 2);
}
