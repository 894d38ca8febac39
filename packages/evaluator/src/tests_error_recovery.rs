/// Partial-failure tests
///
/// A bad node must never take its siblings down with it: unknown types are
/// skipped, failing handlers are dropped, and everything else still renders.
use crate::evaluator::{EvalError, Evaluator};
use mailcraft_document::{EmailTemplate, GlobalStyles, Node};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

fn evaluate(content: serde_json::Value) -> Vec<String> {
    let mut template = EmailTemplate::new();
    template.content = serde_json::from_value(content).expect("valid document");
    Evaluator::new()
        .evaluate(&template)
        .nodes
        .iter()
        .map(|node| node.text_content())
        .collect()
}

/// Log sink shared between the test and the subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_unknown_node_between_paragraphs() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let texts = tracing::subscriber::with_default(subscriber, || {
        evaluate(json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "before" }] },
                { "type": "foo", "attrs": { "uid": "x" } },
                { "type": "paragraph", "content": [{ "type": "text", "text": "after" }] }
            ]
        }))
    });

    assert_eq!(texts, vec!["before", "after"]);

    let output = logs.contents();
    assert!(output.contains("WARN"), "no warning logged: {output}");
    assert!(output.contains("Unsupported node type"), "{output}");
    assert!(output.contains("node_type=foo"), "{output}");
}

#[test]
fn test_invalid_heading_level_is_dropped() {
    let texts = evaluate(json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 9 }, "content": [{ "type": "text", "text": "bad" }] },
            { "type": "heading", "attrs": { "level": "2" }, "content": [{ "type": "text", "text": "good" }] }
        ]
    }));

    assert_eq!(texts, vec!["good"]);
}

#[test]
fn test_image_without_src_is_an_error() {
    let evaluator = Evaluator::new();
    let globals = GlobalStyles::default();
    let node: Node = serde_json::from_value(json!({ "type": "image", "attrs": { "alt": "x" } }))
        .expect("valid node");

    let result = evaluator.transform_node(&node, &globals);
    assert!(matches!(
        result,
        Err(EvalError::MissingAttribute { attr: "src", .. })
    ));

    let bad_width: Node = serde_json::from_value(json!({
        "type": "image",
        "attrs": { "src": "a.png", "width": "wide" }
    }))
    .expect("valid node");
    assert!(matches!(
        evaluator.transform_node(&bad_width, &globals),
        Err(EvalError::InvalidAttribute { attr: "width", .. })
    ));
}

#[test]
fn test_failure_inside_list_item_keeps_other_items() {
    let texts = evaluate(json!({
        "type": "doc",
        "content": [{
            "type": "bulletList",
            "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "kept" }] },
                    { "type": "image", "attrs": {} }
                ] },
                { "type": "listItem", "content": [
                    { "type": "mystery" },
                    { "type": "paragraph", "content": [{ "type": "text", "text": "also kept" }] }
                ] }
            ]
        }]
    }));

    assert_eq!(texts, vec!["keptalso kept"]);
}

#[test]
fn test_malformed_styles_fail_open() {
    let mut template = EmailTemplate::new();
    template.content = serde_json::from_value(json!({
        "type": "doc",
        "content": [{
            "type": "paragraph",
            "attrs": { "styles": { "fontSize": "huge", "fontWeight": 450, "textColor": "#123456" } },
            "content": [{ "type": "text", "text": "styled" }]
        }]
    }))
    .expect("valid document");

    let nodes = Evaluator::new().evaluate(&template).nodes;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].style("color"), Some("#123456"));
    assert_eq!(nodes[0].style("font-size"), Some("14px"));
    assert_eq!(nodes[0].style("font-weight"), None);
}

#[test]
fn test_nested_doc_is_rejected_locally() {
    let texts = evaluate(json!({
        "type": "doc",
        "content": [
            { "type": "doc", "content": [] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "fine" }] }
        ]
    }));

    assert_eq!(texts, vec!["fine"]);
}

#[test]
fn test_empty_and_missing_content() {
    assert!(evaluate(json!({ "type": "doc" })).is_empty());
    assert_eq!(
        evaluate(json!({ "type": "doc", "content": [{ "type": "paragraph" }] })),
        vec![""]
    );
}
