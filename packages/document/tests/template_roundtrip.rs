use mailcraft_document::{
    assign_missing_uids, duplicate_uids, find_by_uid, load_template_value, BlockStyles,
    EmailTemplate, FontWeight, NodeType, SequentialUidGenerator, TextAlign, UidIndex,
};
use serde_json::{json, Value};

fn editor_payload() -> Value {
    json!({
        "id": "tmpl_1",
        "header": { "from": "a@example.com", "replyTo": "", "subject": "Hi", "preview": "" },
        "globalStyles": {
            "container": { "width": 520 },
            "typography": { "fontSize": 15 }
        },
        "content": {
            "type": "doc",
            "content": [
                {
                    "type": "heading",
                    "attrs": { "level": 2, "styles": { "textAlign": "center", "fontWeight": 700 } },
                    "content": [{ "type": "text", "text": "Title" }]
                },
                {
                    "type": "bulletList",
                    "content": [{
                        "type": "listItem",
                        "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "one" }] }]
                    }]
                },
                { "type": "image", "attrs": { "src": "https://x.test/a.png", "styles": { "width": "wide" } } },
                { "type": "poll", "attrs": { "question": "?" } }
            ]
        },
        "variables": [],
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

#[test]
fn test_editor_payload_loads_with_backfilled_sections() {
    let loaded = load_template_value(editor_payload()).unwrap();
    assert!(loaded.migrated_sections.contains(&"body"));
    assert!(!loaded.migrated_sections.contains(&"container"));

    let template = loaded.template;
    let defaults = EmailTemplate::new().global_styles;
    assert_eq!(template.global_styles.container.width, 520.0);
    assert_eq!(
        template.global_styles.container.align,
        defaults.container.align
    );
    assert_eq!(template.global_styles.body, defaults.body);
    assert_eq!(template.content.content[3].node_type, NodeType::Unknown("poll".into()));
}

#[test]
fn test_block_styles_read_leniently() {
    let loaded = load_template_value(editor_payload()).unwrap();
    let content = &loaded.template.content.content;

    let heading = BlockStyles::from_value(&content[0].attrs["styles"]);
    assert_eq!(heading.text_align, Some(TextAlign::Center));
    assert_eq!(heading.font_weight, Some(FontWeight::Bold));

    let image = BlockStyles::from_value(&content[2].attrs["styles"]);
    assert!(image.width.is_none());
    assert!(image.is_empty());
}

#[test]
fn test_assigned_uids_are_indexed() {
    let mut template = load_template_value(editor_payload()).unwrap().template;
    let assigned = assign_missing_uids(&mut template.content, &mut SequentialUidGenerator::new("b"));

    // heading, bulletList, inner paragraph, image
    assert_eq!(assigned, 4);
    assert!(duplicate_uids(&template.content).is_empty());

    let index = UidIndex::build(&template.content);
    assert_eq!(index.len(), 4);
    for uid in ["b-1", "b-2", "b-3", "b-4"] {
        let indexed = index.resolve(&template.content, uid).unwrap();
        let walked = find_by_uid(&template.content, uid).unwrap();
        assert_eq!(indexed.path, walked.path);
        assert_eq!(indexed.node, walked.node);
    }
    assert_eq!(index.path("b-3"), Some(&[1, 0, 0][..]));

    let json = serde_json::to_value(&template).unwrap();
    let reloaded = load_template_value(json).unwrap();
    assert!(!reloaded.was_migrated());
    assert_eq!(reloaded.template, template);
}
