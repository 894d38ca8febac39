//! Structural validation and migration of persisted templates.
//!
//! A persisted template is trusted only if its outer shape is intact: all
//! top-level fields present, `variables` an array, every header field a
//! string and `content.type == "doc"`. Global style sections added after the
//! template was saved are backfilled from the defaults.

use crate::error::{DocumentError, DocumentResult};
use crate::template::EmailTemplate;
use serde_json::Value;
use tracing::{debug, info};

const REQUIRED_FIELDS: &[&str] = &[
    "id",
    "header",
    "globalStyles",
    "content",
    "variables",
    "createdAt",
    "updatedAt",
];

const HEADER_FIELDS: &[&str] = &["from", "replyTo", "subject", "preview"];

const GLOBAL_STYLE_SECTIONS: &[&str] = &[
    "body",
    "container",
    "typography",
    "link",
    "image",
    "button",
    "codeBlock",
    "inlineCode",
];

/// A template read from storage, with the sections that had to be backfilled
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTemplate {
    pub template: EmailTemplate,
    pub migrated_sections: Vec<&'static str>,
}

impl LoadedTemplate {
    pub fn was_migrated(&self) -> bool {
        !self.migrated_sections.is_empty()
    }
}

/// Check the structural shape of a raw template value
pub fn validate_template_value(value: &Value) -> DocumentResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("template is not an object"))?;

    for field in REQUIRED_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) => return Err(invalid(format!("missing `{}`", field))),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(invalid(format!("empty `{}`", field)))
            }
            _ => {}
        }
    }

    if !object["variables"].is_array() {
        return Err(invalid("`variables` is not an array"));
    }

    let header = object["header"]
        .as_object()
        .ok_or_else(|| invalid("`header` is not an object"))?;
    for field in HEADER_FIELDS {
        if !header.get(*field).map(Value::is_string).unwrap_or(false) {
            return Err(invalid(format!("header field `{}` is not a string", field)));
        }
    }

    if object["content"].get("type").and_then(Value::as_str) != Some("doc") {
        return Err(invalid("`content.type` is not \"doc\""));
    }

    Ok(())
}

/// Global style sections absent from a raw template value
pub fn missing_global_style_sections(value: &Value) -> Vec<&'static str> {
    let styles = value.get("globalStyles");
    GLOBAL_STYLE_SECTIONS
        .iter()
        .copied()
        .filter(|section| {
            styles
                .and_then(|styles| styles.get(*section))
                .map(|section| !section.is_object())
                .unwrap_or(true)
        })
        .collect()
}

/// Parse, validate and migrate a persisted template
pub fn load_template(json: &str) -> DocumentResult<LoadedTemplate> {
    let value: Value = serde_json::from_str(json)?;
    load_template_value(value)
}

pub fn load_template_value(value: Value) -> DocumentResult<LoadedTemplate> {
    validate_template_value(&value)?;

    let migrated_sections = missing_global_style_sections(&value);
    if !migrated_sections.is_empty() {
        info!(sections = ?migrated_sections, "Backfilling global style sections from defaults");
    }

    let template: EmailTemplate = serde_json::from_value(value)
        .map_err(|e| invalid(format!("malformed template: {}", e)))?;
    debug!(id = %template.id, "Template loaded");

    Ok(LoadedTemplate {
        template,
        migrated_sections,
    })
}

fn invalid(reason: impl Into<String>) -> DocumentError {
    DocumentError::InvalidTemplate(reason.into())
}
