//! # Email Template
//!
//! The aggregate root: header metadata, global styles, document content and
//! variable declarations.

use crate::ast::{Node, NodeType};
use crate::global_styles::GlobalStyles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailHeader {
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    /// Preview text shown by email clients next to the subject
    pub preview: String,
}

/// Partial header update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailHeaderPatch {
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub subject: Option<String>,
    pub preview: Option<String>,
}

impl EmailHeaderPatch {
    pub fn apply(&self, header: &mut EmailHeader) {
        if let Some(from) = &self.from {
            header.from = from.clone();
        }
        if let Some(reply_to) = &self.reply_to {
            header.reply_to = reply_to.clone();
        }
        if let Some(subject) = &self.subject {
            header.subject = subject.clone();
        }
        if let Some(preview) = &self.preview {
            header.preview = preview.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Number(n) => write!(f, "{}", n),
            VariableValue::Text(s) => f.write_str(s),
        }
    }
}

/// Declared template variable, substituted as literal `{{name}}` text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub default_value: VariableValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: String,
    pub header: EmailHeader,
    pub global_styles: GlobalStyles,
    pub content: Node,
    pub variables: Vec<Variable>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    /// Fresh template with every default filled in
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: generate_template_id(),
            header: EmailHeader::default(),
            global_styles: GlobalStyles::default(),
            content: default_content(),
            variables: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Variable defaults keyed by name
    pub fn variable_defaults(&self) -> BTreeMap<String, String> {
        self.variables
            .iter()
            .map(|variable| (variable.name.clone(), variable.default_value.to_string()))
            .collect()
    }
}

impl Default for EmailTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// A document holding one empty paragraph
pub fn default_content() -> Node {
    Node::doc(vec![Node::new(NodeType::Paragraph)])
}

pub fn generate_template_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("template-{}-{}", Utc::now().timestamp_millis(), &suffix[..7])
}
