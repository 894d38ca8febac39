//! # Template Store
//!
//! Owns the single [`EmailTemplate`]. Readers get immutable snapshots;
//! every update builds the next template and swaps it in as one step, so
//! a reader never sees a half-applied change.

use crate::error::WorkspaceResult;
use crate::persistence::PersistenceWorker;
use mailcraft_common::Storage;
use mailcraft_document::{
    load_template, EmailHeaderPatch, EmailTemplate, GlobalStylesPatch, Node, Variable,
};
use mailcraft_editor::EditSession;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Partial update of several template sections at once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplatePatch {
    pub header: Option<EmailHeaderPatch>,
    pub global_styles: Option<GlobalStylesPatch>,
    pub content: Option<Node>,
    pub variables: Option<Vec<Variable>>,
}

/// What [`TemplateStore::open`] found in storage
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing stored; started from defaults
    Missing,
    Loaded,
    /// Loaded after backfilling these global style sections
    Migrated(Vec<&'static str>),
    /// Stored value was unusable; started from defaults
    Discarded(String),
}

pub struct TemplateStore {
    current: watch::Sender<Arc<EmailTemplate>>,
    persistence: Option<PersistenceWorker>,
}

impl TemplateStore {
    pub fn new(template: EmailTemplate) -> Self {
        let (current, _) = watch::channel(Arc::new(template));
        Self {
            current,
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, worker: PersistenceWorker) -> Self {
        self.persistence = Some(worker);
        self
    }

    /// Load the template stored under `key`, falling back to a fresh default
    /// when nothing usable is there
    #[instrument(skip(storage))]
    pub fn open(storage: &dyn Storage, key: &str) -> WorkspaceResult<(Self, LoadOutcome)> {
        let Some(json) = storage.get(key)? else {
            info!("No stored template, starting from defaults");
            return Ok((Self::new(EmailTemplate::new()), LoadOutcome::Missing));
        };

        match load_template(&json) {
            Ok(loaded) if loaded.was_migrated() => {
                let sections = loaded.migrated_sections.clone();
                Ok((Self::new(loaded.template), LoadOutcome::Migrated(sections)))
            }
            Ok(loaded) => Ok((Self::new(loaded.template), LoadOutcome::Loaded)),
            Err(e) => {
                warn!(error = %e, "Stored template is invalid, starting from defaults");
                Ok((
                    Self::new(EmailTemplate::new()),
                    LoadOutcome::Discarded(e.to_string()),
                ))
            }
        }
    }

    /// The current template
    pub fn snapshot(&self) -> Arc<EmailTemplate> {
        self.current.borrow().clone()
    }

    /// Receiver notified after every update
    pub fn subscribe(&self) -> watch::Receiver<Arc<EmailTemplate>> {
        self.current.subscribe()
    }

    pub fn persistence(&self) -> Option<&PersistenceWorker> {
        self.persistence.as_ref()
    }

    pub fn update_header(&self, patch: &EmailHeaderPatch) -> Arc<EmailTemplate> {
        self.update("header", |template| patch.apply(&mut template.header))
    }

    /// Merge `patch` section by section; untouched fields keep their values
    pub fn update_global_styles(&self, patch: &GlobalStylesPatch) -> Arc<EmailTemplate> {
        self.update("globalStyles", |template| {
            template.global_styles.merge(patch)
        })
    }

    pub fn update_content(&self, content: Node) -> Arc<EmailTemplate> {
        self.update("content", move |template| template.content = content)
    }

    pub fn set_variables(&self, variables: Vec<Variable>) -> Arc<EmailTemplate> {
        self.update("variables", move |template| template.variables = variables)
    }

    pub fn update_template(&self, patch: TemplatePatch) -> Arc<EmailTemplate> {
        self.update("template", move |template| {
            if let Some(header) = &patch.header {
                header.apply(&mut template.header);
            }
            if let Some(global_styles) = &patch.global_styles {
                template.global_styles.merge(global_styles);
            }
            if let Some(content) = patch.content {
                template.content = content;
            }
            if let Some(variables) = patch.variables {
                template.variables = variables;
            }
        })
    }

    /// Replace the template with a fresh default under a new id
    pub fn reset(&self) -> Arc<EmailTemplate> {
        let fresh = Arc::new(EmailTemplate::new());
        info!(id = %fresh.id, "Template reset");
        self.current.send_replace(Arc::clone(&fresh));
        self.persist(&fresh);
        fresh
    }

    /// Start an editing session over the current content
    pub fn edit_session(&self) -> WorkspaceResult<EditSession> {
        Ok(EditSession::new(self.snapshot().content.clone())?)
    }

    /// Store the session's document as the template content
    pub fn commit(&self, session: &EditSession) -> Arc<EmailTemplate> {
        self.update_content(session.document().root().clone())
    }

    /// Write any pending snapshot now
    pub fn flush(&self) -> WorkspaceResult<bool> {
        match &self.persistence {
            Some(worker) => worker.flush(),
            None => Ok(false),
        }
    }

    fn update(&self, section: &str, edit: impl FnOnce(&mut EmailTemplate)) -> Arc<EmailTemplate> {
        let mut updated = None;
        self.current.send_modify(|current| {
            let mut next = EmailTemplate::clone(current);
            edit(&mut next);
            next.touch();
            *current = Arc::new(next);
            updated = Some(Arc::clone(current));
        });

        let next = updated.unwrap_or_else(|| self.snapshot());
        debug!(section, updated_at = %next.updated_at, "Template updated");

        self.persist(&next);
        next
    }

    fn persist(&self, template: &Arc<EmailTemplate>) {
        if let Some(worker) = &self.persistence {
            worker.schedule(Arc::clone(template));
        }
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(EmailTemplate::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_common::MemoryStorage;
    use mailcraft_document::{
        ContainerStylesPatch, PaddingPatch, TypographyStylesPatch, VariableType, VariableValue,
    };
    use serde_json::json;

    #[test]
    fn test_update_header_refreshes_timestamp() {
        let store = TemplateStore::default();
        let before = store.snapshot();

        let after = store.update_header(&EmailHeaderPatch {
            subject: Some("Welcome".into()),
            ..Default::default()
        });

        assert_eq!(after.header.subject, "Welcome");
        assert_eq!(after.id, before.id);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(before.header.subject, "");
        assert_eq!(store.snapshot().header.subject, "Welcome");
    }

    #[test]
    fn test_global_styles_merge_is_deep() {
        let store = TemplateStore::default();
        let font_size = store.snapshot().global_styles.typography.font_size;

        store.update_global_styles(&GlobalStylesPatch {
            container: Some(ContainerStylesPatch {
                width: Some(640.0),
                padding: Some(PaddingPatch {
                    left: Some(8.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        });

        let styles = &store.snapshot().global_styles;
        assert_eq!(styles.container.width, 640.0);
        assert_eq!(styles.container.padding.left, 8.0);
        assert_eq!(styles.typography.font_size, font_size);

        store.update_global_styles(&GlobalStylesPatch {
            typography: Some(TypographyStylesPatch {
                font_size: Some(16.0),
                ..Default::default()
            }),
            ..Default::default()
        });
        let styles = &store.snapshot().global_styles;
        assert_eq!(styles.typography.font_size, 16.0);
        assert_eq!(styles.container.width, 640.0);
    }

    #[test]
    fn test_update_template_patch() {
        let store = TemplateStore::default();
        let patch: TemplatePatch = serde_json::from_value(json!({
            "header": { "from": "team@example.com" },
            "content": { "type": "doc", "content": [
                { "type": "heading", "attrs": { "level": 2 } }
            ]},
            "variables": [
                { "id": "v1", "name": "name", "type": "string", "defaultValue": "there" }
            ]
        }))
        .unwrap();

        let next = store.update_template(patch);
        assert_eq!(next.header.from, "team@example.com");
        assert_eq!(next.content.content[0].attr("level"), Some(&json!(2)));
        assert_eq!(next.variables[0].var_type, VariableType::String);
        assert_eq!(
            next.variables[0].default_value,
            VariableValue::Text("there".into())
        );
    }

    #[test]
    fn test_subscribers_see_each_snapshot() {
        let store = TemplateStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_variables(Vec::new());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().updated_at, store.snapshot().updated_at);
    }

    #[test]
    fn test_reset_generates_new_id() {
        let store = TemplateStore::default();
        store.update_header(&EmailHeaderPatch {
            subject: Some("Old".into()),
            ..Default::default()
        });
        let old_id = store.snapshot().id.clone();

        let fresh = store.reset();
        assert_ne!(fresh.id, old_id);
        assert_eq!(fresh.header.subject, "");
        assert_eq!(fresh.content.content.len(), 1);
    }

    #[test]
    fn test_open_missing_and_discarded() {
        let empty = MemoryStorage::new();
        let (_, outcome) = TemplateStore::open(&empty, "email-template").unwrap();
        assert_eq!(outcome, LoadOutcome::Missing);

        let garbage = MemoryStorage::with_entry("email-template", "{ not json");
        let (store, outcome) = TemplateStore::open(&garbage, "email-template").unwrap();
        assert!(matches!(outcome, LoadOutcome::Discarded(_)));
        assert_eq!(store.snapshot().content.node_type.to_string(), "doc");

        let wrong_shape = MemoryStorage::with_entry("email-template", r#"{"id":"x"}"#);
        let (_, outcome) = TemplateStore::open(&wrong_shape, "email-template").unwrap();
        assert!(matches!(outcome, LoadOutcome::Discarded(_)));
    }

    #[test]
    fn test_open_backfills_missing_body() {
        let mut value = serde_json::to_value(EmailTemplate::new()).unwrap();
        value["globalStyles"]
            .as_object_mut()
            .unwrap()
            .remove("body");
        let storage = MemoryStorage::with_entry("email-template", &value.to_string());

        let (store, outcome) = TemplateStore::open(&storage, "email-template").unwrap();
        assert_eq!(outcome, LoadOutcome::Migrated(vec!["body"]));
        assert_eq!(
            store.snapshot().global_styles.body,
            EmailTemplate::new().global_styles.body
        );
    }

    #[test]
    fn test_open_round_trips_stored_template() {
        let mut template = EmailTemplate::new();
        template.header.subject = "Stored".into();
        let storage =
            MemoryStorage::with_entry("email-template", &serde_json::to_string(&template).unwrap());

        let (store, outcome) = TemplateStore::open(&storage, "email-template").unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(*store.snapshot(), template);
    }

    #[test]
    fn test_edit_session_commit() {
        let store = TemplateStore::default();
        let mut session = store.edit_session().unwrap();
        let uid = session.document().root().content[0]
            .uid()
            .unwrap()
            .to_string();

        let mut attrs = mailcraft_document::Attrs::new();
        attrs.insert("textAlign".into(), json!("center"));
        assert!(session.update_attrs_by_uid(&uid, &attrs).unwrap());

        let committed = store.commit(&session);
        assert_eq!(committed.content.content[0].uid(), Some(uid.as_str()));
        assert_eq!(
            committed.content.content[0].attr_str("textAlign"),
            Some("center")
        );
    }
}
