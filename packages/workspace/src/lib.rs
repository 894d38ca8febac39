//! # Mailcraft Workspace
//!
//! Holds the template aggregate for an editing session: immutable
//! snapshots, debounced persistence to a [`Storage`] backend, the
//! `mailcraft.config.json` settings, and an async render entry point.

pub mod config;
pub mod error;
pub mod persistence;
pub mod render;
pub mod store;

pub use config::{Config, ASSET_BASE_URL_ENV, DEFAULT_CONFIG_NAME};
pub use error::{WorkspaceError, WorkspaceResult};
pub use persistence::PersistenceWorker;
pub use render::render_html;
pub use store::{LoadOutcome, TemplatePatch, TemplateStore};

use mailcraft_common::{FileStorage, Storage};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Open the persisted template described by `config`, with debounced
/// writes back to the same file storage. Needs a tokio runtime.
pub fn open_workspace(config: &Config, cwd: &Path) -> WorkspaceResult<(TemplateStore, LoadOutcome)> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config.storage_path(cwd)));
    let (store, outcome) = TemplateStore::open(storage.as_ref(), &config.storage_key)?;
    info!(key = %config.storage_key, outcome = ?outcome, "Opened workspace");

    let worker = PersistenceWorker::new(storage, config.storage_key.clone(), config.debounce())?;
    Ok((store.with_persistence(worker), outcome))
}
