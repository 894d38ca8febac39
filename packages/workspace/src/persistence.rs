//! Debounced template persistence.
//!
//! Every scheduled save replaces the pending snapshot and restarts the
//! timer, so a burst of edits ends in a single write of the latest state.

use crate::error::{WorkspaceError, WorkspaceResult};
use mailcraft_common::Storage;
use mailcraft_document::EmailTemplate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

type Pending = Arc<Mutex<Option<Arc<EmailTemplate>>>>;

pub struct PersistenceWorker {
    storage: Arc<dyn Storage>,
    key: String,
    delay: Duration,
    runtime: Handle,
    pending: Pending,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PersistenceWorker {
    /// Must be created from inside a tokio runtime
    pub fn new(
        storage: Arc<dyn Storage>,
        key: impl Into<String>,
        delay: Duration,
    ) -> WorkspaceResult<Self> {
        let runtime = Handle::try_current().map_err(|_| WorkspaceError::NoRuntime)?;
        Ok(Self {
            storage,
            key: key.into(),
            delay,
            runtime,
            pending: Arc::new(Mutex::new(None)),
            task: Mutex::new(None),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `template` for writing once the debounce window passes
    /// without another call. Cancels any pending write.
    pub fn schedule(&self, template: Arc<EmailTemplate>) {
        *lock(&self.pending) = Some(template);

        let storage = Arc::clone(&self.storage);
        let pending = Arc::clone(&self.pending);
        let key = self.key.clone();
        let delay = self.delay;

        let mut task = lock(&self.task);
        if let Some(previous) = task.take() {
            previous.abort();
        }
        *task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = write_pending(storage.as_ref(), &key, &pending) {
                error!(key = %key, error = %e, "Failed to persist template");
            }
        }));
    }

    /// Cancel the timer and write any pending snapshot now.
    /// Returns whether anything was written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn flush(&self) -> WorkspaceResult<bool> {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
        write_pending(self.storage.as_ref(), &self.key, &self.pending)
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }
}

fn write_pending(storage: &dyn Storage, key: &str, pending: &Pending) -> WorkspaceResult<bool> {
    let Some(template) = lock(pending).take() else {
        return Ok(false);
    };

    let json = serde_json::to_string(template.as_ref())?;
    storage.set(key, &json)?;
    debug!(key, id = %template.id, bytes = json.len(), "Persisted template");
    Ok(true)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
