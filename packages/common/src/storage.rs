use crate::error::CommonError;
use crate::result::CommonResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Key/value storage for serialized state
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> CommonResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> CommonResult<()>;

    /// Delete the value stored under `key` (no-op if absent)
    fn remove(&self, key: &str) -> CommonResult<()>;
}

/// Keys become file names, so they are restricted to a safe alphabet
pub fn validate_key(key: &str) -> CommonResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(CommonError::InvalidKey(key.to_string()))
    }
}

/// One JSON file per key inside a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CommonResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> CommonResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> CommonResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write-then-rename so readers never observe a half-written file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;

        debug!(key, bytes = value.len(), path = %path.display(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> CommonResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for testing
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        storage
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    fn poisoned() -> CommonError {
        CommonError::Generic("memory storage lock poisoned".to_string())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> CommonResult<Option<String>> {
        validate_key(key)?;
        let entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CommonResult<()> {
        validate_key(key)?;
        self.entries
            .lock()
            .map_err(|_| Self::poisoned())?
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().map_err(|_| Self::poisoned())? += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> CommonResult<()> {
        validate_key(key)?;
        self.entries
            .lock()
            .map_err(|_| Self::poisoned())?
            .remove(key);
        Ok(())
    }
}
