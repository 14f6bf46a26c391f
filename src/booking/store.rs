//! Durable storage for the persisted booking blob.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{EngineError, EngineResult};

/// A key-value store for serialized wizard state.
pub trait BookingStore: Send + Sync {
    /// Reads the blob stored under `key`, if any.
    fn load(&self, key: &str) -> EngineResult<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn save(&self, key: &str, blob: &str) -> EngineResult<()>;
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw blob under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl BookingStore for MemoryStore {
    fn load(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> EngineResult<()> {
        self.blobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BookingStore for FileStore {
    fn load(&self, key: &str) -> EngineResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| EngineError::Storage {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, key: &str, blob: &str) -> EngineResult<()> {
        let to_storage_error = |e: std::io::Error| EngineError::Storage {
            key: key.to_string(),
            message: e.to_string(),
        };
        fs::create_dir_all(&self.dir).map_err(to_storage_error)?;
        fs::write(self.path_for(key), blob).map_err(to_storage_error)
    }
}
