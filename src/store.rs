//! Persistent store adapter.
//!
//! A thin string-keyed blob store that every other component reads and
//! writes through. Two implementations: `FileStore` persists each key as
//! a file under the data directory (written atomically via temp file +
//! rename), and `MemoryStore` backs tests.
//!
//! Persisted layout, four independent keys:
//!
//! ```text
//! taskflow_users   JSON array of User
//! taskflow_tasks   JSON array of Task (all users intermixed)
//! taskflow_token   opaque session token
//! taskflow_user    cached current-user JSON blob
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// Key for the user registry.
pub const USERS_KEY: &str = "taskflow_users";
/// Key for the global task list.
pub const TASKS_KEY: &str = "taskflow_tasks";
/// Key for the session token.
pub const TOKEN_KEY: &str = "taskflow_token";
/// Key for the cached current-user payload.
pub const USER_KEY: &str = "taskflow_user";

/// String-keyed durable blob storage.
///
/// Missing keys are an explicit `None`, never an error. Callers own
/// serialization; the store does not inspect values.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Write data atomically using temp file + rename, so readers never
    /// see partial writes.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "failed to read store entry; treating as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write_atomic(&self.key_path(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }
}

/// Read a JSON list from the store. Missing or malformed data is never
/// fatal: it is logged and treated as an empty collection.
pub fn read_json_list<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Vec<T> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(key, %err, "malformed persisted data; treating as empty");
            Vec::new()
        }
    }
}

/// Overwrite a JSON list in the store.
pub fn write_json_list<T: Serialize>(store: &dyn Store, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    store.set(key, &json)
}
