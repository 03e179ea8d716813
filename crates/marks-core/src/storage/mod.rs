//! Local key/value storage
//!
//! Durable string storage for the session credential and the theme
//! preference. Values live under fixed keys and never expire.
//!
//! - `FileStore`: JSON object on disk, written through on every change
//! - `MemoryStore`: in-process map, nothing persisted

pub mod error;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

pub use error::{StorageError, StorageResult};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";
/// Key holding the signed-in user as JSON
pub const USER_KEY: &str = "user";
/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";

/// String key/value storage shared by the session and theme store
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file
///
/// The whole map is rewritten atomically on every `set`/`remove`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StorageError::ReadError {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StorageError::InvalidFormat {
                    path: path.clone(),
                    details: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened local storage at {:?} ({} keys)", path, entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(entries)?;
        atomic_write(&self.path, &data)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries();
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value.to_string());
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = entries.clone();
        staged.remove(key);
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }
}

/// Write data to a file atomically
///
/// Writes to a sibling temp file, syncs it, then renames over the target.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::write(parent, e))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| StorageError::write(&temp_path, e))?;
    file.write_all(data)
        .map_err(|e| StorageError::write(&temp_path, e))?;
    file.sync_all()
        .map_err(|e| StorageError::write(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })
}
