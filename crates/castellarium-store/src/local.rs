//! Durable local key-value storage.
//!
//! Values are strings; the id lists are stored as JSON arrays under fixed
//! keys so that existing saved state keeps loading.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::StoreError;
use crate::ids::{ids_from_values, IdSets};

pub const VISITED_KEY: &str = "visitedIds_v2";
pub const WISHLIST_KEY: &str = "wishlistIds_v2";
/// Id of the user signed in when the process last ran.
pub const SESSION_USER_KEY: &str = "sessionUserId";

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A single JSON object file mapping keys to string values.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::CorruptFile {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|source| self.io_error(source))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|source| self.io_error(source))?;
        tmp.write_all(&body)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        apply(&mut entries);
        self.write_all(&entries)
    }
}

impl LocalStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Volatile store, for tests and for running without a state file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Loads both id lists. Missing keys read as empty lists.
///
/// # Errors
///
/// Returns [`StoreError::CorruptEntry`] if a stored value is not a JSON
/// array, or any error from the underlying store.
pub fn load_id_sets(store: &dyn LocalStore) -> Result<IdSets, StoreError> {
    let visited = load_id_list(store, VISITED_KEY)?;
    let wishlisted = load_id_list(store, WISHLIST_KEY)?;
    Ok(IdSets::from_lists(visited, wishlisted))
}

/// Writes both id lists.
///
/// # Errors
///
/// Returns any error from the underlying store.
pub fn save_id_sets(store: &dyn LocalStore, ids: &IdSets) -> Result<(), StoreError> {
    store.set(VISITED_KEY, &encode_ids(VISITED_KEY, &ids.visited_list())?)?;
    store.set(WISHLIST_KEY, &encode_ids(WISHLIST_KEY, &ids.wishlisted_list())?)
}

fn load_id_list(store: &dyn LocalStore, key: &str) -> Result<Vec<String>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    let values: Option<Vec<Value>> =
        serde_json::from_str(&raw).map_err(|source| StoreError::CorruptEntry {
            key: key.to_owned(),
            source,
        })?;
    Ok(values.map(ids_from_values).unwrap_or_default())
}

fn encode_ids(key: &str, ids: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(ids).map_err(|source| StoreError::Encode {
        key: key.to_owned(),
        source,
    })
}
