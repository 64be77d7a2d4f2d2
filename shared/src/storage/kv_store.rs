//! Key-value store trait and implementations.
//!
//! Provides the `KeyValueStore` trait, an ordered string-to-string mapping,
//! with an `InMemoryKeyValueStore` for development and testing and a
//! `FileKeyValueStore` that persists the whole mapping as one JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during key-value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on key-value store")]
    LockError,

    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("Corrupt store file {path}: {source}")]
    Corrupt {
        /// The backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for key-value store implementations.
///
/// Keys are kept in lexicographic order. Implementations must be thread-safe
/// (Send + Sync).
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Stores several values at once. Either every value is stored or, on
    /// error, none is.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set_many(&self, values: Vec<(&str, String)>) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns all keys in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory key-value store implementation.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Creates a new in-memory store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockError)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockError)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn set_many(&self, values: Vec<(&str, String)>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockError)?;
        for (key, value) in values {
            entries.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockError)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockError)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Key-value store persisted as a single JSON object on disk.
///
/// The file is read once on open; every mutation rewrites it through a
/// sibling temporary file followed by a rename. The in-memory copy only
/// changes once the file has been written.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened key-value store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockError)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.set_many(vec![(key, value)])
    }

    fn set_many(&self, values: Vec<(&str, String)>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockError)?;
        let mut next = entries.clone();
        for (key, value) in values {
            next.insert(key.to_string(), value);
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockError)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockError)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("units").unwrap(), None);

        store.set("units", "[]".to_string()).unwrap();
        assert_eq!(store.get("units").unwrap().as_deref(), Some("[]"));

        store.remove("units").unwrap();
        assert_eq!(store.get("units").unwrap(), None);
        store.remove("units").unwrap();
    }

    #[test]
    fn test_in_memory_keys_are_ordered() {
        let store = InMemoryKeyValueStore::new();
        store.set("units", "1".to_string()).unwrap();
        store.set("collections", "2".to_string()).unwrap();
        store.set("employees", "3".to_string()).unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec!["collections", "employees", "units"]
        );
    }

    #[test]
    fn test_in_memory_shared_instance() {
        let store = InMemoryKeyValueStore::new_shared();
        let other = Arc::clone(&store);
        store.set("a", "1".to_string()).unwrap();
        assert_eq!(other.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path().join("data.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        {
            let store = FileKeyValueStore::open(&path).unwrap();
            store.set("units", r#"[{"id":"1","name":"A"}]"#.to_string()).unwrap();
            store.set("tmp", "x".to_string()).unwrap();
            store.remove("tmp").unwrap();
        }

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["units"]);
        assert_eq!(
            reopened.get("units").unwrap().as_deref(),
            Some(r#"[{"id":"1","name":"A"}]"#)
        );
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "not json").unwrap();

        let result = FileKeyValueStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_file_store_failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = FileKeyValueStore::open(&path).unwrap();
        store.set("units", "[1]".to_string()).unwrap();
        store.set("equipment", "[2]".to_string()).unwrap();

        // A directory in place of the data file makes the rename fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.set("units", "[1,3]".to_string()),
            Err(StoreError::Io { .. })
        ));
        assert!(store
            .set_many(vec![("units", "[]".to_string()), ("employees", "[4]".to_string())])
            .is_err());
        assert!(store.remove("equipment").is_err());

        assert_eq!(store.get("units").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("equipment").unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.keys().unwrap(), vec!["equipment", "units"]);
    }

    #[test]
    fn test_set_many_stores_every_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        {
            let store = FileKeyValueStore::open(&path).unwrap();
            store
                .set_many(vec![("units", "[]".to_string()), ("equipment", "[]".to_string())])
                .unwrap();
        }

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["equipment", "units"]);

        let memory = InMemoryKeyValueStore::new();
        memory
            .set_many(vec![("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        assert_eq!(memory.keys().unwrap(), vec!["a", "b"]);
    }
}
