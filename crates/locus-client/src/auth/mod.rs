//! Persisted local key-value storage for credentials.
//!
//! The client only ever reads from a [`TokenStore`]. Writing and clearing
//! belong to the login flow.

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;

use locus_core::error::LocusError;
use crate::ClientResult;

/// File name of the persisted store inside the storage directory
pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// String key-value storage, modeled on browser local storage
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Read a value. A missing key is `Ok(None)`.
    fn get_item(&self, key: &str) -> ClientResult<Option<String>>;

    /// Write a value
    fn set_item(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> ClientResult<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.items.write().insert(key.to_string(), value.to_string());
        store
    }
}

impl TokenStore for MemoryStore {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ClientResult<()> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk.
///
/// The file is re-read on every lookup so values written by another process
/// are picked up by the next request.
#[derive(Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Store backed by `<dir>/local_storage.json`
    pub fn in_dir(dir: &Utf8Path) -> Self {
        Self::at_path(dir.join(STORAGE_FILE_NAME))
    }

    /// Store backed by an explicit file
    pub fn at_path(path: Utf8PathBuf) -> Self {
        Self {
            path,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_items(&self) -> ClientResult<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(LocusError::storage(format!("Failed to read {}", self.path), e));
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| LocusError::storage(format!("{} is not a JSON object of strings", self.path), e))
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LocusError::storage(format!("Failed to create {}", parent), e))?;
        }

        let content = serde_json::to_string_pretty(items)
            .map_err(|e| LocusError::storage("Failed to serialize local storage".to_string(), e))?;

        std::fs::write(&self.path, content)
            .map_err(|e| LocusError::storage(format!("Failed to write {}", self.path), e))
    }
}

impl TokenStore for FileStore {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        let _guard = self.lock.read();
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        let _guard = self.lock.write();
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> ClientResult<()> {
        let _guard = self.lock.write();
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let store = FileStore::in_dir(&dir.join("storage"));
        (temp_dir, store)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("auth_token").unwrap(), None);

        store.set_item("auth_token", "abc").unwrap();
        assert_eq!(store.get_item("auth_token").unwrap().as_deref(), Some("abc"));

        store.remove_item("auth_token").unwrap();
        assert_eq!(store.get_item("auth_token").unwrap(), None);
        store.remove_item("auth_token").unwrap();
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let (_temp_dir, store) = temp_store();
        assert!(!store.path().exists());
        assert_eq!(store.get_item("auth_token").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let (_temp_dir, store) = temp_store();
        store.set_item("auth_token", "persisted").unwrap();
        store.set_item("theme", "dark").unwrap();

        let reopened = FileStore::at_path(store.path().to_path_buf());
        assert_eq!(reopened.get_item("auth_token").unwrap().as_deref(), Some("persisted"));
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));

        reopened.remove_item("auth_token").unwrap();
        assert_eq!(store.get_item("auth_token").unwrap(), None);
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let (_temp_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        let err = store.get_item("auth_token").unwrap_err();
        assert!(matches!(err, LocusError::Storage { .. }));
    }
}
