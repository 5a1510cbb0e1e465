//! Storage backends
//!
//! A backend is a flat string key/value store. Entries carry an optional
//! expiry; an expired entry reads as absent. `FileStore` persists to a
//! JSON file and is the usual primary; `MemoryStore` holds entries for
//! the life of the process and backs the facade's fallback tier.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Backend failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored value with an optional expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    /// An entry that never expires.
    pub fn persistent(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// An entry that reads as absent after `expires_at`.
    pub fn expiring(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() > at).unwrap_or(false)
    }
}

/// A flat key/value store for small persistent state.
pub trait StorageBackend: Send {
    /// True when the backend can currently accept writes.
    fn available(&self) -> bool;

    /// The live value under `key`. Expired entries read as `None`.
    fn get(&self, key: &str) -> Option<String>;

    fn put(&mut self, key: &str, entry: StoredEntry) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Backend persisting entries to a JSON file.
///
/// The file is read once at open and rewritten after every mutation; the
/// store assumes it is the file's only writer. An unreadable file is
/// treated as empty so a corrupt state never wedges the embedder. A
/// failed write marks the store unavailable, sending later operations to
/// the facade's fallback tier.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, StoredEntry>,
    healthy: bool,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable storage file, starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable storage file, starting empty");
                HashMap::new()
            }
        };
        Ok(Self {
            path,
            entries,
            healthy: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        if let Err(err) = fs::write(&self.path, text) {
            self.healthy = false;
            warn!(path = %self.path.display(), %err, "storage write failed, store marked unavailable");
            return Err(err.into());
        }
        Ok(())
    }
}

impl StorageBackend for FileStore {
    fn available(&self) -> bool {
        self.healthy
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn put(&mut self, key: &str, entry: StoredEntry) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), entry);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Backend holding entries for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStore {
    fn available(&self) -> bool {
        true
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    fn put(&mut self, key: &str, entry: StoredEntry) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_file_store_round_trip_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.path(), path);
        store.put("visited", StoredEntry::persistent("yes")).unwrap();
        assert_eq!(store.get("visited").as_deref(), Some("yes"));

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("visited").as_deref(), Some("yes"));
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/state.json");
        let mut store = FileStore::open(&path).unwrap();
        store.put("k", StoredEntry::persistent("v")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty_but_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json at all").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("k"), None);
        store.put("k", StoredEntry::persistent("v")).unwrap();
        assert_eq!(FileStore::open(&path).unwrap().get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = FileStore::open(&path).unwrap();
        store.put("k", StoredEntry::persistent("v")).unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
        assert_eq!(FileStore::open(&path).unwrap().get("k"), None);
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let mut store = MemoryStore::new();
        let gone = Utc::now() - Duration::seconds(1);
        store.put("old", StoredEntry::expiring("v", gone)).unwrap();
        assert_eq!(store.get("old"), None);

        let live = Utc::now() + Duration::days(30);
        store.put("new", StoredEntry::expiring("v", live)).unwrap();
        assert_eq!(store.get("new").as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        store.put("k", StoredEntry::persistent("a")).unwrap();
        store.put("k", StoredEntry::persistent("b")).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }
}
