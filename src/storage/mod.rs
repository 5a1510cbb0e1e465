//! Small persistent state
//!
//! Embedded widgets remember little things across visits: a dismissed
//! banner, a first-seen date. `Storage` is their facade over two
//! backends: a persistent primary and a process-lifetime fallback that
//! takes over whenever the primary is unavailable. Fallback entries
//! expire after a fixed window so a degraded session never pins state
//! forever.

mod backend;

pub use backend::{FileStore, MemoryStore, StorageBackend, StorageError, StoredEntry};

use std::path::PathBuf;

use chrono::{Duration, Utc};
use tracing::warn;

/// How long fallback entries live, in days.
pub const DEFAULT_FALLBACK_TTL_DAYS: i64 = 30;

/// Two-tier persistent key/value store.
pub struct Storage {
    primary: Option<Box<dyn StorageBackend>>,
    fallback: Box<dyn StorageBackend>,
    fallback_ttl: Duration,
}

impl Storage {
    /// A file-backed primary at `path` with an in-memory fallback.
    ///
    /// When the file store cannot be opened the facade degrades to
    /// fallback-only with a warning rather than failing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let primary: Option<Box<dyn StorageBackend>> = match FileStore::open(&path) {
            Ok(store) => Some(Box::new(store)),
            Err(err) => {
                warn!(path = %path.display(), %err, "primary store unavailable, using fallback only");
                None
            }
        };
        Self::with_backends(primary, Box::new(MemoryStore::new()))
    }

    /// A facade with no persistent tier.
    pub fn in_memory() -> Self {
        Self::with_backends(None, Box::new(MemoryStore::new()))
    }

    /// A facade over caller-built backends.
    pub fn with_backends(
        primary: Option<Box<dyn StorageBackend>>,
        fallback: Box<dyn StorageBackend>,
    ) -> Self {
        Self {
            primary,
            fallback,
            fallback_ttl: Duration::days(DEFAULT_FALLBACK_TTL_DAYS),
        }
    }

    /// Override the fallback entry lifetime.
    pub fn with_fallback_ttl(mut self, ttl: Duration) -> Self {
        self.fallback_ttl = ttl;
        self
    }

    /// True when writes are currently landing in the fallback tier.
    pub fn using_fallback(&self) -> bool {
        !matches!(&self.primary, Some(primary) if primary.available())
    }

    /// The live value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        match &self.primary {
            Some(primary) if primary.available() => primary.get(key),
            _ => self.fallback.get(key),
        }
    }

    /// Write `value` under `key`. Fallback writes carry the expiry
    /// window; primary writes persist indefinitely.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let value = value.into();
        match &mut self.primary {
            Some(primary) if primary.available() => {
                primary.put(key, StoredEntry::persistent(value))
            }
            _ => {
                let expires_at = Utc::now() + self.fallback_ttl;
                self.fallback.put(key, StoredEntry::expiring(value, expires_at))
            }
        }
    }

    /// Write `value` under `key` only when nothing is stored there yet.
    /// An empty stored value counts as absent. Returns whether the write
    /// happened.
    pub fn set_if_absent(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<bool, StorageError> {
        match self.get(key) {
            Some(existing) if !existing.is_empty() => Ok(false),
            _ => {
                self.set(key, value)?;
                Ok(true)
            }
        }
    }

    /// Drop `key` from the active tier.
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match &mut self.primary {
            Some(primary) if primary.available() => primary.remove(key),
            _ => self.fallback.remove(key),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("using_fallback", &self.using_fallback())
            .finish_non_exhaustive()
    }
}
