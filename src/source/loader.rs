//! Block loading and parsing
//!
//! `BlockLoader` bridges a `BlockSource` and the store: it fetches the raw
//! text for a name, parses it as JSON, and fingerprints it for
//! provenance. Absence of a block is a normal outcome; malformed text is
//! fatal and surfaces to the caller that triggered the load.

use std::sync::Arc;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use super::BlockSource;

/// Block loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed configuration block {name:?}: {source}")]
    MalformedBlock {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A parsed block together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedBlock {
    /// Block name, as tagged on the page element.
    pub name: String,
    /// Parsed block value.
    pub value: Value,
    /// SHA-256 of the raw block text, hex-encoded.
    pub digest: String,
    /// Raw block text length in bytes.
    pub bytes: usize,
}

/// Loads named blocks from a page source.
#[derive(Clone)]
pub struct BlockLoader {
    source: Arc<dyn BlockSource>,
}

impl BlockLoader {
    pub fn new(source: Arc<dyn BlockSource>) -> Self {
        Self { source }
    }

    /// Load and parse the block tagged `name`.
    ///
    /// `Ok(None)` when the page has no element for `name`. Empty block
    /// text parses as an empty object; anything else must be valid JSON
    /// or the load fails with [`LoadError::MalformedBlock`].
    pub fn load(&self, name: &str) -> Result<Option<LoadedBlock>, LoadError> {
        let Some(text) = self.source.block_text(name) else {
            debug!(name, "no embedded block on page");
            return Ok(None);
        };
        let value = if text.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&text).map_err(|source| LoadError::MalformedBlock {
                name: name.to_string(),
                source,
            })?
        };

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest = hex::encode(hasher.finalize());

        debug!(name, bytes = text.len(), "loaded embedded block");
        Ok(Some(LoadedBlock {
            name: name.to_string(),
            value,
            digest,
            bytes: text.len(),
        }))
    }
}
