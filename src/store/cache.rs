//! Block cache
//!
//! Two tiers of base configuration:
//!
//! - The **main mapping**: keys of the `main` block, merged eagerly at
//!   startup and kept for the life of the process.
//! - **Per-name blocks**: loaded lazily on first access and dropped on
//!   every page transition.
//!
//! The cache also keeps a provenance trail of every block it has parsed,
//! so embedders can report exactly which page text produced the current
//! state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::source::{BlockLoader, LoadError};

use super::merge::merge_into;

/// Name of the block force-loaded at startup.
pub const MAIN_BLOCK: &str = "main";

/// Which tier a block was loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockOrigin {
    /// Merged into the main mapping at startup.
    Main,
    /// Loaded lazily under its own name.
    Named,
}

/// Where a cached block's content came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockProvenance {
    pub name: String,
    pub origin: BlockOrigin,
    /// SHA-256 of the raw block text, hex-encoded.
    pub digest: String,
    /// Raw block text length in bytes.
    pub bytes: usize,
}

/// The two-tier block cache.
#[derive(Debug, Default)]
pub struct ConfigCache {
    main: Map<String, Value>,
    others: HashMap<String, Value>,
    provenance: Vec<BlockProvenance>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the `main` block into the main mapping.
    ///
    /// Runs once at startup; calling it again merges again, with incoming
    /// keys overwriting same-named ones. A page without a `main` block
    /// merges nothing, as does a `main` block whose value is not an
    /// object.
    pub fn load_main(&mut self, loader: &BlockLoader) -> Result<(), LoadError> {
        let Some(block) = loader.load(MAIN_BLOCK)? else {
            return Ok(());
        };
        match block.value {
            Value::Object(map) => {
                merge_into(&mut self.main, map);
                self.provenance.push(BlockProvenance {
                    name: block.name,
                    origin: BlockOrigin::Main,
                    digest: block.digest,
                    bytes: block.bytes,
                });
            }
            _ => warn!("main block is not an object, nothing merged"),
        }
        Ok(())
    }

    /// The base value for `name`: the main mapping's entry when it has
    /// one, otherwise the per-name block, loading it on first access.
    ///
    /// A name the page knows nothing about caches as an empty object so
    /// the page is not re-queried on every access.
    pub fn get(&mut self, name: &str, loader: &BlockLoader) -> Result<&Value, LoadError> {
        if self.main.contains_key(name) {
            return Ok(&self.main[name]);
        }
        if !self.others.contains_key(name) {
            let value = match loader.load(name)? {
                Some(block) => {
                    self.provenance.push(BlockProvenance {
                        name: block.name,
                        origin: BlockOrigin::Named,
                        digest: block.digest,
                        bytes: block.bytes,
                    });
                    block.value
                }
                None => Value::Object(Map::new()),
            };
            self.others.insert(name.to_string(), value);
        }
        Ok(&self.others[name])
    }

    /// Drop every lazily-loaded block. The main mapping survives.
    pub fn clear(&mut self) {
        let dropped = self.others.len();
        self.others.clear();
        self.provenance.retain(|p| p.origin == BlockOrigin::Main);
        debug!(dropped, "lazily-loaded blocks cleared");
    }

    /// Peek at a cached value without triggering a load.
    pub fn cached(&self, name: &str) -> Option<&Value> {
        self.main.get(name).or_else(|| self.others.get(name))
    }

    /// True when `name` resolves without going back to the page.
    pub fn contains(&self, name: &str) -> bool {
        self.main.contains_key(name) || self.others.contains_key(name)
    }

    /// The main mapping.
    pub fn main(&self) -> &Map<String, Value> {
        &self.main
    }

    /// Provenance of every block currently backing the cache.
    pub fn provenance(&self) -> &[BlockProvenance] {
        &self.provenance
    }

    /// Mutable handle on a cached array, the write-through target for
    /// array views. `None` when `name` is not cached or not an array.
    pub(crate) fn cached_array_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        let slot = if self.main.contains_key(name) {
            self.main.get_mut(name)
        } else {
            self.others.get_mut(name)
        };
        match slot {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use serde_json::json;
    use std::sync::Arc;

    fn make_loader(source: MockSource) -> (Arc<MockSource>, BlockLoader) {
        let source = Arc::new(source);
        let loader = BlockLoader::new(source.clone());
        (source, loader)
    }

    #[test]
    fn test_load_main_merges_keys() {
        let (_, loader) = make_loader(
            MockSource::new().with_block("main", r#"{"themes": ["aurora"], "debug": true}"#),
        );
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        assert_eq!(cache.main().len(), 2);
        assert_eq!(cache.main()["debug"], json!(true));
    }

    #[test]
    fn test_load_main_without_block_merges_nothing() {
        let (_, loader) = make_loader(MockSource::new());
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        assert!(cache.main().is_empty());
        assert!(cache.provenance().is_empty());
    }

    #[test]
    fn test_load_main_again_overwrites_same_keys() {
        let (source, loader) = make_loader(MockSource::new().with_block("main", r#"{"a": 1, "b": 2}"#));
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();

        source.set_block("main", r#"{"b": 3}"#);
        cache.load_main(&loader).unwrap();
        assert_eq!(cache.main()["a"], json!(1));
        assert_eq!(cache.main()["b"], json!(3));
    }

    #[test]
    fn test_non_object_main_is_ignored() {
        let (_, loader) = make_loader(MockSource::new().with_block("main", r#"[1, 2, 3]"#));
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        assert!(cache.main().is_empty());
    }

    #[test]
    fn test_main_mapping_shadows_named_blocks() {
        let (source, loader) = make_loader(
            MockSource::new()
                .with_block("main", r#"{"widgets": "from-main"}"#)
                .with_block("widgets", r#"{"from": "page"}"#),
        );
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        assert_eq!(
            cache.get("widgets", &loader).unwrap(),
            &json!("from-main")
        );
        // The per-name block was never consulted.
        assert_eq!(source.lookups("widgets"), 0);
    }

    #[test]
    fn test_named_block_loads_once() {
        let (source, loader) =
            make_loader(MockSource::new().with_block("widgets", r#"{"rows": 3}"#));
        let mut cache = ConfigCache::new();
        cache.get("widgets", &loader).unwrap();
        cache.get("widgets", &loader).unwrap();
        assert_eq!(source.lookups("widgets"), 1);
    }

    #[test]
    fn test_missing_block_caches_as_empty_object() {
        let (source, loader) = make_loader(MockSource::new());
        let mut cache = ConfigCache::new();
        assert_eq!(cache.get("missing", &loader).unwrap(), &json!({}));
        cache.get("missing", &loader).unwrap();
        assert_eq!(source.lookups("missing"), 1);
    }

    #[test]
    fn test_clear_drops_named_blocks_but_not_main() {
        let (source, loader) = make_loader(
            MockSource::new()
                .with_block("main", r#"{"debug": true}"#)
                .with_block("widgets", r#"{"rows": 3}"#),
        );
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        cache.get("widgets", &loader).unwrap();
        assert_eq!(cache.provenance().len(), 2);

        cache.clear();
        assert!(cache.contains("debug"));
        assert!(!cache.contains("widgets"));
        assert_eq!(cache.provenance().len(), 1);
        assert_eq!(cache.provenance()[0].origin, BlockOrigin::Main);

        // Next access goes back to the page.
        cache.get("widgets", &loader).unwrap();
        assert_eq!(source.lookups("widgets"), 2);
    }

    #[test]
    fn test_malformed_named_block_propagates() {
        let (_, loader) = make_loader(MockSource::new().with_block("widgets", "{broken"));
        let mut cache = ConfigCache::new();
        let err = cache.get("widgets", &loader).unwrap_err();
        assert!(matches!(err, LoadError::MalformedBlock { ref name, .. } if name == "widgets"));
    }

    #[test]
    fn test_cached_array_mut_targets_both_tiers() {
        let (_, loader) = make_loader(
            MockSource::new()
                .with_block("main", r#"{"themes": [1]}"#)
                .with_block("widgets", r#"[2]"#),
        );
        let mut cache = ConfigCache::new();
        cache.load_main(&loader).unwrap();
        cache.get("widgets", &loader).unwrap();

        cache.cached_array_mut("themes").unwrap().push(json!(9));
        cache.cached_array_mut("widgets").unwrap().push(json!(9));
        assert_eq!(cache.cached("themes").unwrap(), &json!([1, 9]));
        assert_eq!(cache.cached("widgets").unwrap(), &json!([2, 9]));
        assert!(cache.cached_array_mut("absent").is_none());
    }
}
