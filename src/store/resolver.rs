//! Layered resolution
//!
//! `ConfigResolver` is the single entry point embedded readers go
//! through. Resolution order for a name:
//!
//! 1. The main mapping, when it has the key.
//! 2. Otherwise the per-name block, loaded lazily.
//! 3. The override layer, merged on top.
//!
//! Container bases come back as live views ([`Resolved::Array`],
//! [`Resolved::Object`]); scalars and kind-mismatched overrides come back
//! as plain values. The resolver is a cheap cloneable handle over one
//! shared store, so views stay coherent with later resolutions and with
//! page transitions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::source::{BlockLoader, BlockSource, LoadError};
use crate::transition::TransitionHook;

use super::cache::{BlockProvenance, ConfigCache};
use super::merge::shallow_merge;
use super::overrides::OverrideLayer;
use super::view::{ArrayView, ObjectView, Resolved};

/// The mutable store state, guarded by one lock.
pub(crate) struct Inner {
    pub(crate) cache: ConfigCache,
    pub(crate) overrides: OverrideLayer,
}

/// State shared by the resolver and every view handed out.
pub(crate) struct Shared {
    pub(crate) loader: BlockLoader,
    inner: Mutex<Inner>,
    transitions: AtomicU64,
}

impl Shared {
    /// Lock the store state. A poisoned lock only means some holder
    /// panicked mid-operation; the stores themselves stay usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle on the layered configuration store.
#[derive(Clone)]
pub struct ConfigResolver {
    shared: Arc<Shared>,
}

impl ConfigResolver {
    /// A resolver over fresh, empty stores. Nothing is loaded until
    /// [`load_main`](Self::load_main) or the first resolution.
    pub fn new(loader: BlockLoader) -> Self {
        Self::with_stores(loader, ConfigCache::new(), OverrideLayer::new())
    }

    /// A resolver over caller-built stores, for pre-seeded caches and
    /// test isolation.
    pub fn with_stores(loader: BlockLoader, cache: ConfigCache, overrides: OverrideLayer) -> Self {
        Self {
            shared: Arc::new(Shared {
                loader,
                inner: Mutex::new(Inner { cache, overrides }),
                transitions: AtomicU64::new(0),
            }),
        }
    }

    /// Build a resolver over `source` and eagerly merge its `main`
    /// block, the normal startup path.
    pub fn bootstrap(source: Arc<dyn BlockSource>) -> Result<Self, LoadError> {
        let resolver = Self::new(BlockLoader::new(source));
        resolver.load_main()?;
        Ok(resolver)
    }

    /// Merge the page's `main` block into the main mapping.
    pub fn load_main(&self) -> Result<(), LoadError> {
        self.shared.lock().cache.load_main(&self.shared.loader)
    }

    /// Resolve `name` through the layers.
    ///
    /// A name whose base and override are both arrays resolves to a live
    /// [`ArrayView`]; both objects, to an [`ObjectView`] over their
    /// shallow merge. An override whose kind does not match the base
    /// wins verbatim. Names with no override entry resolve to the base
    /// value as-is.
    pub fn resolve(&self, name: &str) -> Result<Resolved, LoadError> {
        let mut guard = self.shared.lock();
        let Inner { cache, overrides } = &mut *guard;
        let base = cache.get(name, &self.shared.loader)?;
        let layered = overrides.get_or_init(name, base);

        Ok(match (layered, base) {
            (Some(Value::Array(_)), Value::Array(_)) => {
                Resolved::Array(ArrayView::new(Arc::clone(&self.shared), name))
            }
            (Some(Value::Object(written)), Value::Object(base_map)) => {
                let merged = shallow_merge(base_map, written);
                Resolved::Object(ObjectView::new(Arc::clone(&self.shared), name, merged))
            }
            (Some(written), _) => Resolved::Value(written.clone()),
            (None, value) => Resolved::Value(value.clone()),
        })
    }

    /// Replace the override entry for `name` wholesale.
    pub fn set_override(&self, name: impl Into<String>, value: Value) {
        self.shared.lock().overrides.set(name, value);
    }

    /// Drop the override entry for `name`, returning it.
    pub fn remove_override(&self, name: &str) -> Option<Value> {
        self.shared.lock().overrides.remove(name)
    }

    /// Snapshot of the override entry for `name`, if any.
    pub fn override_snapshot(&self, name: &str) -> Option<Value> {
        self.shared.lock().overrides.get(name).cloned()
    }

    /// Drop every lazily-loaded block. The main mapping and all
    /// overrides survive; dropped names reload from the page on next
    /// access.
    pub fn clear_cache(&self) {
        self.shared.lock().cache.clear();
    }

    /// Provenance of every block currently backing the cache.
    pub fn provenance(&self) -> Vec<BlockProvenance> {
        self.shared.lock().cache.provenance().to_vec()
    }

    /// Number of page transitions delivered so far.
    pub fn transitions(&self) -> u64 {
        self.shared.transitions.load(Ordering::SeqCst)
    }

    /// A handle for the page-transition event source to call into.
    pub fn transition_hook(&self) -> TransitionHook {
        TransitionHook::new(self.clone())
    }

    /// Count a transition and clear the lazy tier. Returns the new
    /// transition total.
    pub(crate) fn record_transition(&self) -> u64 {
        let count = self.shared.transitions.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.lock().cache.clear();
        count
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("transitions", &self.transitions())
            .finish_non_exhaustive()
    }
}
