//! Page-transition invalidation
//!
//! On a soft navigation the document body is replaced without a full
//! reload, so every lazily-loaded block may be stale while the process
//! lives on. The embedder subscribes the store to its transition event
//! by taking a [`TransitionHook`] and calling [`notify`] from the event
//! handler. Each notification drops the lazy tier of the cache; the main
//! mapping and all overrides survive.
//!
//! [`notify`]: TransitionHook::notify

use tracing::info;

use crate::store::ConfigResolver;

/// Subscription handle for the page-transition event source.
///
/// Cheap to clone; all clones feed the same store.
#[derive(Clone)]
pub struct TransitionHook {
    resolver: ConfigResolver,
}

impl TransitionHook {
    pub(crate) fn new(resolver: ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Deliver one transition: drop every lazily-loaded block so the
    /// next resolution re-reads the new document. Overrides and the
    /// main mapping are untouched.
    pub fn notify(&self) {
        let transitions = self.resolver.record_transition();
        info!(transitions, "page transition, lazy blocks dropped");
    }

    /// Number of transitions delivered so far.
    pub fn transitions(&self) -> u64 {
        self.resolver.transitions()
    }
}

impl std::fmt::Debug for TransitionHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionHook")
            .field("transitions", &self.transitions())
            .finish_non_exhaustive()
    }
}
