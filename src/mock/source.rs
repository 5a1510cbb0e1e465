//! Scripted block source

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::source::BlockSource;

/// Configurable in-memory page.
///
/// Blocks are plain name/text pairs. Every lookup is counted, matched or
/// not, so tests can assert how often the store went back to the page.
/// Texts can be rewritten mid-test to model a page transition swapping
/// the underlying document.
#[derive(Debug, Default)]
pub struct MockSource {
    blocks: Mutex<HashMap<String, String>>,
    lookups: Mutex<HashMap<String, u64>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style block registration.
    pub fn with_block(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.set_block(name, text);
        self
    }

    /// Add or rewrite a block's text.
    pub fn set_block(&self, name: impl Into<String>, text: impl Into<String>) {
        self.lock_blocks().insert(name.into(), text.into());
    }

    /// Remove a block, making future lookups miss.
    pub fn remove_block(&self, name: &str) {
        self.lock_blocks().remove(name);
    }

    /// How many times `name` has been looked up.
    pub fn lookups(&self, name: &str) -> u64 {
        self.lock_lookups().get(name).copied().unwrap_or(0)
    }

    /// Total lookups across every name.
    pub fn total_lookups(&self) -> u64 {
        self.lock_lookups().values().sum()
    }

    fn lock_blocks(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blocks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_lookups(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlockSource for MockSource {
    fn block_text(&self, name: &str) -> Option<String> {
        *self.lock_lookups().entry(name.to_string()).or_insert(0) += 1;
        self.lock_blocks().get(name).cloned()
    }
}
