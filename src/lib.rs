//! Diversity config - layered page-embedded configuration
//!
//! This crate implements the configuration store for pages that embed
//! their settings as marked script blocks: a `main` block merged eagerly
//! at startup, further blocks loaded lazily by name, and a caller
//! override layer merged on top. Container values resolve to live views
//! whose writes survive page transitions.

pub mod format;
pub mod mock;
pub mod source;
pub mod storage;
pub mod store;
pub mod theme;
pub mod transition;
pub mod url;

pub use source::{BlockLoader, BlockSource, HtmlPage, LoadError, LoadedBlock, DEFAULT_MARKER};
pub use storage::{Storage, StorageBackend, StorageError};
pub use store::{
    ArrayView, BlockOrigin, BlockProvenance, ConfigCache, ConfigResolver, ObjectView,
    OverrideLayer, Resolved, MAIN_BLOCK,
};
pub use transition::TransitionHook;
