//! Page block sources
//!
//! A `BlockSource` is the page: something that can hand back the raw text
//! of a named embedded configuration block. `HtmlPage` is the shipped
//! implementation (marked `<script>` elements in an HTML document); the
//! `mock` module provides a scripted source for tests. `BlockLoader` sits
//! on top and turns raw text into parsed blocks with provenance.

mod html;
mod loader;

pub use html::{HtmlPage, DEFAULT_MARKER};
pub use loader::{BlockLoader, LoadError, LoadedBlock};

/// A source of named configuration block text.
///
/// Implementations locate the unique page element tagged with the
/// configuration marker and the given name. Absence is `None`, not an
/// error; the text itself may be empty.
pub trait BlockSource: Send + Sync {
    /// Raw text of the block tagged `name`, or `None` when the page
    /// carries no element for that name.
    fn block_text(&self, name: &str) -> Option<String>;
}
