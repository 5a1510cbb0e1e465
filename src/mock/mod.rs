//! Mock page source
//!
//! In-memory `BlockSource` for exercising the store without a real page:
//! scripted block texts, per-name lookup counts for cache assertions, and
//! text rewriting to simulate a page changing under the store between
//! transitions. Parse failures are injected by scripting malformed text.

mod source;

pub use source::MockSource;
