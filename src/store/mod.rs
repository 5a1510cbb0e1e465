//! Layered configuration store
//!
//! The store proper: the block cache, the override layer, and the
//! resolver that layers them. Embedders construct a [`ConfigResolver`]
//! over a page source once and resolve names through it; everything else
//! here is the machinery behind that call.

mod cache;
mod merge;
mod overrides;
mod resolver;
mod view;

pub use cache::{BlockOrigin, BlockProvenance, ConfigCache, MAIN_BLOCK};
pub use merge::shallow_merge;
pub use overrides::OverrideLayer;
pub use resolver::ConfigResolver;
pub use view::{ArrayView, ObjectView, Resolved};
