//! Merge logic for configuration mappings
//!
//! Two merges live here, both over top-level keys only:
//! - `merge_into`: accumulate a parsed main block into the main mapping
//!   (later keys overwrite earlier same-named keys)
//! - `shallow_merge`: build the object view's backing map (all base keys,
//!   overwritten by same-named override keys)
//!
//! Nested objects are never merged recursively; an overridden key replaces
//! the base value wholesale.

use serde_json::{Map, Value};

/// Merge `src` into `dest`, later keys overwriting earlier same-named keys.
///
/// Used when the main block is (re-)loaded: repeated loads merge, they do
/// not replace.
pub fn merge_into(dest: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, value) in src {
        dest.insert(key, value);
    }
}

/// Shallow merge of two mappings into a new one.
///
/// Merge semantics:
/// - Keys present only in `base`: kept unchanged
/// - Keys present in `overlay`: overlay wins, top-level only
/// - Nested containers under an overridden key: replaced, not merged
pub fn shallow_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
