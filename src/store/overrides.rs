//! Override layer
//!
//! Caller-written values keyed by block name. Overrides are the durable
//! record of every write made through the store: they survive page
//! transitions and cache clears, and are dropped only when the caller
//! removes them.
//!
//! An override entry is lazily materialised the first time a name with a
//! container base is resolved, with the same container kind as the base
//! (empty array for an array base, empty object for an object base).
//! Scalar and null bases get no implicit entry.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Caller-written overrides, keyed by block name.
#[derive(Debug, Default)]
pub struct OverrideLayer {
    entries: HashMap<String, Value>,
}

impl OverrideLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `name`, materialising an empty container matching
    /// `base`'s kind when there is none. Existing entries are returned
    /// unchanged whatever their shape.
    pub fn get_or_init(&mut self, name: &str, base: &Value) -> Option<&Value> {
        if !self.entries.contains_key(name) {
            let init = match base {
                Value::Array(_) => Some(Value::Array(Vec::new())),
                Value::Object(_) => Some(Value::Object(Map::new())),
                _ => None,
            };
            if let Some(init) = init {
                self.entries.insert(name.to_string(), init);
            }
        }
        self.entries.get(name)
    }

    /// The entry for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Replace the entry for `name` wholesale.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Record an object-view write. A non-object entry is replaced by a
    /// fresh object holding only the written key.
    pub fn set_key(&mut self, name: &str, key: &str, value: Value) {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(key.to_string(), value);
        }
    }

    /// Record an array-view write, padding with nulls up to `index`. A
    /// non-array entry is replaced by a fresh array.
    pub fn set_index(&mut self, name: &str, index: usize, value: Value) {
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value;
        }
    }

    /// Drop the entry for `name`, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Drop every entry. Only ever caller-invoked; page transitions
    /// clear caches, not overrides.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
