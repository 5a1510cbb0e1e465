//! Resolved values and live views
//!
//! What a resolution hands back. Scalars are plain values. Containers
//! are views wired back into the shared store so that reads and writes
//! keep their layered semantics:
//!
//! - [`ArrayView`] reads the live cached base array and writes through to
//!   both the base array and the override entry, so positional writes
//!   stay visible to the page's other readers and survive cache clears.
//! - [`ObjectView`] owns the shallow merge computed at resolution time;
//!   writes land in that merge and in the override entry. The cached
//!   base object is never touched.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::resolver::Shared;

/// Outcome of resolving a name.
pub enum Resolved {
    /// A live view over an array base.
    Array(ArrayView),
    /// A view over the shallow merge of an object base and its override.
    Object(ObjectView),
    /// A scalar or null base, or an override returned verbatim after a
    /// container-kind mismatch.
    Value(Value),
}

impl Resolved {
    /// Collapse to a plain value: views snapshot their current contents.
    pub fn to_value(&self) -> Value {
        match self {
            Resolved::Array(view) => Value::Array(view.snapshot()),
            Resolved::Object(view) => Value::Object(view.snapshot()),
            Resolved::Value(value) => value.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Resolved::Value(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Resolved::Value(value) => value.as_bool(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Resolved::Value(value) => value.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Resolved::Value(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_array_view(&self) -> Option<&ArrayView> {
        match self {
            Resolved::Array(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_object_view(&self) -> Option<&ObjectView> {
        match self {
            Resolved::Object(view) => Some(view),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Array(view) => f.debug_tuple("Array").field(&view.name).finish(),
            Resolved::Object(view) => f.debug_tuple("Object").field(&view.name).finish(),
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Live view over an array base.
///
/// Reads go to the cached base array at call time, so the view tracks
/// in-place changes made elsewhere. After a cache clear the base may be
/// gone until the name is resolved again; a detached view reads as
/// empty.
pub struct ArrayView {
    shared: Arc<Shared>,
    name: String,
}

impl ArrayView {
    pub(crate) fn new(shared: Arc<Shared>, name: &str) -> Self {
        Self {
            shared,
            name: name.to_string(),
        }
    }

    /// The name this view resolves through.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element at `index` in the live base array.
    pub fn get(&self, index: usize) -> Option<Value> {
        let inner = self.shared.lock();
        match inner.cache.cached(&self.name) {
            Some(Value::Array(items)) => items.get(index).cloned(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        let inner = self.shared.lock();
        match inner.cache.cached(&self.name) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the live base array.
    pub fn snapshot(&self) -> Vec<Value> {
        let inner = self.shared.lock();
        match inner.cache.cached(&self.name) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Write `value` at `index`, padding with nulls past the end.
    ///
    /// The write lands in the cached base array, where every other
    /// reader of the block sees it, and in the override entry, where it
    /// outlives cache clears.
    pub fn set(&mut self, index: usize, value: Value) {
        let mut inner = self.shared.lock();
        if let Some(items) = inner.cache.cached_array_mut(&self.name) {
            if index >= items.len() {
                items.resize(index + 1, Value::Null);
            }
            items[index] = value.clone();
        }
        inner.overrides.set_index(&self.name, index, value);
    }
}

impl std::fmt::Debug for ArrayView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayView")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// View over the shallow merge of an object base and its override.
///
/// The merge is computed once, at resolution time; the view owns it.
/// Writes update the owned merge and the override entry, never the
/// cached base object.
pub struct ObjectView {
    shared: Arc<Shared>,
    name: String,
    merged: Map<String, Value>,
}

impl ObjectView {
    pub(crate) fn new(shared: Arc<Shared>, name: &str, merged: Map<String, Value>) -> Self {
        Self {
            shared,
            name: name.to_string(),
            merged,
        }
    }

    /// The name this view resolves through.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.merged.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.merged.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.merged.keys()
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Copy of the merged mapping.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.merged.clone()
    }

    /// Write `value` under `key`, visible to this view immediately and
    /// recorded in the override entry for every later resolution.
    pub fn set(&mut self, key: &str, value: Value) {
        self.merged.insert(key.to_string(), value.clone());
        self.shared.lock().overrides.set_key(&self.name, key, value);
    }
}

impl std::fmt::Debug for ObjectView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectView")
            .field("name", &self.name)
            .field("merged", &self.merged)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use crate::store::ConfigResolver;
    use serde_json::json;

    #[test]
    fn test_scalar_accessors_are_kind_strict() {
        assert_eq!(Resolved::Value(json!("home")).as_str(), Some("home"));
        assert_eq!(Resolved::Value(json!(true)).as_bool(), Some(true));
        assert_eq!(Resolved::Value(json!(4)).as_u64(), Some(4));
        assert_eq!(Resolved::Value(json!(1.5)).as_f64(), Some(1.5));

        assert_eq!(Resolved::Value(json!(4)).as_str(), None);
        assert_eq!(Resolved::Value(json!(true)).as_u64(), None);
        assert_eq!(Resolved::Value(json!("home")).as_bool(), None);
        assert_eq!(Resolved::Value(json!("home")).as_f64(), None);
    }

    #[test]
    fn test_view_accessors() {
        let source =
            MockSource::new().with_block("main", r#"{"layout": {"rows": 2}, "themes": ["a"]}"#);
        let resolver = ConfigResolver::bootstrap(Arc::new(source)).unwrap();

        let layout = resolver.resolve("layout").unwrap();
        let view = layout.as_object_view().unwrap();
        assert_eq!(view.name(), "layout");
        assert!(view.contains_key("rows"));
        assert!(!view.contains_key("cols"));
        assert_eq!(view.keys().collect::<Vec<_>>(), ["rows"]);
        assert!(!view.is_empty());
        assert!(layout.as_array_view().is_none());
        assert_eq!(layout.as_bool(), None);

        let themes = resolver.resolve("themes").unwrap();
        let view = themes.as_array_view().unwrap();
        assert_eq!(view.name(), "themes");
        assert!(!view.is_empty());
        assert!(themes.as_object_view().is_none());
        assert_eq!(themes.as_str(), None);
    }
}
