//! Dynamic Record State
//!
//! [`Record`] is a ready-made state aggregate for hosts that do not have a
//! static state struct: an immutable string-keyed map of shared, type-erased
//! [`Value`]s.
//!
//! Identity works the way the engine expects out of the box:
//!
//! - Two `Value`s are "the same" only when they share one allocation, never
//!   by comparing contents.
//! - Two `Record`s are "the same state" only when they share the backing
//!   map. Builder-style updates ([`Record::with`], [`Record::without`])
//!   produce a new map while untouched fields keep their identity, so a
//!   rebuilt record reads as changed only in the fields that actually moved.
//!
//! Update functions that want to preserve "unchanged" for a field they
//! recompute should put the old `Value` back rather than re-wrap an equal
//! content.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::state::SyncState;

/// An opaque shared field value.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wrap a value into a shared, type-erased field value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Identity comparison: same allocation, not equal contents.
    pub fn same(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the wrapped value as `T`, if that is what it is.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({:p})", Arc::as_ptr(&self.0))
    }
}

/// An immutable string-keyed state aggregate with structural sharing.
#[derive(Clone)]
pub struct Record {
    fields: Arc<IndexMap<String, Value>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self {
            fields: Arc::new(IndexMap::new()),
        }
    }

    /// Build a new record with `key` set to `value`.
    ///
    /// Untouched fields keep their identity; the record itself gets a new
    /// one.
    pub fn with(&self, key: impl Into<String>, value: Value) -> Self {
        let mut fields = (*self.fields).clone();
        fields.insert(key.into(), value);

        Self {
            fields: Arc::new(fields),
        }
    }

    /// Build a new record without `key`.
    pub fn without(&self, key: &str) -> Self {
        let mut fields = (*self.fields).clone();
        fields.shift_remove(key);

        Self {
            fields: Arc::new(fields),
        }
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field and borrow it as `T`.
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(|value| value.downcast_ref())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

impl SyncState for Record {
    type Key = String;

    fn field_differs(&self, previous: &Self, key: &Self::Key) -> bool {
        match (self.get(key), previous.get(key)) {
            (Some(current), Some(before)) => !current.same(before),
            (None, None) => false,
            _ => true,
        }
    }

    fn same_state(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}
