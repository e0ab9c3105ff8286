//! Default backing object for generated adapters.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::value::Value;

/// A thread-safe attribute map.
///
/// Adapters never read it themselves; the get/set behaviors registered by
/// the application decide what each attribute means.
#[derive(Default)]
pub struct DataObject {
    fields: RwLock<HashMap<String, Value>>,
}

impl DataObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed an attribute.
    pub fn with(self, attribute: impl Into<String>, value: Value) -> Self {
        self.fields.write().insert(attribute.into(), value);
        self
    }

    pub fn get(&self, attribute: &str) -> Option<Value> {
        self.fields.read().get(attribute).cloned()
    }

    /// Store `value`, returning the previous one.
    pub fn set(&self, attribute: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.write().insert(attribute.into(), value)
    }

    pub fn remove(&self, attribute: &str) -> Option<Value> {
        self.fields.write().remove(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.fields.read().contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    /// Attribute names, sorted.
    pub fn attributes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataObject")
            .field("attributes", &self.attributes())
            .finish()
    }
}
