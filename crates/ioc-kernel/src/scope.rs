//! Scopes: concurrent key → behavior maps chained to an optional parent.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::resolver::Behavior;

/// A node in the scope tree.
///
/// The map is safe for concurrent reads, inserts and removals from any number
/// of threads. A scope holds its parent, never its children, so the tree has
/// no ownership cycles; a scope stays reachable for as long as a thread
/// binding or a descendant scope holds it.
pub struct Scope {
    id: Uuid,
    parent: Option<Arc<Scope>>,
    entries: DashMap<String, Behavior>,
}

impl Scope {
    /// A scope without a parent.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            parent: None,
            entries: DashMap::new(),
        })
    }

    pub fn with_parent(parent: Arc<Scope>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            parent: Some(parent),
            entries: DashMap::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    /// Number of ancestors between this scope and the end of its chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent.as_ref();
        while let Some(scope) = cursor {
            depth += 1;
            cursor = scope.parent.as_ref();
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Clone the behavior out so no shard lock is held while it runs.
    pub fn get(&self, key: &str) -> Option<Behavior> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Insert or overwrite `key`. Returns `true` when a previous binding was replaced.
    pub fn insert(&self, key: impl Into<String>, behavior: Behavior) -> bool {
        self.entries.insert(key.into(), behavior).is_some()
    }

    pub fn remove(&self, key: &str) -> Option<Behavior> {
        self.entries.remove(key).map(|(_, behavior)| behavior)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Walk from this scope through its parents and return the first binding for `key`.
    pub fn lookup(self: &Arc<Self>, key: &str) -> Option<(Arc<Scope>, Behavior)> {
        let mut cursor = Some(self.clone());
        while let Some(scope) = cursor {
            if let Some(behavior) = scope.get(key) {
                return Some((scope, behavior));
            }
            cursor = scope.parent.clone();
        }
        None
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("len", &self.entries.len())
            .finish()
    }
}
