//! Persistent per-node scratch storage for decorators

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

/// Identity of one decorator instance inside a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoratorId(Uuid);

impl DecoratorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DecoratorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DecoratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed values keyed by (decorator instance, requested type)
///
/// Lives inside a node's `LayoutState`, so entries survive across passes for
/// that path and are never shared with another path.
#[derive(Default)]
pub struct PersistentStore {
    entries: HashMap<(DecoratorId, TypeId), Box<dyn Any>>,
}

impl PersistentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: 'static>(&self, owner: DecoratorId) -> Option<&T> {
        self.entries
            .get(&(owner, TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static>(&mut self, owner: DecoratorId) -> Option<&mut T> {
        self.entries
            .get_mut(&(owner, TypeId::of::<T>()))
            .and_then(|value| value.downcast_mut::<T>())
    }

    pub fn set<T: 'static>(&mut self, owner: DecoratorId, value: T) {
        self.entries.insert((owner, TypeId::of::<T>()), Box::new(value));
    }

    pub fn remove<T: 'static>(&mut self, owner: DecoratorId) -> Option<T> {
        self.entries
            .remove(&(owner, TypeId::of::<T>()))
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}
