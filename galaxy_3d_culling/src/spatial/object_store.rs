/// ObjectStore: caller-owned collection of culling objects.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Culling
/// structures track objects by `ObjectKey`, never by value: two objects
/// with the same `id` and bounds stay distinct.

use slotmap::{new_key_type, SlotMap};
use crate::bounds::BoundingSphere;

new_key_type! {
    /// Stable key for a SpatialObject within an ObjectStore.
    ///
    /// Keys remain valid even after other objects are removed.
    /// A key becomes invalid only when its own object is removed.
    pub struct ObjectKey;
}

/// An object that can be placed in a spatial grid and culled.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialObject<T> {
    /// Caller-side identifier, carried through untouched
    pub id: u64,
    /// World-space bounds. Objects without bounds cannot be tracked.
    pub bounding_sphere: Option<BoundingSphere>,
    /// User data (mesh handle, entity id, ...)
    pub payload: T,
}

impl<T> SpatialObject<T> {
    pub fn new(id: u64, bounding_sphere: BoundingSphere, payload: T) -> Self {
        Self {
            id,
            bounding_sphere: Some(bounding_sphere),
            payload,
        }
    }

    /// Object with no bounding volume yet.
    pub fn unbounded(id: u64, payload: T) -> Self {
        Self {
            id,
            bounding_sphere: None,
            payload,
        }
    }
}

pub struct ObjectStore<T> {
    objects: SlotMap<ObjectKey, SpatialObject<T>>,
}

impl<T> ObjectStore<T> {
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, object: SpatialObject<T>) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Remove an object. Returns it if the key was live.
    pub fn remove(&mut self, key: ObjectKey) -> Option<SpatialObject<T>> {
        self.objects.remove(key)
    }

    pub fn get(&self, key: ObjectKey) -> Option<&SpatialObject<T>> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut SpatialObject<T>> {
        self.objects.get_mut(key)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SpatialObject<T>)> + '_ {
        self.objects.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.objects.keys()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl<T> Default for ObjectStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "object_store_tests.rs"]
mod tests;
