use glam::Vec3;
use super::*;

fn unit_sphere() -> BoundingSphere {
    BoundingSphere::new(Vec3::ZERO, 1.0).unwrap()
}

#[test]
fn test_insert_get_remove() {
    let mut store = ObjectStore::new();
    let key = store.insert(SpatialObject::new(7, unit_sphere(), "crate"));

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(key).unwrap().id, 7);
    assert_eq!(store.get(key).unwrap().payload, "crate");

    let removed = store.remove(key).unwrap();
    assert_eq!(removed.id, 7);
    assert!(store.is_empty());
    assert!(store.get(key).is_none());
}

#[test]
fn test_same_id_objects_are_distinct() {
    let mut store = ObjectStore::new();
    let a = store.insert(SpatialObject::new(1, unit_sphere(), ()));
    let b = store.insert(SpatialObject::new(1, unit_sphere(), ()));

    assert_ne!(a, b);
    assert_eq!(store.get(a), store.get(b));

    store.remove(a);
    assert!(!store.contains(a));
    assert!(store.contains(b));
}

#[test]
fn test_removed_key_is_not_reused() {
    let mut store = ObjectStore::new();
    let old = store.insert(SpatialObject::new(1, unit_sphere(), ()));
    store.remove(old);
    let new = store.insert(SpatialObject::new(2, unit_sphere(), ()));

    // Generational keys: the slot may be reused, the key is not
    assert_ne!(old, new);
    assert!(store.get(old).is_none());
}

#[test]
fn test_get_mut_and_iter() {
    let mut store = ObjectStore::new();
    let key = store.insert(SpatialObject::unbounded(3, 10u32));
    assert!(store.get(key).unwrap().bounding_sphere.is_none());

    store.get_mut(key).unwrap().bounding_sphere = Some(unit_sphere());
    store.insert(SpatialObject::new(4, unit_sphere(), 20u32));

    let total: u32 = store.iter().map(|(_, object)| object.payload).sum();
    assert_eq!(total, 30);
    assert_eq!(store.keys().count(), 2);
    assert!(store.get(key).unwrap().bounding_sphere.is_some());

    store.clear();
    assert!(store.is_empty());
}
