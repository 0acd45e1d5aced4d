use glam::Vec3;
use crate::error::Error;
use super::*;

fn make_aabb(min: Vec3, max: Vec3) -> BoundingBox {
    BoundingBox::new(min, max).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_valid_box() {
    let aabb = make_aabb(Vec3::splat(-1.0), Vec3::splat(1.0));
    assert_eq!(aabb.center(), Vec3::ZERO);
    assert_eq!(aabb.extents(), Vec3::splat(2.0));
    assert_eq!(aabb.half_extents(), Vec3::splat(1.0));
}

#[test]
fn test_flat_box_is_valid() {
    assert!(BoundingBox::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, 1.0, 5.0)).is_ok());
}

#[test]
fn test_inverted_box_fails() {
    let result = BoundingBox::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
    assert!(matches!(result, Err(Error::InvalidGeometry(_))));
}

#[test]
fn test_non_finite_box_fails() {
    let result = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, f32::INFINITY, 1.0));
    assert!(matches!(result, Err(Error::InvalidGeometry(_))));
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_contains_point_inclusive() {
    let aabb = make_aabb(Vec3::ZERO, Vec3::splat(10.0));
    assert!(aabb.contains_point(Vec3::splat(5.0)));
    assert!(aabb.contains_point(Vec3::ZERO));
    assert!(aabb.contains_point(Vec3::splat(10.0)));
    assert!(!aabb.contains_point(Vec3::new(10.1, 5.0, 5.0)));
}

#[test]
fn test_contains_box() {
    let big = make_aabb(Vec3::splat(-10.0), Vec3::splat(10.0));
    let small = make_aabb(Vec3::splat(-1.0), Vec3::splat(1.0));
    let straddling = make_aabb(Vec3::splat(5.0), Vec3::splat(15.0));

    assert!(big.contains_box(&small));
    assert!(big.contains_box(&big));
    assert!(!small.contains_box(&big));
    assert!(!big.contains_box(&straddling));
}

// ============================================================================
// Intersections
// ============================================================================

#[test]
fn test_intersects_aabb() {
    let a = make_aabb(Vec3::splat(-2.0), Vec3::splat(2.0));
    let b = make_aabb(Vec3::splat(1.0), Vec3::splat(3.0));
    let c = make_aabb(Vec3::splat(5.0), Vec3::splat(7.0));
    let touching = make_aabb(Vec3::new(2.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0));
    // Overlaps on x and y, separated on z only
    let z_separated = make_aabb(Vec3::new(-1.0, -1.0, 2.5), Vec3::new(1.0, 1.0, 3.0));

    assert!(a.intersects_aabb(&b));
    assert!(b.intersects_aabb(&a));
    assert!(!a.intersects_aabb(&c));
    assert!(a.intersects_aabb(&touching));
    assert!(!a.intersects_aabb(&z_separated));
}

// ============================================================================
// Derived boxes
// ============================================================================

#[test]
fn test_from_points_contains_all_points() {
    let points = [
        Vec3::new(3.0, -1.0, 2.0),
        Vec3::new(-4.0, 6.0, 0.5),
        Vec3::new(0.0, 0.0, -9.0),
        Vec3::new(1e-3, 1e3, 7.25),
    ];

    let aabb = BoundingBox::from_points(&points).unwrap();
    assert_eq!(aabb.min, Vec3::new(-4.0, -1.0, -9.0));
    assert_eq!(aabb.max, Vec3::new(3.0, 1e3, 7.25));
    for p in &points {
        assert!(aabb.contains_point(*p));
    }
}

#[test]
fn test_from_points_empty_fails() {
    assert!(matches!(BoundingBox::from_points(&[]), Err(Error::InvalidGeometry(_))));
}

#[test]
fn test_corners_cover_all_combinations() {
    let aabb = make_aabb(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
    let corners = aabb.corners();

    assert_eq!(corners[0], aabb.min);
    assert_eq!(corners[7], aabb.max);
    assert_eq!(corners[1], Vec3::new(1.0, -2.0, -3.0));
    assert_eq!(corners[6], Vec3::new(-1.0, 2.0, 3.0));
    for c in &corners {
        assert!(aabb.contains_point(*c));
    }
}

#[test]
fn test_union_and_clamp() {
    let a = make_aabb(Vec3::ZERO, Vec3::splat(2.0));
    let b = make_aabb(Vec3::splat(1.0), Vec3::splat(5.0));

    let u = a.union(&b);
    assert_eq!(u.min, Vec3::ZERO);
    assert_eq!(u.max, Vec3::splat(5.0));

    let clamped = b.clamped_to(&a).unwrap();
    assert_eq!(clamped.min, Vec3::splat(1.0));
    assert_eq!(clamped.max, Vec3::splat(2.0));

    let disjoint = make_aabb(Vec3::splat(10.0), Vec3::splat(11.0));
    assert!(disjoint.clamped_to(&a).is_none());
}
