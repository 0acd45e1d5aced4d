use glam::{Mat4, Vec2, Vec3};
use super::*;

/// Camera at (0, 50, 200) looking down -Z, 90° FOV.
fn camera_vp() -> Mat4 {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 1000.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 50.0, 200.0), Vec3::new(0.0, 50.0, 0.0), Vec3::Y);
    projection * view
}

/// Wall between the camera and the origin.
fn wall() -> Occluder {
    Occluder::new(1, BoundingBox::new(Vec3::new(-50.0, 0.0, -10.0), Vec3::new(50.0, 100.0, 10.0)).unwrap())
}

fn sphere(center: Vec3, radius: f32) -> BoundingSphere {
    BoundingSphere::new(center, radius).unwrap()
}

fn frame_with_wall() -> SoftwareOcclusionTest {
    let mut test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig::default());
    test.begin_frame(&camera_vp());
    test.rasterize(&wall());
    test
}

// ============================================================================
// Depth buffer
// ============================================================================

#[test]
fn test_new_buffer_is_cleared() {
    let test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig::default());
    assert_eq!(test.resolution(), 64);
    assert_eq!(test.depth_at(0, 0), Some(1.0));
    assert_eq!(test.depth_at(63, 63), Some(1.0));
    assert_eq!(test.depth_at(64, 0), None);
}

#[test]
fn test_zero_resolution_is_raised() {
    let test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig { resolution: 0, ..Default::default() });
    assert_eq!(test.resolution(), 1);
}

#[test]
fn test_huge_resolution_is_capped() {
    let test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig { resolution: 70_000, ..Default::default() });
    assert_eq!(test.resolution(), MAX_OCCLUSION_RESOLUTION);
    assert_eq!(test.depth_at(MAX_OCCLUSION_RESOLUTION - 1, MAX_OCCLUSION_RESOLUTION - 1), Some(1.0));
    assert_eq!(test.depth_at(MAX_OCCLUSION_RESOLUTION, 0), None);
}

#[test]
fn test_rasterize_writes_center_not_corners() {
    let test = frame_with_wall();

    let center = test.depth_at(32, 32).unwrap();
    assert!(center < 1.0 && center > 0.0);
    // Wall covers roughly the middle quarter of the screen
    assert_eq!(test.depth_at(0, 0), Some(1.0));
    assert_eq!(test.depth_at(10, 32), Some(1.0));

    let stats = test.stats();
    assert_eq!(stats.occluders_rasterized, 1);
    assert_eq!(stats.occluders_skipped, 0);
    assert!(stats.pixels_written > 100);
}

#[test]
fn test_begin_frame_clears_buffer() {
    let mut test = frame_with_wall();
    test.begin_frame(&camera_vp());

    assert_eq!(test.depth_at(32, 32), Some(1.0));
    assert_eq!(test.stats(), SoftwareOcclusionStats::default());
}

#[test]
fn test_occluder_crossing_near_plane_is_skipped() {
    let mut test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig::default());
    test.begin_frame(&camera_vp());

    // Box around the camera itself
    let around_eye = BoundingBox::new(Vec3::new(-10.0, 40.0, 190.0), Vec3::new(10.0, 60.0, 210.0)).unwrap();
    test.rasterize_box(&around_eye);

    assert_eq!(test.stats().occluders_skipped, 1);
    assert_eq!(test.stats().occluders_rasterized, 0);
    assert_eq!(test.depth_at(32, 32), Some(1.0));
}

#[test]
fn test_nearer_occluder_wins() {
    let mut test = frame_with_wall();
    let far_depth = test.depth_at(32, 32).unwrap();

    let near_block = BoundingBox::new(Vec3::new(-5.0, 45.0, 95.0), Vec3::new(5.0, 55.0, 105.0)).unwrap();
    test.rasterize_box(&near_block);
    let near_depth = test.depth_at(32, 32).unwrap();
    assert!(near_depth < far_depth);

    // Rasterizing the wall again does not raise the stored depth
    test.rasterize(&wall());
    assert_eq!(test.depth_at(32, 32), Some(near_depth));
}

// ============================================================================
// test_sphere
// ============================================================================

#[test]
fn test_sphere_behind_wall_is_occluded() {
    let test = frame_with_wall();
    let hidden = sphere(Vec3::new(0.0, 50.0, -100.0), 5.0);

    assert_eq!(test.test_sphere(&hidden), OcclusionResult::Occluded);
    assert_eq!(test.stats().spheres_tested, 1);
    assert_eq!(test.stats().spheres_occluded, 1);
}

#[test]
fn test_sphere_in_front_of_wall_is_visible() {
    let test = frame_with_wall();
    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 50.0, 100.0), 5.0)), OcclusionResult::Visible);
}

#[test]
fn test_sphere_above_wall_is_visible() {
    let test = frame_with_wall();
    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 150.0, -100.0), 5.0)), OcclusionResult::Visible);
}

#[test]
fn test_off_screen_and_behind_camera_are_visible() {
    let test = frame_with_wall();
    assert_eq!(test.test_sphere(&sphere(Vec3::new(500.0, 50.0, -100.0), 1.0)), OcclusionResult::Visible);
    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 50.0, 300.0), 1.0)), OcclusionResult::Visible);
}

#[test]
fn test_nothing_occluded_without_occluders() {
    let mut test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig::default());
    test.begin_frame(&camera_vp());
    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 50.0, -100.0), 1.0)), OcclusionResult::Visible);
}

#[test]
fn test_gl_depth_range() {
    let projection = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 1000.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 50.0, 200.0), Vec3::new(0.0, 50.0, 0.0), Vec3::Y);

    let mut test = SoftwareOcclusionTest::new(SoftwareOcclusionConfig {
        depth_range: DepthRange::NegativeOneToOne,
        ..Default::default()
    });
    test.begin_frame(&(projection * view));
    test.rasterize(&wall());

    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 50.0, -100.0), 5.0)), OcclusionResult::Occluded);
    assert_eq!(test.test_sphere(&sphere(Vec3::new(0.0, 50.0, 100.0), 5.0)), OcclusionResult::Visible);
}

// ============================================================================
// Hull helpers
// ============================================================================

#[test]
fn test_convex_hull_drops_interior_points() {
    let points = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(4.0, 0.0),
        Vec2::new(4.0, 4.0),
        Vec2::new(0.0, 4.0),
        Vec2::new(2.0, 2.0),
        Vec2::new(2.0, 0.0), // collinear on an edge
    ];
    let hull = convex_hull(points);
    assert_eq!(hull.len(), 4);

    assert!(point_in_convex_polygon(&hull, Vec2::new(1.0, 3.0)));
    assert!(point_in_convex_polygon(&hull, Vec2::new(4.0, 2.0)));
    assert!(!point_in_convex_polygon(&hull, Vec2::new(5.0, 2.0)));
}

#[test]
fn test_convex_hull_of_collinear_points_is_degenerate() {
    let hull = convex_hull(vec![Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0), Vec2::splat(3.0)]);
    assert!(hull.len() < 3);
}
