use glam::{Mat4, Vec3};
use super::*;

/// Camera at the origin looking down -Z, 90° FOV, near 0.1, far 100.
fn forward_vp() -> Mat4 {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    projection * view
}

/// Same camera turned around, looking down +Z.
fn backward_vp() -> Mat4 {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::Z, Vec3::Y);
    projection * view
}

fn scene_lights() -> Vec<LightDescriptor> {
    vec![
        LightDescriptor::point(Vec3::new(0.0, 0.0, -10.0), 2.0),  // 0: in front
        LightDescriptor::point(Vec3::new(0.0, 0.0, 10.0), 2.0),   // 1: behind
        LightDescriptor::directional(Vec3::NEG_Y),                // 2
        LightDescriptor::Ambient,                                 // 3
        LightDescriptor::point(Vec3::new(0.0, 0.0, -300.0), 5.0), // 4: beyond far
    ]
}

// ============================================================================
// LightCuller
// ============================================================================

#[test]
fn test_cull_point_lights_by_frustum() {
    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    culler.cull(&forward_vp(), &scene_lights(), &mut visible).unwrap();

    assert_eq!(visible, vec![0, 2, 3]);

    let stats = culler.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.visible, 3);
    assert_eq!(stats.always_visible, 2);
    assert_eq!(stats.culled, 2);
    assert_eq!(stats.malformed, 0);
}

#[test]
fn test_point_light_range_reaching_into_frustum_is_kept() {
    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    // Center behind the camera, range reaches past the near plane
    let lights = [LightDescriptor::point(Vec3::new(0.0, 0.0, 1.0), 3.0)];
    culler.cull(&forward_vp(), &lights, &mut visible).unwrap();
    assert_eq!(visible, vec![0]);
}

#[test]
fn test_global_lights_never_culled() {
    let lights = [
        LightDescriptor::directional(Vec3::X),
        LightDescriptor::Ambient,
        LightDescriptor::directional(Vec3::new(f32::NAN, 0.0, 0.0)),
    ];
    let matrices = [
        Mat4::IDENTITY,
        forward_vp(),
        backward_vp(),
        Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 1.0),
        Mat4::perspective_rh(0.1, 3.0, 500.0, 1000.0) * Mat4::from_translation(Vec3::splat(1e4)),
    ];

    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    for vp in &matrices {
        culler.cull(vp, &lights, &mut visible).unwrap();
        assert_eq!(visible, vec![0, 1, 2]);
    }
}

#[test]
fn test_spot_light_pointing_away_is_kept() {
    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    // In front of the camera, cone aimed straight back past the camera
    let lights = [LightDescriptor::spot(Vec3::new(0.0, 0.0, -10.0), Vec3::Z, 5.0, 0.2, 0.3)];
    culler.cull(&forward_vp(), &lights, &mut visible).unwrap();
    assert_eq!(visible, vec![0]);
}

#[test]
fn test_malformed_lights_are_visible() {
    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    let lights = [
        LightDescriptor::point(Vec3::new(0.0, 0.0, 50.0), -1.0),
        LightDescriptor::point(Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0),
        LightDescriptor::spot(Vec3::ZERO, Vec3::Z, f32::NAN, 0.1, 0.2),
    ];
    culler.cull(&forward_vp(), &lights, &mut visible).unwrap();

    assert_eq!(visible, vec![0, 1, 2]);
    assert_eq!(culler.stats().malformed, 3);
}

#[test]
fn test_is_light_visible_follows_last_cull() {
    let mut culler = LightCuller::new();
    let behind = LightDescriptor::point(Vec3::new(0.0, 0.0, 10.0), 2.0);

    // No frustum yet: conservative
    assert!(culler.is_light_visible(&behind));

    let mut visible = Vec::new();
    culler.cull(&forward_vp(), &[], &mut visible).unwrap();
    assert!(!culler.is_light_visible(&behind));
    assert!(culler.is_light_visible(&LightDescriptor::Ambient));

    culler.cull(&backward_vp(), &[], &mut visible).unwrap();
    assert!(culler.is_light_visible(&behind));
}

#[test]
fn test_degenerate_matrix_keeps_previous_results() {
    let mut culler = LightCuller::new();
    let mut visible = Vec::new();
    culler.cull(&forward_vp(), &scene_lights(), &mut visible).unwrap();
    let stats_before = *culler.stats();

    assert!(culler.cull(&Mat4::ZERO, &scene_lights(), &mut visible).is_err());
    assert_eq!(visible, vec![0, 2, 3]);
    assert_eq!(*culler.stats(), stats_before);
    assert!(culler.frustum().is_some());
}

#[test]
fn test_gl_depth_range_culler() {
    let projection = Mat4::perspective_rh_gl(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);

    let mut culler = LightCuller::with_depth_range(DepthRange::NegativeOneToOne);
    let mut visible = Vec::new();
    culler.cull(&(projection * view), &scene_lights(), &mut visible).unwrap();
    assert_eq!(visible, vec![0, 2, 3]);
}

// ============================================================================
// BatchLightCuller
// ============================================================================

#[test]
fn test_batch_cull_views_in_order() {
    let mut batch = BatchLightCuller::new();
    let results = batch.cull_views(&[forward_vp(), backward_vp()], &scene_lights()).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], vec![0, 2, 3]);
    assert_eq!(results[1], vec![1, 2, 3]);
}

#[test]
fn test_batch_pool_grows_and_never_shrinks() {
    let mut batch = BatchLightCuller::new();
    let lights = scene_lights();

    batch.cull_views(&[forward_vp(), backward_vp(), forward_vp()], &lights).unwrap();
    assert_eq!(batch.pool_size(), 3);

    let results = batch.cull_views(&[backward_vp()], &lights).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], vec![1, 2, 3]);
    assert_eq!(batch.pool_size(), 3);

    assert!(batch.culler(0).unwrap().frustum().is_some());
    assert!(batch.culler(5).is_none());
}

#[test]
fn test_batch_fails_on_degenerate_view() {
    let mut batch = BatchLightCuller::new();
    let result = batch.cull_views(&[forward_vp(), Mat4::ZERO], &scene_lights());
    assert!(result.is_err());
}
