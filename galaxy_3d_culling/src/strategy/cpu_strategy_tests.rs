use glam::{Mat4, Vec3};
use super::*;

/// 64x64 screen, 16 px tiles: 4x4 tiles.
fn strategy(max_lights_per_tile: u32) -> CpuLightCullingStrategy {
    CpuLightCullingStrategy::new(64, 64, LightCullingConfig {
        max_lights_per_tile,
        ..Default::default()
    })
    .unwrap()
}

/// Camera at (0, 0, 10) looking at the origin; at the origin the screen
/// spans [-10, 10] on both axes, 5 units per tile.
fn camera() -> (Mat4, Mat4) {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    (view, projection)
}

fn scene_lights() -> Vec<LightDescriptor> {
    vec![
        LightDescriptor::point(Vec3::ZERO, 1.0),
        LightDescriptor::directional(Vec3::NEG_Y),
        LightDescriptor::point(Vec3::new(0.0, 0.0, 30.0), 1.0), // behind the camera
        LightDescriptor::Ambient,
    ]
}

const CENTER_TILES: [usize; 4] = [5, 6, 9, 10];

#[test]
fn test_kind_and_name() {
    let strategy = strategy(8);
    assert_eq!(strategy.kind(), StrategyKind::Cpu);
    assert!(!strategy.name().is_empty());
    assert_eq!(strategy.tile_grid().num_tiles(), 16);
}

#[test]
fn test_assigns_lights_to_tiles() {
    let mut strategy = strategy(8);
    let (view, projection) = camera();
    let lists = strategy.cull(&scene_lights(), &view, &projection).unwrap();

    assert_eq!((lists.tiles_x(), lists.tiles_y()), (4, 4));
    for tile in 0..16 {
        if CENTER_TILES.contains(&tile) {
            assert_eq!(lists.lights_for_tile(tile), &[0, 1, 3], "tile {}", tile);
        } else {
            assert_eq!(lists.lights_for_tile(tile), &[1, 3], "tile {}", tile);
        }
    }

    let stats = strategy.stats();
    assert_eq!(stats.lights_total, 4);
    assert_eq!(stats.lights_visible, 3);
    assert_eq!(stats.assignments, 36);
    assert_eq!(stats.dropped, 0);
    assert_eq!(stats.overflowed_tiles, 0);
}

#[test]
fn test_top_left_light_lands_in_first_tile() {
    let mut strategy = strategy(8);
    let (view, projection) = camera();
    let lights = [LightDescriptor::point(Vec3::new(-7.0, 7.0, 0.0), 1.0)];
    let lists = strategy.cull(&lights, &view, &projection).unwrap();

    assert_eq!(lists.lights_for_tile(0), &[0]);
    assert_eq!(lists.total_assignments(), 1);
}

#[test]
fn test_overflow_is_capped_and_counted() {
    let mut strategy = strategy(2);
    let (view, projection) = camera();
    let lists = strategy.cull(&scene_lights(), &view, &projection).unwrap();

    for tile in CENTER_TILES {
        assert_eq!(lists.lights_for_tile(tile), &[0, 1]);
    }
    let stats = strategy.stats();
    assert_eq!(stats.dropped, 4);
    assert_eq!(stats.overflowed_tiles, 4);
    assert_eq!(stats.assignments, 32);
}

#[test]
fn test_malformed_light_reaches_every_tile() {
    let mut strategy = strategy(8);
    let (view, projection) = camera();
    let lights = [LightDescriptor::point(Vec3::ZERO, f32::NAN)];
    let lists = strategy.cull(&lights, &view, &projection).unwrap();
    assert_eq!(lists.total_assignments(), 16);
}

#[test]
fn test_resize() {
    let mut strategy = strategy(8);
    strategy.resize(32, 16).unwrap();
    let (view, projection) = camera();
    let lists = strategy.cull(&[LightDescriptor::Ambient], &view, &projection).unwrap();

    assert_eq!((lists.tiles_x(), lists.tiles_y()), (2, 1));
    assert!(strategy.resize(0, 16).is_err());
}

#[test]
fn test_degenerate_projection_fails() {
    let mut strategy = strategy(8);
    let (view, _) = camera();
    assert!(strategy.cull(&scene_lights(), &view, &Mat4::ZERO).is_err());
}

#[test]
fn test_no_lights() {
    let mut strategy = strategy(8);
    let (view, projection) = camera();
    let lists = strategy.cull(&[], &view, &projection).unwrap();
    assert_eq!(lists.total_assignments(), 0);
    assert_eq!(lists.num_tiles(), 16);
}
