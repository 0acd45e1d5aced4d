use super::*;

#[test]
fn test_default_config() {
    let config = GpuLightCullerConfig::default();
    assert_eq!(config.max_lights_per_tile, DEFAULT_MAX_LIGHTS_PER_TILE);
    assert_eq!(config.workgroup_size, DEFAULT_WORKGROUP_SIZE);
}

#[test]
fn test_shader_source_fills_every_placeholder() {
    let source = shader_source(&GpuLightCullerConfig {
        max_lights_per_tile: 128,
        workgroup_size: 32,
    });

    assert!(!source.contains("{{"));
    assert!(source.contains("const WORKGROUP_SIZE: u32 = 32u;"));
    assert!(source.contains("const MAX_LIGHTS_PER_TILE: u32 = 128u;"));
    assert!(source.contains("const FRUSTUM_EPSILON: f32 = 0.01;"));
}

#[test]
fn test_shader_light_type_codes_match_core() {
    use galaxy_3d_culling::galaxy3d::culling::{LIGHT_TYPE_AMBIENT, LIGHT_TYPE_DIRECTIONAL};

    let source = shader_source(&GpuLightCullerConfig::default());
    assert!(source.contains(&format!("const LIGHT_TYPE_DIRECTIONAL: u32 = {}u;", LIGHT_TYPE_DIRECTIONAL)));
    assert!(source.contains(&format!("const LIGHT_TYPE_AMBIENT: u32 = {}u;", LIGHT_TYPE_AMBIENT)));
}

#[test]
fn test_shader_layout_sizes() {
    // Struct sizes the WGSL declarations assume
    assert_eq!(std::mem::size_of::<GpuLight>(), 3 * 16);
    assert_eq!(std::mem::size_of::<GpuTilePlanes>(), 6 * 16);
    assert_eq!(std::mem::size_of::<GpuCullingConfig>(), 64 + 16);
}
