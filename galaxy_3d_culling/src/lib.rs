/*!
# Galaxy 3D Culling

Visibility and light culling core for the Galaxy 3D engine.

This crate is platform-agnostic: everything here runs on the CPU and only
depends on camera matrices and scene bounds. GPU backends (wgpu, ...) live
in their own crates and plug in through the `LightCullingStrategy` trait,
sharing the packed layouts defined here.

## Architecture

- **Frustum**: 6 inward planes extracted from a view-projection matrix
- **SpatialGrid**: uniform grid index over bounding spheres
- **ObjectCuller**: grid query + exact frustum test + optional occlusion,
  sorted by distance
- **LightCuller / BatchLightCuller**: light visibility for one or many views
- **TileGrid**: per-tile view-space sub-frustums for Forward+
- **LightCullingStrategy**: per-tile light lists, CPU implementation here
- **OccluderVolume / SoftwareOcclusionTest**: occlusion tests plugged into
  the object culler

Per-frame state is owned by the cullers and reused across frames.
*/

// Internal modules
pub mod error;
pub mod log;
pub mod math;
pub mod bounds;
pub mod camera;
pub mod spatial;
pub mod culling;
pub mod tiles;
pub mod occlusion;
pub mod strategy;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Geometry
    pub use crate::bounds::{BoundingBox, BoundingSphere};
    pub use crate::camera::{DepthRange, Frustum};
    pub use crate::math::Plane;

    // Culling entry points
    pub use crate::culling::{
        BatchLightCuller, LightCuller, LightDescriptor, ObjectCuller, ObjectCullerConfig,
        SortMode, VisibleObject,
    };
    pub use crate::spatial::{ObjectKey, ObjectStore, SpatialGrid, SpatialObject};
    pub use crate::tiles::{TileGrid, TileGridConfig};
    pub use crate::strategy::{
        CpuLightCullingStrategy, LightCullingConfig, LightCullingStrategy, StrategyKind,
        TileLightLists,
    };
    pub use crate::occlusion::{
        OccluderVolume, OcclusionResult, OcclusionTest, SoftwareOcclusionTest,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
    }

    pub mod math {
        pub use crate::math::*;
    }

    pub mod bounds {
        pub use crate::bounds::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod spatial {
        pub use crate::spatial::*;
    }

    pub mod culling {
        pub use crate::culling::*;
    }

    pub mod tiles {
        pub use crate::tiles::*;
    }

    pub mod occlusion {
        pub use crate::occlusion::*;
    }

    pub mod strategy {
        pub use crate::strategy::*;
    }
}

// Re-export math library at crate root
pub use glam;
