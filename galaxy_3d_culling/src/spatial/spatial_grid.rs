/// SpatialGrid: uniform grid over a fixed world box for broad-phase queries.
///
/// Each tracked object is registered in every cell its bounding sphere's
/// box touches, so one object may appear in many cells. A reverse map
/// (object → cell range) makes removal proportional to the cells the
/// object occupies, and lets `update` migrate only the cells that changed.
///
/// Coordinates outside the grid are clamped to the border cells rather
/// than rejected: the grid still answers queries for objects that drift
/// out of the world box.

use rustc_hash::{FxHashMap, FxHashSet};
use glam::{UVec3, Vec3};
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::cell_key::{CellKey, CellRange, MAX_CELLS_PER_AXIS};
use super::object_store::{ObjectKey, SpatialObject};

/// Occupancy counters, see `SpatialGrid::stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridStats {
    /// Cells holding at least one object
    pub active_cells: usize,
    /// Tracked objects, each counted once
    pub unique_objects: usize,
    /// Sum of per-cell object counts (objects spanning cells count per cell)
    pub total_entries: usize,
}

/// Reverse-map entry for one tracked object.
#[derive(Debug, Clone, Copy)]
struct TrackedObject {
    sphere: BoundingSphere,
    cells: CellRange,
}

pub struct SpatialGrid {
    bounds: BoundingBox,
    cells_per_axis: u32,
    cell_size: Vec3,
    /// Occupied cells only; empty cells are dropped
    cells: FxHashMap<CellKey, FxHashSet<ObjectKey>>,
    /// Reverse lookup: object key → (sphere, occupied cell range)
    objects: FxHashMap<ObjectKey, TrackedObject>,
}

impl SpatialGrid {
    /// Create an empty grid over `bounds` with `cells_per_axis`³ cells.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `cells_per_axis` is outside [1, 256] or the
    /// bounds have zero extent on some axis. `InvalidGeometry` if the bounds
    /// themselves are malformed.
    pub fn new(bounds: BoundingBox, cells_per_axis: u32) -> Result<Self> {
        if !(1..=MAX_CELLS_PER_AXIS).contains(&cells_per_axis) {
            engine_bail!("galaxy3d::SpatialGrid", InvalidArgument,
                "cells_per_axis {} out of range [1, {}]", cells_per_axis, MAX_CELLS_PER_AXIS);
        }
        bounds.validate()?;
        let extents = bounds.extents();
        if extents.cmple(Vec3::ZERO).any() {
            engine_bail!("galaxy3d::SpatialGrid", InvalidArgument,
                "Grid bounds {:?} - {:?} have zero extent", bounds.min, bounds.max);
        }

        let cell_size = extents / cells_per_axis as f32;
        engine_debug!("galaxy3d::SpatialGrid",
            "Created grid: {} cells/axis, cell size {:?}", cells_per_axis, cell_size);

        Ok(Self {
            bounds,
            cells_per_axis,
            cell_size,
            cells: FxHashMap::default(),
            objects: FxHashMap::default(),
        })
    }

    // ===== TRACKING =====

    /// Start tracking an object. Re-inserting a tracked key behaves like `update`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the object has no bounding sphere,
    /// `InvalidGeometry` if the sphere is malformed. The grid is not
    /// modified on error.
    pub fn insert<T>(&mut self, key: ObjectKey, object: &SpatialObject<T>) -> Result<()> {
        let sphere = Self::validated_sphere(object)?;
        self.place(key, sphere);
        Ok(())
    }

    /// Move a tracked object to its new bounds. Only cells entering or
    /// leaving its footprint are touched. Untracked keys are inserted.
    ///
    /// # Errors
    ///
    /// Same as `insert`; the previous placement is kept on error.
    pub fn update<T>(&mut self, key: ObjectKey, object: &SpatialObject<T>) -> Result<()> {
        let sphere = Self::validated_sphere(object)?;
        self.place(key, sphere);
        Ok(())
    }

    /// Stop tracking an object. Returns false if it was not tracked.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let Some(tracked) = self.objects.remove(&key) else {
            return false;
        };
        for cell in tracked.cells.iter() {
            self.remove_from_cell(cell, key);
        }
        true
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(&key)
    }

    /// Bounding sphere recorded at the last insert/update.
    pub fn bounding_sphere(&self, key: ObjectKey) -> Option<&BoundingSphere> {
        self.objects.get(&key).map(|tracked| &tracked.sphere)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.objects.clear();
    }

    // ===== QUERIES =====

    /// Append every tracked object whose cells overlap the sphere's cells.
    ///
    /// Each object is appended once, however many cells it shares with
    /// the query.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for a non-finite center or a negative / non-finite radius.
    pub fn query_sphere(&self, center: Vec3, radius: f32, results: &mut Vec<ObjectKey>) -> Result<()> {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            engine_bail!("galaxy3d::SpatialGrid", InvalidGeometry,
                "Query sphere {:?} r={} is invalid", center, radius);
        }
        let range = self.cell_range(center - Vec3::splat(radius), center + Vec3::splat(radius));
        self.collect_range(&range, results);
        Ok(())
    }

    /// Append every tracked object whose cells overlap the box's cells.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for a malformed box.
    pub fn query_box(&self, aabb: &BoundingBox, results: &mut Vec<ObjectKey>) -> Result<()> {
        aabb.validate()?;
        let range = self.cell_range(aabb.min, aabb.max);
        self.collect_range(&range, results);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn cells_per_axis(&self) -> u32 {
        self.cells_per_axis
    }

    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn stats(&self) -> GridStats {
        GridStats {
            active_cells: self.cells.len(),
            unique_objects: self.objects.len(),
            total_entries: self.cells.values().map(|set| set.len()).sum(),
        }
    }

    /// Cell coordinate containing `point`, clamped to the grid.
    pub fn cell_of(&self, point: Vec3) -> UVec3 {
        let last = (self.cells_per_axis - 1) as f32;
        let cell = ((point - self.bounds.min) / self.cell_size).floor();
        // f32 → u32 casts saturate, clamp first so the max is exact
        cell.clamp(Vec3::ZERO, Vec3::splat(last)).as_uvec3()
    }

    // ===== INTERNALS =====

    fn validated_sphere<T>(object: &SpatialObject<T>) -> Result<BoundingSphere> {
        let Some(sphere) = object.bounding_sphere else {
            engine_bail!("galaxy3d::SpatialGrid", InvalidArgument,
                "Object {} has no bounding sphere", object.id);
        };
        sphere.validate()?;
        Ok(sphere)
    }

    fn cell_range(&self, min: Vec3, max: Vec3) -> CellRange {
        CellRange {
            min: self.cell_of(min),
            max: self.cell_of(max),
        }
    }

    /// Insert or move `key` to the cells covered by `sphere`.
    fn place(&mut self, key: ObjectKey, sphere: BoundingSphere) {
        let radius = Vec3::splat(sphere.radius);
        let new_cells = self.cell_range(sphere.center - radius, sphere.center + radius);

        match self.objects.insert(key, TrackedObject { sphere, cells: new_cells }) {
            Some(previous) if previous.cells == new_cells => {}
            Some(previous) => {
                for cell in previous.cells.iter().filter(|c| !new_cells.contains(*c)) {
                    self.remove_from_cell(cell, key);
                }
                for cell in new_cells.iter().filter(|c| !previous.cells.contains(*c)) {
                    self.cells.entry(cell).or_default().insert(key);
                }
            }
            None => {
                for cell in new_cells.iter() {
                    self.cells.entry(cell).or_default().insert(key);
                }
            }
        }
    }

    fn remove_from_cell(&mut self, cell: CellKey, key: ObjectKey) {
        if let Some(set) = self.cells.get_mut(&cell) {
            set.remove(&key);
            if set.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    fn collect_range(&self, range: &CellRange, results: &mut Vec<ObjectKey>) {
        let mut seen: FxHashSet<ObjectKey> = FxHashSet::default();

        // Walk whichever is smaller: the query's cells or the occupied cells
        if range.cell_count() <= self.cells.len() {
            for cell in range.iter() {
                if let Some(set) = self.cells.get(&cell) {
                    results.extend(set.iter().copied().filter(|key| seen.insert(*key)));
                }
            }
        } else {
            for (cell, set) in &self.cells {
                if range.contains(*cell) {
                    results.extend(set.iter().copied().filter(|key| seen.insert(*key)));
                }
            }
        }
    }
}
