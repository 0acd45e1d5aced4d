/// Packed grid cell coordinates and inclusive cell ranges.

use glam::UVec3;

/// Upper bound on cells per axis: 8 bits per coordinate in a `CellKey`.
pub const MAX_CELLS_PER_AXIS: u32 = 256;

/// Grid cell identifier: `x | y << 8 | z << 16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(pub u32);

impl CellKey {
    /// Pack cell coordinates. Each coordinate must be < 256.
    #[inline]
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        debug_assert!(x < MAX_CELLS_PER_AXIS && y < MAX_CELLS_PER_AXIS && z < MAX_CELLS_PER_AXIS);
        Self(x | (y << 8) | (z << 16))
    }

    #[inline]
    pub fn x(self) -> u32 {
        self.0 & 0xFF
    }

    #[inline]
    pub fn y(self) -> u32 {
        (self.0 >> 8) & 0xFF
    }

    #[inline]
    pub fn z(self) -> u32 {
        (self.0 >> 16) & 0xFF
    }

    #[inline]
    pub fn coords(self) -> UVec3 {
        UVec3::new(self.x(), self.y(), self.z())
    }
}

/// Inclusive box of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: UVec3,
    pub max: UVec3,
}

impl CellRange {
    #[inline]
    pub fn contains(&self, cell: CellKey) -> bool {
        let c = cell.coords();
        c.cmpge(self.min).all() && c.cmple(self.max).all()
    }

    /// True if the two ranges share at least one cell.
    #[inline]
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Number of cells covered.
    #[inline]
    pub fn cell_count(&self) -> usize {
        let size = self.max - self.min + UVec3::ONE;
        size.x as usize * size.y as usize * size.z as usize
    }

    /// All cells in x-fastest order.
    pub fn iter(&self) -> impl Iterator<Item = CellKey> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y).flat_map(move |y| {
                (min.x..=max.x).map(move |x| CellKey::new(x, y, z))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let key = CellKey::new(1, 2, 3);
        assert_eq!(key.0, 1 | (2 << 8) | (3 << 16));
        assert_eq!(key.coords(), UVec3::new(1, 2, 3));

        let corner = CellKey::new(255, 255, 255);
        assert_eq!(corner.coords(), UVec3::splat(255));
    }

    #[test]
    fn test_range_iter_and_count() {
        let range = CellRange { min: UVec3::new(1, 0, 2), max: UVec3::new(2, 1, 2) };
        let cells: Vec<CellKey> = range.iter().collect();

        assert_eq!(range.cell_count(), 4);
        assert_eq!(cells, vec![
            CellKey::new(1, 0, 2),
            CellKey::new(2, 0, 2),
            CellKey::new(1, 1, 2),
            CellKey::new(2, 1, 2),
        ]);
        assert!(cells.iter().all(|c| range.contains(*c)));
        assert!(!range.contains(CellKey::new(0, 0, 2)));
    }

    #[test]
    fn test_range_overlap() {
        let a = CellRange { min: UVec3::ZERO, max: UVec3::splat(3) };
        let b = CellRange { min: UVec3::splat(3), max: UVec3::splat(5) };
        let c = CellRange { min: UVec3::new(4, 0, 0), max: UVec3::new(6, 3, 3) };

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
