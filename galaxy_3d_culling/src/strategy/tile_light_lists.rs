/// TileLightLists: per-tile light index lists in the packed layout the
/// shading pass reads.
///
/// Tiles are stored in row-major order, one fixed-size block each:
///
/// ```text
/// [count, index_0, index_1, ..., index_(max-1)]
/// ```
///
/// Only the first `count` indices of a block are meaningful. Indices refer
/// to the light slice given to the strategy.

use crate::error::Result;
use crate::engine_bail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLightLists {
    tiles_x: u32,
    tiles_y: u32,
    max_lights_per_tile: u32,
    words: Vec<u32>,
}

impl TileLightLists {
    /// Empty lists (every count 0).
    pub fn new(tiles_x: u32, tiles_y: u32, max_lights_per_tile: u32) -> Self {
        let len = Self::word_count(tiles_x, tiles_y, max_lights_per_tile);
        Self {
            tiles_x,
            tiles_y,
            max_lights_per_tile,
            words: vec![0; len],
        }
    }

    /// Wrap a packed buffer, typically read back from the GPU.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `words` does not hold exactly one block per tile
    /// or a block's count exceeds `max_lights_per_tile`.
    pub fn from_words(tiles_x: u32, tiles_y: u32, max_lights_per_tile: u32, words: Vec<u32>) -> Result<Self> {
        let expected = Self::word_count(tiles_x, tiles_y, max_lights_per_tile);
        if words.len() != expected {
            engine_bail!("galaxy3d::TileLightLists", InvalidArgument,
                "Packed buffer has {} words, expected {} ({}x{} tiles, {} lights per tile)",
                words.len(), expected, tiles_x, tiles_y, max_lights_per_tile);
        }

        let stride = max_lights_per_tile as usize + 1;
        if let Some((tile, count)) = words
            .iter()
            .step_by(stride)
            .enumerate()
            .find(|(_, count)| **count > max_lights_per_tile)
        {
            engine_bail!("galaxy3d::TileLightLists", InvalidArgument,
                "Tile {} has count {} (max {})", tile, count, max_lights_per_tile);
        }

        Ok(Self { tiles_x, tiles_y, max_lights_per_tile, words })
    }

    /// Size in u32 words of the packed buffer for a tile layout.
    pub fn word_count(tiles_x: u32, tiles_y: u32, max_lights_per_tile: u32) -> usize {
        tiles_x as usize * tiles_y as usize * (max_lights_per_tile as usize + 1)
    }

    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    pub fn max_lights_per_tile(&self) -> u32 {
        self.max_lights_per_tile
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// Words per tile block.
    #[inline]
    pub fn block_stride(&self) -> usize {
        self.max_lights_per_tile as usize + 1
    }

    /// Number of lights assigned to a tile, 0 for an out-of-range index.
    pub fn count(&self, tile_index: usize) -> u32 {
        self.words
            .get(tile_index * self.block_stride())
            .copied()
            .unwrap_or(0)
    }

    /// Light indices of a tile, empty for an out-of-range index.
    pub fn lights_for_tile(&self, tile_index: usize) -> &[u32] {
        if tile_index >= self.num_tiles() {
            return &[];
        }
        let start = tile_index * self.block_stride();
        let count = self.words[start] as usize;
        &self.words[start + 1..start + 1 + count]
    }

    /// Append a light to a tile. Returns false if the tile is full or the
    /// index is out of range.
    pub fn push(&mut self, tile_index: usize, light_index: u32) -> bool {
        if tile_index >= self.num_tiles() {
            return false;
        }
        let start = tile_index * self.block_stride();
        let count = self.words[start];
        if count >= self.max_lights_per_tile {
            return false;
        }
        self.words[start + 1 + count as usize] = light_index;
        self.words[start] = count + 1;
        true
    }

    /// Sum of all tile counts.
    pub fn total_assignments(&self) -> usize {
        self.words
            .iter()
            .step_by(self.block_stride())
            .map(|&count| count as usize)
            .sum()
    }

    /// The packed buffer, ready for upload.
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u32> {
        self.words
    }
}

#[cfg(test)]
#[path = "tile_light_lists_tests.rs"]
mod tests;
