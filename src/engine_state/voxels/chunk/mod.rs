//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense `CHUNK_X x CHUNK_Y x CHUNK_Z`
//! array of one-byte blocks, plus two derived caches that are kept in step with
//! every write:
//! - `heightmap`: the y of the highest non-air block in each (x, z) column, or
//!   `None` for an all-air column
//! - `non_air_count`: the exact number of non-air blocks
//!
//! ## Storage Layout
//!
//! Blocks are stored row-major with x fastest, then z, then y:
//! `index = CHUNK_X * CHUNK_Z * y + CHUNK_X * z + x`. A horizontal slice of the
//! chunk is therefore one contiguous run, which is what the encoder walks when it
//! regenerates a y-range.
//!
//! ### Performance Characteristics
//! - **Block Lookup**: O(1)
//! - **Block Write**: O(1), except when clearing the top block of a column, which
//!   scans that column downward to find the new top
//! - **Memory Usage**: one byte per block plus one byte per column

use cgmath::Point3;

use super::block::block_type::BlockType;
use super::block::Block;

pub mod chunk_creation;
pub mod chunk_iteration;

/// The width of a chunk in blocks, along x.
pub const CHUNK_X: usize = 16;
/// The height of a chunk in blocks, along y.
pub const CHUNK_Y: usize = 256;
/// The depth of a chunk in blocks, along z.
pub const CHUNK_Z: usize = 16;
/// The number of columns in a chunk (CHUNK_X * CHUNK_Z).
pub const CHUNK_PLANE_SIZE: usize = CHUNK_X * CHUNK_Z;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_Y;

// Column heights are cached as bytes and the picking key packs (x, z) and y into
// 8-bit channels.
const _: () = assert!(CHUNK_Y <= 256 && CHUNK_PLANE_SIZE <= 256);

/// A fixed-size block of voxels, the unit of storage, generation and redraw.
///
/// The chunk does not know where it sits in the world; its slot in the chunk set
/// owns that, along with any render state.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Every block in the chunk, in row-major (x, z, y) order.
    blocks: Vec<Block>,

    /// Highest non-air y per column, indexed by `CHUNK_X * z + x`.
    heightmap: Vec<Option<u8>>,

    /// Number of entries in `blocks` that are not air.
    non_air_count: u32,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty() -> Self {
        Chunk {
            blocks: vec![Block::AIR; CHUNK_SIZE],
            heightmap: vec![None; CHUNK_PLANE_SIZE],
            non_air_count: 0,
        }
    }

    /// Creates a new chunk with every block set to `block_type`.
    pub fn solid(block_type: BlockType) -> Self {
        let mut chunk = Self::empty();
        if block_type.is_solid() {
            chunk.blocks.fill(Block::new(block_type));
            chunk.heightmap.fill(Some((CHUNK_Y - 1) as u8));
            chunk.non_air_count = CHUNK_SIZE as u32;
        }
        chunk
    }

    /// Returns the flat index of a block, or `None` if any coordinate is out of range.
    #[inline]
    fn index_of(x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= CHUNK_X || y >= CHUNK_Y || z >= CHUNK_Z {
            return None;
        }
        Some(CHUNK_PLANE_SIZE * y + CHUNK_X * z + x)
    }

    /// Returns whether (x, y, z) lies inside the chunk.
    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        Self::index_of(x, y, z).is_some()
    }

    /// Gets the type of the block at the given chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates lie outside the chunk.
    #[inline]
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        Self::index_of(x, y, z).map(|index| self.blocks[index].block_type())
    }

    /// Gets the block at a point, see [`Chunk::get_block`].
    pub fn get_block_at(&self, position: Point3<i32>) -> Option<BlockType> {
        self.get_block(position.x, position.y, position.z)
    }

    /// Writes a block and repairs the height cache and non-air count.
    ///
    /// # Returns
    /// `false` without mutating anything if the coordinates are out of range or the
    /// block already has this type, `true` otherwise.
    ///
    /// # Panics
    /// Panics if clearing a block would take the non-air count below zero.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        let Some(index) = Self::index_of(x, y, z) else {
            return false;
        };

        let previous = self.blocks[index].block_type();
        if previous == block_type {
            return false;
        }

        match (previous.is_solid(), block_type.is_solid()) {
            (false, true) => self.non_air_count += 1,
            (true, false) => {
                assert!(
                    self.non_air_count > 0,
                    "non-air count underflow clearing ({x}, {y}, {z})"
                );
                self.non_air_count -= 1;
            }
            _ => {}
        }
        self.blocks[index] = Block::new(block_type);

        let column = CHUNK_X * z as usize + x as usize;
        let y_byte = y as u8;
        match self.heightmap[column] {
            cached if block_type.is_solid() && cached.map_or(true, |top| y_byte > top) => {
                self.heightmap[column] = Some(y_byte);
            }
            Some(top) if !block_type.is_solid() && top == y_byte => {
                self.heightmap[column] = self.scan_column_down(x, y, z);
            }
            _ => {}
        }

        true
    }

    /// Sets the block at a point, see [`Chunk::set_block`].
    pub fn set_block_at(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        self.set_block(position.x, position.y, position.z, block_type)
    }

    /// Finds the highest non-air block at or below `from_y` in a column.
    fn scan_column_down(&self, x: i32, from_y: i32, z: i32) -> Option<u8> {
        (0..=from_y)
            .rev()
            .find(|&y| {
                self.get_block(x, y, z)
                    .is_some_and(|block_type| block_type.is_solid())
            })
            .map(|y| y as u8)
    }

    /// The cached top of a column, `None` if the column is all air or (x, z) is
    /// outside the chunk.
    #[inline]
    pub fn column_height(&self, x: i32, z: i32) -> Option<u8> {
        if x < 0 || z < 0 || x as usize >= CHUNK_X || z as usize >= CHUNK_Z {
            return None;
        }
        self.heightmap[CHUNK_X * z as usize + x as usize]
    }

    /// Whether (x, y, z) sits above the surface of its column, which approximates
    /// being lit by an overhead sun. Anything outside the chunk counts as lit.
    pub fn is_above_surface(&self, x: i32, y: i32, z: i32) -> bool {
        if !Self::in_bounds(x, y, z) {
            return true;
        }
        match self.column_height(x, z) {
            Some(top) => y > top as i32,
            None => true,
        }
    }

    /// The exact number of non-air blocks.
    #[inline]
    pub fn non_air_count(&self) -> u32 {
        self.non_air_count
    }

    /// Releases the block storage. The chunk cannot be used afterwards.
    pub fn free(self) {
        drop(self);
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scanned_non_air_count(chunk: &Chunk) -> u32 {
        let mut count = 0;
        for y in 0..CHUNK_Y as i32 {
            for z in 0..CHUNK_Z as i32 {
                for x in 0..CHUNK_X as i32 {
                    if chunk.get_block(x, y, z).unwrap().is_solid() {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn scanned_column_height(chunk: &Chunk, x: i32, z: i32) -> Option<u8> {
        (0..CHUNK_Y as i32)
            .rev()
            .find(|&y| chunk.get_block(x, y, z).unwrap().is_solid())
            .map(|y| y as u8)
    }

    #[test]
    fn set_raise_and_lower_scenario() {
        let mut chunk = Chunk::empty();

        assert!(chunk.set_block(0, 0, 0, BlockType::STONE));
        assert_eq!(chunk.non_air_count(), 1);
        assert_eq!(chunk.column_height(0, 0), Some(0));

        assert!(chunk.set_block(0, 5, 0, BlockType::GRASS));
        assert_eq!(chunk.non_air_count(), 2);
        assert_eq!(chunk.column_height(0, 0), Some(5));

        assert!(chunk.set_block(0, 5, 0, BlockType::AIR));
        assert_eq!(chunk.non_air_count(), 1);
        assert_eq!(chunk.column_height(0, 0), Some(0));
    }

    #[test]
    fn clearing_last_block_resets_column_to_unset() {
        let mut chunk = Chunk::empty();
        chunk.set_block(3, 7, 4, BlockType::DIRT);
        assert!(chunk.set_block(3, 7, 4, BlockType::AIR));
        assert_eq!(chunk.column_height(3, 4), None);
        assert_eq!(chunk.non_air_count(), 0);
    }

    #[test]
    fn out_of_range_reads_and_writes_are_rejected() {
        let mut chunk = Chunk::empty();
        assert_eq!(chunk.get_block(-1, 0, 0), None);
        assert_eq!(chunk.get_block(0, CHUNK_Y as i32, 0), None);
        assert_eq!(chunk.get_block(0, 0, CHUNK_Z as i32), None);
        assert!(!chunk.set_block(CHUNK_X as i32, 0, 0, BlockType::STONE));
        assert!(!chunk.set_block(0, -1, 0, BlockType::STONE));
        assert_eq!(chunk.non_air_count(), 0);
    }

    #[test]
    fn writing_same_type_is_a_no_op() {
        let mut chunk = Chunk::empty();
        assert!(!chunk.set_block(1, 1, 1, BlockType::AIR));
        assert!(chunk.set_block(1, 1, 1, BlockType::STONE));
        assert!(!chunk.set_block(1, 1, 1, BlockType::STONE));
        assert_eq!(chunk.non_air_count(), 1);
    }

    #[test]
    fn swapping_solid_types_keeps_count_and_height() {
        let mut chunk = Chunk::empty();
        chunk.set_block(2, 9, 2, BlockType::STONE);
        assert!(chunk.set_block(2, 9, 2, BlockType::GRASS));
        assert_eq!(chunk.non_air_count(), 1);
        assert_eq!(chunk.column_height(2, 2), Some(9));
        assert_eq!(chunk.get_block(2, 9, 2), Some(BlockType::GRASS));
    }

    #[test]
    fn clearing_below_top_keeps_height() {
        let mut chunk = Chunk::empty();
        chunk.set_block(0, 2, 0, BlockType::STONE);
        chunk.set_block(0, 8, 0, BlockType::STONE);
        assert!(chunk.set_block(0, 2, 0, BlockType::AIR));
        assert_eq!(chunk.column_height(0, 0), Some(8));
    }

    #[test]
    fn solid_chunk_is_full() {
        let chunk = Chunk::solid(BlockType::STONE);
        assert_eq!(chunk.non_air_count(), CHUNK_SIZE as u32);
        assert_eq!(chunk.column_height(15, 15), Some(255));
        assert_eq!(scanned_non_air_count(&chunk), CHUNK_SIZE as u32);
    }

    #[test]
    fn sun_test_uses_column_height_and_treats_outside_as_lit() {
        let mut chunk = Chunk::empty();
        chunk.set_block(4, 10, 4, BlockType::STONE);
        assert!(chunk.is_above_surface(4, 11, 4));
        assert!(!chunk.is_above_surface(4, 10, 4));
        assert!(!chunk.is_above_surface(4, 3, 4));
        assert!(chunk.is_above_surface(5, 0, 4));
        assert!(chunk.is_above_surface(-1, 0, 4));
        assert!(chunk.is_above_surface(4, -1, 4));
    }

    fn edit_strategy() -> impl Strategy<Value = (i32, i32, i32, u8)> {
        (-1..=CHUNK_X as i32, 0..24i32, -1..=CHUNK_Z as i32, 0..5u8)
    }

    proptest! {
        #[test]
        fn caches_match_full_scan_after_any_edits(edits in prop::collection::vec(edit_strategy(), 1..200)) {
            let mut chunk = Chunk::empty();
            for (x, y, z, block_byte) in edits {
                let block_type = BlockType::get_block_type_from_int(block_byte);
                let changed = chunk.set_block(x, y, z, block_type);
                if changed {
                    prop_assert_eq!(chunk.get_block(x, y, z), Some(block_type));
                }
            }
            prop_assert_eq!(chunk.non_air_count(), scanned_non_air_count(&chunk));
            for z in 0..CHUNK_Z as i32 {
                for x in 0..CHUNK_X as i32 {
                    prop_assert_eq!(chunk.column_height(x, z), scanned_column_height(&chunk, x, z));
                }
            }
        }
    }
}
