//! # Chunk Creation Module
//!
//! Fills a chunk from the shared world heightmap. Each column receives, from the
//! top down:
//! - `GRASS` at the column height
//! - `DIRT` one block below
//! - `STONE` from two below the height down to y = 1
//! - `CRUST` at y = 0
//!
//! The column height is the heightmap sample plus a fixed underground depth,
//! clamped to `[1, CHUNK_Y - 2]`. No randomness is involved, so the same heightmap
//! and offsets always produce the same chunk.

use crate::engine_state::voxels::{block::block_type::BlockType, heightmap::Heightmap};

use super::{Chunk, CHUNK_X, CHUNK_Y, CHUNK_Z};

/// Depth of solid ground below a heightmap sample of zero.
pub const DEFAULT_UNDERGROUND_HEIGHT: i32 = 16;

impl Chunk {
    /// Generates a chunk whose (0, 0) column reads heightmap sample
    /// (`x_offset`, `z_offset`).
    ///
    /// # Panics
    /// Panics if the chunk's footprint extends past the heightmap.
    pub fn generate(
        heightmap: &Heightmap,
        x_offset: usize,
        z_offset: usize,
        underground_height: i32,
    ) -> Self {
        let mut chunk = Chunk::empty();

        for z in 0..CHUNK_Z {
            for x in 0..CHUNK_X {
                let sample = heightmap.sample(x_offset + x, z_offset + z) as i32;
                let height = column_height(sample, underground_height);
                let (x, z) = (x as i32, z as i32);

                chunk.set_block(x, height, z, BlockType::GRASS);
                chunk.set_block(x, height - 1, z, BlockType::DIRT);
                for y in (1..=height - 2).rev() {
                    chunk.set_block(x, y, z, BlockType::STONE);
                }
                chunk.set_block(x, 0, z, BlockType::CRUST);
            }
        }

        chunk
    }
}

/// Converts a heightmap sample into the y of a column's grass block.
#[inline]
pub fn column_height(sample: i32, underground_height: i32) -> i32 {
    (sample + underground_height).clamp(1, CHUNK_Y as i32 - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_heightmap(side: usize, sample: u8) -> Heightmap {
        Heightmap::from_samples(side, vec![sample; side * side]).unwrap()
    }

    #[test]
    fn columns_are_layered() {
        let chunk = Chunk::generate(&flat_heightmap(16, 10), 0, 0, DEFAULT_UNDERGROUND_HEIGHT);
        let top = 10 + DEFAULT_UNDERGROUND_HEIGHT;

        assert_eq!(chunk.get_block(3, top, 3), Some(BlockType::GRASS));
        assert_eq!(chunk.get_block(3, top - 1, 3), Some(BlockType::DIRT));
        assert_eq!(chunk.get_block(3, top - 2, 3), Some(BlockType::STONE));
        assert_eq!(chunk.get_block(3, 1, 3), Some(BlockType::STONE));
        assert_eq!(chunk.get_block(3, 0, 3), Some(BlockType::CRUST));
        assert_eq!(chunk.get_block(3, top + 1, 3), Some(BlockType::AIR));

        assert_eq!(chunk.column_height(3, 3), Some(top as u8));
        assert_eq!(
            chunk.non_air_count(),
            ((top + 1) as usize * CHUNK_X * CHUNK_Z) as u32
        );
    }

    #[test]
    fn heights_are_clamped() {
        assert_eq!(column_height(255, DEFAULT_UNDERGROUND_HEIGHT), CHUNK_Y as i32 - 2);
        assert_eq!(column_height(0, 0), 1);
        assert_eq!(column_height(0, -20), 1);

        let chunk = Chunk::generate(&flat_heightmap(16, 255), 0, 0, DEFAULT_UNDERGROUND_HEIGHT);
        assert_eq!(chunk.column_height(0, 0), Some(254));
        assert_eq!(chunk.get_block(0, 255, 0), Some(BlockType::AIR));
    }

    #[test]
    fn minimum_height_column_has_grass_over_crust() {
        let chunk = Chunk::generate(&flat_heightmap(16, 0), 0, 0, 0);
        // grass at 1, the dirt slot at 0 is overwritten by crust
        assert_eq!(chunk.get_block(0, 1, 0), Some(BlockType::GRASS));
        assert_eq!(chunk.get_block(0, 0, 0), Some(BlockType::CRUST));
        assert_eq!(chunk.non_air_count(), (2 * CHUNK_X * CHUNK_Z) as u32);
    }

    #[test]
    fn offsets_select_the_chunk_footprint() {
        let side = 32;
        let samples = (0..side * side)
            .map(|i| if i % side >= 16 && i / side >= 16 { 50 } else { 5 })
            .collect();
        let heightmap = Heightmap::from_samples(side, samples).unwrap();

        let near = Chunk::generate(&heightmap, 0, 0, 0);
        let far = Chunk::generate(&heightmap, 16, 16, 0);
        assert_eq!(near.column_height(0, 0), Some(5));
        assert_eq!(far.column_height(0, 0), Some(50));
    }

    #[test]
    fn generation_is_idempotent() {
        let heightmap = Heightmap::from_samples(
            16,
            (0..256).map(|i| (i % 97) as u8).collect(),
        )
        .unwrap();
        let first = Chunk::generate(&heightmap, 0, 0, DEFAULT_UNDERGROUND_HEIGHT);
        let second = Chunk::generate(&heightmap, 0, 0, DEFAULT_UNDERGROUND_HEIGHT);
        for z in 0..CHUNK_Z as i32 {
            for x in 0..CHUNK_X as i32 {
                assert_eq!(first.column_height(x, z), second.column_height(x, z));
            }
        }
        assert_eq!(first.non_air_count(), second.non_air_count());
    }
}
