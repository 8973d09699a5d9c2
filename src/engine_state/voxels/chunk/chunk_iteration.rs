//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air blocks of a chunk within a
//! horizontal slab `[from_y, to_y)`.
//!
//! Blocks are visited in storage order (x fastest, then z, then y), which is also
//! the order the encoder emits faces in, so regenerating an unchanged chunk always
//! yields identical vertex streams.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_PLANE_SIZE, CHUNK_X, CHUNK_Y};

/// An iterator over all non-air blocks in a slab of a chunk.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next flat index to inspect
    current_offset: usize,
    /// One past the last flat index of the slab
    end_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator over the slab `[from_y, to_y)`.
    ///
    /// # Panics
    /// Panics if `from_y > to_y` or `to_y > CHUNK_Y`.
    pub fn new(chunk_ref: &'a Chunk, from_y: usize, to_y: usize) -> Self {
        assert!(
            from_y <= to_y && to_y <= CHUNK_Y,
            "invalid slab [{from_y}, {to_y})"
        );
        ChunkBlockIterator {
            chunk_ref,
            current_offset: from_y * CHUNK_PLANE_SIZE,
            end_offset: to_y * CHUNK_PLANE_SIZE,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_offset < self.end_offset {
            let offset = self.current_offset;
            self.current_offset += 1;

            let block_type = self.chunk_ref.blocks[offset].block_type();
            if !block_type.is_solid() {
                continue;
            }

            let y = offset / CHUNK_PLANE_SIZE;
            let in_plane = offset % CHUNK_PLANE_SIZE;
            let position = Point3::new(
                (in_plane % CHUNK_X) as i32,
                y as i32,
                (in_plane / CHUNK_X) as i32,
            );
            return Some((position, block_type));
        }

        None
    }
}

impl Chunk {
    /// Iterates the non-air blocks in `[from_y, to_y)`.
    pub fn solid_blocks(&self, from_y: usize, to_y: usize) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self, from_y, to_y)
    }
}
