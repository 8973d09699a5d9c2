//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the block-to-palette
//! lookup used by the vertex encoder.

use block_type::BlockType;
use phf::phf_map;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data.
pub type BlockTypeSize = u8;

/// Maps each solid block type (by its stored byte) to its layer in the palette
/// texture array. `AIR` has no entry because it never produces geometry.
pub static BLOCK_TYPE_TO_PALETTE_INDEX: phf::Map<u8, u32> = phf_map! {
    1u8 => 0, // GRASS
    2u8 => 2, // DIRT
    3u8 => 1, // STONE
    4u8 => 3, // CRUST
};

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the cell one byte wide, so a chunk's voxel
/// array is exactly `X * Y * Z` bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An empty cell.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
    };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// The rich type of this block.
    #[inline]
    pub fn block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type)
    }

    /// Gets the palette layer for a block type.
    ///
    /// # Panics
    /// Panics for `AIR` or any type missing from `BLOCK_TYPE_TO_PALETTE_INDEX`;
    /// the encoder only asks for solid blocks, so a miss means the table is stale.
    pub fn get_palette_index(block_type: BlockType) -> u32 {
        match BLOCK_TYPE_TO_PALETTE_INDEX.get(&(block_type as BlockTypeSize)) {
            Some(index) => *index,
            None => panic!("no palette layer for block type {block_type:?}"),
        }
    }
}
