//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from the
//! compact byte stored in each chunk cell.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block with its own palette layer.
/// The `FromPrimitive` derive allows conversion from the stored byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// An air block, which is non-solid and carries no geometry.
    AIR = 0,

    /// Surface layer placed at the top of every generated column.
    GRASS = 1,

    /// Placed directly beneath the grass layer.
    DIRT = 2,

    /// Fills the column between the dirt layer and the crust.
    STONE = 3,

    /// The floor layer at y = 0, indestructible by convention.
    CRUST = 4,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `BlockType`. Chunks
    /// only ever store bytes written from a `BlockType`, so this signals corruption.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        match btype_option {
            Some(block_type) => block_type,
            None => panic!("stored block byte {btype} is not a known block type"),
        }
    }

    /// Whether this block type produces geometry.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}
