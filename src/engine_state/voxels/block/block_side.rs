//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block.
//!
//! The face order is shared by face culling, sun exposure, the picking key and
//! edit-on-face, so the neighbour offsets live in one table here rather than being
//! re-derived by each of them.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant's discriminant is the face index written into the picking key.
/// The order is: [WEST, EAST, BOTTOM, TOP, NORTH, SOUTH]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The west face (facing negative X)
    WEST = 0,

    /// The east face (facing positive X)
    EAST = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The north face (facing negative Z)
    NORTH = 4,

    /// The south face (facing positive Z)
    SOUTH = 5,
}

/// Neighbour offsets (dx, dy, dz), indexed by `BlockSide as usize`.
pub const SIDE_OFFSETS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

impl BlockSide {
    /// Returns an array containing all six block faces in face-index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::WEST,
            BlockSide::EAST,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::NORTH,
            BlockSide::SOUTH,
        ]
    }

    /// Looks up a face by its index, returning `None` outside `0..6`.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        Self::all().get(index).copied()
    }

    /// The index of this face, as stored in the picking key.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The integer step from a voxel to its neighbour across this face.
    #[inline]
    pub fn offset(self) -> Vector3<i32> {
        let [dx, dy, dz] = SIDE_OFFSETS[self.index()];
        Vector3::new(dx, dy, dz)
    }

    /// The outward unit normal of this face.
    #[inline]
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }

    /// Returns the coordinates of the neighbour across this face, which may lie
    /// outside the chunk.
    #[inline]
    pub fn neighbour(self, x: i32, y: i32, z: i32) -> (i32, i32, i32) {
        let [dx, dy, dz] = SIDE_OFFSETS[self.index()];
        (x + dx, y + dy, z + dz)
    }
}
