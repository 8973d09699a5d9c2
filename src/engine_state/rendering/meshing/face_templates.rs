//! Fixed per-face vertex templates.
//!
//! Each template is the six corners (two counter-clockwise triangles) of one face
//! of a cube spanning `[-1, 1]` on every axis, centred on the voxel. The encoder
//! translates a template by the voxel coordinates times [`CELL_SIZE`].

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::super::vertex::{VOXEL_FACE_VERTS, VOXEL_VP_COMPS, VOXEL_VT_COMPS};

/// Edge length of a voxel in encoder units.
pub const CELL_SIZE: f32 = 2.0;

type FaceTemplate = [[f32; VOXEL_VP_COMPS]; VOXEL_FACE_VERTS];

/// Face corner positions, indexed by `BlockSide as usize`.
pub const FACE_TEMPLATES: [FaceTemplate; 6] = [
    // west
    [
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
    ],
    // east
    [
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
    ],
    // bottom
    [
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
    ],
    // top
    [
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
    ],
    // north
    [
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
        [-1.0, -1.0, -1.0],
    ],
    // south
    [
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
    ],
];

/// Texture coordinates shared by every face.
pub const FACE_TEXCOORDS: [[f32; VOXEL_VT_COMPS]; VOXEL_FACE_VERTS] = [
    [0.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
];

/// The template for `side`, translated to the voxel at (x, y, z).
pub fn face_positions(side: BlockSide, x: i32, y: i32, z: i32) -> FaceTemplate {
    let translation = [x as f32 * CELL_SIZE, y as f32 * CELL_SIZE, z as f32 * CELL_SIZE];
    let mut corners = FACE_TEMPLATES[side.index()];
    for corner in corners.iter_mut() {
        for (component, offset) in corner.iter_mut().zip(translation) {
            *component += offset;
        }
    }
    corners
}
