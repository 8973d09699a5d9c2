//! Face visibility and vertex attribute encoding.
//!
//! Converts a chunk's voxels into the vertex streams the renderer draws. Every
//! non-air voxel in the requested y-range is tested against its six neighbours; a
//! face is emitted when the neighbour is air or lies outside the chunk. Neighbouring
//! chunks are never consulted, so chunk edges always render.
//!
//! # Per-face output
//! Six vertices (two triangles, no index buffer) into each of:
//! - position: the face template offset by the voxel coordinates times `CELL_SIZE`
//! - palette index: the texture layer for the block type
//! - picking key: see [`super::picking`]
//! - texture coordinate: the shared unit-quad template
//! - normal: the face normal, with `w = 1.0` when the face is sunlit
//!
//! A face is sunlit when the neighbour cell it looks into sits above the surface
//! of that cell's column. This reads only the chunk's own height cache.
//!
//! # Performance Considerations
//! - Streams are reserved for the worst case (36 vertices per non-air voxel) and
//!   shrunk once at the end, so no counting pass is needed
//! - Neighbour and sun tests are O(1) per face

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Block},
    chunk::Chunk,
};

use super::picking::encode_picking_key;
use super::vertex::{ChunkVertexData, FaceAttributes, VOXEL_CUBE_VERTS};

mod face_templates;

pub use face_templates::{face_positions, CELL_SIZE, FACE_TEMPLATES, FACE_TEXCOORDS};

/// Encodes the visible faces of `chunk` in the slab `[from_y, to_y)`.
///
/// Faces are emitted in storage order of their voxel (x fastest, then z, then y)
/// and face-index order within a voxel, so an unchanged chunk always encodes to
/// identical streams.
///
/// # Panics
/// Panics on an invalid slab, on a block type without a palette layer, or if the
/// streams end up with different lengths.
pub fn generate_chunk_vertex_data(chunk: &Chunk, from_y: usize, to_y: usize) -> ChunkVertexData {
    let worst_case = chunk.non_air_count() as usize * VOXEL_CUBE_VERTS;
    let mut vertex_data = ChunkVertexData::with_capacity(worst_case);

    for (position, block_type) in chunk.solid_blocks(from_y, to_y) {
        let (x, y, z) = (position.x, position.y, position.z);
        let palette_index = Block::get_palette_index(block_type);

        for side in BlockSide::all() {
            let (nx, ny, nz) = side.neighbour(x, y, z);
            let covered = chunk
                .get_block(nx, ny, nz)
                .is_some_and(|neighbour| neighbour.is_solid());
            if covered {
                continue;
            }

            let normal = side.normal();
            let sun_factor = if chunk.is_above_surface(nx, ny, nz) {
                1.0
            } else {
                0.0
            };

            vertex_data.push_face(FaceAttributes {
                positions: &face_positions(side, x, y, z),
                texcoords: &FACE_TEXCOORDS,
                palette_index,
                picking: encode_picking_key(x, y, z, side),
                normal: [normal.x, normal.y, normal.z, sun_factor],
            });
        }
    }

    vertex_data.shrink_to_fit();
    vertex_data.vertex_count();
    vertex_data
}
