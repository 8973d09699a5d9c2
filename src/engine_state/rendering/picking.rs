//! # Picking Codec
//!
//! Maps a voxel face to a colour-like key and back. The encoder writes
//! `((z * CHUNK_X + x) / 255, y / 255, face / 255)` into every vertex of a face
//! and the picking pass writes `chunk_id / 255` into the fourth channel, so a
//! pixel read back from an 8-bit RGBA target carries the whole address:
//!
//! | channel | content             |
//! |---------|---------------------|
//! | r       | `z * CHUNK_X + x`   |
//! | g       | `y`                 |
//! | b       | face index (0..6)   |
//! | a       | chunk id            |
//!
//! The round trip is exact only when the picking geometry is rasterized with
//! point sampling; any filtering would blend neighbouring keys.

use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    chunk::{CHUNK_X, CHUNK_Z},
};

/// Value the picking target is cleared to before each query. Its face channel is
/// out of range, so an uncovered pixel decodes to nothing.
pub const PICKING_CLEAR_COLOUR: [u8; 4] = [255, 255, 255, 255];

/// A voxel face recovered from a picking pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PickedVoxel {
    /// Chunk-relative x
    pub x: i32,
    /// Chunk-relative y
    pub y: i32,
    /// Chunk-relative z
    pub z: i32,
    /// The face under the cursor
    pub face: BlockSide,
    /// Id of the chunk the voxel belongs to
    pub chunk_id: usize,
}

/// Encodes a voxel face as the per-vertex picking key.
#[inline]
pub fn encode_picking_key(x: i32, y: i32, z: i32, face: BlockSide) -> [f32; 3] {
    [
        (z * CHUNK_X as i32 + x) as f32 / 255.0,
        y as f32 / 255.0,
        face.index() as f32 / 255.0,
    ]
}

/// The per-draw value stamped into the fourth channel during the picking pass.
#[inline]
pub fn chunk_id_uniform(chunk_id: usize) -> f32 {
    chunk_id as f32 / 255.0
}

/// Quantizes a key and chunk uniform the way an 8-bit unorm target stores them.
pub fn key_to_colour(key: [f32; 3], chunk_uniform: f32) -> [u8; 4] {
    let quantize = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        quantize(key[0]),
        quantize(key[1]),
        quantize(key[2]),
        quantize(chunk_uniform),
    ]
}

/// Decodes a pixel read back from the picking target.
///
/// # Returns
/// `None` when the face channel is above 5, which is how the clear colour
/// signals that no voxel was under the cursor.
pub fn decode_picked_colour(r: u8, g: u8, b: u8, a: u8) -> Option<PickedVoxel> {
    let face = BlockSide::from_index(b as usize)?;
    let column = r as usize;
    let z = column / CHUNK_X;
    if z >= CHUNK_Z {
        return None;
    }
    Some(PickedVoxel {
        x: (column % CHUNK_X) as i32,
        y: g as i32,
        z: z as i32,
        face,
        chunk_id: a as usize,
    })
}
