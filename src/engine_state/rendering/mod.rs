//! Rendering system for the voxel engine.
//!
//! This module turns chunks into vertex streams and schedules their draws, but
//! stops short of the GPU: buffer upload, shaders and the framebuffer live behind
//! the [`ChunkRenderer`] trait, which the world drives with one upload per
//! regenerated chunk and one draw call per visible chunk.
//!
//! # Architecture
//! - `meshing`: face visibility and attribute encoding
//! - `vertex`: the parallel attribute streams handed to the renderer
//! - `picking`: the colour key codec for mouse-over selection
//! - `draw_queue`: distance ordering, frustum culling and the draw budget
//! - `headless`: a recording renderer with no graphics device

use cgmath::{Matrix4, Vector3};

pub mod draw_queue;
pub mod headless;
pub mod meshing;
pub mod picking;
pub mod vertex;

// Re-export commonly used types
pub use headless::HeadlessRenderer;
pub use vertex::ChunkVertexData;

/// Everything the lit pass needs to draw one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkDrawCall {
    /// Id of the chunk whose uploaded mesh is drawn
    pub chunk_id: usize,
    /// Model transform from encoder units to world space
    pub model: Matrix4<f32>,
    /// Camera projection
    pub projection: Matrix4<f32>,
    /// Camera view
    pub view: Matrix4<f32>,
    /// Camera forward vector, used by the sun shading
    pub forward: Vector3<f32>,
    /// Number of vertices in the uploaded mesh
    pub vertex_count: usize,
}

/// Everything the picking pass needs to draw one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickingDrawCall {
    /// Id of the chunk whose uploaded mesh is drawn
    pub chunk_id: usize,
    /// `chunk_id / 255`, written to the fourth channel of every fragment
    pub chunk_id_uniform: f32,
    /// Model transform from encoder units to world space
    pub model: Matrix4<f32>,
    /// Off-centre projection covering the pixels under the cursor
    pub projection: Matrix4<f32>,
    /// Camera view
    pub view: Matrix4<f32>,
    /// Number of vertices in the uploaded mesh
    pub vertex_count: usize,
}

/// The render-resource side of the world.
///
/// The world owns voxel data and scheduling; an implementor owns whatever the
/// meshes become once uploaded. A chunk's mesh is always released before the
/// same chunk is uploaded again.
pub trait ChunkRenderer {
    /// Takes ownership of freshly encoded vertex data for `chunk_id`.
    fn upload_chunk_mesh(&mut self, chunk_id: usize, vertex_data: ChunkVertexData);

    /// Frees the mesh previously uploaded for `chunk_id`.
    fn release_chunk_mesh(&mut self, chunk_id: usize);

    /// Draws one chunk in the lit pass.
    fn draw_chunk(&mut self, call: &ChunkDrawCall);

    /// Draws one chunk into the picking target.
    fn draw_chunk_for_picking(&mut self, call: &PickingDrawCall);
}
