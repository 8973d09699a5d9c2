//! A [`ChunkRenderer`] that keeps uploaded meshes in memory and records every
//! draw call instead of talking to a graphics device.
//!
//! It stands in for the GPU in the binary and in tests, and it checks the
//! upload/release discipline: uploading over a live mesh, or releasing a mesh that
//! was never uploaded, panics.

use std::collections::BTreeMap;

use super::picking::{chunk_id_uniform, key_to_colour};
use super::{ChunkDrawCall, ChunkRenderer, ChunkVertexData, PickingDrawCall};

/// Records uploads and draw calls.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    meshes: BTreeMap<usize, ChunkVertexData>,
    uploads: usize,
    releases: usize,
    draw_calls: Vec<ChunkDrawCall>,
    picking_calls: Vec<PickingDrawCall>,
}

impl HeadlessRenderer {
    /// Creates a renderer with no meshes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the draw calls of the previous frame. Meshes are kept.
    pub fn begin_frame(&mut self) {
        self.draw_calls.clear();
        self.picking_calls.clear();
    }

    /// The live mesh for `chunk_id`.
    pub fn mesh(&self, chunk_id: usize) -> Option<&ChunkVertexData> {
        self.meshes.get(&chunk_id)
    }

    /// Number of live meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total uploads since creation.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total releases since creation.
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Lit-pass draw calls since the last `begin_frame`.
    pub fn draw_calls(&self) -> &[ChunkDrawCall] {
        &self.draw_calls
    }

    /// Picking-pass draw calls since the last `begin_frame`.
    pub fn picking_calls(&self) -> &[PickingDrawCall] {
        &self.picking_calls
    }

    /// The RGBA value the picking pass writes for vertex `vertex` of a chunk's
    /// mesh, as an 8-bit target would store it.
    ///
    /// # Returns
    /// `None` if the chunk has no mesh or the vertex does not exist.
    pub fn picking_colour(&self, chunk_id: usize, vertex: usize) -> Option<[u8; 4]> {
        let key = *self.meshes.get(&chunk_id)?.picking.get(vertex)?;
        Some(key_to_colour(key, chunk_id_uniform(chunk_id)))
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn upload_chunk_mesh(&mut self, chunk_id: usize, vertex_data: ChunkVertexData) {
        let bytes: usize = vertex_data.stream_bytes().iter().map(|s| s.len()).sum();
        log::debug!(
            "Uploading chunk {} mesh: {} vertices, {} bytes",
            chunk_id,
            vertex_data.vertex_count(),
            bytes
        );
        let previous = self.meshes.insert(chunk_id, vertex_data);
        assert!(
            previous.is_none(),
            "chunk {chunk_id} mesh uploaded without releasing the previous one"
        );
        self.uploads += 1;
    }

    fn release_chunk_mesh(&mut self, chunk_id: usize) {
        let released = self.meshes.remove(&chunk_id);
        assert!(
            released.is_some(),
            "chunk {chunk_id} mesh released but never uploaded"
        );
        self.releases += 1;
    }

    fn draw_chunk(&mut self, call: &ChunkDrawCall) {
        self.draw_calls.push(*call);
    }

    fn draw_chunk_for_picking(&mut self, call: &PickingDrawCall) {
        self.picking_calls.push(*call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::meshing::generate_chunk_vertex_data;
    use crate::engine_state::rendering::picking::decode_picked_colour;
    use crate::engine_state::voxels::{block::block_type::BlockType, chunk::Chunk};

    fn single_voxel_mesh() -> ChunkVertexData {
        let mut chunk = Chunk::empty();
        chunk.set_block(2, 30, 9, BlockType::STONE);
        generate_chunk_vertex_data(&chunk, 0, 256)
    }

    #[test]
    fn tracks_uploads_and_releases() {
        let mut renderer = HeadlessRenderer::new();
        renderer.upload_chunk_mesh(3, single_voxel_mesh());
        assert_eq!(renderer.mesh_count(), 1);
        assert_eq!(renderer.mesh(3).map(|mesh| mesh.vertex_count()), Some(36));

        renderer.release_chunk_mesh(3);
        renderer.upload_chunk_mesh(3, ChunkVertexData::default());
        assert_eq!(renderer.uploads(), 2);
        assert_eq!(renderer.releases(), 1);
    }

    #[test]
    #[should_panic(expected = "without releasing")]
    fn double_upload_panics() {
        let mut renderer = HeadlessRenderer::new();
        renderer.upload_chunk_mesh(0, ChunkVertexData::default());
        renderer.upload_chunk_mesh(0, ChunkVertexData::default());
    }

    #[test]
    #[should_panic(expected = "never uploaded")]
    fn releasing_unknown_mesh_panics() {
        HeadlessRenderer::new().release_chunk_mesh(7);
    }

    #[test]
    fn picking_colour_decodes_to_the_encoded_face() {
        let mut renderer = HeadlessRenderer::new();
        renderer.upload_chunk_mesh(42, single_voxel_mesh());

        // the fourth face block is the top face
        let [r, g, b, a] = renderer.picking_colour(42, 3 * 6 + 2).unwrap();
        let picked = decode_picked_colour(r, g, b, a).unwrap();
        assert_eq!((picked.x, picked.y, picked.z), (2, 30, 9));
        assert_eq!(picked.face.index(), 3);
        assert_eq!(picked.chunk_id, 42);

        assert_eq!(renderer.picking_colour(42, 36), None);
        assert_eq!(renderer.picking_colour(1, 0), None);
    }
}
