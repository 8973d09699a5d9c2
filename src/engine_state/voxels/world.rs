//! # World Module
//!
//! This module provides the `World` struct, which owns every chunk of a fixed
//! square grid and everything derived from them that depends on the camera.
//!
//! ## Lifecycle
//!
//! A world starts out uninitialized. [`World::create`] generates one heightmap for
//! the whole grid, fills and encodes every chunk and uploads the meshes;
//! [`World::destroy`] releases them again. Every other operation needs a created
//! world. Creating twice, or destroying an uninitialized world, fails without
//! changing anything.
//!
//! ## Per-frame flow
//!
//! 1. Edits (`edit_block_on_face`, `set_block`, `remove_block`) mark the chunks
//!    they change as dirty
//! 2. `flush_dirty` re-encodes dirty chunks and swaps their meshes
//! 3. `sort_draw_queue` orders chunks by distance from the camera
//! 4. `draw` and `draw_for_picking` walk the queue
//!
//! ## Chunk ids
//!
//! A chunk's id is its index in the grid, `cz * chunks_wide + cx`. Ids are written
//! into an 8-bit picking channel, so a grid holds at most [`MAX_CHUNKS`] chunks.

use bitvec::prelude::BitVec;
use cgmath::{Matrix4, Point3, Vector3};
use log::{debug, info, warn};
use web_time::Instant;

use crate::config::EngineConfig;
use crate::engine_state::camera_state::Frustum;
use crate::engine_state::rendering::{
    draw_queue::DrawQueue,
    meshing::{generate_chunk_vertex_data, CELL_SIZE},
    picking::chunk_id_uniform,
    ChunkDrawCall, ChunkRenderer, ChunkVertexData, PickingDrawCall,
};
use crate::error::EngineError;

use super::block::{block_side::BlockSide, block_type::BlockType};
use super::chunk::{Chunk, CHUNK_X, CHUNK_Y, CHUNK_Z};
use super::heightmap::Heightmap;

/// The largest number of chunks a world can hold.
pub const MAX_CHUNKS: usize = 256;

/// A square grid of chunks and their render bookkeeping.
///
/// # Examples
///
/// ```
/// use voxel_world::{EngineConfig, HeadlessRenderer, World};
///
/// let mut renderer = HeadlessRenderer::new();
/// let mut world = World::new(EngineConfig::default());
/// world.create(7, 2, 2, &mut renderer).unwrap();
/// assert_eq!(world.chunk_count(), 4);
/// world.destroy(&mut renderer).unwrap();
/// ```
pub struct World {
    /// Generation, scale and draw settings
    config: EngineConfig,
    /// Every chunk, indexed by id
    chunks: Vec<Chunk>,
    /// Vertex count of each chunk's live mesh
    vertex_counts: Vec<usize>,
    /// Chunks edited since their mesh was last encoded
    dirty: BitVec,
    /// Grid width in chunks
    chunks_wide: usize,
    /// Grid depth in chunks
    chunks_deep: usize,
    /// Seed of the current heightmap
    seed: u32,
    /// Whether `create` has run without a matching `destroy`
    created: bool,
    /// The heightmap the chunks were generated from
    heightmap: Option<Heightmap>,
    /// Distance-ordered chunks for the draw passes
    draw_queue: DrawQueue,
    /// Number of chunks the last lit pass drew
    chunks_drawn: usize,
    /// When set, only `y < height` is encoded
    slice_view: Option<u32>,
}

impl World {
    /// Creates an uninitialized world that will use `config` once created.
    pub fn new(config: EngineConfig) -> Self {
        World {
            config,
            chunks: Vec::new(),
            vertex_counts: Vec::new(),
            dirty: BitVec::new(),
            chunks_wide: 0,
            chunks_deep: 0,
            seed: 0,
            created: false,
            heightmap: None,
            draw_queue: DrawQueue::new(),
            chunks_drawn: 0,
            slice_view: None,
        }
    }

    /// Generates a `width` x `depth` grid of chunks from a seeded heightmap and
    /// uploads every chunk's mesh.
    ///
    /// # Errors
    /// Fails without side effects if the world already exists, or if the grid is
    /// not square, empty, or larger than [`MAX_CHUNKS`].
    pub fn create(
        &mut self,
        seed: u32,
        width: u32,
        depth: u32,
        renderer: &mut impl ChunkRenderer,
    ) -> Result<(), EngineError> {
        self.validate_grid(width, depth)?;

        let start = Instant::now();
        let side = CHUNK_X * width as usize;
        let heightmap = Heightmap::generate(seed, side, &self.config.heightmap);
        debug!(
            "Generated {side}x{side} {:?} heightmap in {:?}",
            self.config.heightmap.algorithm,
            start.elapsed()
        );

        self.create_with_heightmap(seed, width, depth, heightmap, renderer)
    }

    /// Like [`World::create`], but fills the chunks from a supplied heightmap.
    ///
    /// # Errors
    /// As [`World::create`], and also if the heightmap is smaller than the grid.
    pub fn create_with_heightmap(
        &mut self,
        seed: u32,
        width: u32,
        depth: u32,
        heightmap: Heightmap,
        renderer: &mut impl ChunkRenderer,
    ) -> Result<(), EngineError> {
        self.validate_grid(width, depth)?;
        let required = CHUNK_X.max(CHUNK_Z) * width.max(depth) as usize;
        if heightmap.side() < required {
            return Err(EngineError::HeightmapTooSmall {
                side: heightmap.side(),
                required,
            });
        }

        let start = Instant::now();
        let chunks_wide = width as usize;
        let chunk_count = chunks_wide * depth as usize;
        let underground_height = self.config.world.underground_height;

        self.chunks = (0..chunk_count)
            .map(|chunk_id| {
                let (cx, cz) = (chunk_id % chunks_wide, chunk_id / chunks_wide);
                Chunk::generate(&heightmap, cx * CHUNK_X, cz * CHUNK_Z, underground_height)
            })
            .collect();
        self.chunks_wide = chunks_wide;
        self.chunks_deep = depth as usize;
        self.seed = seed;
        self.heightmap = Some(heightmap);
        self.dirty = BitVec::repeat(false, chunk_count);
        self.vertex_counts = vec![0; chunk_count];
        self.draw_queue.clear();
        self.chunks_drawn = 0;
        self.created = true;

        for chunk_id in 0..chunk_count {
            let vertex_data = self.encode_chunk(chunk_id);
            self.vertex_counts[chunk_id] = vertex_data.vertex_count();
            renderer.upload_chunk_mesh(chunk_id, vertex_data);
        }

        let total_vertices: usize = self.vertex_counts.iter().sum();
        info!(
            "Created {}x{} chunk world (seed {}): {} vertices in {:?}",
            width,
            depth,
            seed,
            total_vertices,
            start.elapsed()
        );
        Ok(())
    }

    fn validate_grid(&self, width: u32, depth: u32) -> Result<(), EngineError> {
        if self.created {
            warn!("Ignoring create on a world that already exists");
            return Err(EngineError::AlreadyCreated);
        }
        if width != depth {
            return Err(EngineError::NonSquareGrid(width, depth));
        }
        if width == 0 {
            return Err(EngineError::EmptyGrid);
        }
        let chunk_count = width as usize * depth as usize;
        if chunk_count > MAX_CHUNKS {
            return Err(EngineError::TooManyChunks(chunk_count, MAX_CHUNKS));
        }
        Ok(())
    }

    /// Releases every chunk mesh and frees the chunks.
    ///
    /// # Errors
    /// Fails without side effects if the world has not been created.
    pub fn destroy(&mut self, renderer: &mut impl ChunkRenderer) -> Result<(), EngineError> {
        if !self.created {
            warn!("Ignoring destroy on a world that was never created");
            return Err(EngineError::NotCreated);
        }

        for chunk_id in 0..self.chunks.len() {
            renderer.release_chunk_mesh(chunk_id);
        }
        for chunk in self.chunks.drain(..) {
            chunk.free();
        }

        self.vertex_counts.clear();
        self.dirty.clear();
        self.heightmap = None;
        self.draw_queue.clear();
        self.chunks_drawn = 0;
        self.chunks_wide = 0;
        self.chunks_deep = 0;
        self.created = false;

        info!("Destroyed world (seed {})", self.seed);
        Ok(())
    }

    fn ensure_created(&self) -> Result<(), EngineError> {
        if self.created {
            Ok(())
        } else {
            Err(EngineError::NotCreated)
        }
    }

    /// Whether the world has been created and not yet destroyed.
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The configuration the world was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed of the current (or last) heightmap.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of chunks in the grid, zero when uninitialized.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Grid size as (chunks wide, chunks deep).
    pub fn grid_size(&self) -> (usize, usize) {
        (self.chunks_wide, self.chunks_deep)
    }

    /// The heightmap the chunks were generated from.
    pub fn heightmap(&self) -> Option<&Heightmap> {
        self.heightmap.as_ref()
    }

    /// Read access to one chunk.
    pub fn chunk(&self, chunk_id: usize) -> Option<&Chunk> {
        self.chunks.get(chunk_id)
    }

    /// Grid coordinates of a chunk id.
    fn chunk_coords(&self, chunk_id: usize) -> (usize, usize) {
        (chunk_id % self.chunks_wide, chunk_id / self.chunks_wide)
    }

    /// Resolves chunk-relative (x, z), which may lie outside the chunk, to the
    /// chunk that actually holds it and coordinates local to that chunk.
    ///
    /// # Returns
    /// `None` if the position is outside the grid.
    pub fn locate(&self, chunk_id: usize, x: i32, z: i32) -> Option<(usize, i32, i32)> {
        if chunk_id >= self.chunks.len() {
            return None;
        }
        let (cx, cz) = self.chunk_coords(chunk_id);
        let target_cx = cx as i32 + x.div_euclid(CHUNK_X as i32);
        let target_cz = cz as i32 + z.div_euclid(CHUNK_Z as i32);
        if target_cx < 0
            || target_cz < 0
            || target_cx as usize >= self.chunks_wide
            || target_cz as usize >= self.chunks_deep
        {
            return None;
        }
        let target = target_cz as usize * self.chunks_wide + target_cx as usize;
        Some((
            target,
            x.rem_euclid(CHUNK_X as i32),
            z.rem_euclid(CHUNK_Z as i32),
        ))
    }

    /// Gets a block by chunk id and chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the world is uninitialized or the chunk or coordinates are out of
    /// range.
    pub fn get_block(&self, chunk_id: usize, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.chunks.get(chunk_id)?.get_block(x, y, z)
    }

    /// Sets a block by chunk id and chunk-relative coordinates, marking the chunk
    /// dirty if it changed.
    ///
    /// # Returns
    /// Whether the block changed; out-of-range targets change nothing.
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn set_block(
        &mut self,
        chunk_id: usize,
        x: i32,
        y: i32,
        z: i32,
        block_type: BlockType,
    ) -> Result<bool, EngineError> {
        self.ensure_created()?;
        let Some(chunk) = self.chunks.get_mut(chunk_id) else {
            return Ok(false);
        };
        let changed = chunk.set_block(x, y, z, block_type);
        if changed {
            self.dirty.set(chunk_id, true);
        }
        Ok(changed)
    }

    /// Clears a block to air; the dig counterpart of [`World::edit_block_on_face`].
    pub fn remove_block(
        &mut self,
        chunk_id: usize,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<bool, EngineError> {
        self.set_block(chunk_id, x, y, z, BlockType::AIR)
    }

    /// Places `block_type` in the cell adjacent to a picked face.
    ///
    /// The cell may belong to a neighbouring chunk, in which case the edit is
    /// applied there. The chunk that changes is marked dirty.
    ///
    /// # Arguments
    /// * `chunk_id` - Chunk of the picked voxel
    /// * `x`, `y`, `z` - Chunk-relative coordinates of the picked voxel
    /// * `face` - The picked face of that voxel
    /// * `block_type` - Type to write into the adjacent cell
    ///
    /// # Returns
    /// Whether a block changed. Cells beyond the edge of the world or above the
    /// top of a chunk are left alone.
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn edit_block_on_face(
        &mut self,
        chunk_id: usize,
        x: i32,
        y: i32,
        z: i32,
        face: BlockSide,
        block_type: BlockType,
    ) -> Result<bool, EngineError> {
        self.ensure_created()?;
        let (nx, ny, nz) = face.neighbour(x, y, z);
        let Some((target, local_x, local_z)) = self.locate(chunk_id, nx, nz) else {
            debug!("Edit on face {face:?} of ({x}, {y}, {z}) in chunk {chunk_id} leaves the world");
            return Ok(false);
        };
        self.set_block(target, local_x, ny, local_z, block_type)
    }

    /// Whether a chunk has changed since its mesh was last encoded.
    pub fn is_dirty(&self, chunk_id: usize) -> bool {
        self.dirty.get(chunk_id).is_some_and(|bit| *bit)
    }

    /// Number of dirty chunks.
    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }

    fn encode_chunk(&self, chunk_id: usize) -> ChunkVertexData {
        let to_y = self
            .slice_view
            .map_or(CHUNK_Y, |height| (height as usize).min(CHUNK_Y));
        generate_chunk_vertex_data(&self.chunks[chunk_id], 0, to_y)
    }

    /// Re-encodes every dirty chunk, replaces its mesh and clears its flag.
    ///
    /// # Returns
    /// The number of chunks regenerated.
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn flush_dirty(&mut self, renderer: &mut impl ChunkRenderer) -> Result<usize, EngineError> {
        self.ensure_created()?;

        let dirty: Vec<usize> = self.dirty.iter_ones().collect();
        for &chunk_id in &dirty {
            let vertex_data = self.encode_chunk(chunk_id);
            renderer.release_chunk_mesh(chunk_id);
            self.vertex_counts[chunk_id] = vertex_data.vertex_count();
            renderer.upload_chunk_mesh(chunk_id, vertex_data);
            self.dirty.set(chunk_id, false);
        }

        if !dirty.is_empty() {
            info!("Regenerated {} dirty chunk meshes", dirty.len());
        }
        Ok(dirty.len())
    }

    /// Switches slice view on (`Some(height)`: only `y < height` is encoded) or
    /// off (`None`). Every chunk is marked dirty, so the change shows after the
    /// next [`World::flush_dirty`].
    pub fn set_slice_view(&mut self, slice_view: Option<u32>) {
        if self.slice_view == slice_view {
            return;
        }
        self.slice_view = slice_view;
        self.dirty.fill(true);
        debug!("Slice view set to {slice_view:?}");
    }

    /// The current slice height, if slice view is on.
    pub fn slice_view(&self) -> Option<u32> {
        self.slice_view
    }

    /// Vertex count of a chunk's live mesh.
    pub fn vertex_count(&self, chunk_id: usize) -> Option<usize> {
        self.vertex_counts.get(chunk_id).copied()
    }

    /// Model transform of a chunk: scales encoder units to world units and moves
    /// the chunk to its place in the grid.
    pub fn chunk_transform(&self, chunk_id: usize) -> Option<Matrix4<f32>> {
        if chunk_id >= self.chunks.len() {
            return None;
        }
        let scale = self.config.world.voxel_scale;
        let (cx, cz) = self.chunk_coords(chunk_id);
        let translation = Vector3::new(
            (cx * CHUNK_X) as f32 * scale,
            0.0,
            (cz * CHUNK_Z) as f32 * scale,
        );
        Some(Matrix4::from_translation(translation) * Matrix4::from_scale(scale / CELL_SIZE))
    }

    /// Orders chunks by planar distance from `camera_position`.
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn sort_draw_queue(&mut self, camera_position: Point3<f32>) -> Result<(), EngineError> {
        self.ensure_created()?;
        self.draw_queue.sort(
            camera_position,
            self.chunks_wide,
            self.chunks.len(),
            self.config.world.voxel_scale,
        );
        Ok(())
    }

    /// The draw queue as of the last sort.
    pub fn draw_queue(&self) -> &DrawQueue {
        &self.draw_queue
    }

    fn max_visible_distance(&self) -> f32 {
        self.config.draw.max_visible_distance_chunks as f32
            * CHUNK_X as f32
            * self.config.world.voxel_scale
    }

    /// Issues lit draw calls for the visible chunks, nearest first.
    ///
    /// # Returns
    /// The number of chunks drawn, also available from [`World::chunks_drawn`].
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn draw(
        &mut self,
        renderer: &mut impl ChunkRenderer,
        camera_forward: Vector3<f32>,
        projection: Matrix4<f32>,
        view: Matrix4<f32>,
    ) -> Result<usize, EngineError> {
        self.ensure_created()?;
        if self.dirty.any() {
            warn!(
                "Drawing with {} dirty chunks; their meshes are stale until flushed",
                self.dirty.count_ones()
            );
        }

        let frustum = Frustum::new(projection, view);
        let mut drawn = 0;
        for item in self.draw_queue.visible(
            &frustum,
            self.max_visible_distance(),
            self.config.draw.max_drawn_chunks,
        ) {
            let Some(model) = self.chunk_transform(item.chunk_id) else {
                continue;
            };
            renderer.draw_chunk(&ChunkDrawCall {
                chunk_id: item.chunk_id,
                model,
                projection,
                view,
                forward: camera_forward,
                vertex_count: self.vertex_counts[item.chunk_id],
            });
            drawn += 1;
        }

        self.chunks_drawn = drawn;
        Ok(drawn)
    }

    /// Issues picking-pass draw calls, stamping each chunk with its id.
    ///
    /// Uses the same ordering, distance limit and budget as [`World::draw`], with
    /// the frustum of the off-centre projection.
    ///
    /// # Returns
    /// The number of chunks drawn into the picking target.
    ///
    /// # Errors
    /// Fails if the world has not been created.
    pub fn draw_for_picking(
        &self,
        renderer: &mut impl ChunkRenderer,
        offcentre_projection: Matrix4<f32>,
        view: Matrix4<f32>,
    ) -> Result<usize, EngineError> {
        self.ensure_created()?;

        let frustum = Frustum::new(offcentre_projection, view);
        let mut drawn = 0;
        for item in self.draw_queue.visible(
            &frustum,
            self.max_visible_distance(),
            self.config.draw.max_drawn_chunks,
        ) {
            let Some(model) = self.chunk_transform(item.chunk_id) else {
                continue;
            };
            renderer.draw_chunk_for_picking(&PickingDrawCall {
                chunk_id: item.chunk_id,
                chunk_id_uniform: chunk_id_uniform(item.chunk_id),
                model,
                projection: offcentre_projection,
                view,
                vertex_count: self.vertex_counts[item.chunk_id],
            });
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Number of chunks drawn by the last [`World::draw`].
    pub fn chunks_drawn(&self) -> usize {
        self.chunks_drawn
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::camera_state::Projection;
    use crate::engine_state::rendering::HeadlessRenderer;
    use approx::assert_relative_eq;
    use cgmath::{Deg, Transform};

    fn flat_world(width: u32, sample: u8) -> (World, HeadlessRenderer) {
        let mut config = EngineConfig::default();
        config.world.underground_height = 0;
        let mut world = World::new(config);
        let mut renderer = HeadlessRenderer::new();
        let side = CHUNK_X * width as usize;
        let heightmap = Heightmap::from_samples(side, vec![sample; side * side]).unwrap();
        world
            .create_with_heightmap(1, width, width, heightmap, &mut renderer)
            .unwrap();
        (world, renderer)
    }

    fn overhead_view(world: &World) -> (Matrix4<f32>, Matrix4<f32>) {
        let (wide, deep) = world.grid_size();
        let scale = world.config().world.voxel_scale;
        let centre_x = wide as f32 * CHUNK_X as f32 * scale * 0.5;
        let centre_z = deep as f32 * CHUNK_Z as f32 * scale * 0.5;
        let projection = Projection::new(100, 100, Deg(120.0), 0.1, 1000.0);
        let view = Matrix4::look_to_rh(
            Point3::new(centre_x, 150.0, centre_z),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::unit_z(),
        );
        (projection.calc_matrix(), view)
    }

    #[test]
    fn lifecycle_gates_operations() {
        let mut world = World::default();
        let mut renderer = HeadlessRenderer::new();

        assert!(matches!(world.destroy(&mut renderer), Err(EngineError::NotCreated)));
        assert!(matches!(
            world.edit_block_on_face(0, 0, 0, 0, BlockSide::TOP, BlockType::STONE),
            Err(EngineError::NotCreated)
        ));
        assert!(matches!(world.flush_dirty(&mut renderer), Err(EngineError::NotCreated)));
        assert_eq!(world.get_block(0, 0, 0, 0), None);

        world.create(3, 2, 2, &mut renderer).unwrap();
        assert!(world.is_created());
        assert_eq!(renderer.mesh_count(), 4);
        assert!(matches!(
            world.create(3, 2, 2, &mut renderer),
            Err(EngineError::AlreadyCreated)
        ));
        assert_eq!(renderer.uploads(), 4);

        world.destroy(&mut renderer).unwrap();
        assert!(!world.is_created());
        assert_eq!(world.chunk_count(), 0);
        assert_eq!(renderer.mesh_count(), 0);

        world.create(4, 1, 1, &mut renderer).unwrap();
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn rejects_bad_grids() {
        let mut world = World::default();
        let mut renderer = HeadlessRenderer::new();
        assert!(matches!(
            world.create(0, 2, 3, &mut renderer),
            Err(EngineError::NonSquareGrid(2, 3))
        ));
        assert!(matches!(world.create(0, 0, 0, &mut renderer), Err(EngineError::EmptyGrid)));
        assert!(matches!(
            world.create(0, 17, 17, &mut renderer),
            Err(EngineError::TooManyChunks(289, MAX_CHUNKS))
        ));
        let small = Heightmap::from_samples(16, vec![0; 256]).unwrap();
        assert!(matches!(
            world.create_with_heightmap(0, 2, 2, small, &mut renderer),
            Err(EngineError::HeightmapTooSmall { side: 16, required: 32 })
        ));
        assert!(!world.is_created());
        assert_eq!(renderer.uploads(), 0);
    }

    #[test]
    fn chunks_follow_the_heightmap() {
        let (world, renderer) = flat_world(2, 20);
        for chunk_id in 0..4 {
            assert_eq!(world.get_block(chunk_id, 3, 20, 3), Some(BlockType::GRASS));
            assert_eq!(world.get_block(chunk_id, 3, 21, 3), Some(BlockType::AIR));
            let vertices = renderer.mesh(chunk_id).map(|mesh| mesh.vertex_count());
            assert_eq!(vertices, world.vertex_count(chunk_id));
        }
    }

    #[test]
    fn locate_wraps_into_neighbouring_chunks() {
        let (world, _) = flat_world(3, 10);
        // chunk 4 is the centre of the 3x3 grid
        assert_eq!(world.locate(4, 5, 5), Some((4, 5, 5)));
        assert_eq!(world.locate(4, -1, 5), Some((3, 15, 5)));
        assert_eq!(world.locate(4, 16, 5), Some((5, 0, 5)));
        assert_eq!(world.locate(4, 5, -1), Some((1, 5, 15)));
        assert_eq!(world.locate(4, 5, 16), Some((7, 5, 0)));
        assert_eq!(world.locate(0, -1, 0), None);
        assert_eq!(world.locate(8, 16, 0), None);
        assert_eq!(world.locate(9, 0, 0), None);
    }

    #[test]
    fn edit_on_face_crosses_chunk_boundary() {
        let (mut world, _) = flat_world(2, 10);

        // east face of the easternmost grass column in chunk 0
        let changed = world
            .edit_block_on_face(0, 15, 10, 4, BlockSide::EAST, BlockType::GRASS)
            .unwrap();
        assert!(!changed, "the neighbouring cell is already grass");

        let changed = world
            .edit_block_on_face(0, 15, 10, 4, BlockSide::TOP, BlockType::STONE)
            .unwrap();
        assert!(changed);
        assert_eq!(world.get_block(0, 15, 11, 4), Some(BlockType::STONE));
        assert!(world.is_dirty(0));

        let changed = world
            .edit_block_on_face(0, 15, 11, 4, BlockSide::EAST, BlockType::DIRT)
            .unwrap();
        assert!(changed);
        assert_eq!(world.get_block(1, 0, 11, 4), Some(BlockType::DIRT));
        assert!(world.is_dirty(1));
        assert_eq!(world.dirty_count(), 2);
    }

    #[test]
    fn edits_off_the_world_are_ignored() {
        let (mut world, _) = flat_world(2, 10);
        assert!(!world
            .edit_block_on_face(0, 0, 11, 0, BlockSide::WEST, BlockType::STONE)
            .unwrap());
        assert!(!world
            .edit_block_on_face(0, 0, 255, 0, BlockSide::TOP, BlockType::STONE)
            .unwrap());
        assert!(!world.set_block(99, 0, 0, 0, BlockType::STONE).unwrap());
        assert_eq!(world.dirty_count(), 0);
    }

    #[test]
    fn flush_regenerates_dirty_meshes() {
        let (mut world, mut renderer) = flat_world(2, 10);
        let before = world.vertex_count(3).unwrap();

        assert!(world.set_block(3, 8, 11, 8, BlockType::STONE).unwrap());
        assert!(world.remove_block(2, 0, 10, 0).unwrap());
        assert_eq!(world.flush_dirty(&mut renderer).unwrap(), 2);
        assert_eq!(world.dirty_count(), 0);
        assert_eq!(renderer.releases(), 2);

        // a block on a flat surface adds its four sides and top, hides one top
        assert_eq!(world.vertex_count(3), Some(before + 4 * 6));
        assert_eq!(renderer.mesh(3).map(|mesh| mesh.vertex_count()), Some(before + 4 * 6));
        assert_eq!(world.flush_dirty(&mut renderer).unwrap(), 0);
    }

    #[test]
    fn slice_view_limits_encoded_height() {
        let (mut world, mut renderer) = flat_world(1, 30);
        world.set_slice_view(Some(10));
        assert_eq!(world.dirty_count(), 1);
        world.flush_dirty(&mut renderer).unwrap();

        let mesh = renderer.mesh(0).unwrap();
        assert!(!mesh.is_empty());
        assert!(mesh.picking.iter().all(|key| key[1] < 10.0 / 255.0 + 1e-6));

        world.set_slice_view(None);
        world.flush_dirty(&mut renderer).unwrap();
        let mesh = renderer.mesh(0).unwrap();
        assert!(mesh.picking.iter().any(|key| key[1] == 30.0 / 255.0));
    }

    #[test]
    fn chunk_transform_places_chunk_in_grid() {
        let (world, _) = flat_world(2, 10);
        let model = world.chunk_transform(3).unwrap();
        // voxel (0, 0, 0) of chunk 3 sits at the chunk's grid corner
        let origin = model.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(origin.x, 3.2, epsilon = 1e-5);
        assert_relative_eq!(origin.z, 3.2, epsilon = 1e-5);
        // one voxel step of CELL_SIZE encoder units is one voxel_scale in world units
        let step = model.transform_point(Point3::new(CELL_SIZE, CELL_SIZE, 0.0));
        assert_relative_eq!(step.x - origin.x, 0.2, epsilon = 1e-5);
        assert_relative_eq!(step.y - origin.y, 0.2, epsilon = 1e-5);
        assert_eq!(world.chunk_transform(4), None);
    }

    #[test]
    fn draw_walks_sorted_queue_within_budget() {
        let (mut world, mut renderer) = flat_world(4, 10);
        let (projection, view) = overhead_view(&world);

        // nothing is queued before the first sort
        assert_eq!(world.draw(&mut renderer, Vector3::unit_z(), projection, view).unwrap(), 0);

        world.sort_draw_queue(Point3::new(0.0, 5.0, 0.0)).unwrap();
        let drawn = world.draw(&mut renderer, Vector3::unit_z(), projection, view).unwrap();
        assert_eq!(drawn, 16);
        assert_eq!(world.chunks_drawn(), 16);
        assert_eq!(renderer.draw_calls()[0].chunk_id, 0);
        assert_eq!(renderer.draw_calls()[15].chunk_id, 15);
        assert_eq!(
            renderer.draw_calls()[0].vertex_count,
            world.vertex_count(0).unwrap()
        );

        renderer.begin_frame();
        world.config.draw.max_drawn_chunks = 3;
        assert_eq!(world.draw(&mut renderer, Vector3::unit_z(), projection, view).unwrap(), 3);
        assert_eq!(world.chunks_drawn(), 3);
    }

    #[test]
    fn distance_limit_ends_the_walk() {
        let (mut world, mut renderer) = flat_world(4, 10);
        world.config.draw.max_visible_distance_chunks = 2;
        let (projection, view) = overhead_view(&world);

        // near the corner of chunk 0, two chunk widths reach only its neighbours
        world.sort_draw_queue(Point3::new(1.0, 5.0, 1.0)).unwrap();
        let drawn = world.draw(&mut renderer, Vector3::unit_z(), projection, view).unwrap();
        let ids: Vec<usize> = renderer.draw_calls().iter().map(|call| call.chunk_id).collect();
        assert_eq!(drawn, 4);
        assert_eq!(ids, vec![0, 1, 4, 5]);
    }

    #[test]
    fn picking_pass_stamps_chunk_ids() {
        let (mut world, mut renderer) = flat_world(2, 10);
        let (projection, view) = overhead_view(&world);
        world.sort_draw_queue(Point3::new(0.0, 5.0, 0.0)).unwrap();

        let drawn = world.draw_for_picking(&mut renderer, projection, view).unwrap();
        assert_eq!(drawn, 4);
        for call in renderer.picking_calls() {
            assert_relative_eq!(call.chunk_id_uniform, call.chunk_id as f32 / 255.0);
        }
        assert_eq!(world.chunks_drawn(), 0);
    }
}
