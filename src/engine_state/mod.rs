//! # Engine State Module
//!
//! The core engine module that ties the voxel world to a renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, the renderer and the camera projection
//! * `camera_state` - Projection matrices and frustum culling
//! * `rendering` - Vertex encoding, picking, draw scheduling and the renderer seam
//! * `voxels` - Blocks, chunks, terrain and the chunk grid
//!
//! ## Frame Flow
//!
//! Each frame the caller supplies the camera position and forward vector:
//! 1. Dirty chunks are re-encoded and their meshes replaced
//! 2. The draw queue is sorted by distance from the camera
//! 3. Visible chunks are drawn, nearest first, within the draw budget
//!
//! Picking is a second pass over the same queue with an off-centre projection
//! around the cursor. The pixel read back from it is decoded into a voxel face
//! and turned into an edit.

use cgmath::{Matrix4, Point3, Vector3};
use log::debug;

use camera_state::{Projection, SubViewport};
use rendering::{picking::decode_picked_colour, ChunkRenderer};
use voxels::{block::block_type::BlockType, world::World};

use crate::{config::EngineConfig, error::EngineError};

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// What to do with a picked voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Place a block in the cell in front of the picked face
    Place(BlockType),
    /// Clear the picked voxel itself
    Remove,
}

/// Counters from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Chunks re-encoded before drawing
    pub regenerated: usize,
    /// Chunks drawn
    pub drawn: usize,
}

/// The main state container for the voxel engine
///
/// Holds the world, the renderer it uploads to and the camera projection, and
/// runs the per-frame sequence of flush, sort and draw.
///
/// # Examples
///
/// ```
/// use cgmath::{Deg, Point3, Vector3};
/// use voxel_world::{EngineConfig, EngineState, HeadlessRenderer, Projection};
///
/// let mut config = EngineConfig::default();
/// config.world.chunks_wide = 2;
/// config.world.chunks_deep = 2;
/// let projection = Projection::new(640, 480, Deg(60.0), 0.1, 500.0);
/// let mut engine_state = EngineState::new(config, HeadlessRenderer::new(), projection);
///
/// engine_state.create_world().unwrap();
/// let stats = engine_state
///     .render_frame(Point3::new(3.2, 30.0, -4.0), Vector3::new(0.0, -0.5, 1.0))
///     .unwrap();
/// assert!(stats.drawn > 0);
/// ```
pub struct EngineState<R: ChunkRenderer> {
    /// The voxel world
    pub world: World,
    /// Receives meshes and draw calls
    pub renderer: R,
    /// Camera projection settings
    pub projection: Projection,
}

impl<R: ChunkRenderer> EngineState<R> {
    /// Creates an engine state with an uninitialized world.
    ///
    /// # Arguments
    /// * `config` - World, heightmap and draw settings
    /// * `renderer` - The render-resource object meshes are uploaded to
    /// * `projection` - Initial camera projection
    pub fn new(config: EngineConfig, renderer: R, projection: Projection) -> Self {
        Self {
            world: World::new(config),
            renderer,
            projection,
        }
    }

    /// Creates the world with the seed and grid size from the configuration.
    pub fn create_world(&mut self) -> Result<(), EngineError> {
        let settings = self.world.config().world.clone();
        self.world.create(
            settings.seed,
            settings.chunks_wide,
            settings.chunks_deep,
            &mut self.renderer,
        )
    }

    /// Tears the world down, releasing every mesh.
    pub fn destroy_world(&mut self) -> Result<(), EngineError> {
        self.world.destroy(&mut self.renderer)
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Flushes dirty chunks, sorts the draw queue and draws.
    ///
    /// # Arguments
    /// * `camera_position` - Camera position in world space
    /// * `camera_forward` - Direction the camera faces
    pub fn render_frame(
        &mut self,
        camera_position: Point3<f32>,
        camera_forward: Vector3<f32>,
    ) -> Result<FrameStats, EngineError> {
        let regenerated = self.world.flush_dirty(&mut self.renderer)?;
        self.world.sort_draw_queue(camera_position)?;

        let view = view_matrix(camera_position, camera_forward);
        let drawn = self.world.draw(
            &mut self.renderer,
            camera_forward,
            self.projection.calc_matrix(),
            view,
        )?;

        Ok(FrameStats { regenerated, drawn })
    }

    /// Draws the picking pass for the pixels around the cursor. Uses the draw
    /// queue from the last [`EngineState::render_frame`].
    ///
    /// # Returns
    /// The number of chunks drawn into the picking target.
    pub fn render_picking(
        &mut self,
        camera_position: Point3<f32>,
        camera_forward: Vector3<f32>,
        cursor: SubViewport,
    ) -> Result<usize, EngineError> {
        let view = view_matrix(camera_position, camera_forward);
        let projection = self.projection.offcentre_matrix(cursor);
        self.world.draw_for_picking(&mut self.renderer, projection, view)
    }

    /// Decodes a pixel read back from the picking target and applies `action` to
    /// the voxel it names.
    ///
    /// # Returns
    /// Whether a block changed. A pixel that decodes to nothing changes nothing.
    pub fn apply_pick(&mut self, pixel: [u8; 4], action: EditAction) -> Result<bool, EngineError> {
        let [r, g, b, a] = pixel;
        let Some(picked) = decode_picked_colour(r, g, b, a) else {
            debug!("Picking pixel {pixel:?} names no voxel");
            return Ok(false);
        };

        match action {
            EditAction::Place(block_type) => self.world.edit_block_on_face(
                picked.chunk_id,
                picked.x,
                picked.y,
                picked.z,
                picked.face,
                block_type,
            ),
            EditAction::Remove => {
                self.world
                    .remove_block(picked.chunk_id, picked.x, picked.y, picked.z)
            }
        }
    }
}

/// A right-handed view matrix looking along `forward` with y up.
pub fn view_matrix(position: Point3<f32>, forward: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::look_to_rh(position, forward, Vector3::unit_y())
}
