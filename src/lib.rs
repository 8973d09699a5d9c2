#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world: seeded terrain, per-chunk vertex encoding, colour-coded
//! picking and an editable grid of chunks drawn nearest first.
//!
//! ## Key Modules
//!
//! * `config` - Serde-backed engine settings
//! * `error` - The crate's error type
//! * `engine_state` - The world, its renderer seam and the camera maths
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel data (chunks, heightmap, the chunk grid)
//! * Vertex encoding (face culling, sunlight, picking keys)
//! * The renderer, reached only through the `ChunkRenderer` trait
//!
//! A graphics backend implements `ChunkRenderer`. The crate ships a
//! `HeadlessRenderer` that records uploads and draw calls in memory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     if let Err(err) = voxel_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use cgmath::{Deg, InnerSpace, Point3, Vector3};
use log::{error, info, warn};
use web_time::Instant;

use engine_state::voxels::chunk::{CHUNK_X, CHUNK_Y};

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use engine_state::{
    camera_state::{Frustum, Projection, SubViewport},
    rendering::{
        picking::{decode_picked_colour, PickedVoxel},
        ChunkRenderer, ChunkVertexData, HeadlessRenderer,
    },
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::Chunk,
        heightmap::Heightmap,
        world::World,
    },
    EditAction, EngineState, FrameStats,
};
pub use error::EngineError;

/// Width of the simulated window in pixels.
const WINDOW_WIDTH: u32 = 1280;
/// Height of the simulated window in pixels.
const WINDOW_HEIGHT: u32 = 720;
/// Side of the pixel square the picking pass renders around the cursor.
const PICKING_WINDOW: u32 = 1;

/// Runs one headless session of the engine.
///
/// Usage: `voxel-world [config.json] [heightmap.png]`
///
/// Creates the world from the configuration (or the defaults), draws a frame from
/// a camera above the grid, picks the top face under the cursor, places a block on
/// it and draws again. If a second path is given the heightmap is written there as
/// a greyscale image.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let heightmap_path = args.next();

    let projection = Projection::new(WINDOW_WIDTH, WINDOW_HEIGHT, Deg(60.0), 0.1, 1000.0);
    let mut engine_state = EngineState::new(config, HeadlessRenderer::new(), projection);

    let start = Instant::now();
    engine_state.create_world()?;
    info!(
        "Created world of {} chunks (seed {}) in {:?}",
        engine_state.world.chunk_count(),
        engine_state.world.seed(),
        start.elapsed()
    );

    if let (Some(path), Some(heightmap)) = (heightmap_path, engine_state.world.heightmap()) {
        heightmap.write_png(&path)?;
        info!("Wrote heightmap to {path}");
    }

    let (chunks_wide, chunks_deep) = engine_state.world.grid_size();
    let voxel_scale = engine_state.world.config().world.voxel_scale;
    let chunk_extent = CHUNK_X as f32 * voxel_scale;
    let camera_position = Point3::new(
        chunks_wide as f32 * chunk_extent * 0.5,
        CHUNK_Y as f32 * voxel_scale * 0.4,
        -(chunks_deep as f32) * chunk_extent * 0.25,
    );
    let camera_forward = Vector3::new(0.0, -0.4, 1.0).normalize();

    engine_state.renderer.begin_frame();
    let stats = engine_state.render_frame(camera_position, camera_forward)?;
    info!("Frame 1: drew {} chunks", stats.drawn);

    let cursor = SubViewport::around_cursor(WINDOW_WIDTH / 2, WINDOW_HEIGHT / 2, PICKING_WINDOW);
    let picked_chunks = engine_state.render_picking(camera_position, camera_forward, cursor)?;
    info!("Picking pass drew {picked_chunks} chunks");

    match top_face_pixel(&engine_state.renderer) {
        Some(pixel) => {
            if let Some(picked) = decode_picked_colour(pixel[0], pixel[1], pixel[2], pixel[3]) {
                info!("Picked {picked:?}");
            }
            let placed = engine_state.apply_pick(pixel, EditAction::Place(BlockType::STONE))?;
            info!("Placed stone: {placed}");
        }
        None => warn!("Nothing under the cursor to pick"),
    }

    engine_state.renderer.begin_frame();
    let stats = engine_state.render_frame(camera_position, camera_forward)?;
    info!(
        "Frame 2: regenerated {} chunks, drew {} chunks",
        stats.regenerated, stats.drawn
    );

    if let Err(err) = engine_state.destroy_world() {
        error!("Failed to destroy world: {err}");
        return Err(err);
    }

    Ok(())
}

/// Stands in for reading the picking target back: the colour of the first
/// upward-facing vertex of the nearest chunk in the picking pass.
fn top_face_pixel(renderer: &HeadlessRenderer) -> Option<[u8; 4]> {
    let call = renderer.picking_calls().first()?;
    let mesh = renderer.mesh(call.chunk_id)?;
    let top = BlockSide::TOP.index() as f32;
    let vertex = mesh
        .picking
        .iter()
        .position(|key| (key[2] * 255.0).round() == top)?;
    renderer.picking_colour(call.chunk_id, vertex)
}
