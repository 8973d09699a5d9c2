//! # Voxel Engine Core
//!
//! Representation, generation and editing of the voxel world.
//!
//! ## Architecture
//!
//! * **Block**: block types, palette layers and the six face directions
//! * **Chunk**: a dense 16x256x16 array of blocks with an incrementally maintained
//!   height cache and non-air count
//! * **Heightmap**: the seeded elevation grid terrain is generated from
//! * **World**: the chunk grid, its lifecycle, cross-chunk edits and draw
//!   scheduling
//!
//! ## Data Flow
//!
//! 1. The world generates a heightmap and fills every chunk from it
//! 2. Each chunk is encoded into vertex streams and handed to the renderer
//! 3. Edits mark the chunks they touch dirty
//! 4. Dirty chunks are re-encoded in full before the next draw

pub mod block;
pub mod chunk;
pub mod heightmap;
pub mod world;
