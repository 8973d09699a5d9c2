//! # Error Module
//!
//! Recoverable failures of the world lifecycle and of configuration handling.
//!
//! Out-of-range voxel coordinates are not errors here; they surface as `None` or
//! `false` from the chunk accessors. Bookkeeping desynchronisation (a negative
//! non-air count, an unknown palette type, mismatched vertex streams) panics.

use std::path::PathBuf;

/// Errors returned by world lifecycle operations and configuration loading.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// `create` was called on a world that already holds chunks.
    #[error("The world has already been created; destroy it before creating it again.")]
    AlreadyCreated,

    /// An operation that needs chunks was called before `create` (or after `destroy`).
    #[error("The world has not been created.")]
    NotCreated,

    /// Only square chunk grids are supported.
    #[error("Chunk grid must be square, but was {0} chunks wide and {1} chunks deep.")]
    NonSquareGrid(u32, u32),

    /// A grid with zero chunks was requested.
    #[error("Chunk grid must contain at least one chunk.")]
    EmptyGrid,

    /// Chunk ids are stamped into an 8-bit picking channel, so at most 256 chunks fit.
    #[error("Chunk grid of {0} chunks exceeds the maximum of {1}.")]
    TooManyChunks(usize, usize),

    /// A supplied heightmap does not cover the requested chunk grid.
    #[error("Heightmap of side {side} is too small for a grid needing side {required}.")]
    HeightmapTooSmall {
        /// Side of the supplied heightmap in samples
        side: usize,
        /// Side the grid needs
        required: usize,
    },

    /// The configuration file could not be read.
    #[error("Failed to read config file \"{0}\": {1}")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    /// The configuration text was not valid JSON for `EngineConfig`.
    #[error("Failed to parse engine config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Writing the debug heightmap image failed.
    #[error("Failed to export heightmap image: {0}")]
    HeightmapExport(#[from] image::ImageError),
}
