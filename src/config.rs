//! # Engine Configuration
//!
//! Serde-backed settings for world generation and draw scheduling, loaded from JSON.
//! Every field has a default, so a config file only needs to name what it overrides:
//!
//! ```json
//! { "world": { "seed": 7, "chunks_wide": 4, "chunks_deep": 4 },
//!   "heightmap": { "algorithm": "perlin" } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World size, seed and scale
    pub world: WorldConfig,
    /// Heightmap generation parameters
    pub heightmap: HeightmapConfig,
    /// Draw scheduling limits
    pub draw: DrawConfig,
}

impl EngineConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| EngineError::ConfigRead(path.to_path_buf(), err))?;
        Self::from_json_str(&text)
    }
}

/// Settings describing the chunk grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the heightmap generator
    pub seed: u32,
    /// Number of chunks along x
    pub chunks_wide: u32,
    /// Number of chunks along z
    pub chunks_deep: u32,
    /// World units per voxel edge
    pub voxel_scale: f32,
    /// Constant added to every heightmap sample before placing the grass layer
    pub underground_height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunks_wide: 16,
            chunks_deep: 16,
            voxel_scale: 0.2,
            underground_height: 16,
        }
    }
}

/// Which generator produces the shared heightmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightmapAlgorithm {
    /// Seeded diamond-square midpoint displacement followed by a 3x3 box filter
    #[default]
    DiamondSquare,
    /// Fractal Perlin noise
    Perlin,
}

/// Parameters for heightmap generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapConfig {
    /// Generator to use
    pub algorithm: HeightmapAlgorithm,
    /// Baseline elevation around which features are placed
    pub default_height: u8,
    /// Initial random displacement amplitude for diamond-square
    pub noise_scale: u32,
    /// Spacing in samples between seeded lattice points
    pub feature_spread: u32,
    /// Maximum elevation swing of the seeded lattice points
    pub feature_max_height: u32,
    /// Base frequency for the Perlin generator
    pub perlin_frequency: f64,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            algorithm: HeightmapAlgorithm::DiamondSquare,
            default_height: 63,
            noise_scale: 64,
            feature_spread: 64,
            feature_max_height: 64,
            perlin_frequency: 0.01,
        }
    }
}

/// Limits applied when walking the draw queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Draw-count budget per pass
    pub max_drawn_chunks: usize,
    /// Chunks further than this many chunk widths from the camera are not drawn
    pub max_visible_distance_chunks: u32,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_drawn_chunks: 128,
            max_visible_distance_chunks: 10,
        }
    }
}
