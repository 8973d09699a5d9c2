//! # Heightmap Module
//!
//! A square grid of 8-bit elevation samples covering the whole world. The terrain
//! generator reads one sample per chunk column, offset by the chunk's position in
//! the grid.
//!
//! Two generators are provided, selected by [`HeightmapAlgorithm`]:
//! - **Diamond-square**: seeded midpoint displacement over a power-of-two lattice,
//!   cropped to size and smoothed with a 3x3 box filter
//! - **Perlin**: fractal Perlin noise sampled once per grid cell
//!
//! Both are deterministic for a given seed and configuration.

use std::path::Path;

use noise::{Fbm, NoiseFn, Perlin};

use crate::config::{HeightmapAlgorithm, HeightmapConfig};
use crate::error::EngineError;

/// A square grid of elevation samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heightmap {
    side: usize,
    samples: Vec<u8>,
}

impl Heightmap {
    /// Wraps externally produced samples.
    ///
    /// # Returns
    /// `None` unless `samples` holds exactly `side * side` entries.
    pub fn from_samples(side: usize, samples: Vec<u8>) -> Option<Self> {
        (samples.len() == side * side).then_some(Heightmap { side, samples })
    }

    /// Generates a heightmap with `side * side` samples.
    pub fn generate(seed: u32, side: usize, config: &HeightmapConfig) -> Self {
        let samples = match config.algorithm {
            HeightmapAlgorithm::DiamondSquare => diamond_square(seed, side, config),
            HeightmapAlgorithm::Perlin => perlin(seed, side, config),
        };
        Heightmap { side, samples }
    }

    /// Side length in samples.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// The raw samples, row-major with x fastest.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// The sample at (x, z).
    ///
    /// # Panics
    /// Panics if (x, z) lies outside the grid.
    #[inline]
    pub fn sample(&self, x: usize, z: usize) -> u8 {
        assert!(x < self.side && z < self.side, "heightmap sample ({x}, {z}) out of range");
        self.samples[self.side * z + x]
    }

    /// Writes the heightmap as a grayscale image, with the format taken from the
    /// path's extension.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        image::save_buffer(
            path,
            &self.samples,
            self.side as u32,
            self.side as u32,
            image::ColorType::L8,
        )?;
        Ok(())
    }
}

fn diamond_square(seed: u32, side: usize, config: &HeightmapConfig) -> Vec<u8> {
    let spread = (config.feature_spread.max(1) as usize).next_power_of_two();
    let size = side.max(spread).next_power_of_two();
    let n = size + 1;

    let mut rng = fastrand::Rng::with_seed(seed as u64);
    let base = config.default_height as f32;
    let mut grid = vec![base; n * n];

    let half_swing = config.feature_max_height as f32 * 0.5;
    for z in (0..n).step_by(spread) {
        for x in (0..n).step_by(spread) {
            grid[n * z + x] = base + (rng.f32() * 2.0 - 1.0) * half_swing;
        }
    }

    let mut step = spread;
    let mut amplitude = config.noise_scale as f32;
    while step > 1 {
        let half = step / 2;

        // diamond step: square centres
        for z in (half..n).step_by(step) {
            for x in (half..n).step_by(step) {
                let average = (grid[n * (z - half) + x - half]
                    + grid[n * (z - half) + x + half]
                    + grid[n * (z + half) + x - half]
                    + grid[n * (z + half) + x + half])
                    * 0.25;
                grid[n * z + x] = average + (rng.f32() * 2.0 - 1.0) * amplitude;
            }
        }

        // square step: edge midpoints
        for z in (0..n).step_by(half) {
            let x_start = if (z / half) % 2 == 0 { half } else { 0 };
            for x in (x_start..n).step_by(step) {
                let mut total = 0.0;
                let mut count = 0.0;
                if x >= half {
                    total += grid[n * z + x - half];
                    count += 1.0;
                }
                if x + half < n {
                    total += grid[n * z + x + half];
                    count += 1.0;
                }
                if z >= half {
                    total += grid[n * (z - half) + x];
                    count += 1.0;
                }
                if z + half < n {
                    total += grid[n * (z + half) + x];
                    count += 1.0;
                }
                grid[n * z + x] = total / count + (rng.f32() * 2.0 - 1.0) * amplitude;
            }
        }

        step = half;
        amplitude *= 0.5;
    }

    let mut cropped = vec![0.0f32; side * side];
    for z in 0..side {
        for x in 0..side {
            cropped[side * z + x] = grid[n * z + x].clamp(0.0, 255.0);
        }
    }

    box_filter(&cropped, side)
}

/// 3x3 mean filter; edge samples average over the neighbours that exist.
fn box_filter(values: &[f32], side: usize) -> Vec<u8> {
    let mut filtered = Vec::with_capacity(side * side);
    for z in 0..side {
        for x in 0..side {
            let mut total = 0.0;
            let mut count = 0.0;
            for zz in z.saturating_sub(1)..=(z + 1).min(side - 1) {
                for xx in x.saturating_sub(1)..=(x + 1).min(side - 1) {
                    total += values[side * zz + xx];
                    count += 1.0;
                }
            }
            filtered.push((total / count).round().clamp(0.0, 255.0) as u8);
        }
    }
    filtered
}

fn perlin(seed: u32, side: usize, config: &HeightmapConfig) -> Vec<u8> {
    let fbm = Fbm::<Perlin>::new(seed);
    let base = config.default_height as f64;
    let swing = config.feature_max_height as f64;

    let mut samples = Vec::with_capacity(side * side);
    for z in 0..side {
        for x in 0..side {
            let value = fbm.get([
                x as f64 * config.perlin_frequency,
                z as f64 * config.perlin_frequency,
            ]);
            samples.push((base + value * swing).round().clamp(0.0, 255.0) as u8);
        }
    }
    samples
}
