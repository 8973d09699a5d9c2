//! # Camera State Module
//!
//! Clip-space helpers for the draw and picking passes: perspective and off-centre
//! projections, and frustum culling of chunk bounding boxes. The camera's own
//! position and view matrix are supplied by the caller each frame.

pub mod camera;
pub mod frustum;

pub use camera::{Projection, SubViewport, OPENGL_TO_WGPU_MATRIX};
pub use frustum::Frustum;
