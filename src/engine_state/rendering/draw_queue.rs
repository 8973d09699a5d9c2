//! # Draw Queue
//!
//! Per-frame ordering of chunks for the draw and picking passes. Every chunk gets
//! a squared planar distance from the camera to the centre of its footprint and a
//! world-space bounding box; the queue is sorted nearest first.
//!
//! Walking the queue:
//! 1. Stop at the first chunk beyond the maximum visible distance. The ordering
//!    guarantees every later chunk is further away.
//! 2. Skip chunks whose bounding box is outside the frustum.
//! 3. Stop once the draw budget is spent.

use cgmath::Point3;

use crate::engine_state::{
    camera_state::Frustum,
    voxels::chunk::{CHUNK_X, CHUNK_Y, CHUNK_Z},
};

/// One chunk's entry in the draw queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkQueueItem {
    /// Id (grid index) of the chunk
    pub chunk_id: usize,
    /// Squared distance from the camera to the footprint centre, in the xz plane
    pub sqdist: f32,
    /// Minimum corner of the world-space bounding box
    pub mins: Point3<f32>,
    /// Maximum corner of the world-space bounding box
    pub maxs: Point3<f32>,
}

/// Chunks ordered by distance from the camera.
#[derive(Debug, Default, Clone)]
pub struct DrawQueue {
    items: Vec<ChunkQueueItem>,
}

impl DrawQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the queue for a square grid `chunks_wide` chunks across holding
    /// `chunk_count` chunks, as seen from `camera_position`.
    ///
    /// The sort is stable, so chunks at equal distance keep their id order.
    pub fn sort(
        &mut self,
        camera_position: Point3<f32>,
        chunks_wide: usize,
        chunk_count: usize,
        voxel_scale: f32,
    ) {
        let chunk_width = CHUNK_X as f32 * voxel_scale;
        let chunk_depth = CHUNK_Z as f32 * voxel_scale;
        let chunk_height = CHUNK_Y as f32 * voxel_scale;

        self.items.clear();
        self.items.extend((0..chunk_count).map(|chunk_id| {
            let chunk_x = (chunk_id % chunks_wide.max(1)) as f32;
            let chunk_z = (chunk_id / chunks_wide.max(1)) as f32;
            let centre_x = chunk_x * chunk_width + chunk_width * 0.5;
            let centre_z = chunk_z * chunk_depth + chunk_depth * 0.5;

            let dx = camera_position.x - centre_x;
            let dz = camera_position.z - centre_z;

            ChunkQueueItem {
                chunk_id,
                sqdist: dx * dx + dz * dz,
                mins: Point3::new(centre_x - chunk_width * 0.5, 0.0, centre_z - chunk_depth * 0.5),
                maxs: Point3::new(
                    centre_x + chunk_width * 0.5,
                    chunk_height,
                    centre_z + chunk_depth * 0.5,
                ),
            }
        }));

        self.items.sort_by(|a, b| a.sqdist.total_cmp(&b.sqdist));
    }

    /// The sorted entries.
    pub fn items(&self) -> &[ChunkQueueItem] {
        &self.items
    }

    /// Number of queued chunks.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue has not been sorted since it was last cleared.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The entries to draw this pass, in order.
    ///
    /// # Arguments
    /// * `frustum` - Chunks whose bounding box misses it are skipped
    /// * `max_distance` - The walk ends at the first chunk further than this
    /// * `budget` - At most this many entries are yielded
    pub fn visible<'a>(
        &'a self,
        frustum: &'a Frustum,
        max_distance: f32,
        budget: usize,
    ) -> impl Iterator<Item = &'a ChunkQueueItem> + 'a {
        let max_sqdist = max_distance * max_distance;
        self.items
            .iter()
            .take_while(move |item| item.sqdist <= max_sqdist)
            .filter(move |item| frustum.intersects_aabb(item.mins, item.maxs))
            .take(budget)
    }
}
