//! View-frustum culling.
//!
//! Planes are extracted from the combined `projection * view` matrix
//! (Gribb-Hartmann). With the WGPU depth range, clip-space z runs over `[0, w]`,
//! so the near plane is the third matrix row on its own rather than `row3 + row2`.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector4};

/// The six planes of a view frustum, each `(nx, ny, nz, d)` with the normal
/// pointing inward: `n . p + d >= 0` for points inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vector4<f32>; 6],
}

impl Frustum {
    /// Extracts the frustum of `view_projection` (projection times view).
    pub fn from_view_projection(view_projection: Matrix4<f32>) -> Self {
        let row0 = view_projection.row(0);
        let row1 = view_projection.row(1);
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);

        let planes = [
            row3 + row0, // left
            row3 - row0, // right
            row3 + row1, // bottom
            row3 - row1, // top
            row2,        // near
            row3 - row2, // far
        ]
        .map(normalize_plane);

        Self { planes }
    }

    /// The frustum seen through `projection` from `view`.
    pub fn new(projection: Matrix4<f32>, view: Matrix4<f32>) -> Self {
        Self::from_view_projection(projection * view)
    }

    /// Whether any part of the axis-aligned box `[mins, maxs]` may be inside.
    ///
    /// For each plane only the box corner furthest along the plane normal is
    /// tested; the box is rejected when that corner is behind any plane.
    pub fn intersects_aabb(&self, mins: Point3<f32>, maxs: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            let corner = Point3::new(
                if plane.x >= 0.0 { maxs.x } else { mins.x },
                if plane.y >= 0.0 { maxs.y } else { mins.y },
                if plane.z >= 0.0 { maxs.z } else { mins.z },
            );
            plane.x * corner.x + plane.y * corner.y + plane.z * corner.z + plane.w >= 0.0
        })
    }

    /// Whether the point lies inside or on the frustum.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.intersects_aabb(point, point)
    }
}

fn normalize_plane(plane: Vector4<f32>) -> Vector4<f32> {
    let length = plane.truncate().magnitude();
    if length > 0.0 {
        plane / length
    } else {
        plane
    }
}
