//! # Camera Projection
//!
//! Projection matrices consumed by the draw and picking passes. Camera movement
//! and view-matrix maintenance belong to the caller; this module only turns lens
//! settings into clip-space transforms.
//!
//! ## Key Components
//! - `Projection`: perspective projection settings
//! - `Projection::offcentre_matrix`: a projection that stretches a small sub-window
//!   of the viewport over the whole clip volume, so a picking pass can render only
//!   the pixels under the cursor

use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU uses a coordinate system where:
/// - X is right
/// - Y is up
/// - Z is forward (unlike OpenGL where Z is backward)
/// - NDC (Normalized Device Coordinates) range from -1 to 1 in X and Y, and 0 to 1 in Z
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A rectangle of the framebuffer in pixels, with y measured from the top edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubViewport {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width, at least one pixel
    pub width: u32,
    /// Height, at least one pixel
    pub height: u32,
}

impl SubViewport {
    /// A `size` x `size` window centred on the pixel (`cursor_x`, `cursor_y`).
    pub fn around_cursor(cursor_x: u32, cursor_y: u32, size: u32) -> Self {
        let size = size.max(1);
        Self {
            x: cursor_x.saturating_sub(size / 2),
            y: cursor_y.saturating_sub(size / 2),
            width: size,
            height: size,
        }
    }
}

/// Manages the perspective projection parameters.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Viewport width in pixels
    width: u32,
    /// Viewport height in pixels
    height: u32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the viewport size.
    ///
    /// # Arguments
    /// * `width` - New viewport width in pixels
    /// * `height` - New viewport height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    ///
    /// # Returns
    /// A 4x4 projection matrix ready for use in shaders
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect(), self.znear, self.zfar)
    }

    /// Calculates a projection that maps `window` of the viewport onto the full
    /// clip volume.
    ///
    /// Rendering with this matrix into a target of `window`'s size reproduces
    /// exactly the pixels `calc_matrix` would have produced inside that window.
    ///
    /// # Arguments
    /// * `window` - The sub-rectangle of the viewport to keep
    pub fn offcentre_matrix(&self, window: SubViewport) -> Matrix4<f32> {
        let (w, h) = (self.width as f32, self.height as f32);
        let sub_w = window.width.max(1) as f32;
        let sub_h = window.height.max(1) as f32;
        let (x, y) = (window.x as f32, window.y as f32);

        let scale_x = w / sub_w;
        let scale_y = h / sub_h;
        let shift_x = (w - 2.0 * x - sub_w) / sub_w;
        // pixel y grows downward, clip y upward
        let shift_y = (2.0 * y + sub_h - h) / sub_h;

        #[rustfmt::skip]
        let crop = Matrix4::new(
            scale_x, 0.0,     0.0, 0.0,
            0.0,     scale_y, 0.0, 0.0,
            0.0,     0.0,     1.0, 0.0,
            shift_x, shift_y, 0.0, 1.0,
        );
        crop * self.calc_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn to_ndc(matrix: Matrix4<f32>, point: Point3<f32>) -> Vector3<f32> {
        let clip = matrix * point.to_homogeneous();
        clip.truncate() / clip.w
    }

    #[test]
    fn depth_range_is_zero_to_one() {
        let projection = Projection::new(800, 600, Deg(45.0), 0.5, 50.0);
        let matrix = projection.calc_matrix();
        assert_relative_eq!(to_ndc(matrix, Point3::new(0.0, 0.0, -0.5)).z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(to_ndc(matrix, Point3::new(0.0, 0.0, -50.0)).z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut projection = Projection::new(100, 100, Deg(60.0), 0.1, 10.0);
        assert_relative_eq!(projection.aspect(), 1.0);
        projection.resize(200, 100);
        assert_relative_eq!(projection.aspect(), 2.0);
    }

    #[test]
    fn offcentre_window_centre_maps_to_clip_origin() {
        let projection = Projection::new(640, 480, Deg(45.0), 0.1, 100.0);
        let window = SubViewport::around_cursor(480, 120, 2);
        let full = projection.calc_matrix();
        let cropped = projection.offcentre_matrix(window);

        // find the view-space point that lands on the window centre in the full view
        let ndc_x = 2.0 * 480.0 / 640.0 - 1.0;
        let ndc_y = 1.0 - 2.0 * 120.0 / 480.0;
        let depth = -10.0;
        let tan_half = (Rad::from(Deg(22.5f32))).0.tan();
        let point = Point3::new(
            ndc_x * tan_half * projection.aspect() * -depth,
            ndc_y * tan_half * -depth,
            depth,
        );

        let full_ndc = to_ndc(full, point);
        assert_relative_eq!(full_ndc.x, ndc_x, epsilon = 1e-4);
        assert_relative_eq!(full_ndc.y, ndc_y, epsilon = 1e-4);

        let cropped_ndc = to_ndc(cropped, point);
        assert_relative_eq!(cropped_ndc.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(cropped_ndc.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(cropped_ndc.z, full_ndc.z, epsilon = 1e-5);
    }

    #[test]
    fn full_viewport_window_is_identity_crop() {
        let projection = Projection::new(320, 200, Deg(70.0), 0.1, 100.0);
        let window = SubViewport {
            x: 0,
            y: 0,
            width: 320,
            height: 200,
        };
        let cropped: [[f32; 4]; 4] = projection.offcentre_matrix(window).into();
        let full: [[f32; 4]; 4] = projection.calc_matrix().into();
        for (cropped_column, full_column) in cropped.iter().zip(full.iter()) {
            for (c, f) in cropped_column.iter().zip(full_column.iter()) {
                assert_relative_eq!(*c, *f, epsilon = 1e-6);
            }
        }
    }
}
