//! Projection frustum.
//!
//! The frustum is stored as a window on the plane at unit distance from the
//! eye plus near/far distances, so a sub-rectangle of the screen maps to a
//! sub-window without touching near/far. Everything is kept in `f64`; a
//! one-pixel pick window on a large viewport loses precision in `f32`.

use glam::{DMat4, DVec2, DVec4, Mat4};

/// Perspective or orthographic projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Window is on the plane at unit distance; extents scale with depth.
    Perspective,
    /// Window is the view-space box cross-section.
    Orthographic,
}

/// View frustum defined by a window, near/far distances and kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    kind: ProjectionKind,
    window_min: DVec2,
    window_max: DVec2,
    near: f64,
    far: f64,
}

impl Frustum {
    /// Symmetric perspective frustum.
    ///
    /// `fovy_degrees` is the full vertical field of view.
    #[must_use]
    pub fn perspective(fovy_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let half_h = (fovy_degrees.to_radians() * 0.5).tan();
        let half_w = half_h * aspect;
        Self {
            kind: ProjectionKind::Perspective,
            window_min: DVec2::new(-half_w, -half_h),
            window_max: DVec2::new(half_w, half_h),
            near,
            far,
        }
    }

    /// Orthographic frustum over the given view-space box.
    #[must_use]
    pub fn orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            kind: ProjectionKind::Orthographic,
            window_min: DVec2::new(left, bottom),
            window_max: DVec2::new(right, top),
            near,
            far,
        }
    }

    /// Same frustum with a replaced window.
    #[must_use]
    pub fn with_window(&self, window_min: DVec2, window_max: DVec2) -> Self {
        Self {
            window_min,
            window_max,
            ..*self
        }
    }

    /// Projection kind.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Lower-left window corner.
    #[must_use]
    pub fn window_min(&self) -> DVec2 {
        self.window_min
    }

    /// Upper-right window corner.
    #[must_use]
    pub fn window_max(&self) -> DVec2 {
        self.window_max
    }

    /// Near plane distance.
    #[must_use]
    pub fn near(&self) -> f64 {
        self.near
    }

    /// Far plane distance.
    #[must_use]
    pub fn far(&self) -> f64 {
        self.far
    }

    /// Right-handed projection with `[0, 1]` depth (wgpu convention).
    #[must_use]
    pub fn compute_projection_matrix_f64(&self) -> DMat4 {
        let (l, b) = (self.window_min.x, self.window_min.y);
        let (r, t) = (self.window_max.x, self.window_max.y);
        let (n, f) = (self.near, self.far);
        let inv_w = 1.0 / (r - l);
        let inv_h = 1.0 / (t - b);
        let inv_d = 1.0 / (n - f);
        match self.kind {
            ProjectionKind::Perspective => DMat4::from_cols(
                DVec4::new(2.0 * inv_w, 0.0, 0.0, 0.0),
                DVec4::new(0.0, 2.0 * inv_h, 0.0, 0.0),
                DVec4::new((r + l) * inv_w, (t + b) * inv_h, f * inv_d, -1.0),
                DVec4::new(0.0, 0.0, n * f * inv_d, 0.0),
            ),
            ProjectionKind::Orthographic => DMat4::from_cols(
                DVec4::new(2.0 * inv_w, 0.0, 0.0, 0.0),
                DVec4::new(0.0, 2.0 * inv_h, 0.0, 0.0),
                DVec4::new(0.0, 0.0, inv_d, 0.0),
                DVec4::new(-(r + l) * inv_w, -(t + b) * inv_h, n * inv_d, 1.0),
            ),
        }
    }

    /// [`Self::compute_projection_matrix_f64`] narrowed to `f32`.
    #[must_use]
    pub fn compute_projection_matrix(&self) -> Mat4 {
        self.compute_projection_matrix_f64().as_mat4()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn symmetric_perspective_matches_glam() {
        let frustum = Frustum::perspective(45.0, 1.5, 1.0, 1000.0);
        let ours = frustum.compute_projection_matrix();
        let glam = Mat4::perspective_rh(45.0_f32.to_radians(), 1.5, 1.0, 1000.0);
        for (a, b) in ours.to_cols_array().iter().zip(glam.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn orthographic_matches_glam() {
        let frustum = Frustum::orthographic(-4.0, 2.0, -1.0, 3.0, 0.5, 50.0);
        let ours = frustum.compute_projection_matrix();
        let glam = Mat4::orthographic_rh(-4.0, 2.0, -1.0, 3.0, 0.5, 50.0);
        for (a, b) in ours.to_cols_array().iter().zip(glam.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn depth_range_is_zero_to_one() {
        let proj = Frustum::perspective(60.0, 1.0, 2.0, 100.0)
            .compute_projection_matrix();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -2.0));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn off_center_window_maps_to_ndc_corners() {
        let frustum = Frustum::perspective(45.0, 1.0, 1.0, 100.0)
            .with_window(DVec2::new(0.1, 0.2), DVec2::new(0.3, 0.4));
        let proj = frustum.compute_projection_matrix();
        // Window corner at unit distance, pushed to depth 10.
        let corner = Vec3::new(0.1, 0.2, -1.0) * 10.0;
        let ndc = proj.project_point3(corner);
        assert_relative_eq!(ndc.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, -1.0, epsilon = 1e-5);
    }
}
