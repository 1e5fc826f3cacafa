use glam::{Mat4, Vec2, Vec3};

/// Rotate/translate camera used by the drawing harness.
///
/// The view matrix applies the Y rotation, then the X rotation, then the
/// translation. With zero rotation and a translation of `(0, 0, -20)` the eye
/// sits at `z = 20` looking down `-z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestCamera {
    /// Rotation in degrees: `x` about the Y axis, `y` about the X axis.
    pub rotate: Vec2,
    /// View-space translation.
    pub translate: Vec3,
}

impl Default for TestCamera {
    fn default() -> Self {
        Self {
            rotate: Vec2::ZERO,
            translate: Vec3::ZERO,
        }
    }
}

impl TestCamera {
    /// Camera with the given rotation (degrees) and translation.
    #[must_use]
    pub fn new(rotate: Vec2, translate: Vec3) -> Self {
        Self { rotate, translate }
    }

    /// Orbit by a mouse delta (degrees per pixel).
    pub fn rotate_by(&mut self, delta: Vec2) {
        self.rotate += delta;
    }

    /// Dolly/pan by a view-space delta.
    pub fn translate_by(&mut self, delta: Vec3) {
        self.translate += delta;
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translate)
            * Mat4::from_rotation_x(self.rotate.y.to_radians())
            * Mat4::from_rotation_y(self.rotate.x.to_radians())
    }

    /// Eye position in world space.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.view_matrix().inverse().transform_point3(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn translated_camera_eye() {
        let camera = TestCamera::new(Vec2::ZERO, Vec3::new(0.0, 0.0, -20.0));
        let eye = camera.eye();
        assert_relative_eq!(eye.z, 20.0, epsilon = 1e-5);
        let view_pos = camera.view_matrix().transform_point3(Vec3::new(-5.0, 0.0, 5.0));
        assert_relative_eq!(view_pos.z, -15.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_about_y_moves_x() {
        let mut camera = TestCamera::default();
        camera.rotate_by(Vec2::new(90.0, 0.0));
        let p = camera.view_matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-5);
    }
}
