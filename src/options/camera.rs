use glam::{Vec2, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::{Frustum, TestCamera};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and initial placement.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial translation of the world in view space.
    #[schemars(skip)]
    pub translate: [f32; 3],
    /// Initial rotation in degrees (around y, then x).
    #[schemars(skip)]
    pub rotate: [f32; 2],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
            translate: [0.0, 0.0, -20.0],
            rotate: [0.0, 0.0],
        }
    }
}

impl CameraOptions {
    /// Camera at the configured placement.
    #[must_use]
    pub fn camera(&self) -> TestCamera {
        TestCamera::new(Vec2::from(self.rotate), Vec3::from(self.translate))
    }

    /// Perspective frustum for a viewport of the given aspect ratio.
    #[must_use]
    pub fn frustum(&self, aspect: f64) -> Frustum {
        Frustum::perspective(
            f64::from(self.fovy),
            aspect,
            f64::from(self.znear),
            f64::from(self.zfar),
        )
    }
}
