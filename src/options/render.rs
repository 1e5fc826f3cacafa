use glam::UVec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::BackendKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Render", inline)]
#[serde(default)]
/// Backend and offscreen target size.
pub struct RenderOptions {
    /// Which backend executes passes.
    #[schemars(title = "Backend")]
    pub backend: BackendKind,
    /// Target width in pixels.
    #[schemars(title = "Width", range(min = 1))]
    pub width: u32,
    /// Target height in pixels.
    #[schemars(title = "Height", range(min = 1))]
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            backend: BackendKind::Software,
            width: 640,
            height: 480,
        }
    }
}

impl RenderOptions {
    /// Target size as a vector.
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }
}
