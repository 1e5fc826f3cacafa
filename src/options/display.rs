use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::Lighting;
use crate::repr::ReprToken;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Display collection styling.
pub struct DisplayOptions {
    /// Default repr of the display collection.
    #[schemars(title = "Representation")]
    pub repr: ReprToken,
    /// Background color (linear RGBA).
    #[schemars(skip)]
    pub clear_color: [f32; 4],
    /// Edge color for wire-on-surface reprs.
    #[schemars(skip)]
    pub wire_color: [f32; 4],
    /// Whether the headlight is on.
    #[schemars(title = "Lighting")]
    pub lighting: bool,
    /// Light received by faces turned away from the eye.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub ambient: f32,
    /// Point size in pixels for the points repr.
    #[schemars(title = "Point Size", range(min = 1, max = 16))]
    pub point_size: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            repr: ReprToken::Hull,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            wire_color: [0.0, 0.0, 0.0, 1.0],
            lighting: true,
            ambient: 0.2,
            point_size: 3,
        }
    }
}

impl DisplayOptions {
    /// Headlight parameters for the color pass.
    #[must_use]
    pub fn lighting(&self) -> Lighting {
        Lighting {
            enabled: self.lighting,
            ambient: self.ambient,
        }
    }
}
