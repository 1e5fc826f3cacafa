use glam::UVec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::picking::{HighlightMode, ResolveMode, DEFAULT_MINIMUM_RESOLUTION};
use crate::repr::ReprToken;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// Pick pass parameters.
pub struct PickingOptions {
    /// Smallest pick target, in pixels (width, height).
    #[schemars(title = "Minimum Resolution")]
    pub minimum_resolution: [u32; 2],
    /// How raw hits are reduced.
    #[schemars(title = "Resolve Mode")]
    pub resolve_mode: ResolveMode,
    /// Highlight mode picks are recorded under.
    #[schemars(title = "Highlight Mode")]
    pub highlight_mode: HighlightMode,
    /// Default repr of the pick collection.
    #[schemars(title = "Pickables Representation")]
    pub pickables_repr: ReprToken,
    /// Point size in pick-target pixels.
    #[schemars(skip)]
    pub point_size: u32,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            minimum_resolution: DEFAULT_MINIMUM_RESOLUTION.to_array(),
            resolve_mode: ResolveMode::Unique,
            highlight_mode: HighlightMode::Select,
            pickables_repr: ReprToken::Refined,
            point_size: 3,
        }
    }
}

impl PickingOptions {
    /// Minimum resolution, each axis at least 1.
    #[must_use]
    pub fn minimum_resolution(&self) -> UVec2 {
        UVec2::from(self.minimum_resolution).max(UVec2::ONE)
    }
}
