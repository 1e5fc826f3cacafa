use glam::Vec4;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::picking::HighlightMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Selection", inline)]
#[serde(default)]
/// Highlighting of selected objects in the display pass.
pub struct SelectionOptions {
    /// Draw selected objects highlighted.
    #[schemars(title = "Highlight")]
    pub enable_highlight: bool,
    /// Blend color for the `select` mode.
    #[schemars(skip)]
    pub select_color: [f32; 4],
    /// Blend color for the `locate` mode.
    #[schemars(skip)]
    pub locate_color: [f32; 4],
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            enable_highlight: true,
            select_color: [1.0, 1.0, 0.0, 1.0],
            locate_color: [1.0, 0.0, 1.0, 1.0],
        }
    }
}

impl SelectionOptions {
    /// Blend color for a highlight mode.
    #[must_use]
    pub fn color_for(&self, mode: HighlightMode) -> Vec4 {
        match mode {
            HighlightMode::Select => Vec4::from(self.select_color),
            HighlightMode::Locate => Vec4::from(self.locate_color),
        }
    }
}
