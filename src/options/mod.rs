//! Runtime options with TOML preset support.
//!
//! Display styling, highlight colors, pick parameters, the camera and the
//! backend are consolidated here. Options serialize to/from TOML so a
//! scenario run can be reproduced from a file.

mod camera;
mod display;
mod picking;
mod render;
mod selection;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use picking::PickingOptions;
pub use render::RenderOptions;
use schemars::JsonSchema;
pub use selection::SelectionOptions;
use serde::{Deserialize, Serialize};

use crate::error::PickError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[picking]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Display collection styling.
    pub display: DisplayOptions,
    /// Highlight colors.
    pub selection: SelectionOptions,
    /// Pick pass parameters.
    pub picking: PickingOptions,
    /// Camera projection and placement.
    pub camera: CameraOptions,
    /// Backend and target size.
    pub render: RenderOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::Io`] or [`PickError::OptionsParse`].
    pub fn load(path: &Path) -> Result<Self, PickError> {
        let content = std::fs::read_to_string(path).map_err(PickError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, PickError> {
        toml::from_str(content)
            .map_err(|e| PickError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`PickError::Io`] or [`PickError::OptionsParse`].
    pub fn save(&self, path: &Path) -> Result<(), PickError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PickError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PickError::Io)?;
        }
        std::fs::write(path, content).map_err(PickError::Io)
    }
}
