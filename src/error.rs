//! Crate-level error types.

use std::fmt;

#[cfg(feature = "gpu")]
use crate::render::gpu::GpuContextError;
use crate::scene::ObjectPath;

/// Errors produced by the picking crate.
#[derive(Debug)]
pub enum PickError {
    /// Degenerate viewport or resolution handed to picking.
    InvalidInput(String),
    /// A collection was dirtied or queried before being registered.
    UnregisteredCollection(String),
    /// A style edit or lookup named an object that is not in the scene.
    UnknownObject(ObjectPath),
    /// A string could not be parsed as an absolute object path.
    InvalidPath(String),
    /// GPU context initialization failure.
    #[cfg(feature = "gpu")]
    Gpu(GpuContextError),
    /// GPU buffer readback failed.
    Readback(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Image encoding failure.
    Image(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl PickError {
    /// Whether this error indicates a programming error in the orchestration
    /// layer rather than recoverable input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredCollection(_)
                | Self::UnknownObject(_)
                | Self::InvalidPath(_)
        )
    }
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::UnregisteredCollection(name) => {
                write!(f, "collection '{name}' is not registered")
            }
            Self::UnknownObject(path) => {
                write!(f, "no object at path {path}")
            }
            Self::InvalidPath(path) => {
                write!(f, "'{path}' is not a valid absolute object path")
            }
            #[cfg(feature = "gpu")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Readback(msg) => write!(f, "readback failed: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Image(msg) => write!(f, "image error: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for PickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "gpu")]
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "gpu")]
impl From<GpuContextError> for PickError {
    fn from(e: GpuContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for PickError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for PickError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_told_apart_from_bad_input() {
        let missing = PickError::UnknownObject(ObjectPath::new("/ghost").unwrap());
        assert!(missing.is_internal());
        assert!(PickError::UnregisteredCollection("extra".into()).is_internal());
        assert!(!PickError::InvalidInput("0x0 viewport".into()).is_internal());
        assert!(missing.to_string().contains("/ghost"));
    }
}
