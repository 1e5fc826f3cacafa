use std::fmt;
use std::str::FromStr;

use crate::error::PickError;

/// Absolute, `/`-separated identity of a scene object (e.g. `/cube1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Parse an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidPath`] if the path is relative, has an
    /// empty component or a trailing separator.
    pub fn new(path: &str) -> Result<Self, PickError> {
        if path == "/" {
            return Ok(Self::root());
        }
        let valid = path.starts_with('/')
            && path[1..].split('/').all(|component| {
                !component.is_empty()
                    && component
                        .chars()
                        .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
            });
        if valid {
            Ok(Self(path.to_owned()))
        } else {
            Err(PickError::InvalidPath(path.to_owned()))
        }
    }

    /// The absolute root `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the absolute root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Last path component (empty for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Whether `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn has_prefix(&self, prefix: &Self) -> bool {
        if prefix.is_root() {
            return true;
        }
        self.0
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectPath {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ObjectPath {
    type Error = PickError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_and_malformed_paths() {
        assert!(ObjectPath::new("cube").is_err());
        assert!(ObjectPath::new("/cube/").is_err());
        assert!(ObjectPath::new("//cube").is_err());
        assert!(ObjectPath::new("/cu be").is_err());
        assert!(ObjectPath::new("/world/cube_1").is_ok());
    }

    #[test]
    fn prefix_is_component_wise() {
        let cube = ObjectPath::new("/world/cube1").unwrap();
        let world = ObjectPath::new("/world").unwrap();
        let wor = ObjectPath::new("/wor").unwrap();
        assert!(cube.has_prefix(&ObjectPath::root()));
        assert!(cube.has_prefix(&world));
        assert!(cube.has_prefix(&cube));
        assert!(!cube.has_prefix(&wor));
        assert!(!world.has_prefix(&cube));
    }

    #[test]
    fn name_is_last_component() {
        assert_eq!(ObjectPath::new("/a/b").unwrap().name(), "b");
        assert_eq!(ObjectPath::root().name(), "");
    }
}
