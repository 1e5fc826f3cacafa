//! Named render collections.
//!
//! A collection selects which scene objects are drawn (by path prefix) and
//! which representation they are drawn with. Two collections exist in a
//! running engine: the display collection and the pick collection.

use crate::repr::{ReprSelector, ReprToken};
use crate::scene::{DisplayStyle, ObjectPath};

/// Name of the display collection, registered implicitly by the change
/// tracker.
pub const DISPLAY_COLLECTION: &str = "geometry";

/// Name of the pick collection, which must be registered explicitly.
pub const PICKABLES_COLLECTION: &str = "pickables";

/// A named grouping of scene objects with a default representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCollection {
    name: String,
    repr_selector: ReprSelector,
    forced_repr: bool,
    root_paths: Vec<ObjectPath>,
    exclude_paths: Vec<ObjectPath>,
}

impl RenderCollection {
    /// Collection rooted at `/` with `forced_repr = false`.
    #[must_use]
    pub fn new(name: impl Into<String>, repr_selector: ReprSelector) -> Self {
        Self {
            name: name.into(),
            repr_selector,
            forced_repr: false,
            root_paths: vec![ObjectPath::root()],
            exclude_paths: Vec::new(),
        }
    }

    /// The display collection drawing objects with `repr` by default.
    #[must_use]
    pub fn display(repr: ReprToken) -> Self {
        Self::new(DISPLAY_COLLECTION, ReprSelector::new(repr))
    }

    /// The pick collection. Requests refined geometry so picking precision
    /// does not follow a coarse display repr; authored reprs still win.
    #[must_use]
    pub fn pickables() -> Self {
        Self::new(PICKABLES_COLLECTION, ReprSelector::new(ReprToken::Refined))
    }

    /// When forced, the collection's selector wins over authored reprs.
    #[must_use]
    pub fn with_forced_repr(mut self, forced: bool) -> Self {
        self.forced_repr = forced;
        self
    }

    /// Replace the include roots.
    #[must_use]
    pub fn with_root_paths(mut self, roots: Vec<ObjectPath>) -> Self {
        self.root_paths = roots;
        self
    }

    /// Replace the excluded subtrees.
    #[must_use]
    pub fn with_exclude_paths(mut self, excludes: Vec<ObjectPath>) -> Self {
        self.exclude_paths = excludes;
        self
    }

    /// Unique collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default repr selector.
    #[must_use]
    pub fn repr_selector(&self) -> &ReprSelector {
        &self.repr_selector
    }

    /// Whether authored reprs are ignored.
    #[must_use]
    pub fn forced_repr(&self) -> bool {
        self.forced_repr
    }

    /// Whether `path` is drawn by this collection.
    #[must_use]
    pub fn contains(&self, path: &ObjectPath) -> bool {
        self.root_paths.iter().any(|root| path.has_prefix(root))
            && !self.exclude_paths.iter().any(|ex| path.has_prefix(ex))
    }

    /// The repr this collection draws an object with: the authored repr if
    /// any (and not forced), otherwise the selector's primary token.
    #[must_use]
    pub fn resolve_repr(&self, style: &DisplayStyle) -> ReprToken {
        match style.repr {
            Some(authored) if !self.forced_repr => authored,
            _ => self.repr_selector.primary(),
        }
    }
}
