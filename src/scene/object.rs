use glam::{Mat4, Vec4};

use super::mesh::QuadMesh;
use super::ObjectPath;
use crate::repr::ReprToken;

/// Per-object rendering style shared by every collection drawing the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayStyle {
    /// Authored representation; overrides the collection default unless the
    /// collection forces its own.
    pub repr: Option<ReprToken>,
    /// Subdivision level consulted by refined representations.
    pub refine_level: u32,
}

/// A scene object: a quad cage with a transform, color and display style.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(super) path: ObjectPath,
    pub(super) prim_id: u32,
    pub(super) transform: Mat4,
    pub(super) display_color: Vec4,
    pub(super) topology: QuadMesh,
    pub(super) style: DisplayStyle,
}

impl SceneObject {
    /// Scene identity.
    #[must_use]
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Dense index assigned at insertion.
    #[must_use]
    pub fn prim_id(&self) -> u32 {
        self.prim_id
    }

    /// Object-to-world transform.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Linear RGBA display color.
    #[must_use]
    pub fn display_color(&self) -> Vec4 {
        self.display_color
    }

    /// Authored cage.
    #[must_use]
    pub fn topology(&self) -> &QuadMesh {
        &self.topology
    }

    /// Current display style.
    #[must_use]
    pub fn style(&self) -> DisplayStyle {
        self.style
    }
}
