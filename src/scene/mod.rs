//! Authoritative scene: insertion-ordered objects and their display styles.
//!
//! The scene only stores authored data. It knows nothing about collections
//! or caches; style edits are routed through
//! [`RenderIndex`](crate::render_index::RenderIndex) so the change tracker
//! sees them.

pub mod mesh;
mod object;
mod path;

use glam::{Mat4, Vec4};
use indexmap::IndexMap;
pub use mesh::QuadMesh;
pub use object::{DisplayStyle, SceneObject};
pub use path::ObjectPath;

use crate::error::PickError;
use crate::repr::ReprToken;

/// Colors handed out to objects added without an explicit color.
const PALETTE: [[f32; 4]; 4] = [
    [0.8, 0.35, 0.25, 1.0],
    [0.25, 0.55, 0.85, 1.0],
    [0.35, 0.75, 0.35, 1.0],
    [0.85, 0.75, 0.3, 1.0],
];

/// The authoritative scene. Owns all objects in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: IndexMap<ObjectPath, SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Object management --

    /// Add a unit cube (`[-1, 1]^3` cage) under `path` with `transform`.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used.
    pub fn add_cube(
        &mut self,
        path: ObjectPath,
        transform: Mat4,
    ) -> Result<u32, PickError> {
        let color = Vec4::from(PALETTE[self.objects.len() % PALETTE.len()]);
        self.add_mesh(path, QuadMesh::cube(), transform, color)
    }

    /// Add an arbitrary quad mesh. Returns the assigned prim id.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used or the
    /// mesh fails [`QuadMesh::validate`].
    pub fn add_mesh(
        &mut self,
        path: ObjectPath,
        topology: QuadMesh,
        transform: Mat4,
        display_color: Vec4,
    ) -> Result<u32, PickError> {
        if self.objects.contains_key(&path) {
            return Err(PickError::InvalidInput(format!(
                "object {path} already exists"
            )));
        }
        topology.validate()?;
        let prim_id = self.objects.len() as u32;
        log::debug!("adding {path} as prim {prim_id}");
        let object = SceneObject {
            path: path.clone(),
            prim_id,
            transform,
            display_color,
            topology,
            style: DisplayStyle::default(),
        };
        let _ = self.objects.insert(path, object);
        Ok(prim_id)
    }

    /// Read access to an object.
    #[must_use]
    pub fn object(&self, path: &ObjectPath) -> Option<&SceneObject> {
        self.objects.get(path)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &ObjectPath) -> bool {
        self.objects.contains_key(path)
    }

    // -- Style edits --

    fn style_mut(
        &mut self,
        path: &ObjectPath,
    ) -> Result<&mut SceneObject, PickError> {
        self.objects
            .get_mut(path)
            .ok_or_else(|| PickError::UnknownObject(path.clone()))
    }

    /// Set the refine level. Returns the previous level.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub(crate) fn set_refine_level(
        &mut self,
        path: &ObjectPath,
        level: u32,
    ) -> Result<u32, PickError> {
        let object = self.style_mut(path)?;
        let previous = object.style.refine_level;
        object.style.refine_level = level;
        Ok(previous)
    }

    /// Set (or clear) the authored repr. Returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub(crate) fn set_repr(
        &mut self,
        path: &ObjectPath,
        repr: Option<ReprToken>,
    ) -> Result<Option<ReprToken>, PickError> {
        let object = self.style_mut(path)?;
        let previous = object.style.repr;
        object.style.repr = repr;
        Ok(previous)
    }
}
