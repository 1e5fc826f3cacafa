//! Scene and style-mutation methods for PickEngine

use glam::{Mat4, Vec4};

use super::PickEngine;
use crate::error::PickError;
use crate::repr::ReprToken;
use crate::scene::{ObjectPath, QuadMesh};

impl PickEngine {
    /// Add a unit cube to the scene. Returns its prim id.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used.
    pub fn add_cube(
        &mut self,
        path: ObjectPath,
        transform: Mat4,
    ) -> Result<u32, PickError> {
        self.index.add_cube(path, transform)
    }

    /// Add an arbitrary quad mesh. Returns its prim id.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used or a
    /// face references a missing point.
    pub fn add_mesh(
        &mut self,
        path: ObjectPath,
        topology: QuadMesh,
        transform: Mat4,
        color: Vec4,
    ) -> Result<u32, PickError> {
        self.index.add_mesh(path, topology, transform, color)
    }

    /// Set an object's refine level. Takes effect on the next pass.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub fn set_refine_level(
        &mut self,
        path: &ObjectPath,
        level: u32,
    ) -> Result<(), PickError> {
        self.index.set_refine_level(path, level)
    }

    /// Author or clear an object's repr.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub fn set_repr(
        &mut self,
        path: &ObjectPath,
        repr: Option<ReprToken>,
    ) -> Result<(), PickError> {
        self.index.set_repr(path, repr)
    }

    /// Author an object's repr by name. An empty name clears it so the
    /// collection defaults apply again.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] for unknown names and
    /// [`PickError::UnknownObject`] if `path` is not in the scene.
    pub fn set_repr_name(
        &mut self,
        path: &ObjectPath,
        name: &str,
    ) -> Result<(), PickError> {
        let repr = if name.is_empty() {
            None
        } else {
            Some(name.parse::<ReprToken>()?)
        };
        self.set_repr(path, repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::render::SoftwareBackend;

    #[test]
    fn repr_names_parse_and_clear() {
        let mut engine =
            PickEngine::new(Options::default(), Box::new(SoftwareBackend::new()));
        let cube = ObjectPath::new("/cube").unwrap();
        let _ = engine.add_cube(cube.clone(), Mat4::IDENTITY).unwrap();

        engine.set_repr_name(&cube, "refinedWire").unwrap();
        let style = engine.index().scene().object(&cube).unwrap().style();
        assert_eq!(style.repr, Some(ReprToken::RefinedWire));

        engine.set_repr_name(&cube, "").unwrap();
        let style = engine.index().scene().object(&cube).unwrap().style();
        assert_eq!(style.repr, None);

        assert!(matches!(
            engine.set_repr_name(&cube, "bogus"),
            Err(PickError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.set_refine_level(&ObjectPath::new("/nope").unwrap(), 1),
            Err(PickError::UnknownObject(_))
        ));
    }

    #[test]
    fn malformed_mesh_is_rejected_before_any_pass() {
        let mut engine =
            PickEngine::new(Options::default(), Box::new(SoftwareBackend::new()));
        let mesh = QuadMesh::new(
            vec![glam::Vec3::ZERO, glam::Vec3::X, glam::Vec3::Y],
            vec![[0, 1, 2, 9]],
        );
        let bad = ObjectPath::new("/bad").unwrap();
        assert!(matches!(
            engine.add_mesh(bad.clone(), mesh, Mat4::IDENTITY, Vec4::ONE),
            Err(PickError::InvalidInput(_))
        ));
        assert!(!engine.index().scene().contains(&bad));
        assert!(engine.index().tracker().object_state(&bad).is_none());
    }
}
