//! Render index: the scene, its change tracker and per-collection draw
//! batches.
//!
//! Style edits enter through here so the tracker sees them. Each collection
//! owns a [`DrawBatchCache`] that is rebuilt wholesale whenever the
//! collection's version moved; repr geometry is shared between collections
//! through a cache keyed by `(prim id, repr)`.

use std::sync::Arc;

use glam::{Mat4, Vec4};
use rustc_hash::FxHashMap;

use crate::change_tracker::ChangeTracker;
use crate::collection::RenderCollection;
use crate::error::PickError;
use crate::render::DrawGeometry;
use crate::repr::ReprToken;
use crate::scene::{ObjectPath, QuadMesh, Scene, SceneObject};

/// One object as drawn by one collection.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Scene path of the source object.
    pub path: ObjectPath,
    /// Dense scene index of the source object.
    pub prim_id: u32,
    /// Repr the collection resolved for this object.
    pub repr: ReprToken,
    /// Display color.
    pub color: Vec4,
    /// Shared world-space geometry.
    pub geometry: Arc<DrawGeometry>,
}

/// Draw items of one collection plus the version they were built at.
#[derive(Debug, Default)]
pub struct DrawBatchCache {
    version: Option<u64>,
    items: Vec<DrawItem>,
    rebuilds: u64,
}

impl DrawBatchCache {
    /// Collection version the items reflect, if ever built.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Cached items in scene order.
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Number of wholesale rebuilds so far.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

#[derive(Debug)]
struct ReprGeometry {
    refine_level: u32,
    geometry: Arc<DrawGeometry>,
}

/// Owns the scene and everything derived from it.
#[derive(Debug, Default)]
pub struct RenderIndex {
    scene: Scene,
    tracker: ChangeTracker,
    repr_cache: FxHashMap<(u32, ReprToken), ReprGeometry>,
    batches: FxHashMap<String, DrawBatchCache>,
    geometry_builds: u64,
}

impl RenderIndex {
    /// Empty index with the display collection registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The authoritative scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Change tracker state.
    #[must_use]
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Register a collection so it can be synced.
    pub fn register_collection(&mut self, name: &str) {
        self.tracker.register_collection(name);
    }

    // -- Scene edits --

    /// Add a unit cube. Returns its prim id.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used.
    pub fn add_cube(
        &mut self,
        path: ObjectPath,
        transform: Mat4,
    ) -> Result<u32, PickError> {
        let prim_id = self.scene.add_cube(path.clone(), transform)?;
        self.tracker.object_inserted(path);
        Ok(prim_id)
    }

    /// Add an arbitrary quad mesh. Returns its prim id.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if `path` is already used or the
    /// mesh is malformed.
    pub fn add_mesh(
        &mut self,
        path: ObjectPath,
        topology: QuadMesh,
        transform: Mat4,
        color: Vec4,
    ) -> Result<u32, PickError> {
        let prim_id =
            self.scene.add_mesh(path.clone(), topology, transform, color)?;
        self.tracker.object_inserted(path);
        Ok(prim_id)
    }

    /// Change an object's refine level.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub fn set_refine_level(
        &mut self,
        path: &ObjectPath,
        level: u32,
    ) -> Result<(), PickError> {
        let previous = self.scene.set_refine_level(path, level)?;
        self.tracker.mark_style_dirty(path)?;
        log::debug!("{path}: refine level {previous} -> {level}");
        Ok(())
    }

    /// Author (or clear) an object's repr.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if `path` is not in the scene.
    pub fn set_repr(
        &mut self,
        path: &ObjectPath,
        repr: Option<ReprToken>,
    ) -> Result<(), PickError> {
        let previous = self.scene.set_repr(path, repr)?;
        self.tracker.mark_style_dirty(path)?;
        log::debug!("{path}: repr {previous:?} -> {repr:?}");
        Ok(())
    }

    // -- Sync --

    /// Bring a collection's draw batch up to date and return its items.
    ///
    /// Runs pending garbage collection first, so a style edit anywhere
    /// rebuilds every collection on its next sync.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnregisteredCollection`] if the collection was
    /// never registered.
    pub fn sync_collection(
        &mut self,
        collection: &RenderCollection,
    ) -> Result<&[DrawItem], PickError> {
        if self.tracker.collect_garbage() {
            log::debug!("garbage collection bumped all collections");
        }
        let version = self.tracker.collection_version(collection.name())?;
        let batch = self
            .batches
            .entry(collection.name().to_owned())
            .or_default();

        if batch.version != Some(version) {
            batch.items.clear();
            for object in self.scene.objects() {
                if !collection.contains(object.path()) {
                    continue;
                }
                let repr = collection.resolve_repr(&object.style());
                let geometry = repr_geometry(
                    &mut self.repr_cache,
                    &mut self.geometry_builds,
                    object,
                    repr,
                );
                batch.items.push(DrawItem {
                    path: object.path().clone(),
                    prim_id: object.prim_id(),
                    repr,
                    color: object.display_color(),
                    geometry,
                });
                self.tracker.mark_clean(object.path());
            }
            batch.version = Some(version);
            batch.rebuilds += 1;
            log::debug!(
                "rebuilt '{}' at version {version}: {} items",
                collection.name(),
                batch.items.len()
            );
        }
        Ok(&batch.items)
    }

    /// Batch cache of a collection, if it has been synced.
    #[must_use]
    pub fn batch(&self, name: &str) -> Option<&DrawBatchCache> {
        self.batches.get(name)
    }

    /// Times a collection's batch has been rebuilt.
    #[must_use]
    pub fn rebuild_count(&self, name: &str) -> u64 {
        self.batches.get(name).map_or(0, DrawBatchCache::rebuilds)
    }

    /// Times repr geometry was (re)built from a cage.
    #[must_use]
    pub fn geometry_build_count(&self) -> u64 {
        self.geometry_builds
    }
}

/// Cached geometry for `object` drawn as `repr`, rebuilt only when the level
/// the repr actually consumes has changed.
fn repr_geometry(
    cache: &mut FxHashMap<(u32, ReprToken), ReprGeometry>,
    builds: &mut u64,
    object: &SceneObject,
    repr: ReprToken,
) -> Arc<DrawGeometry> {
    let level = if repr.honors_refine_level() {
        object.style().refine_level
    } else {
        0
    };
    let key = (object.prim_id(), repr);
    if let Some(cached) = cache.get(&key) {
        if cached.refine_level == level {
            return Arc::clone(&cached.geometry);
        }
    }
    *builds += 1;
    let geometry = Arc::new(DrawGeometry::build(object, repr));
    let _ = cache.insert(
        key,
        ReprGeometry {
            refine_level: level,
            geometry: Arc::clone(&geometry),
        },
    );
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_tracker::ObjectState;
    use crate::collection::PICKABLES_COLLECTION;

    fn path(s: &str) -> ObjectPath {
        ObjectPath::new(s).unwrap()
    }

    fn two_cube_index() -> RenderIndex {
        let mut index = RenderIndex::new();
        index.register_collection(PICKABLES_COLLECTION);
        let _ = index
            .add_cube(path("/cube1"), Mat4::from_translation(glam::Vec3::X * -5.0))
            .unwrap();
        let _ = index
            .add_cube(path("/cube2"), Mat4::from_translation(glam::Vec3::X * 5.0))
            .unwrap();
        index
    }

    #[test]
    fn sync_is_cached_until_version_moves() {
        let mut index = two_cube_index();
        let display = RenderCollection::display(ReprToken::Hull);
        assert_eq!(index.sync_collection(&display).unwrap().len(), 2);
        assert_eq!(index.sync_collection(&display).unwrap().len(), 2);
        assert_eq!(index.rebuild_count("geometry"), 1);
    }

    #[test]
    fn style_edit_rebuilds_every_collection() {
        let mut index = two_cube_index();
        let display = RenderCollection::display(ReprToken::Hull);
        let pick = RenderCollection::pickables();
        let _ = index.sync_collection(&display).unwrap();
        let _ = index.sync_collection(&pick).unwrap();

        index.set_refine_level(&path("/cube1"), 2).unwrap();
        assert_eq!(
            index.tracker().object_state(&path("/cube1")),
            Some(ObjectState::StyleDirty)
        );
        let _ = index.sync_collection(&display).unwrap();
        let _ = index.sync_collection(&pick).unwrap();
        assert_eq!(index.rebuild_count("geometry"), 2);
        assert_eq!(index.rebuild_count(PICKABLES_COLLECTION), 2);
        assert_eq!(
            index.tracker().object_state(&path("/cube1")),
            Some(ObjectState::Clean)
        );
    }

    #[test]
    fn refine_level_reaches_only_refined_reprs() {
        let mut index = two_cube_index();
        let display = RenderCollection::display(ReprToken::Hull);
        let pick = RenderCollection::pickables();
        let _ = index.sync_collection(&display).unwrap();
        let _ = index.sync_collection(&pick).unwrap();
        let builds = index.geometry_build_count();

        index.set_refine_level(&path("/cube1"), 2).unwrap();
        let hull = index.sync_collection(&display).unwrap();
        assert_eq!(hull[0].geometry.triangles.len(), 12);
        let refined = index.sync_collection(&pick).unwrap();
        assert_eq!(refined[0].repr, ReprToken::Refined);
        assert_eq!(refined[0].geometry.triangles.len(), 192);
        // Only cube1's refined geometry was rebuilt.
        assert_eq!(index.geometry_build_count(), builds + 1);
    }

    #[test]
    fn authored_repr_reaches_both_collections() {
        let mut index = two_cube_index();
        index
            .set_repr(&path("/cube2"), Some(ReprToken::RefinedWire))
            .unwrap();
        let display = RenderCollection::display(ReprToken::Hull);
        let pick = RenderCollection::pickables();
        assert_eq!(
            index.sync_collection(&display).unwrap()[1].repr,
            ReprToken::RefinedWire
        );
        assert_eq!(
            index.sync_collection(&pick).unwrap()[1].repr,
            ReprToken::RefinedWire
        );
    }

    #[test]
    fn excluded_paths_are_not_drawn() {
        let mut index = two_cube_index();
        let pick = RenderCollection::pickables()
            .with_exclude_paths(vec![path("/cube2")]);
        let items = index.sync_collection(&pick).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path.as_str(), "/cube1");
    }

    #[test]
    fn unregistered_collection_is_an_error() {
        let mut index = two_cube_index();
        let other = RenderCollection::new("other", crate::repr::ReprSelector::new(ReprToken::Hull));
        assert!(matches!(
            index.sync_collection(&other),
            Err(PickError::UnregisteredCollection(_))
        ));
        assert!(matches!(
            index.set_repr(&path("/nope"), None),
            Err(PickError::UnknownObject(_))
        ));
    }
}
