//! Change tracking for style edits and collection versions.
//!
//! Objects move `Clean -> StyleDirty` on any repr or refine-level edit. A
//! style edit also requests garbage collection; the next execution runs it,
//! which bumps *every* registered collection so each draw batch cache
//! rebuilds wholesale. Objects return to `Clean` once a rebuild has synced
//! them.

use rustc_hash::FxHashMap;

use crate::collection::DISPLAY_COLLECTION;
use crate::error::PickError;
use crate::scene::ObjectPath;

/// Per-object invalidation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectState {
    /// Cached batches reflect the object's current style.
    #[default]
    Clean,
    /// A style edit has not yet been consumed by a batch rebuild.
    StyleDirty,
}

/// Tracks collection versions and per-object style dirtiness.
#[derive(Debug)]
pub struct ChangeTracker {
    collections: FxHashMap<String, u64>,
    objects: FxHashMap<ObjectPath, ObjectState>,
    needs_garbage_collection: bool,
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeTracker {
    /// Tracker with the display collection registered.
    #[must_use]
    pub fn new() -> Self {
        let mut collections = FxHashMap::default();
        let _ = collections.insert(DISPLAY_COLLECTION.to_owned(), 0);
        Self {
            collections,
            objects: FxHashMap::default(),
            needs_garbage_collection: false,
        }
    }

    // -- Collections --

    /// Register a collection name. Registering twice is a no-op.
    pub fn register_collection(&mut self, name: &str) {
        if !self.collections.contains_key(name) {
            log::debug!("registering collection '{name}'");
            let _ = self.collections.insert(name.to_owned(), 0);
        }
    }

    /// Whether `name` has been registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Current version of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnregisteredCollection`] for unknown names.
    pub fn collection_version(&self, name: &str) -> Result<u64, PickError> {
        self.collections
            .get(name)
            .copied()
            .ok_or_else(|| PickError::UnregisteredCollection(name.to_owned()))
    }

    /// Bump one collection.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnregisteredCollection`] for unknown names.
    pub fn mark_collection_dirty(&mut self, name: &str) -> Result<(), PickError> {
        let version = self
            .collections
            .get_mut(name)
            .ok_or_else(|| PickError::UnregisteredCollection(name.to_owned()))?;
        *version += 1;
        Ok(())
    }

    /// Bump every registered collection.
    pub fn mark_all_collections_dirty(&mut self) {
        for version in self.collections.values_mut() {
            *version += 1;
        }
    }

    // -- Objects --

    /// Start tracking a newly inserted object. Membership changed, so every
    /// collection is bumped.
    pub fn object_inserted(&mut self, path: ObjectPath) {
        let _ = self.objects.insert(path, ObjectState::Clean);
        self.mark_all_collections_dirty();
    }

    /// Record a repr or refine-level edit.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::UnknownObject`] if the object is not tracked.
    pub fn mark_style_dirty(&mut self, path: &ObjectPath) -> Result<(), PickError> {
        let state = self
            .objects
            .get_mut(path)
            .ok_or_else(|| PickError::UnknownObject(path.clone()))?;
        *state = ObjectState::StyleDirty;
        self.needs_garbage_collection = true;
        Ok(())
    }

    /// Mark an object as consumed by a rebuild.
    pub fn mark_clean(&mut self, path: &ObjectPath) {
        if let Some(state) = self.objects.get_mut(path) {
            *state = ObjectState::Clean;
        }
    }

    /// State of a tracked object.
    #[must_use]
    pub fn object_state(&self, path: &ObjectPath) -> Option<ObjectState> {
        self.objects.get(path).copied()
    }

    /// Number of objects currently style-dirty.
    #[must_use]
    pub fn dirty_object_count(&self) -> usize {
        self.objects
            .values()
            .filter(|s| **s == ObjectState::StyleDirty)
            .count()
    }

    /// Whether a style edit is waiting for garbage collection.
    #[must_use]
    pub fn needs_garbage_collection(&self) -> bool {
        self.needs_garbage_collection
    }

    /// Run pending garbage collection: invalidate every collection.
    /// Returns `true` if anything was collected.
    pub fn collect_garbage(&mut self) -> bool {
        if !self.needs_garbage_collection {
            return false;
        }
        log::debug!(
            "garbage collection: {} style-dirty objects, invalidating {} collections",
            self.dirty_object_count(),
            self.collections.len()
        );
        self.mark_all_collections_dirty();
        self.needs_garbage_collection = false;
        true
    }
}
