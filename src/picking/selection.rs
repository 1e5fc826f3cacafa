//! Selections keyed by highlight mode, and hit-to-selection translation.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::hit::{PickHit, ResolveMode};
use crate::scene::ObjectPath;

/// Highlight channel a selection entry belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// Persistent selection.
    #[default]
    Select,
    /// Transient rollover highlight.
    Locate,
}

impl HighlightMode {
    /// Both modes, in priority order for drawing.
    pub const ALL: [Self; 2] = [Self::Select, Self::Locate];
}

/// What was selected on one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedObject {
    /// Coarse face indices, in hit order.
    pub element_indices: IndexSet<u32>,
    /// Instance indices, in hit order.
    pub instance_indices: IndexSet<u32>,
}

/// Selected objects per highlight mode. Each object appears at most once per
/// mode; objects keep the order they were first added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    modes: BTreeMap<HighlightMode, IndexMap<ObjectPath, SelectedObject>>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no mode holds any object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.values().all(IndexMap::is_empty)
    }

    /// Select an object (whole-object selection).
    pub fn add_object(&mut self, mode: HighlightMode, path: ObjectPath) {
        let _ = self.modes.entry(mode).or_default().entry(path).or_default();
    }

    /// Select an object and record the element/instance a hit landed on.
    pub fn add_hit(
        &mut self,
        mode: HighlightMode,
        path: ObjectPath,
        element: Option<u32>,
        instance: Option<u32>,
    ) {
        let entry = self.modes.entry(mode).or_default().entry(path).or_default();
        if let Some(element) = element {
            let _ = entry.element_indices.insert(element);
        }
        if let Some(instance) = instance {
            let _ = entry.instance_indices.insert(instance);
        }
    }

    /// Drop everything recorded under `mode`.
    pub fn clear_mode(&mut self, mode: HighlightMode) {
        let _ = self.modes.remove(&mode);
    }

    /// Selected paths under `mode`, in insertion order.
    #[must_use]
    pub fn selected_paths(&self, mode: HighlightMode) -> Vec<&ObjectPath> {
        self.modes
            .get(&mode)
            .map(|objects| objects.keys().collect())
            .unwrap_or_default()
    }

    /// Selection details of one object under `mode`.
    #[must_use]
    pub fn selected_object(
        &self,
        mode: HighlightMode,
        path: &ObjectPath,
    ) -> Option<&SelectedObject> {
        self.modes.get(&mode).and_then(|objects| objects.get(path))
    }

    /// Whether `path` is selected under `mode`.
    #[must_use]
    pub fn contains(&self, mode: HighlightMode, path: &ObjectPath) -> bool {
        self.selected_object(mode, path).is_some()
    }

    /// Highest-priority mode `path` is selected under, if any.
    #[must_use]
    pub fn highlight_of(&self, path: &ObjectPath) -> Option<HighlightMode> {
        HighlightMode::ALL
            .into_iter()
            .find(|mode| self.contains(*mode, path))
    }
}

/// Build a fresh selection from raw hits.
#[must_use]
pub fn translate_hits_to_selection(
    resolve_mode: ResolveMode,
    highlight_mode: HighlightMode,
    hits: &[PickHit],
) -> Selection {
    let mut selection = Selection::new();
    translate_hits_into(&mut selection, resolve_mode, highlight_mode, hits);
    selection
}

/// Replace `highlight_mode`'s entries of `selection` with the resolved hits.
/// Other modes are left untouched. An empty hit list deselects the mode.
pub fn translate_hits_into(
    selection: &mut Selection,
    resolve_mode: ResolveMode,
    highlight_mode: HighlightMode,
    hits: &[PickHit],
) {
    selection.clear_mode(highlight_mode);
    for hit in resolve_mode.resolve(hits.to_vec()) {
        selection.add_hit(
            highlight_mode,
            hit.object_path,
            hit.element_index,
            hit.instance_index,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn hit(path: &str, element: u32, depth: f32) -> PickHit {
        PickHit {
            object_path: ObjectPath::new(path).unwrap(),
            instance_index: None,
            element_index: Some(element),
            normalized_depth: depth,
            world_space_hit_point: Vec3::ZERO,
        }
    }

    #[test]
    fn empty_hits_deselect() {
        let selection =
            translate_hits_to_selection(ResolveMode::Unique, HighlightMode::Select, &[]);
        assert!(selection.is_empty());
        assert!(selection.selected_paths(HighlightMode::Select).is_empty());
    }

    #[test]
    fn unique_lists_each_object_once() {
        let hits = [hit("/cube2", 0, 0.4), hit("/cube2", 0, 0.41), hit("/cube2", 1, 0.5)];
        let selection =
            translate_hits_to_selection(ResolveMode::Unique, HighlightMode::Select, &hits);
        let paths = selection.selected_paths(HighlightMode::Select);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].as_str(), "/cube2");
    }

    #[test]
    fn all_keeps_every_element_once_per_object() {
        let hits = [hit("/a", 0, 0.4), hit("/a", 3, 0.5), hit("/a", 0, 0.45)];
        let selection =
            translate_hits_to_selection(ResolveMode::All, HighlightMode::Select, &hits);
        let path = ObjectPath::new("/a").unwrap();
        let object = selection.selected_object(HighlightMode::Select, &path).unwrap();
        let elements: Vec<u32> = object.element_indices.iter().copied().collect();
        assert_eq!(elements, [0, 3]);
    }

    #[test]
    fn modes_coexist() {
        let mut selection = Selection::new();
        selection.add_object(HighlightMode::Locate, ObjectPath::new("/a").unwrap());
        translate_hits_into(
            &mut selection,
            ResolveMode::Unique,
            HighlightMode::Select,
            &[hit("/b", 0, 0.2)],
        );
        assert_eq!(selection.selected_paths(HighlightMode::Locate).len(), 1);
        assert_eq!(selection.selected_paths(HighlightMode::Select).len(), 1);
        // Select wins over Locate when both apply.
        selection.add_object(HighlightMode::Select, ObjectPath::new("/a").unwrap());
        assert_eq!(
            selection.highlight_of(&ObjectPath::new("/a").unwrap()),
            Some(HighlightMode::Select)
        );

        translate_hits_into(&mut selection, ResolveMode::Unique, HighlightMode::Select, &[]);
        assert!(selection.selected_paths(HighlightMode::Select).is_empty());
        assert!(!selection.is_empty());
    }
}
