//! Pick hits and hit resolution modes.

use glam::Vec3;
use indexmap::map::Entry;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::ObjectPath;

/// How raw per-pixel hits are reduced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum ResolveMode {
    /// Only the single hit closest to the camera.
    #[serde(rename = "resolveNearestToCamera")]
    NearestToCamera,
    /// One hit per object, the closest one, in first-encounter order.
    #[default]
    #[serde(rename = "resolveUnique")]
    Unique,
    /// Every hit.
    #[serde(rename = "resolveAll")]
    All,
}

impl ResolveMode {
    /// Reduce `hits` according to the mode.
    #[must_use]
    pub fn resolve(self, hits: Vec<PickHit>) -> Vec<PickHit> {
        match self {
            Self::NearestToCamera => hits
                .into_iter()
                .min_by(|a, b| a.normalized_depth.total_cmp(&b.normalized_depth))
                .into_iter()
                .collect(),
            Self::Unique => {
                let mut unique: IndexMap<ObjectPath, PickHit> = IndexMap::new();
                for hit in hits {
                    match unique.entry(hit.object_path.clone()) {
                        Entry::Occupied(mut slot) => {
                            if hit.normalized_depth < slot.get().normalized_depth {
                                let _ = slot.insert(hit);
                            }
                        }
                        Entry::Vacant(slot) => {
                            let _ = slot.insert(hit);
                        }
                    }
                }
                unique.into_values().collect()
            }
            Self::All => hits,
        }
    }
}

/// One resolved pick hit.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Object that was hit.
    pub object_path: ObjectPath,
    /// Instance index, for instanced draw items.
    pub instance_index: Option<u32>,
    /// Coarse face (or edge/point owner face) index.
    pub element_index: Option<u32>,
    /// Window-space depth in `[0, 1]`.
    pub normalized_depth: f32,
    /// Hit position reconstructed from the pick pixel and its depth.
    pub world_space_hit_point: Vec3,
}

#[cfg(test)]
mod tests {
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
    fn unique_keeps_first_order_and_min_depth() {
        let hits = vec![
            hit("/b", 0, 0.6),
            hit("/a", 1, 0.5),
            hit("/b", 2, 0.3),
            hit("/a", 3, 0.9),
        ];
        let resolved = ResolveMode::Unique.resolve(hits);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].object_path.as_str(), "/b");
        assert_eq!(resolved[0].element_index, Some(2));
        assert_eq!(resolved[1].object_path.as_str(), "/a");
        assert_eq!(resolved[1].element_index, Some(1));
    }

    #[test]
    fn nearest_picks_global_minimum() {
        let hits = vec![hit("/b", 0, 0.6), hit("/a", 1, 0.2), hit("/b", 2, 0.3)];
        let resolved = ResolveMode::NearestToCamera.resolve(hits);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].object_path.as_str(), "/a");
    }

    #[test]
    fn all_keeps_everything_and_empty_stays_empty() {
        let hits = vec![hit("/a", 0, 0.6), hit("/a", 0, 0.6)];
        assert_eq!(ResolveMode::All.resolve(hits).len(), 2);
        for mode in [ResolveMode::NearestToCamera, ResolveMode::Unique, ResolveMode::All] {
            assert!(mode.resolve(Vec::new()).is_empty());
        }
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&ResolveMode::NearestToCamera).unwrap();
        assert_eq!(json, "\"resolveNearestToCamera\"");
        let mode: ResolveMode = serde_json::from_str("\"resolveAll\"").unwrap();
        assert_eq!(mode, ResolveMode::All);
    }
}
