//! Pick resolution math, hit resolution and selections.
//!
//! A pick renders object/element IDs into a small off-screen target through a
//! narrowed projection, reduces the per-pixel hits by a [`ResolveMode`], and
//! translates them into a [`Selection`] keyed by [`HighlightMode`].

mod hit;
pub(crate) mod pick_map;
mod resolution;
mod selection;
mod tracker;

pub use hit::{PickHit, ResolveMode};
pub use pick_map::{PickMap, PickTarget};
pub use resolution::{
    check_viewport, compute_narrowed_projection, compute_resolution, narrowed_frustum,
    ScreenRect, DEFAULT_MINIMUM_RESOLUTION, MAX_VIEWPORT_DIMENSION,
};
pub use selection::{
    translate_hits_into, translate_hits_to_selection, HighlightMode, SelectedObject,
    Selection,
};
pub use tracker::SelectionTracker;
