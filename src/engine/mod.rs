//! Render/pick orchestration.
//!
//! [`PickEngine`] owns the render index, the two collections and a backend.
//! Display and pick passes are independent executions over the same index:
//! the display pass draws `geometry`, the pick pass draws `pickables` into
//! a narrowed target. Either one runs outstanding invalidation first.

mod pick_task;
mod render_task;
mod scene_management;

use glam::{IVec2, Mat4, UVec2};
pub use pick_task::PickContext;

use crate::camera::Frustum;
use crate::collection::{RenderCollection, PICKABLES_COLLECTION};
use crate::error::PickError;
use crate::options::Options;
use crate::picking::{
    check_viewport, compute_resolution, narrowed_frustum, translate_hits_to_selection,
    HighlightMode, PickHit, ResolveMode, ScreenRect, Selection, SelectionTracker,
    MAX_VIEWPORT_DIMENSION,
};
use crate::render::{create_backend, ColorImage, RenderBackend};
use crate::render_index::RenderIndex;
use crate::repr::ReprSelector;

/// A pick gesture plus the knobs [`PickEngine::pick`] fills from options.
#[derive(Debug, Clone, Copy)]
pub struct PickRequest<'a> {
    /// Gesture start in window pixels (top-left origin).
    pub start: IVec2,
    /// Gesture end in window pixels.
    pub end: IVec2,
    /// Full viewport size.
    pub viewport: UVec2,
    /// Frustum the display pass renders with.
    pub frustum: &'a Frustum,
    /// World-to-view matrix.
    pub view: Mat4,
    /// Hit reduction.
    pub resolve_mode: ResolveMode,
    /// Highlight mode the selection is recorded under.
    pub highlight_mode: HighlightMode,
    /// Smallest pick target.
    pub minimum_resolution: UVec2,
}

/// Drives display and pick passes over one scene.
pub struct PickEngine {
    index: RenderIndex,
    display: RenderCollection,
    pickables: RenderCollection,
    backend: Box<dyn RenderBackend>,
    options: Options,
}

impl PickEngine {
    /// Engine over an empty scene using `backend`.
    ///
    /// The display collection takes its default repr from
    /// `options.display.repr`; the pick collection from
    /// `options.picking.pickables_repr`.
    #[must_use]
    pub fn new(options: Options, backend: Box<dyn RenderBackend>) -> Self {
        let mut index = RenderIndex::new();
        index.register_collection(PICKABLES_COLLECTION);
        let display = RenderCollection::display(options.display.repr);
        let pickables = RenderCollection::new(
            PICKABLES_COLLECTION,
            ReprSelector::new(options.picking.pickables_repr),
        );
        log::debug!(
            "engine on {}: display '{}', pickables '{}'",
            backend.name(),
            options.display.repr,
            options.picking.pickables_repr
        );
        Self {
            index,
            display,
            pickables,
            backend,
            options,
        }
    }

    /// Engine with the backend named in `options.render.backend`.
    ///
    /// # Errors
    ///
    /// Propagates backend creation failures.
    pub fn from_options(options: Options) -> Result<Self, PickError> {
        let backend = create_backend(options.render.backend)?;
        Ok(Self::new(options, backend))
    }

    // -- Accessors --

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Scene, tracker and batch caches.
    #[must_use]
    pub fn index(&self) -> &RenderIndex {
        &self.index
    }

    /// The display collection (`geometry`).
    #[must_use]
    pub fn display_collection(&self) -> &RenderCollection {
        &self.display
    }

    /// The pick collection (`pickables`).
    #[must_use]
    pub fn pickables_collection(&self) -> &RenderCollection {
        &self.pickables
    }

    /// Name of the active backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // -- Passes --

    /// Draw the display collection, highlighting `selection`.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] for a zero-area or oversized
    /// viewport and propagates backend errors.
    pub fn render_frame(
        &mut self,
        viewport: UVec2,
        view: Mat4,
        frustum: &Frustum,
        selection: &SelectionTracker,
    ) -> Result<ColorImage, PickError> {
        check_viewport(viewport)?;
        render_task::execute(
            &mut self.index,
            self.backend.as_mut(),
            &render_task::RenderContext {
                viewport,
                view,
                projection: frustum.compute_projection_matrix(),
                collection: &self.display,
                selection,
                options: &self.options,
            },
        )
    }

    /// Request for the gesture `start..end` with configured defaults.
    #[must_use]
    pub fn pick_request<'a>(
        &self,
        start: IVec2,
        end: IVec2,
        viewport: UVec2,
        frustum: &'a Frustum,
        view: Mat4,
    ) -> PickRequest<'a> {
        let picking = &self.options.picking;
        PickRequest {
            start,
            end,
            viewport,
            frustum,
            view,
            resolve_mode: picking.resolve_mode,
            highlight_mode: picking.highlight_mode,
            minimum_resolution: picking.minimum_resolution(),
        }
    }

    /// Pick the gesture `start..end` and translate the hits into a
    /// selection using the configured resolve and highlight modes.
    ///
    /// A zero-area gesture is a click, not an error. The rectangle is
    /// clipped to the viewport; one lying entirely outside it hits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] for a zero-area or oversized
    /// viewport and propagates backend errors.
    pub fn pick(
        &mut self,
        start: IVec2,
        end: IVec2,
        viewport: UVec2,
        frustum: &Frustum,
        view: Mat4,
    ) -> Result<Selection, PickError> {
        let request = self.pick_request(start, end, viewport, frustum, view);
        self.pick_with(&request)
    }

    /// Pick with explicit resolve mode, highlight mode and resolution.
    ///
    /// # Errors
    ///
    /// Same as [`Self::pick`].
    pub fn pick_with(
        &mut self,
        request: &PickRequest<'_>,
    ) -> Result<Selection, PickError> {
        let hits = self.pick_hits(request)?;
        Ok(translate_hits_to_selection(
            request.resolve_mode,
            request.highlight_mode,
            &hits,
        ))
    }

    /// Raw resolved hits of a pick, before selection translation.
    ///
    /// # Errors
    ///
    /// Same as [`Self::pick`].
    pub fn pick_hits(
        &mut self,
        request: &PickRequest<'_>,
    ) -> Result<Vec<PickHit>, PickError> {
        check_viewport(request.viewport)?;
        let Some(rect) = ScreenRect::from_corners(request.start, request.end)
            .clipped_to(request.viewport)
        else {
            log::debug!(
                "pick rectangle {}..{} lies outside the viewport",
                request.start,
                request.end
            );
            return Ok(Vec::new());
        };
        let narrowed =
            narrowed_frustum(rect.min, rect.max, request.viewport, request.frustum)?;
        let resolution =
            compute_resolution(rect.min, rect.max, request.minimum_resolution)
                .min(UVec2::splat(MAX_VIEWPORT_DIMENSION));
        let mut hits = Vec::new();
        pick_task::execute(
            &mut self.index,
            self.backend.as_mut(),
            PickContext {
                resolution,
                resolve_mode: request.resolve_mode,
                view_matrix: request.view,
                projection_matrix: narrowed.compute_projection_matrix(),
                collection: &self.pickables,
                out_hits: &mut hits,
                point_size: self.options.picking.point_size,
            },
        )?;
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::render::SoftwareBackend;
    use crate::repr::ReprToken;
    use crate::scene::ObjectPath;

    const VIEWPORT: UVec2 = UVec2::new(640, 480);

    fn path(s: &str) -> ObjectPath {
        ObjectPath::new(s).unwrap()
    }

    fn engine() -> PickEngine {
        let mut engine =
            PickEngine::new(Options::default(), Box::new(SoftwareBackend::new()));
        let _ = engine
            .add_cube(path("/cube1"), Mat4::from_translation(Vec3::new(-5.0, 0.0, 0.0)))
            .unwrap();
        let _ = engine
            .add_cube(path("/cube2"), Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)))
            .unwrap();
        engine
    }

    fn view() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -20.0))
    }

    fn frustum() -> Frustum {
        Frustum::perspective(45.0, 640.0 / 480.0, 1.0, 1000.0)
    }

    /// Window pixel of a world point under the test camera.
    fn project(p: Vec3) -> IVec2 {
        let clip = frustum().compute_projection_matrix() * view() * p.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        IVec2::new(
            ((ndc.x + 1.0) * 0.5 * VIEWPORT.x as f32) as i32,
            ((1.0 - ndc.y) * 0.5 * VIEWPORT.y as f32) as i32,
        )
    }

    #[test]
    fn click_on_cube_selects_it_with_front_face() {
        let mut engine = engine();
        let p = project(Vec3::new(5.0, 0.0, 1.0));
        let selection = engine.pick(p, p, VIEWPORT, &frustum(), view()).unwrap();
        let paths = selection.selected_paths(HighlightMode::Select);
        assert_eq!(paths, [&path("/cube2")]);
        let object = selection
            .selected_object(HighlightMode::Select, &path("/cube2"))
            .unwrap();
        // Face 0 of the cage is the +z face.
        assert!(object.element_indices.contains(&0));
    }

    #[test]
    fn click_on_background_deselects() {
        let mut engine = engine();
        let p = project(Vec3::new(0.0, 0.0, 0.0));
        let selection = engine.pick(p, p, VIEWPORT, &frustum(), view()).unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn marquee_over_both_cubes_is_unique_per_object() {
        let mut engine = engine();
        let start = project(Vec3::new(-7.0, 2.0, 1.0));
        let end = project(Vec3::new(7.0, -2.0, 1.0));
        let frustum = frustum();
        let request = engine.pick_request(start, end, VIEWPORT, &frustum, view());
        let hits = engine.pick_hits(&request).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object_path, path("/cube1"));
        assert_eq!(hits[1].object_path, path("/cube2"));
    }

    #[test]
    fn hit_point_lies_on_the_front_face() {
        let mut engine = engine();
        let p = project(Vec3::new(5.0, 0.0, 1.0));
        let frustum = frustum();
        let mut request = engine.pick_request(p, p, VIEWPORT, &frustum, view());
        request.resolve_mode = ResolveMode::NearestToCamera;
        let hits = engine.pick_hits(&request).unwrap();
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert!((hit.world_space_hit_point.z - 1.0).abs() < 0.05);
        assert!((hit.world_space_hit_point.x - 5.0).abs() < 0.2);
        assert!(hit.normalized_depth > 0.0 && hit.normalized_depth < 1.0);
    }

    #[test]
    fn degenerate_viewport_is_invalid_input() {
        let mut engine = engine();
        let p = IVec2::new(3, 3);
        assert!(matches!(
            engine.pick(p, p, UVec2::new(0, 480), &frustum(), view()),
            Err(PickError::InvalidInput(_))
        ));
        let tracker = SelectionTracker::new();
        assert!(matches!(
            engine.render_frame(UVec2::new(640, 0), view(), &frustum(), &tracker),
            Err(PickError::InvalidInput(_))
        ));
    }

    #[test]
    fn picking_does_not_rebuild_display_batches() {
        let mut engine = engine();
        let tracker = SelectionTracker::new();
        let _ = engine
            .render_frame(VIEWPORT, view(), &frustum(), &tracker)
            .unwrap();
        let p = project(Vec3::new(5.0, 0.0, 1.0));
        let _ = engine.pick(p, p, VIEWPORT, &frustum(), view()).unwrap();
        let _ = engine.pick(p, p, VIEWPORT, &frustum(), view()).unwrap();
        assert_eq!(engine.index().rebuild_count("geometry"), 1);
        assert_eq!(engine.index().rebuild_count(PICKABLES_COLLECTION), 1);
    }

    #[test]
    fn pick_ignores_corner_order() {
        let mut engine = engine();
        let f = frustum();
        let a = project(Vec3::new(-7.0, 2.0, 1.0));
        let b = project(Vec3::new(7.0, -2.0, 1.0));
        let ab = engine.pick(a, b, VIEWPORT, &f, view()).unwrap();
        let ba = engine.pick(b, a, VIEWPORT, &f, view()).unwrap();
        let crossed = engine
            .pick(IVec2::new(a.x, b.y), IVec2::new(b.x, a.y), VIEWPORT, &f, view())
            .unwrap();
        assert_eq!(ab.selected_paths(HighlightMode::Select).len(), 2);
        assert_eq!(ab, ba);
        assert_eq!(ab, crossed);
    }

    #[test]
    fn drag_beyond_the_window_is_clipped() {
        let mut engine = engine();
        let f = frustum();
        let selection = engine
            .pick(IVec2::splat(-40_000), IVec2::splat(40_000), VIEWPORT, &f, view())
            .unwrap();
        let paths = selection.selected_paths(HighlightMode::Select);
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&&path("/cube1")));
        assert!(paths.contains(&&path("/cube2")));

        let off = IVec2::new(-10, -10);
        assert!(engine.pick(off, off, VIEWPORT, &f, view()).unwrap().is_empty());
    }

    #[test]
    fn oversized_viewport_is_invalid_input() {
        let mut engine = engine();
        let huge = UVec2::splat(100_000);
        let tracker = SelectionTracker::new();
        assert!(matches!(
            engine.render_frame(huge, view(), &frustum(), &tracker),
            Err(PickError::InvalidInput(_))
        ));
        let p = IVec2::new(3, 3);
        assert!(matches!(
            engine.pick(p, p, huge, &frustum(), view()),
            Err(PickError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_pick_restores_the_unselected_frame() {
        let mut engine = engine();
        let f = frustum();
        let mut tracker = SelectionTracker::new();
        let unselected = engine.render_frame(VIEWPORT, view(), &f, &tracker).unwrap();

        let p = project(Vec3::new(5.0, 0.0, 1.0));
        tracker.set_selection(engine.pick(p, p, VIEWPORT, &f, view()).unwrap());
        let highlighted = engine.render_frame(VIEWPORT, view(), &f, &tracker).unwrap();
        assert!(unselected.diff_count(&highlighted) > 0);

        let background = project(Vec3::ZERO);
        tracker.set_selection(
            engine
                .pick(background, background, VIEWPORT, &f, view())
                .unwrap(),
        );
        let cleared = engine.render_frame(VIEWPORT, view(), &f, &tracker).unwrap();
        assert_eq!(cleared.diff_count(&unselected), 0);
    }

    #[test]
    fn hull_refine_changes_pick_geometry_only() {
        let mut engine = engine();
        let tracker = SelectionTracker::new();
        let before = engine
            .render_frame(VIEWPORT, view(), &frustum(), &tracker)
            .unwrap();
        engine.set_refine_level(&path("/cube1"), 2).unwrap();
        let after = engine
            .render_frame(VIEWPORT, view(), &frustum(), &tracker)
            .unwrap();
        assert_eq!(before.diff_count(&after), 0);

        let p = project(Vec3::new(-5.0, 0.0, 1.0));
        let _ = engine.pick(p, p, VIEWPORT, &frustum(), view()).unwrap();
        let pick_items = engine
            .index()
            .batch(PICKABLES_COLLECTION)
            .unwrap()
            .items();
        assert_eq!(pick_items[0].repr, ReprToken::Refined);
        assert_eq!(pick_items[0].geometry.triangles.len(), 192);
    }
}
