use glam::{IVec2, Mat4, UVec2, Vec3, Vec4};

use crate::camera::{Frustum, TestCamera};
use crate::engine::PickEngine;
use crate::error::PickError;
use crate::input::{GestureOutcome, InputEvent, PickGesture};
use crate::picking::{Selection, SelectionTracker};
use crate::render::ColorImage;

/// Color of the drag rectangle overlay.
const MARQUEE_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Drawing harness around a [`PickEngine`]: viewport, camera, selection and
/// the pointer gesture.
pub struct TestDriver {
    engine: PickEngine,
    camera: TestCamera,
    viewport: UVec2,
    selection: SelectionTracker,
    gesture: PickGesture,
}

impl TestDriver {
    /// Driver with camera and viewport taken from the engine's options.
    #[must_use]
    pub fn new(engine: PickEngine) -> Self {
        let options = engine.options();
        let camera = options.camera.camera();
        let viewport = options.render.viewport();
        Self {
            engine,
            camera,
            viewport,
            selection: SelectionTracker::new(),
            gesture: PickGesture::new(),
        }
    }

    /// The engine.
    #[must_use]
    pub fn engine(&self) -> &PickEngine {
        &self.engine
    }

    /// The engine, for scene and style edits.
    pub fn engine_mut(&mut self) -> &mut PickEngine {
        &mut self.engine
    }

    /// The camera.
    pub fn camera_mut(&mut self) -> &mut TestCamera {
        &mut self.camera
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: UVec2) {
        self.viewport = viewport;
    }

    /// Current selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// World-to-view matrix of the camera.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// Frustum for the current viewport aspect.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        let aspect = f64::from(self.viewport.x) / f64::from(self.viewport.y.max(1));
        self.engine.options().camera.frustum(aspect)
    }

    /// Window pixel (top-left origin) a world point lands on.
    #[must_use]
    pub fn project(&self, world: Vec3) -> IVec2 {
        let view_proj =
            self.frustum().compute_projection_matrix() * self.view_matrix();
        let ndc = view_proj.project_point3(world);
        let size = self.viewport.as_vec2();
        IVec2::new(
            ((ndc.x + 1.0) * 0.5 * size.x).floor() as i32,
            ((1.0 - ndc.y) * 0.5 * size.y).floor() as i32,
        )
    }

    /// Draw the display collection with the current selection, plus the
    /// marquee while a drag is in progress.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn draw_scene(&mut self) -> Result<ColorImage, PickError> {
        let frustum = self.frustum();
        let view = self.view_matrix();
        let mut image = self.engine.render_frame(
            self.viewport,
            view,
            &frustum,
            &self.selection,
        )?;
        if let Some((start, end)) = self.gesture.marquee() {
            image.draw_marquee(start, end, MARQUEE_COLOR);
        }
        Ok(image)
    }

    /// Draw the display collection as if nothing were selected, leaving the
    /// selection state alone.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn draw_unselected(&mut self) -> Result<ColorImage, PickError> {
        let frustum = self.frustum();
        let view = self.view_matrix();
        self.engine.render_frame(
            self.viewport,
            view,
            &frustum,
            &SelectionTracker::new(),
        )
    }

    /// Pick `start..end` without touching the selection state.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn pick(
        &mut self,
        start: IVec2,
        end: IVec2,
    ) -> Result<Selection, PickError> {
        let frustum = self.frustum();
        let view = self.view_matrix();
        self.engine.pick(start, end, self.viewport, &frustum, view)
    }

    /// Pick `start..end` and make the result the current selection.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn pick_and_select(
        &mut self,
        start: IVec2,
        end: IVec2,
    ) -> Result<&Selection, PickError> {
        let selection = self.pick(start, end)?;
        self.selection.set_selection(selection);
        Ok(self.selection.selection())
    }

    /// Route a pointer event: releases pick, alt-drags orbit the camera.
    ///
    /// # Errors
    ///
    /// Propagates engine errors from a pick.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
    ) -> Result<GestureOutcome, PickError> {
        let outcome = self.gesture.handle_event(event);
        match outcome {
            GestureOutcome::Pick { start, end } => {
                let _ = self.pick_and_select(start, end)?;
            }
            GestureOutcome::Orbit { delta } => self.camera.rotate_by(delta),
            GestureOutcome::Marquee { .. } | GestureOutcome::None => {}
        }
        Ok(outcome)
    }

    /// Move the cursor and press the primary button.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn mouse_press(&mut self, x: f32, y: f32) -> Result<(), PickError> {
        self.mouse_move(x, y)?;
        let _ = self.handle_event(InputEvent::primary(true))?;
        Ok(())
    }

    /// Move the cursor.
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn mouse_move(&mut self, x: f32, y: f32) -> Result<(), PickError> {
        let _ = self.handle_event(InputEvent::CursorMoved { x, y })?;
        Ok(())
    }

    /// Move the cursor and release the primary button (picks unless alt).
    ///
    /// # Errors
    ///
    /// Propagates engine errors.
    pub fn mouse_release(&mut self, x: f32, y: f32) -> Result<(), PickError> {
        self.mouse_move(x, y)?;
        let _ = self.handle_event(InputEvent::primary(false))?;
        Ok(())
    }

    /// Set the alt modifier.
    pub fn set_alt(&mut self, alt: bool) {
        let _ = self
            .gesture
            .handle_event(InputEvent::ModifiersChanged { alt });
    }
}
