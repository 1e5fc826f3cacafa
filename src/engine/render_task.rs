//! Display pass: draw the display collection with selection highlighting.

use glam::{Mat4, UVec2};

use crate::camera::ClipPlanes;
use crate::collection::RenderCollection;
use crate::error::PickError;
use crate::options::Options;
use crate::picking::SelectionTracker;
use crate::render::{ColorImage, ColorPass, PassItem, RenderBackend};
use crate::render_index::RenderIndex;

/// Inputs of one display pass.
pub(crate) struct RenderContext<'a> {
    pub viewport: UVec2,
    pub view: Mat4,
    pub projection: Mat4,
    pub collection: &'a RenderCollection,
    pub selection: &'a SelectionTracker,
    pub options: &'a Options,
}

pub(crate) fn execute(
    index: &mut RenderIndex,
    backend: &mut dyn RenderBackend,
    ctx: &RenderContext<'_>,
) -> Result<ColorImage, PickError> {
    let items = index.sync_collection(ctx.collection)?;
    let planes = ClipPlanes::from_view_projection(ctx.projection * ctx.view);
    let highlight = &ctx.options.selection;

    let pass_items: Vec<PassItem<'_>> = items
        .iter()
        .filter(|item| {
            planes.intersects_sphere(item.geometry.center, item.geometry.radius)
        })
        .map(|item| PassItem {
            geometry: item.geometry.as_ref(),
            color: item.color,
            highlight: if highlight.enable_highlight {
                ctx.selection
                    .highlight_of(&item.path)
                    .map(|mode| highlight.color_for(mode))
            } else {
                None
            },
        })
        .collect();
    log::debug!(
        "display {}x{} via {}: {} of {} items, selection v{}",
        ctx.viewport.x,
        ctx.viewport.y,
        backend.name(),
        pass_items.len(),
        items.len(),
        ctx.selection.version()
    );

    let display = &ctx.options.display;
    backend.draw_color(&ColorPass {
        width: ctx.viewport.x,
        height: ctx.viewport.y,
        view: ctx.view,
        projection: ctx.projection,
        clear_color: display.clear_color.into(),
        wire_color: display.wire_color.into(),
        lighting: display.lighting(),
        point_size: display.point_size,
        items: pass_items,
    })
}
