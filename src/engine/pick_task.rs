//! Pick pass: draw the pick collection's IDs into a narrowed target and turn
//! the covered pixels into hits.

use glam::{Mat4, UVec2, Vec2, Vec3};

use crate::camera::ClipPlanes;
use crate::collection::RenderCollection;
use crate::error::PickError;
use crate::picking::{PickHit, PickMap, PickTarget, ResolveMode};
use crate::render::{IdBuffer, IdPass, RenderBackend};
use crate::render_index::RenderIndex;

/// Everything one pick invocation needs. Hits land in `out_hits`.
pub struct PickContext<'a> {
    /// Pick target size in pixels.
    pub resolution: UVec2,
    /// How raw pixel hits are reduced before they are appended.
    pub resolve_mode: ResolveMode,
    /// World-to-view matrix.
    pub view_matrix: Mat4,
    /// Narrowed projection covering exactly the pick target.
    pub projection_matrix: Mat4,
    /// Collection to draw; normally `pickables`.
    pub collection: &'a RenderCollection,
    /// Output.
    pub out_hits: &'a mut Vec<PickHit>,
    /// Point size in pick-target pixels.
    pub point_size: u32,
}

/// Execute the pick pass described by `ctx`.
///
/// # Errors
///
/// Returns [`PickError::InvalidInput`] for a zero resolution, and propagates
/// sync and backend errors.
pub(crate) fn execute(
    index: &mut RenderIndex,
    backend: &mut dyn RenderBackend,
    ctx: PickContext<'_>,
) -> Result<(), PickError> {
    if ctx.resolution.x == 0 || ctx.resolution.y == 0 {
        return Err(PickError::InvalidInput(format!(
            "pick resolution {}x{}",
            ctx.resolution.x, ctx.resolution.y
        )));
    }
    let items = index.sync_collection(ctx.collection)?;
    let view_proj = ctx.projection_matrix * ctx.view_matrix;
    let planes = ClipPlanes::from_view_projection(view_proj);

    let mut pick_map = PickMap::new();
    let mut geometries = Vec::with_capacity(items.len());
    for item in items {
        let geometry = item.geometry.as_ref();
        if planes.intersects_sphere(geometry.center, geometry.radius) {
            let _ = pick_map.push(item.path.clone(), None);
            geometries.push(geometry);
        }
    }
    log::debug!(
        "pick {}x{} via {}: {} of {} items in frustum",
        ctx.resolution.x,
        ctx.resolution.y,
        backend.name(),
        geometries.len(),
        items.len()
    );

    let ids = backend.draw_ids(&IdPass {
        width: ctx.resolution.x,
        height: ctx.resolution.y,
        view: ctx.view_matrix,
        projection: ctx.projection_matrix,
        point_size: ctx.point_size,
        items: geometries,
    })?;

    let hits = collect_hits(&ids, &pick_map, view_proj.inverse());
    let before = ctx.out_hits.len();
    ctx.out_hits.extend(ctx.resolve_mode.resolve(hits));
    log::debug!("pick resolved {} hits", ctx.out_hits.len() - before);
    Ok(())
}

/// Every covered pixel as a hit, in row-major order.
fn collect_hits(
    ids: &IdBuffer,
    pick_map: &PickMap,
    inverse_view_proj: Mat4,
) -> Vec<PickHit> {
    let size = Vec2::new(ids.width() as f32, ids.height() as f32);
    ids.hits()
        .filter_map(|(x, y, sample)| {
            let PickTarget::Object {
                path,
                instance,
                element,
            } = pick_map.resolve(sample.prim, sample.element)
            else {
                return None;
            };
            let ndc = Vec3::new(
                2.0 * (x as f32 + 0.5) / size.x - 1.0,
                1.0 - 2.0 * (y as f32 + 0.5) / size.y,
                sample.depth,
            );
            Some(PickHit {
                object_path: path.clone(),
                instance_index: instance,
                element_index: element,
                normalized_depth: sample.depth,
                world_space_hit_point: inverse_view_proj.project_point3(ndc),
            })
        })
        .collect()
}
