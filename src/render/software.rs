//! Deterministic CPU backend.

use super::image::to_rgba8;
use super::raster::{draw_line, draw_point, fill_triangle};
use super::{ColorImage, ColorPass, IdBuffer, IdPass, IdSample, RenderBackend};
use crate::error::PickError;
use crate::picking::PickMap;

/// CPU rasterizer implementing both passes with a `Less` depth test.
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    color_passes: u64,
    id_passes: u64,
}

impl SoftwareBackend {
    /// New backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `(color, id)` passes executed so far.
    #[must_use]
    pub fn pass_counts(&self) -> (u64, u64) {
        (self.color_passes, self.id_passes)
    }
}

impl RenderBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn draw_color(&mut self, pass: &ColorPass<'_>) -> Result<ColorImage, PickError> {
        self.color_passes += 1;
        let (width, height) = (pass.width, pass.height);
        let mut image = ColorImage::new(width, height, pass.clear_color);
        let mut depth = vec![1.0_f32; width as usize * height as usize];
        let view_proj = pass.projection * pass.view;

        for item in &pass.items {
            let geom = item.geometry;
            let mut write = |x: u32, y: u32, z: f32, rgba: [u8; 4]| {
                let idx = (y * width + x) as usize;
                if z < depth[idx] {
                    depth[idx] = z;
                    image.set_pixel(x, y, rgba);
                }
            };

            if geom.style.draws_surface() {
                for tri in &geom.triangles {
                    let world = tri.indices.map(|i| geom.positions[i as usize]);
                    let shade = if geom.smooth {
                        tri.indices
                            .map(|i| pass.lighting.shade(&pass.view, geom.normals[i as usize]))
                    } else {
                        [pass.lighting.shade(&pass.view, tri.normal); 3]
                    };
                    fill_triangle(&view_proj, world, shade, width, height, |x, y, z, s| {
                        write(x, y, z, to_rgba8(item.shaded(item.color, s)));
                    });
                }
            }

            if geom.style.draws_edges() {
                let base = if geom.style.draws_surface() {
                    pass.wire_color
                } else {
                    item.color
                };
                let rgba = to_rgba8(item.shaded(base, 1.0));
                for line in &geom.lines {
                    let world = line.indices.map(|i| geom.positions[i as usize]);
                    draw_line(&view_proj, world, width, height, |x, y, z| write(x, y, z, rgba));
                }
            }

            let rgba = to_rgba8(item.shaded(item.color, 1.0));
            for &p in &geom.points {
                draw_point(
                    &view_proj,
                    geom.positions[p as usize],
                    pass.point_size,
                    width,
                    height,
                    |x, y, z| write(x, y, z, rgba),
                );
            }
        }
        Ok(image)
    }

    fn draw_ids(&mut self, pass: &IdPass<'_>) -> Result<IdBuffer, PickError> {
        self.id_passes += 1;
        let (width, height) = (pass.width, pass.height);
        let mut ids = IdBuffer::new(width, height);
        let view_proj = pass.projection * pass.view;

        for (index, geom) in pass.items.iter().enumerate() {
            let prim = index as u32 + 1;
            for tri in &geom.triangles {
                let world = tri.indices.map(|i| geom.positions[i as usize]);
                let element = PickMap::encode_element(tri.element);
                fill_triangle(&view_proj, world, [1.0; 3], width, height, |x, y, depth, _| {
                    let _ = ids.write(x, y, IdSample { prim, element, depth });
                });
            }
            for line in &geom.lines {
                let world = line.indices.map(|i| geom.positions[i as usize]);
                let element = PickMap::encode_element(line.element);
                draw_line(&view_proj, world, width, height, |x, y, depth| {
                    let _ = ids.write(x, y, IdSample { prim, element, depth });
                });
            }
            for &p in &geom.points {
                draw_point(
                    &view_proj,
                    geom.positions[p as usize],
                    pass.point_size,
                    width,
                    height,
                    |x, y, depth| {
                        let _ = ids.write(
                            x,
                            y,
                            IdSample {
                                prim,
                                element: 0,
                                depth,
                            },
                        );
                    },
                );
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3, Vec4};

    use super::*;
    use crate::render::{DrawGeometry, Lighting, PassItem};
    use crate::repr::ReprToken;
    use crate::scene::{ObjectPath, Scene};

    fn cube_geometry(repr: ReprToken) -> DrawGeometry {
        let mut scene = Scene::new();
        let path = ObjectPath::new("/cube").unwrap();
        let _ = scene.add_cube(path.clone(), Mat4::IDENTITY).unwrap();
        DrawGeometry::build(scene.object(&path).unwrap(), repr)
    }

    fn view() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0))
    }

    fn projection() -> Mat4 {
        Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 1.0, 100.0)
    }

    #[test]
    fn id_pass_writes_front_face() {
        let geom = cube_geometry(ReprToken::Hull);
        let pass = IdPass {
            width: 32,
            height: 32,
            view: view(),
            projection: projection(),
            point_size: 1,
            items: vec![&geom],
        };
        let ids = SoftwareBackend::new().draw_ids(&pass).unwrap();
        let center = ids.get(16, 16);
        assert_eq!(center.prim, 1);
        // +z face is coarse face 0
        assert_eq!(center.element, 1);
        assert!(center.depth > 0.0 && center.depth < 1.0);
        assert!(!ids.get(0, 0).is_hit());
    }

    #[test]
    fn highlight_changes_color_only_where_drawn() {
        let geom = cube_geometry(ReprToken::Hull);
        let item = PassItem {
            geometry: &geom,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            highlight: None,
        };
        let mut pass = ColorPass {
            width: 32,
            height: 32,
            view: view(),
            projection: projection(),
            clear_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            wire_color: Vec4::ZERO,
            lighting: Lighting::default(),
            point_size: 3,
            items: vec![item],
        };
        let mut backend = SoftwareBackend::new();
        let plain = backend.draw_color(&pass).unwrap();
        pass.items[0].highlight = Some(Vec4::new(1.0, 1.0, 0.0, 1.0));
        let selected = backend.draw_color(&pass).unwrap();
        assert_ne!(plain.pixel(16, 16), selected.pixel(16, 16));
        assert_eq!(plain.pixel(0, 0), selected.pixel(0, 0));
        assert_eq!(backend.pass_counts(), (2, 0));
    }

    #[test]
    fn wire_repr_draws_edges_not_fill() {
        let geom = cube_geometry(ReprToken::Wire);
        let pass = IdPass {
            width: 32,
            height: 32,
            view: view(),
            projection: projection(),
            point_size: 1,
            items: vec![&geom],
        };
        let ids = SoftwareBackend::new().draw_ids(&pass).unwrap();
        assert!(!ids.get(16, 16).is_hit());
        assert!(ids.hits().count() > 0);
    }
}
