//! World-space draw geometry for one object in one representation.

use glam::Vec3;

use crate::repr::{GeomStyle, ReprToken};
use crate::scene::SceneObject;

/// A triangle with its face normal and owning coarse face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Indices into [`DrawGeometry::positions`].
    pub indices: [u32; 3],
    /// World-space unit face normal.
    pub normal: Vec3,
    /// Coarse face index written to the element channel.
    pub element: u32,
}

/// An edge and the coarse face it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Indices into [`DrawGeometry::positions`].
    pub indices: [u32; 2],
    /// Coarse face index written to the element channel.
    pub element: u32,
}

/// Geometry produced for `(object, repr, refine level)`, already transformed
/// into world space.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawGeometry {
    /// World-space vertex positions.
    pub positions: Vec<Vec3>,
    /// World-space per-vertex normals (used when `smooth`).
    pub normals: Vec<Vec3>,
    /// Filled triangles (empty for edge-only and point reprs).
    pub triangles: Vec<Triangle>,
    /// Edges (empty unless the repr draws edges).
    pub lines: Vec<Line>,
    /// Vertex indices drawn as points.
    pub points: Vec<u32>,
    /// Rasterization style of the repr.
    pub style: GeomStyle,
    /// Interpolate vertex normals instead of face normals.
    pub smooth: bool,
    /// Refine level the topology was built at (0 for coarse reprs).
    pub refine_level: u32,
    /// Bounding sphere center.
    pub center: Vec3,
    /// Bounding sphere radius.
    pub radius: f32,
}

impl DrawGeometry {
    /// Build geometry for `object` drawn with `repr`.
    ///
    /// Only reprs that honor refine level subdivide; every other repr draws
    /// the authored cage regardless of the object's refine level.
    #[must_use]
    pub fn build(object: &SceneObject, repr: ReprToken) -> Self {
        let level = if repr.honors_refine_level() {
            object.style().refine_level
        } else {
            0
        };
        let mesh = object.topology().refined(level);
        let transform = object.transform();

        let positions: Vec<Vec3> = mesh
            .points
            .iter()
            .map(|p| transform.transform_point3(*p))
            .collect();

        let style = repr.geom_style();
        let mut normals = vec![Vec3::ZERO; positions.len()];
        let mut triangles = Vec::new();
        for (indices, element) in mesh.triangles() {
            let [a, b, c] = indices.map(|i| positions[i as usize]);
            let area_normal = (b - a).cross(c - a);
            for i in indices {
                normals[i as usize] += area_normal;
            }
            if style.draws_surface() {
                triangles.push(Triangle {
                    indices,
                    normal: area_normal.normalize_or_zero(),
                    element,
                });
            }
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }

        let lines = if style.draws_edges() {
            mesh.edges()
                .into_iter()
                .map(|(indices, element)| Line { indices, element })
                .collect()
        } else {
            Vec::new()
        };

        let points = if style == GeomStyle::Points {
            (0..positions.len() as u32).collect()
        } else {
            Vec::new()
        };

        let (center, radius) = bounding_sphere(&positions);
        log::debug!(
            "built {repr} geometry for {} at level {level}: {} tris, {} lines",
            object.path(),
            triangles.len(),
            lines.len()
        );

        Self {
            positions,
            normals,
            triangles,
            lines,
            points,
            style,
            smooth: matches!(
                repr,
                ReprToken::SmoothHull | ReprToken::Refined | ReprToken::RefinedWireOnSurf
            ),
            refine_level: level,
            center,
            radius,
        }
    }
}

fn bounding_sphere(points: &[Vec3]) -> (Vec3, f32) {
    if points.is_empty() {
        return (Vec3::ZERO, 0.0);
    }
    let (min, max) = points.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    );
    let center = (min + max) * 0.5;
    let radius = points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0_f32, f32::max);
    (center, radius)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Mat4;

    use super::*;
    use crate::scene::{ObjectPath, Scene};

    fn scene_with_cube(level: u32) -> (Scene, ObjectPath) {
        let mut scene = Scene::new();
        let path = ObjectPath::new("/cube1").unwrap();
        let _ = scene
            .add_cube(path.clone(), Mat4::from_translation(Vec3::new(-5.0, 0.0, 5.0)))
            .unwrap();
        let _ = scene.set_refine_level(&path, level).unwrap();
        (scene, path)
    }

    #[test]
    fn hull_ignores_refine_level() {
        let (scene, path) = scene_with_cube(2);
        let object = scene.object(&path).unwrap();
        let hull = DrawGeometry::build(object, ReprToken::Hull);
        assert_eq!(hull.triangles.len(), 12);
        assert_eq!(hull.refine_level, 0);
        assert!(hull.lines.is_empty());
        let refined = DrawGeometry::build(object, ReprToken::Refined);
        assert_eq!(refined.triangles.len(), 96 * 2);
        assert_eq!(refined.refine_level, 2);
    }

    #[test]
    fn wire_reprs_carry_edges_only() {
        let (scene, path) = scene_with_cube(1);
        let object = scene.object(&path).unwrap();
        let wire = DrawGeometry::build(object, ReprToken::RefinedWire);
        assert!(wire.triangles.is_empty());
        assert_eq!(wire.lines.len(), 48);
        let on_surf = DrawGeometry::build(object, ReprToken::RefinedWireOnSurf);
        assert_eq!(on_surf.triangles.len(), 48);
        assert_eq!(on_surf.lines.len(), 48);
    }

    #[test]
    fn positions_are_world_space() {
        let (scene, path) = scene_with_cube(0);
        let geom = DrawGeometry::build(scene.object(&path).unwrap(), ReprToken::Hull);
        assert_relative_eq!(geom.center.x, -5.0, epsilon = 1e-6);
        assert_relative_eq!(geom.center.z, 5.0, epsilon = 1e-6);
        assert_relative_eq!(geom.radius, 3.0_f32.sqrt(), epsilon = 1e-5);
        // Front face (+z) is element 0 and faces +z.
        let front = geom.triangles.iter().find(|t| t.element == 0).unwrap();
        assert_relative_eq!(front.normal.z, 1.0, epsilon = 1e-6);
    }
}
