//! Quad cage topology and Catmull–Clark uniform refinement.
//!
//! Every face produced by refinement remembers the coarse face it came from,
//! so hits on refined geometry still report the authored face index.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::PickError;

/// Highest refine level honored. Each level multiplies the face count by 4.
pub const MAX_REFINE_LEVEL: u32 = 6;

/// A closed or open mesh made of quads.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadMesh {
    /// Vertex positions in object space.
    pub points: Vec<Vec3>,
    /// Quads as counter-clockwise vertex indices (seen from outside).
    pub faces: Vec<[u32; 4]>,
    /// Coarse (authored) face index of each face.
    pub coarse_faces: Vec<u32>,
}

/// Mesh edge with the faces sharing it.
#[derive(Debug, Clone, Copy)]
struct Edge {
    verts: [u32; 2],
    faces: [u32; 2],
    face_count: u8,
}

impl QuadMesh {
    /// Build a mesh whose faces are their own coarse faces.
    #[must_use]
    pub fn new(points: Vec<Vec3>, faces: Vec<[u32; 4]>) -> Self {
        let coarse_faces = (0..faces.len() as u32).collect();
        Self {
            points,
            faces,
            coarse_faces,
        }
    }

    /// Check that every face index names a point and every face has a
    /// coarse face.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] describing the first bad face.
    pub fn validate(&self) -> Result<(), PickError> {
        if self.coarse_faces.len() != self.faces.len() {
            return Err(PickError::InvalidInput(format!(
                "{} coarse faces for {} faces",
                self.coarse_faces.len(),
                self.faces.len()
            )));
        }
        let point_count = self.points.len();
        for (index, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&i| i as usize >= point_count) {
                return Err(PickError::InvalidInput(format!(
                    "face {index} references point {bad} of {point_count}"
                )));
            }
        }
        Ok(())
    }

    /// Axis-aligned cube spanning `[-1, 1]` on every axis.
    #[must_use]
    pub fn cube() -> Self {
        let points = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let faces = vec![
            [4, 5, 6, 7], // +z
            [0, 3, 2, 1], // -z
            [1, 2, 6, 5], // +x
            [0, 4, 7, 3], // -x
            [3, 7, 6, 2], // +y
            [0, 1, 5, 4], // -y
        ];
        Self::new(points, faces)
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn build_edges(&self) -> (Vec<Edge>, FxHashMap<(u32, u32), u32>) {
        let mut edges: Vec<Edge> = Vec::with_capacity(self.faces.len() * 2);
        let mut lookup: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        for (face_idx, face) in self.faces.iter().enumerate() {
            for i in 0..4 {
                let a = face[i];
                let b = face[(i + 1) % 4];
                let key = (a.min(b), a.max(b));
                let edge_idx = *lookup.entry(key).or_insert_with(|| {
                    edges.push(Edge {
                        verts: [key.0, key.1],
                        faces: [0; 2],
                        face_count: 0,
                    });
                    (edges.len() - 1) as u32
                });
                let edge = &mut edges[edge_idx as usize];
                if edge.face_count < 2 {
                    edge.faces[edge.face_count as usize] = face_idx as u32;
                    edge.face_count += 1;
                }
            }
        }
        (edges, lookup)
    }

    /// One level of Catmull–Clark refinement.
    ///
    /// New point layout: original vertices, then one point per edge, then
    /// one point per face. Each face becomes four child quads.
    #[must_use]
    pub fn subdivide(&self) -> Self {
        let (edges, lookup) = self.build_edges();
        let vert_count = self.points.len();
        let edge_base = vert_count as u32;
        let face_base = edge_base + edges.len() as u32;

        let face_points: Vec<Vec3> = self
            .faces
            .iter()
            .map(|f| {
                f.iter().map(|&v| self.points[v as usize]).sum::<Vec3>() / 4.0
            })
            .collect();

        let edge_points: Vec<Vec3> = edges
            .iter()
            .map(|e| {
                let a = self.points[e.verts[0] as usize];
                let b = self.points[e.verts[1] as usize];
                if e.face_count == 2 {
                    (a + b
                        + face_points[e.faces[0] as usize]
                        + face_points[e.faces[1] as usize])
                        / 4.0
                } else {
                    (a + b) * 0.5
                }
            })
            .collect();

        // Per-vertex accumulation of adjacent face points and edge midpoints.
        let mut face_sum = vec![Vec3::ZERO; vert_count];
        let mut face_n = vec![0u32; vert_count];
        for (face, fp) in self.faces.iter().zip(&face_points) {
            for &v in face {
                face_sum[v as usize] += *fp;
                face_n[v as usize] += 1;
            }
        }
        let mut mid_sum = vec![Vec3::ZERO; vert_count];
        let mut valence = vec![0u32; vert_count];
        let mut on_boundary = vec![false; vert_count];
        for e in &edges {
            let a = self.points[e.verts[0] as usize];
            let b = self.points[e.verts[1] as usize];
            let mid = (a + b) * 0.5;
            for &v in &e.verts {
                mid_sum[v as usize] += mid;
                valence[v as usize] += 1;
                if e.face_count < 2 {
                    on_boundary[v as usize] = true;
                }
            }
        }

        let mut points = Vec::with_capacity(
            vert_count + edge_points.len() + face_points.len(),
        );
        for (v, &p) in self.points.iter().enumerate() {
            let n = valence[v];
            if n < 3 || on_boundary[v] || face_n[v] == 0 {
                points.push(p);
                continue;
            }
            let n_f = n as f32;
            let f_avg = face_sum[v] / face_n[v] as f32;
            let r_avg = mid_sum[v] / n_f;
            points.push((f_avg + 2.0 * r_avg + (n_f - 3.0) * p) / n_f);
        }
        points.extend(edge_points);
        points.extend(face_points);

        let mut faces = Vec::with_capacity(self.faces.len() * 4);
        let mut coarse_faces = Vec::with_capacity(self.faces.len() * 4);
        for (face_idx, face) in self.faces.iter().enumerate() {
            let edge_of = |i: usize| {
                let a = face[i % 4];
                let b = face[(i + 1) % 4];
                lookup.get(&(a.min(b), a.max(b))).copied().unwrap_or(0)
                    + edge_base
            };
            let center = face_base + face_idx as u32;
            for i in 0..4 {
                faces.push([face[i], edge_of(i), center, edge_of(i + 3)]);
                coarse_faces.push(self.coarse_faces[face_idx]);
            }
        }

        Self {
            points,
            faces,
            coarse_faces,
        }
    }

    /// Refine `level` times. Levels above [`MAX_REFINE_LEVEL`] are clamped.
    #[must_use]
    pub fn refined(&self, level: u32) -> Self {
        let level = if level > MAX_REFINE_LEVEL {
            log::warn!(
                "refine level {level} clamped to {MAX_REFINE_LEVEL}"
            );
            MAX_REFINE_LEVEL
        } else {
            level
        };
        let mut mesh = self.clone();
        for _ in 0..level {
            mesh = mesh.subdivide();
        }
        mesh
    }

    /// Two triangles per quad, paired with the coarse face index.
    #[must_use]
    pub fn triangles(&self) -> Vec<([u32; 3], u32)> {
        self.faces
            .iter()
            .zip(&self.coarse_faces)
            .flat_map(|(f, &coarse)| {
                [([f[0], f[1], f[2]], coarse), ([f[0], f[2], f[3]], coarse)]
            })
            .collect()
    }

    /// Unique edges, each paired with the coarse face of its first face.
    #[must_use]
    pub fn edges(&self) -> Vec<([u32; 2], u32)> {
        let (edges, _) = self.build_edges();
        edges
            .iter()
            .map(|e| (e.verts, self.coarse_faces[e.faces[0] as usize]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cube_faces_point_outward() {
        let cube = QuadMesh::cube();
        for face in &cube.faces {
            let p: Vec<Vec3> =
                face.iter().map(|&i| cube.points[i as usize]).collect();
            let normal = (p[1] - p[0]).cross(p[2] - p[0]);
            let center = p.iter().sum::<Vec3>() / 4.0;
            assert!(normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn subdivision_counts() {
        let cube = QuadMesh::cube();
        let once = cube.subdivide();
        // 8 verts + 12 edges + 6 faces
        assert_eq!(once.points.len(), 26);
        assert_eq!(once.faces.len(), 24);
        assert_eq!(cube.refined(2).faces.len(), 96);
    }

    #[test]
    fn refinement_pulls_corners_inward() {
        let cube = QuadMesh::cube();
        let refined = cube.refined(2);
        // Original vertex 6 keeps its slot and moves toward the center.
        let corner = refined.points[6];
        assert!(corner.x < 0.7 && corner.y < 0.7 && corner.z < 0.7);
        assert_relative_eq!(corner.x, corner.y, epsilon = 1e-6);
        // Face centers stay on the cage faces' axis.
        let radius = refined.points.iter().map(|p| p.length()).fold(0.0_f32, f32::max);
        assert!(radius < 3.0_f32.sqrt());
    }

    #[test]
    fn children_keep_coarse_face() {
        let refined = QuadMesh::cube().refined(2);
        for (i, &coarse) in refined.coarse_faces.iter().enumerate() {
            assert_eq!(coarse as usize, i / 16);
        }
    }

    #[test]
    fn refine_level_is_clamped() {
        let cube = QuadMesh::cube();
        let a = cube.refined(MAX_REFINE_LEVEL);
        let b = cube.refined(MAX_REFINE_LEVEL + 3);
        assert_eq!(a.faces.len(), b.faces.len());
    }

    #[test]
    fn closed_cube_has_twelve_edges() {
        assert_eq!(QuadMesh::cube().edges().len(), 12);
        assert_eq!(QuadMesh::cube().triangles().len(), 12);
    }

    #[test]
    fn validate_rejects_dangling_indices() {
        assert!(QuadMesh::cube().validate().is_ok());
        let mut mesh = QuadMesh::cube();
        mesh.faces[2][3] = 8;
        assert!(matches!(mesh.validate(), Err(PickError::InvalidInput(_))));
        let mut mesh = QuadMesh::cube();
        let _ = mesh.coarse_faces.pop();
        assert!(mesh.validate().is_err());
    }
}
