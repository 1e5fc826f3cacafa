//! Clip planes for culling
//!
//! Extracts the six clip planes from a view-projection matrix and tests draw
//! item bounding spheres against them. The pick pass extracts planes from the
//! narrowed projection, so only items near the pick rectangle are drawn.

use glam::{Mat4, Vec3, Vec4};

/// A plane in 3D space, represented as (normal.x, normal.y, normal.z, distance)
/// where the plane equation is: ax + by + cz + d = 0
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f32,
}

impl Plane {
    /// Create a plane from homogeneous coefficients and normalize it
    #[must_use]
    pub fn from_coefficients(coeffs: Vec4) -> Self {
        let len = coeffs.truncate().length();
        if len > 0.0 {
            Self {
                normal: coeffs.truncate() / len,
                distance: coeffs.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from point to plane (positive = inside)
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Six inward-facing planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone)]
pub struct ClipPlanes {
    /// The planes, in the order above.
    pub planes: [Plane; 6],
}

impl ClipPlanes {
    /// Gribb/Hartmann extraction for a right-handed `[0,1]` depth projection.
    #[must_use]
    pub fn from_view_projection(vp: Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        Self {
            planes: [
                Plane::from_coefficients(row3 + row0),
                Plane::from_coefficients(row3 - row0),
                Plane::from_coefficients(row3 + row1),
                Plane::from_coefficients(row3 - row1),
                // [0,1] depth: near plane is just row2
                Plane::from_coefficients(row2),
                Plane::from_coefficients(row3 - row2),
            ],
        }
    }

    /// Whether a point lies inside every plane.
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Whether a sphere intersects or lies inside the volume.
    #[inline]
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planes() -> ClipPlanes {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view =
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        ClipPlanes::from_view_projection(proj * view)
    }

    #[test]
    fn contains_origin() {
        let planes = planes();
        assert!(planes.contains_point(Vec3::ZERO));
        // Point behind camera
        assert!(!planes.contains_point(Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn sphere_intersection() {
        let planes = planes();
        assert!(planes.intersects_sphere(Vec3::ZERO, 1.0));
        assert!(!planes.intersects_sphere(Vec3::new(0.0, 0.0, 50.0), 1.0));
        // Off to the side but large enough to reach in
        assert!(planes.intersects_sphere(Vec3::new(8.0, 0.0, 0.0), 6.0));
    }
}
