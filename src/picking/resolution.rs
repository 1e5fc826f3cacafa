//! Pick target sizing and narrowed projection.
//!
//! A pick renders only the screen rectangle between the gesture corners. The
//! projection is narrowed so that rectangle fills the whole (small) pick
//! target, and the target is never smaller than a configured minimum so a
//! zero-area click still samples a few pixels around the cursor.

use glam::{DVec2, IVec2, Mat4, UVec2};

use crate::camera::Frustum;
use crate::error::PickError;

/// Smallest pick target used when none is configured.
pub const DEFAULT_MINIMUM_RESOLUTION: UVec2 = UVec2::new(4, 4);

/// Largest viewport edge accepted by either pass.
pub const MAX_VIEWPORT_DIMENSION: u32 = 16_384;

/// An inclusive pixel rectangle with normalized corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    /// Top-left pixel (inclusive).
    pub min: IVec2,
    /// Bottom-right pixel (inclusive).
    pub max: IVec2,
}

impl ScreenRect {
    /// Rectangle spanned by two corners given in any order.
    #[must_use]
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Pixel extent, counting both edges.
    #[must_use]
    pub fn size(&self) -> UVec2 {
        UVec2::new(
            self.max.x.abs_diff(self.min.x).saturating_add(1),
            self.max.y.abs_diff(self.min.y).saturating_add(1),
        )
    }

    /// Intersection with the pixels of `viewport`, or `None` when the
    /// rectangle lies entirely outside it.
    #[must_use]
    pub fn clipped_to(&self, viewport: UVec2) -> Option<Self> {
        let last = viewport.as_ivec2() - IVec2::ONE;
        let min = self.min.max(IVec2::ZERO);
        let max = self.max.min(last);
        min.cmple(max).all().then_some(Self { min, max })
    }

    /// Whether `p` lies inside (edges included).
    #[must_use]
    pub fn contains(&self, p: IVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Pick target size for the gesture `start..end`: the absolute corner delta
/// per axis, clamped from below by `minimum` (and never below 1x1).
#[must_use]
pub fn compute_resolution(start: IVec2, end: IVec2, minimum: UVec2) -> UVec2 {
    let delta = UVec2::new(start.x.abs_diff(end.x), start.y.abs_diff(end.y));
    delta.max(minimum).max(UVec2::ONE)
}

/// Reject a viewport with zero area or an edge above
/// [`MAX_VIEWPORT_DIMENSION`].
///
/// # Errors
///
/// Returns [`PickError::InvalidInput`] for either case.
pub fn check_viewport(viewport: UVec2) -> Result<(), PickError> {
    if viewport.min_element() == 0 {
        return Err(PickError::InvalidInput(format!(
            "degenerate viewport {}x{}",
            viewport.x, viewport.y
        )));
    }
    if viewport.max_element() > MAX_VIEWPORT_DIMENSION {
        return Err(PickError::InvalidInput(format!(
            "viewport {}x{} exceeds {MAX_VIEWPORT_DIMENSION} pixels per edge",
            viewport.x, viewport.y
        )));
    }
    Ok(())
}

/// Sub-frustum covering the pixel rectangle `start..=end` of a viewport.
///
/// The rectangle `[min, max + 1)` is mapped into NDC (`x: 2x/w - 1`,
/// `y: 1 - 2y/h`, screen y grows downward) and rescaled into the frustum
/// window. Near, far and projection kind are kept.
///
/// # Errors
///
/// Returns [`PickError::InvalidInput`] if the viewport has zero area.
pub fn narrowed_frustum(
    start: IVec2,
    end: IVec2,
    viewport: UVec2,
    frustum: &Frustum,
) -> Result<Frustum, PickError> {
    check_viewport(viewport)?;
    let rect = ScreenRect::from_corners(start, end);
    let size = viewport.as_dvec2();
    let min = rect.min.as_dvec2();
    let max = rect.max.as_dvec2() + DVec2::ONE;

    let ndc_min = DVec2::new(2.0 * min.x / size.x - 1.0, 1.0 - 2.0 * max.y / size.y);
    let ndc_max = DVec2::new(2.0 * max.x / size.x - 1.0, 1.0 - 2.0 * min.y / size.y);

    let origin = frustum.window_min();
    let scale = frustum.window_max() - origin;
    let window_min = origin + scale * 0.5 * (DVec2::ONE + ndc_min);
    let window_max = origin + scale * 0.5 * (DVec2::ONE + ndc_max);
    Ok(frustum.with_window(window_min, window_max))
}

/// Projection matrix of [`narrowed_frustum`].
///
/// # Errors
///
/// Returns [`PickError::InvalidInput`] if the viewport has zero area.
pub fn compute_narrowed_projection(
    start: IVec2,
    end: IVec2,
    viewport: UVec2,
    frustum: &Frustum,
) -> Result<Mat4, PickError> {
    Ok(narrowed_frustum(start, end, viewport, frustum)?.compute_projection_matrix())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Vec3, Vec4Swizzles};

    use super::*;

    fn frustum() -> Frustum {
        Frustum::perspective(45.0, 4.0 / 3.0, 1.0, 1000.0)
    }

    #[test]
    fn resolution_is_clamped_to_minimum() {
        let min = DEFAULT_MINIMUM_RESOLUTION;
        let p = IVec2::new(138, 60);
        assert_eq!(compute_resolution(p, p, min), UVec2::new(4, 4));
        assert_eq!(
            compute_resolution(IVec2::new(176, 96), IVec2::new(179, 99), min),
            UVec2::new(4, 4)
        );
        assert_eq!(
            compute_resolution(IVec2::new(10, 10), IVec2::new(30, 12), min),
            UVec2::new(20, 4)
        );
        assert_eq!(compute_resolution(p, p, UVec2::ZERO), UVec2::ONE);
    }

    #[test]
    fn corner_order_does_not_matter() {
        let a = IVec2::new(176, 96);
        let b = IVec2::new(179, 99);
        let vp = UVec2::new(640, 480);
        let f = frustum();
        assert_eq!(
            compute_resolution(a, b, DEFAULT_MINIMUM_RESOLUTION),
            compute_resolution(b, a, DEFAULT_MINIMUM_RESOLUTION)
        );
        let ab = compute_narrowed_projection(a, b, vp, &f).unwrap();
        let ba = compute_narrowed_projection(b, a, vp, &f).unwrap();
        let mixed = compute_narrowed_projection(
            IVec2::new(176, 99),
            IVec2::new(179, 96),
            vp,
            &f,
        )
        .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab, mixed);
    }

    #[test]
    fn full_viewport_rect_is_identity_narrowing() {
        let vp = UVec2::new(640, 480);
        let f = frustum();
        let narrowed =
            narrowed_frustum(IVec2::ZERO, IVec2::new(639, 479), vp, &f).unwrap();
        assert_relative_eq!(narrowed.window_min().x, f.window_min().x, epsilon = 1e-12);
        assert_relative_eq!(narrowed.window_max().y, f.window_max().y, epsilon = 1e-12);
    }

    #[test]
    fn narrowed_projection_maps_pixel_to_ndc_box() {
        let vp = UVec2::new(640, 480);
        let f = frustum();
        let full = f.compute_projection_matrix();
        // Point projecting to the center of pixel (100, 50).
        let ndc = Vec3::new(
            2.0 * 100.5 / 640.0 - 1.0,
            1.0 - 2.0 * 50.5 / 480.0,
            0.5,
        );
        let view_point = full.inverse().project_point3(ndc);
        let narrowed = compute_narrowed_projection(
            IVec2::new(100, 50),
            IVec2::new(100, 50),
            vp,
            &f,
        )
        .unwrap();
        let clip = narrowed * view_point.extend(1.0);
        let p = clip.xy() / clip.w;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn resolution_of_extreme_corners_does_not_overflow() {
        let r = compute_resolution(
            IVec2::splat(i32::MIN),
            IVec2::splat(i32::MAX),
            DEFAULT_MINIMUM_RESOLUTION,
        );
        assert_eq!(r, UVec2::splat(u32::MAX));
    }

    #[test]
    fn rect_is_clipped_to_viewport() {
        let vp = UVec2::new(640, 480);
        let rect = ScreenRect::from_corners(IVec2::splat(-40_000), IVec2::splat(40_000));
        let clipped = rect.clipped_to(vp).unwrap();
        assert_eq!(clipped.min, IVec2::ZERO);
        assert_eq!(clipped.max, IVec2::new(639, 479));
        assert_eq!(clipped.size(), vp);

        let inside = ScreenRect::from_corners(IVec2::new(5, 9), IVec2::new(2, 3));
        assert_eq!(inside.clipped_to(vp), Some(inside));
        let outside = ScreenRect::from_corners(IVec2::new(-9, 10), IVec2::new(-2, 20));
        assert_eq!(outside.clipped_to(vp), None);
    }

    #[test]
    fn oversized_viewport_is_rejected() {
        let edge = MAX_VIEWPORT_DIMENSION + 1;
        assert!(matches!(
            check_viewport(UVec2::new(edge, 10)),
            Err(PickError::InvalidInput(_))
        ));
        assert!(check_viewport(UVec2::splat(MAX_VIEWPORT_DIMENSION)).is_ok());
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        let err = compute_narrowed_projection(
            IVec2::ZERO,
            IVec2::ZERO,
            UVec2::new(0, 480),
            &frustum(),
        );
        assert!(matches!(err, Err(PickError::InvalidInput(_))));
    }

    #[test]
    fn rect_size_counts_edges() {
        let rect = ScreenRect::from_corners(IVec2::new(5, 9), IVec2::new(2, 3));
        assert_eq!(rect.min, IVec2::new(2, 3));
        assert_eq!(rect.size(), UVec2::new(4, 7));
        assert!(rect.contains(IVec2::new(5, 9)));
        assert!(!rect.contains(IVec2::new(6, 9)));
    }
}
