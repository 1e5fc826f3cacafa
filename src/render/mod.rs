//! Render backends for the display (color) and pick (ID) passes.
//!
//! The engine assembles a [`ColorPass`] or [`IdPass`] from a collection's
//! draw items and hands it to a [`RenderBackend`]. The software backend is a
//! deterministic CPU rasterizer; the `gpu` feature adds a headless wgpu
//! backend with the same output contract.

pub mod geometry;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod id_buffer;
pub mod image;
mod raster;
pub mod software;

use glam::{Mat4, Vec3, Vec4};

pub use self::image::ColorImage;
pub use geometry::DrawGeometry;
#[cfg(feature = "gpu")]
pub use gpu::GpuBackend;
pub use id_buffer::{IdBuffer, IdSample};
pub use software::SoftwareBackend;

use crate::error::PickError;

/// Headlight shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// When off, surfaces are drawn at full display color.
    pub enabled: bool,
    /// Light received by surfaces facing away from the eye.
    pub ambient: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: 0.2,
        }
    }
}

impl Lighting {
    /// Lambert intensity of a world-space normal under a headlight.
    #[must_use]
    pub fn shade(&self, view: &Mat4, normal: Vec3) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let n = view.transform_vector3(normal).normalize_or_zero();
        self.ambient + (1.0 - self.ambient) * n.z.max(0.0)
    }
}

/// One draw item of a color pass.
#[derive(Debug, Clone, Copy)]
pub struct PassItem<'a> {
    /// World-space geometry.
    pub geometry: &'a DrawGeometry,
    /// Display color.
    pub color: Vec4,
    /// Highlight color to blend in, if the object is selected.
    pub highlight: Option<Vec4>,
}

impl PassItem<'_> {
    /// Final color at a given light intensity.
    #[must_use]
    pub fn shaded(&self, base: Vec4, intensity: f32) -> Vec4 {
        let lit = (base.truncate() * intensity).extend(base.w);
        match self.highlight {
            Some(h) => lit.lerp(h.truncate().extend(base.w), 0.5),
            None => lit,
        }
    }
}

/// Everything a backend needs to draw the display collection.
#[derive(Debug, Clone)]
pub struct ColorPass<'a> {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// Background color.
    pub clear_color: Vec4,
    /// Edge color for wire-on-surface reprs.
    pub wire_color: Vec4,
    /// Headlight parameters.
    pub lighting: Lighting,
    /// Point size in pixels for point reprs.
    pub point_size: u32,
    /// Items in draw order.
    pub items: Vec<PassItem<'a>>,
}

/// Everything a backend needs to draw the pick collection's IDs.
///
/// Item `i` writes prim id `i + 1`; elements write their coarse face + 1.
#[derive(Debug, Clone)]
pub struct IdPass<'a> {
    /// Pick target width.
    pub width: u32,
    /// Pick target height.
    pub height: u32,
    /// World-to-view matrix.
    pub view: Mat4,
    /// Narrowed view-to-clip matrix.
    pub projection: Mat4,
    /// Point size in pick-target pixels.
    pub point_size: u32,
    /// Items in pick-id order.
    pub items: Vec<&'a DrawGeometry>,
}

/// A backend able to execute color and ID passes synchronously.
pub trait RenderBackend {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Draw the display collection.
    ///
    /// # Errors
    ///
    /// Backend-specific failures (GPU readback).
    fn draw_color(&mut self, pass: &ColorPass<'_>) -> Result<ColorImage, PickError>;

    /// Draw the pick collection into an ID buffer.
    ///
    /// # Errors
    ///
    /// Backend-specific failures (GPU readback).
    fn draw_ids(&mut self, pass: &IdPass<'_>) -> Result<IdBuffer, PickError>;
}

/// Backend selection for the CLI and options.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// CPU rasterizer.
    #[default]
    Software,
    /// Headless wgpu (requires the `gpu` feature).
    Gpu,
}

impl std::str::FromStr for BackendKind {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software" => Ok(Self::Software),
            "gpu" => Ok(Self::Gpu),
            other => Err(PickError::InvalidInput(format!("unknown backend '{other}'"))),
        }
    }
}

/// Create the backend named by `kind`.
///
/// # Errors
///
/// Returns [`PickError::InvalidInput`] when the GPU backend is requested
/// without the `gpu` feature, or a GPU error if no device is available.
pub fn create_backend(kind: BackendKind) -> Result<Box<dyn RenderBackend>, PickError> {
    match kind {
        BackendKind::Software => Ok(Box::new(SoftwareBackend::new())),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Box::new(GpuBackend::new()?)),
        #[cfg(not(feature = "gpu"))]
        BackendKind::Gpu => Err(PickError::InvalidInput(
            "built without the `gpu` feature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn headlight_shading() {
        let lighting = Lighting::default();
        let view = Mat4::IDENTITY;
        assert_relative_eq!(lighting.shade(&view, Vec3::Z), 1.0);
        assert_relative_eq!(lighting.shade(&view, -Vec3::Z), 0.2);
        let off = Lighting {
            enabled: false,
            ..lighting
        };
        assert_relative_eq!(off.shade(&view, -Vec3::Z), 1.0);
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!("software".parse::<BackendKind>().unwrap(), BackendKind::Software);
        assert_eq!("gpu".parse::<BackendKind>().unwrap(), BackendKind::Gpu);
        assert!("vulkan".parse::<BackendKind>().is_err());
    }
}
