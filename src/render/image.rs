//! RGBA8 color images produced by the display pass.

use std::path::Path;

use glam::{IVec2, Vec4};

use crate::error::PickError;

/// Convert a linear `[0, 1]` color to RGBA8.
#[must_use]
pub fn to_rgba8(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    [
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
        c.w.round() as u8,
    ]
}

/// Row-major RGBA8 image (row 0 at the top).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl ColorImage {
    /// Image filled with `clear`.
    #[must_use]
    pub fn new(width: u32, height: u32, clear: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![to_rgba8(clear); width as usize * height as usize],
        }
    }

    /// Wrap tightly packed RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::InvalidInput`] if the byte count does not match.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PickError> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(PickError::InvalidInput(format!(
                "{} bytes for a {width}x{height} image",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, `None` if out of range.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Overwrite a pixel; out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = rgba;
        }
    }

    /// Raw pixel rows.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Number of pixels that differ from `other` (all pixels if sizes differ).
    #[must_use]
    pub fn diff_count(&self, other: &Self) -> usize {
        if self.width != other.width || self.height != other.height {
            return self.pixels.len().max(other.pixels.len());
        }
        self.pixels
            .iter()
            .zip(&other.pixels)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Outline the rectangle spanned by two corners (the drag marquee).
    /// Zero-area rectangles draw nothing.
    pub fn draw_marquee(&mut self, start: IVec2, end: IVec2, color: Vec4) {
        if start == end {
            return;
        }
        let rgba = to_rgba8(color);
        let min = start.min(end).max(IVec2::ZERO);
        let max = start
            .max(end)
            .min(IVec2::new(self.width as i32 - 1, self.height as i32 - 1));
        if min.x > max.x || min.y > max.y {
            return;
        }
        for x in min.x..=max.x {
            self.set_pixel(x as u32, min.y as u32, rgba);
            self.set_pixel(x as u32, max.y as u32, rgba);
        }
        for y in min.y..=max.y {
            self.set_pixel(min.x as u32, y as u32, rgba);
            self.set_pixel(max.x as u32, y as u32, rgba);
        }
    }

    /// Write the image as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::Image`] on encoding or file errors.
    pub fn save_png(&self, path: &Path) -> Result<(), PickError> {
        let bytes: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        let buffer = image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| PickError::Image("pixel buffer size mismatch".into()))?;
        buffer.save_with_format(path, image::ImageFormat::Png)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marquee_outlines_rectangle() {
        let mut img = ColorImage::new(8, 8, Vec4::ZERO);
        img.draw_marquee(IVec2::new(5, 6), IVec2::new(1, 2), Vec4::ONE);
        assert_eq!(img.pixel(1, 2), Some([255; 4]));
        assert_eq!(img.pixel(5, 6), Some([255; 4]));
        assert_eq!(img.pixel(3, 4), Some([0; 4]));
        let untouched = ColorImage::new(8, 8, Vec4::ZERO);
        // 5 + 5 + 3 + 3 border pixels
        assert_eq!(img.diff_count(&untouched), 16);

        let mut click = untouched.clone();
        click.draw_marquee(IVec2::new(3, 3), IVec2::new(3, 3), Vec4::ONE);
        assert_eq!(click.diff_count(&untouched), 0);
    }

    #[test]
    fn rgba_roundtrip_and_png() {
        let img = ColorImage::new(3, 2, Vec4::new(0.1, 0.1, 0.1, 1.0));
        assert_eq!(img.pixel(0, 0), Some([26, 26, 26, 255]));
        let bytes: Vec<u8> = img.pixels().iter().flatten().copied().collect();
        assert_eq!(ColorImage::from_rgba8(3, 2, &bytes).unwrap(), img);
        assert!(ColorImage::from_rgba8(3, 3, &bytes).is_err());

        let path = std::env::temp_dir().join("scene_pick_image_test.png");
        img.save_png(&path).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(path);
    }
}
