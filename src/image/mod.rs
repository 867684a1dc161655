//! Raster side of the pipeline.
//!
//! Feature matrices become fixed-width 8-bit grayscale rasters through
//! grayscale scaling, histogram equalization, contrast clamping and width
//! cropping/padding, then get written as PNG.

pub mod grayscale;
pub mod histeq;
pub mod window;
pub mod writer;

pub use grayscale::to_grayscale;
pub use histeq::{clamp_and_equalize, histeq};
pub use window::cut_or_pad_window;
pub use writer::save;

use crate::audio::FeatureMatrix;
use crate::config::ImageConfig;

/// Single-channel 8-bit image, row-major.
///
/// Columns are time frames, rows are frequency bins with the lowest bin at
/// the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GrayRaster {
    /// Build a raster from row-major pixels. Returns `None` if the length
    /// does not match `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Apply `f` to every pixel.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Pixel count per intensity level.
    pub fn histogram(&self) -> [u64; 256] {
        let mut hist = [0u64; 256];
        for &p in &self.pixels {
            hist[p as usize] += 1;
        }
        hist
    }
}

/// Runs the full normalization chain with one [`ImageConfig`].
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: ImageConfig,
}

impl ImageNormalizer {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Grayscale, equalize, clamp, then crop or pad to the configured width.
    pub fn normalize(&self, matrix: &FeatureMatrix) -> GrayRaster {
        let raster = to_grayscale(matrix);
        let raster = histeq(&raster);
        let raster = clamp_and_equalize(
            &raster,
            self.config.clamp_low_percent,
            self.config.clamp_high_percent,
        );
        window::cut_or_pad_window_with(&raster, self.config.width, self.config.pad_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_width_is_fixed() {
        let normalizer = ImageNormalizer::default();
        for frames in [1usize, 37, 600, 602, 1500] {
            let matrix: FeatureMatrix = (0..frames)
                .map(|t| (0..39).map(|b| ((t * 7 + b * 13) % 50) as f32).collect())
                .collect();
            let raster = normalizer.normalize(&matrix);
            assert_eq!(raster.width(), 600, "{frames} frames");
            assert_eq!(raster.height(), 39);
        }
    }

    #[test]
    fn normalization_uses_full_range() {
        let matrix: FeatureMatrix = (0..600)
            .map(|t| (0..20).map(|b| (t as f32 * 0.01).sin() + b as f32 * 0.1).collect())
            .collect();
        let raster = ImageNormalizer::default().normalize(&matrix);
        assert_eq!(raster.pixels().iter().min(), Some(&0));
        assert_eq!(raster.pixels().iter().max(), Some(&255));
    }

    #[test]
    fn from_pixels_checks_length() {
        assert!(GrayRaster::from_pixels(3, 2, vec![0; 6]).is_some());
        assert!(GrayRaster::from_pixels(3, 2, vec![0; 5]).is_none());
        let raster = GrayRaster::from_pixels(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(raster.get(1, 0), 2);
        assert_eq!(raster.row(1), &[3, 4]);
        assert_eq!(raster.histogram()[3], 1);
    }
}
