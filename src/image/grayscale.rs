//! Feature matrix to 8-bit grayscale.

use super::GrayRaster;
use crate::audio::FeatureMatrix;

/// Linearly map the matrix's `[min, max]` onto `[0, 255]`.
///
/// The matrix is `[n_frames][n_bins]`; the raster is `n_frames` wide and
/// `n_bins` tall with bin 0 on the bottom row. A constant or empty matrix
/// becomes all zeros. Non-finite values are ignored for the range and map to 0.
pub fn to_grayscale(matrix: &FeatureMatrix) -> GrayRaster {
    let width = matrix.len();
    let height = matrix.iter().map(Vec::len).max().unwrap_or(0);

    let (min, max) = matrix
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let mut raster = GrayRaster::filled(width, height, 0);
    if !(range > 0.0) {
        return raster;
    }

    for (x, frame) in matrix.iter().enumerate() {
        for (bin, &v) in frame.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let y = height - 1 - bin;
            let scaled = ((v - min) / range * 255.0).round().clamp(0.0, 255.0);
            raster.pixels[y * width + x] = scaled as u8;
        }
    }
    raster
}
