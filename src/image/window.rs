//! Width normalization.

use super::GrayRaster;

/// Crop to the first `width` columns or zero-pad on the right up to `width`.
pub fn cut_or_pad_window(raster: &GrayRaster, width: usize) -> GrayRaster {
    cut_or_pad_window_with(raster, width, 0)
}

/// Like [`cut_or_pad_window`] with an explicit padding value. Height is kept.
pub fn cut_or_pad_window_with(raster: &GrayRaster, width: usize, pad_value: u8) -> GrayRaster {
    if raster.width() == width {
        return raster.clone();
    }

    let keep = raster.width().min(width);
    let mut pixels = Vec::with_capacity(width * raster.height());
    for y in 0..raster.height() {
        pixels.extend_from_slice(&raster.row(y)[..keep]);
        pixels.resize(pixels.len() + (width - keep), pad_value);
    }

    GrayRaster {
        width,
        height: raster.height(),
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> GrayRaster {
        let pixels = (0..width * height).map(|i| (i % 251) as u8 + 1).collect();
        GrayRaster::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn crops_from_the_left() {
        let input = ramp(602, 3);
        let output = cut_or_pad_window(&input, 600);
        assert_eq!((output.width(), output.height()), (600, 3));
        for y in 0..3 {
            assert_eq!(output.row(y), &input.row(y)[..600]);
        }
    }

    #[test]
    fn pads_on_the_right() {
        let input = ramp(10, 2);
        let output = cut_or_pad_window(&input, 600);
        assert_eq!((output.width(), output.height()), (600, 2));
        assert_eq!(&output.row(1)[..10], input.row(1));
        assert!(output.row(1)[10..].iter().all(|&p| p == 0));

        let grey = cut_or_pad_window_with(&input, 12, 128);
        assert_eq!(&grey.row(0)[10..], &[128, 128]);
    }

    #[test]
    fn idempotent() {
        for width in [1, 599, 600, 601, 1200] {
            let once = cut_or_pad_window(&ramp(width, 4), 600);
            let twice = cut_or_pad_window(&once, 600);
            assert_eq!(once, twice);
            assert_eq!(twice.width(), 600);
        }
    }
}
