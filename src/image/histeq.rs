//! Histogram equalization and percentile contrast clamping.
//!
//! Both transforms are monotone: a darker input pixel never ends up brighter
//! than a lighter one.

use super::GrayRaster;

/// Spread intensities over `[0, 255]` following the image's own CDF.
///
/// `out = round((cdf(v) - cdf_min) * 255 / (N - cdf_min))` where `cdf_min` is
/// the count of the darkest occupied level. A raster with a single intensity
/// level is returned unchanged.
pub fn histeq(raster: &GrayRaster) -> GrayRaster {
    let hist = raster.histogram();
    let total = raster.pixels().len() as u64;

    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (level, &count) in hist.iter().enumerate() {
        running += count;
        cdf[level] = running;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let denom = total - cdf_min;
    if denom == 0 {
        return raster.clone();
    }

    let mut lut = [0u8; 256];
    for (level, out) in lut.iter_mut().enumerate() {
        let above = cdf[level].saturating_sub(cdf_min);
        *out = ((above * 255 + denom / 2) / denom) as u8;
    }
    raster.map(|p| lut[p as usize])
}

/// Intensity at the nearest-rank `percent` (0–100) of the raster.
fn percentile(hist: &[u64; 256], total: u64, percent: f64) -> u8 {
    let rank = ((percent / 100.0) * (total - 1) as f64).round() as u64;
    let mut seen = 0u64;
    for (level, &count) in hist.iter().enumerate() {
        seen += count;
        if seen > rank {
            return level as u8;
        }
    }
    255
}

/// Clip both tails at the given percentiles, then stretch `[lo, hi]` back to
/// `[0, 255]`.
///
/// If the percentiles collapse onto one level (`hi <= lo`) the raster is
/// returned unchanged.
pub fn clamp_and_equalize(raster: &GrayRaster, low_percent: f64, high_percent: f64) -> GrayRaster {
    let total = raster.pixels().len() as u64;
    if total == 0 {
        return raster.clone();
    }
    let hist = raster.histogram();
    let lo = percentile(&hist, total, low_percent) as u32;
    let hi = percentile(&hist, total, high_percent) as u32;
    if hi <= lo {
        return raster.clone();
    }

    let span = hi - lo;
    raster.map(|p| {
        let clipped = (p as u32).clamp(lo, hi);
        (((clipped - lo) * 255 + span / 2) / span) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(pixels: Vec<u8>) -> GrayRaster {
        let width = pixels.len();
        GrayRaster::from_pixels(width, 1, pixels).unwrap()
    }

    /// Deterministic pseudo-random pixels.
    fn noise(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                // Squash into a narrow, skewed band so equalization has work to do.
                (60 + (state >> 24) % 40 + (state >> 16) % 3) as u8
            })
            .collect()
    }

    #[test]
    fn histeq_is_order_preserving() {
        let input = raster(noise(5000, 7));
        let output = histeq(&input);
        for (a, a_out) in input.pixels().iter().zip(output.pixels()) {
            for (b, b_out) in input.pixels().iter().zip(output.pixels()).take(200) {
                if a < b {
                    assert!(a_out <= b_out, "{a}->{a_out} vs {b}->{b_out}");
                }
            }
        }
    }

    #[test]
    fn histeq_spans_full_range() {
        let output = histeq(&raster(noise(5000, 3)));
        assert_eq!(output.pixels().iter().min(), Some(&0));
        assert_eq!(output.pixels().iter().max(), Some(&255));
    }

    #[test]
    fn histeq_on_uniform_levels() {
        // Four equally common levels land on 0, 85, 170, 255.
        let output = histeq(&raster(vec![10, 20, 30, 40, 40, 30, 20, 10]));
        assert_eq!(output.pixels(), &[0, 85, 170, 255, 255, 170, 85, 0]);
    }

    #[test]
    fn single_level_is_untouched() {
        let input = raster(vec![77; 16]);
        assert_eq!(histeq(&input), input);
        assert_eq!(clamp_and_equalize(&input, 1.0, 99.0), input);
    }

    #[test]
    fn clamp_drops_outliers() {
        // 98 mid-grey pixels spread over 100..=197 plus one black and one white outlier.
        let mut pixels: Vec<u8> = (100..198).collect();
        pixels.push(0);
        pixels.push(255);
        let output = clamp_and_equalize(&raster(pixels), 1.0, 99.0);

        // The outliers are clipped onto the tails of the real content.
        assert_eq!(output.pixels()[98], 0);
        assert_eq!(output.pixels()[99], 255);
        assert_eq!(output.pixels()[0], 0);
        assert_eq!(output.pixels()[97], 255);
        let mid = output.pixels()[48];
        assert!((120..=135).contains(&mid), "mid {mid}");
    }

    #[test]
    fn clamp_is_order_preserving() {
        let input = raster(noise(3000, 11));
        let output = clamp_and_equalize(&histeq(&input), 2.0, 98.0);
        let mut pairs: Vec<(u8, u8)> = input.pixels().iter().copied().zip(output.pixels().iter().copied()).collect();
        pairs.sort();
        assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
