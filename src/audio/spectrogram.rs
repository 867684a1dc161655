//! Cut-off magnitude spectrogram in dB.

use crate::audio::frames::Framer;
use crate::audio::{FeatureExtractor, FeatureMatrix};
use crate::config::{FrameConfig, SpectrogramConfig};

/// Magnitudes below this are clamped before taking the log.
const MIN_MAGNITUDE: f32 = 1e-10;

/// Spectrogram extractor that keeps only bins up to `cutoff_hz`.
#[derive(Debug, Clone)]
pub struct CutoffSpectrogram {
    frame: FrameConfig,
    config: SpectrogramConfig,
}

impl CutoffSpectrogram {
    pub fn new(frame: FrameConfig, config: SpectrogramConfig) -> Self {
        Self { frame, config }
    }

    /// Number of bins kept at `sample_rate`: every `k` with `k * rate / nfft <= cutoff`.
    pub fn n_bins(&self, sample_rate: u32) -> usize {
        let nfft = self.frame.nfft;
        let bin_hz = sample_rate as f32 / nfft as f32;
        let last = (self.config.cutoff_hz / bin_hz).floor() as usize;
        (last + 1).min(nfft / 2 + 1)
    }

    /// Compute `20 * log10(|X|)` per frame, shape `[n_frames, n_bins]`.
    pub fn compute(&self, samples: &[f32], sample_rate: u32) -> FeatureMatrix {
        let framer = Framer::new(&self.frame, sample_rate);
        let keep = self.n_bins(sample_rate);

        framer
            .magnitude_spectrum(samples)
            .into_iter()
            .map(|frame| {
                frame
                    .into_iter()
                    .take(keep)
                    .map(|m| 20.0 * m.max(MIN_MAGNITUDE).log10())
                    .collect()
            })
            .collect()
    }
}

impl FeatureExtractor for CutoffSpectrogram {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> FeatureMatrix {
        self.compute(samples, sample_rate)
    }
}

/// Cut-off spectrogram with explicit parameters.
pub fn spectrogram_cutoff(
    sample_rate: u32,
    samples: &[f32],
    frame: &FrameConfig,
    cutoff_hz: f32,
) -> FeatureMatrix {
    CutoffSpectrogram::new(frame.clone(), SpectrogramConfig { cutoff_hz }).compute(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MelFilterBank;
    use crate::config::MelConfig;

    fn spectrogram() -> CutoffSpectrogram {
        CutoffSpectrogram::new(FrameConfig::default(), SpectrogramConfig::default())
    }

    #[test]
    fn keeps_bins_up_to_cutoff() {
        let spec = spectrogram();
        // 5000 Hz / 31.25 Hz per bin = bin 160.
        assert_eq!(spec.n_bins(16000), 161);
        let out = spec.compute(&vec![0.1; 4000], 16000);
        assert!(out.iter().all(|frame| frame.len() == 161));

        // A cutoff above Nyquist keeps every bin.
        let wide = spectrogram_cutoff(16000, &vec![0.1; 4000], &FrameConfig::default(), 20000.0);
        assert_eq!(wide[0].len(), 257);
    }

    #[test]
    fn silence_is_floored() {
        let out = spectrogram().compute(&[0.0; 500], 16000);
        let floor = 20.0 * MIN_MAGNITUDE.log10();
        assert!((floor + 200.0).abs() < 1e-3);
        assert!(out.iter().flatten().all(|&v| v == floor));
    }

    #[test]
    fn frames_align_with_mel_branch() {
        let samples: Vec<f32> = (0..12_345).map(|i| ((i % 97) as f32 / 97.0) - 0.5).collect();
        let spec = spectrogram().extract(&samples, 16000);
        let mel = MelFilterBank::new(FrameConfig::default(), MelConfig::default()).extract(&samples, 16000);
        assert_eq!(spec.len(), mel.len());
    }

    #[test]
    fn deterministic() {
        let samples: Vec<f32> = (0..8000).map(|i| (i as f32 * 0.37).sin()).collect();
        assert_eq!(spectrogram().compute(&samples, 16000), spectrogram().compute(&samples, 16000));
    }
}
