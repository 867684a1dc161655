//! Log mel-filterbank energies.
//!
//! Pre-emphasis, rectangular frames, power spectrum, then a bank of
//! triangular filters spaced evenly on the HTK mel scale. Output is
//! `ln(energy)` per filter per frame.

use tracing::trace;

use crate::audio::frames::{preemphasis, Framer};
use crate::audio::{FeatureExtractor, FeatureMatrix};
use crate::config::{FrameConfig, MelConfig};

/// Zero energies are replaced by double-precision machine epsilon before the
/// log, so digital silence sits at `ln(2^-52)` (about -36.04).
pub const ENERGY_FLOOR: f32 = f64::EPSILON as f32;

/// Mel-filterbank extractor.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    frame: FrameConfig,
    config: MelConfig,
}

impl MelFilterBank {
    pub fn new(frame: FrameConfig, config: MelConfig) -> Self {
        Self { frame, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MelConfig {
        &self.config
    }

    /// Compute log filterbank energies, shape `[n_frames, nfilt]`.
    pub fn compute(&self, samples: &[f32], sample_rate: u32) -> FeatureMatrix {
        let framer = Framer::new(&self.frame, sample_rate);
        let high_freq = self
            .config
            .high_freq
            .unwrap_or(sample_rate as f32 / 2.0);
        let filterbank = create_mel_filterbank(
            sample_rate,
            self.frame.nfft,
            self.config.nfilt,
            self.config.low_freq,
            high_freq,
        );

        let emphasized = preemphasis(samples, self.config.preemph);
        let power_spec = framer.power_spectrum(&emphasized);
        trace!(
            frame_len = framer.frame_len(),
            frame_step = framer.frame_step(),
            frames = power_spec.len(),
            "Framed segment"
        );

        power_spec
            .iter()
            .map(|frame| {
                filterbank
                    .iter()
                    .map(|filter| {
                        let energy: f32 = filter.iter().zip(frame).map(|(f, p)| f * p).sum();
                        // Empty filters and silent frames would give ln(0).
                        if energy == 0.0 {
                            ENERGY_FLOOR.ln()
                        } else {
                            energy.ln()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl FeatureExtractor for MelFilterBank {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> FeatureMatrix {
        self.compute(samples, sample_rate)
    }
}

/// Log mel-filterbank energies with explicit parameters.
pub fn melfilter(
    sample_rate: u32,
    samples: &[f32],
    frame: &FrameConfig,
    nfilt: usize,
    low_freq: f32,
    preemph: f32,
) -> FeatureMatrix {
    let config = MelConfig {
        nfilt,
        low_freq,
        high_freq: None,
        preemph,
    };
    MelFilterBank::new(frame.clone(), config).compute(samples, sample_rate)
}

/// Convert frequency in Hz to mel (HTK).
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mel to Hz (HTK).
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular filters over `nfft / 2 + 1` bins, one row per filter.
///
/// Filter edges are snapped to FFT bins with `floor((nfft + 1) * hz / rate)`;
/// neighbouring edges that land on the same bin leave that filter empty.
fn create_mel_filterbank(
    sample_rate: u32,
    nfft: usize,
    nfilt: usize,
    low_freq: f32,
    high_freq: f32,
) -> Vec<Vec<f32>> {
    let n_bins = nfft / 2 + 1;
    let mel_min = hz_to_mel(low_freq);
    let mel_max = hz_to_mel(high_freq);

    let bins: Vec<usize> = (0..nfilt + 2)
        .map(|i| mel_min + (mel_max - mel_min) * i as f32 / (nfilt + 1) as f32)
        .map(|mel| ((nfft + 1) as f32 * mel_to_hz(mel) / sample_rate as f32).floor() as usize)
        .map(|bin| bin.min(n_bins - 1))
        .collect();

    let mut filterbank = vec![vec![0.0f32; n_bins]; nfilt];
    for (j, filter) in filterbank.iter_mut().enumerate() {
        let (left, center, right) = (bins[j], bins[j + 1], bins[j + 2]);
        for i in left..center {
            filter[i] = (i - left) as f32 / (center - left) as f32;
        }
        for i in center..right {
            filter[i] = (right - i) as f32 / (right - center) as f32;
        }
    }
    filterbank
}
