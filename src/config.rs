//! Pipeline configuration.
//!
//! All tunables live here and are passed once into [`crate::Pipeline`]. The
//! mel and spectrogram branches share a single [`FrameConfig`] so their frame
//! timing cannot drift apart.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Sliding-window segmentation of the input recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Window length in seconds (default: 5.0)
    pub window_seconds: f64,
    /// Distance between window starts in seconds (default: 5.0)
    pub step_seconds: f64,
    /// Trailing partial windows shorter than this fraction of a full window
    /// are dropped (default: 0.6)
    pub min_fraction: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            window_seconds: 5.0,
            step_seconds: 5.0,
            min_fraction: 0.6,
        }
    }
}

/// Short-time framing shared by both feature branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frame length in seconds (default: 0.00833, ~120 frames per second)
    pub win_seconds: f64,
    /// Frame step in seconds (default: 0.00833)
    pub step_seconds: f64,
    /// FFT size (default: 512)
    pub nfft: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            win_seconds: 0.00833,
            step_seconds: 0.00833,
            nfft: 512,
        }
    }
}

/// Mel filterbank branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelConfig {
    /// Number of triangular filters (default: 39)
    pub nfilt: usize,
    /// Lowest filter edge in Hz (default: 0)
    pub low_freq: f32,
    /// Highest filter edge in Hz (defaults to sample_rate / 2)
    pub high_freq: Option<f32>,
    /// Pre-emphasis coefficient (default: 1.0)
    pub preemph: f32,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            nfilt: 39,
            low_freq: 0.0,
            high_freq: None,
            preemph: 1.0,
        }
    }
}

/// Spectrogram branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Bins above this frequency are discarded (default: 5000 Hz)
    pub cutoff_hz: f32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self { cutoff_hz: 5000.0 }
    }
}

/// Raster normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Output width in columns (time frames) (default: 600)
    pub width: usize,
    /// Lower percentile clipped by contrast clamping (default: 1.0)
    pub clamp_low_percent: f64,
    /// Upper percentile clipped by contrast clamping (default: 99.0)
    pub clamp_high_percent: f64,
    /// Value used for right-side padding (default: 0)
    pub pad_value: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 600,
            clamp_low_percent: 1.0,
            clamp_high_percent: 99.0,
            pad_value: 0,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub segment: SegmentConfig,
    /// Every segment is downsampled to this rate before feature extraction
    /// (default: 16000)
    pub target_sample_rate: u32,
    pub frame: FrameConfig,
    pub mel: MelConfig,
    pub spectrogram: SpectrogramConfig,
    pub image: ImageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment: SegmentConfig::default(),
            target_sample_rate: 16000,
            frame: FrameConfig::default(),
            mel: MelConfig::default(),
            spectrogram: SpectrogramConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        let seg = &self.segment;
        if !(seg.window_seconds > 0.0) || !(seg.step_seconds > 0.0) {
            return invalid("segment window and step must be positive");
        }
        if !(0.0..=1.0).contains(&seg.min_fraction) {
            return invalid(format!(
                "segment.min_fraction must be within [0, 1], got {}",
                seg.min_fraction
            ));
        }
        if self.target_sample_rate == 0 {
            return invalid("target_sample_rate must be positive");
        }
        if !(self.frame.win_seconds > 0.0) || !(self.frame.step_seconds > 0.0) {
            return invalid("frame window and step must be positive");
        }
        if self.frame.nfft < 2 {
            return invalid("frame.nfft must be at least 2");
        }
        if self.mel.nfilt == 0 {
            return invalid("mel.nfilt must be positive");
        }
        let nyquist = self.target_sample_rate as f32 / 2.0;
        let high = self.mel.high_freq.unwrap_or(nyquist);
        if high > nyquist {
            return invalid(format!(
                "mel.high_freq {high} Hz is above the Nyquist frequency {nyquist} Hz"
            ));
        }
        if self.mel.low_freq < 0.0 || self.mel.low_freq >= high {
            return invalid("mel.low_freq must be within [0, high_freq)");
        }
        if !(self.spectrogram.cutoff_hz > 0.0) {
            return invalid("spectrogram.cutoff_hz must be positive");
        }
        if self.image.width == 0 {
            return invalid("image.width must be positive");
        }
        let (lo, hi) = (self.image.clamp_low_percent, self.image.clamp_high_percent);
        if !(0.0 <= lo && lo < hi && hi <= 100.0) {
            return invalid(format!(
                "clamp percentiles must satisfy 0 <= low < high <= 100, got {lo} / {hi}"
            ));
        }
        Ok(())
    }
}
