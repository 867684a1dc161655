//! Audio side of the pipeline.
//!
//! Handles WAV loading, windowing, resampling and the two feature branches
//! (mel filterbank and cut-off spectrogram).

pub mod frames;
pub mod io;
pub mod mel;
pub mod resample;
pub mod spectrogram;
pub mod window;

pub use io::{read_wav, read_wav_dirty, Waveform};
pub use mel::{melfilter, MelFilterBank};
pub use resample::downsample;
pub use spectrogram::{spectrogram_cutoff, CutoffSpectrogram};
pub use window::{sliding_with_filename, Segments, WindowSegment, WindowSegmenter};

/// Real-valued energies, shape `[n_frames][n_bins]`.
pub type FeatureMatrix = Vec<Vec<f32>>;

/// Turns a mono sample buffer into a [`FeatureMatrix`].
pub trait FeatureExtractor {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> FeatureMatrix;
}
