//! # lid-preprocess
//!
//! Turns speech recordings into fixed-size grayscale images for a spoken
//! language classifier. Every 5-second window of a WAV file yields two PNGs:
//! log mel-filterbank energies and a cut-off spectrogram, both 600 frames wide.
//!
//! ## Architecture
//!
//! ```text
//! WAV -> Waveform -> WindowSegment* -> 16 kHz -> FeatureMatrix (mel | spectrogram)
//!   -> GrayRaster [bins x 600] -> melfilter_<id>.png / spectrogram_<id>.png
//! ```
//!
//! ```no_run
//! use lid_preprocess::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let catalog = pipeline.process_file("speech/en_0001.wav", "images")?;
//! println!("{} segments", catalog.len());
//! # Ok::<(), lid_preprocess::Error>(())
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod image;
pub mod pipeline;

pub use audio::{FeatureExtractor, FeatureMatrix, Waveform};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use image::GrayRaster;
pub use pipeline::{wav_to_images, Category, ImageCatalog, Pipeline};
