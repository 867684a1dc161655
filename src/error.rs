//! Error types for the feature pipeline.
//!
//! Any error aborts processing of the current input file. Variants carry the
//! path (and for per-segment failures the segment and stage) so the caller can
//! tell what broke without re-running.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between reading a WAV and writing its images.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not a readable waveform container.
    #[error("failed to decode waveform {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Resampling was asked to upsample, or to a zero rate.
    #[error("unsupported resample target: {source_rate} Hz -> {target_rate} Hz (only downsampling is supported)")]
    UnsupportedRate { source_rate: u32, target_rate: u32 },

    /// The resampler itself failed.
    #[error("resampling failed: {0}")]
    Resample(String),

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Something other than a directory occupies the output path.
    #[error("output path {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A raster file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failed while writing a raster.
    #[error("failed to encode PNG {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`crate::PipelineConfig`].
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config parses but its values are unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A stage failed while processing one segment of an input file.
    #[error("{stage} failed for segment {segment} of {}", input.display())]
    Segment {
        input: PathBuf,
        segment: String,
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Strip [`Error::Segment`] wrappers and return the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Segment { source, .. } => source.root(),
            other => other,
        }
    }
}
