//! Waveform loading.
//!
//! Reads WAV files with `hound`, keeps only the first channel and derives the
//! recording identifier from the path.

use hound::{SampleFormat, WavReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Characters allowed in a cleaned identifier besides ASCII letters and digits.
const VALID_PUNCTUATION: &str = "-_.() ";

/// A decoded recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Name derived from the source path, extension stripped
    pub identifier: String,
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(identifier: impl Into<String>, samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            identifier: identifier.into(),
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file, keeping the full path minus its extension as identifier.
///
/// Used by the pipeline, which only takes the base name of each segment id.
pub fn read_wav_dirty<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    let (samples, sample_rate) = decode_first_channel(path)?;
    let identifier = truncate_extension(&path.to_string_lossy());
    Ok(Waveform::new(identifier, samples, sample_rate))
}

/// Load a WAV file with a sanitized identifier: the whole path is cleaned,
/// then its extension is stripped. Separators are dropped with the rest, so
/// `data/en/a.wav` becomes `dataena`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    let (samples, sample_rate) = decode_first_channel(path)?;
    let identifier = truncate_extension(&clean_filename(&path.to_string_lossy()));
    Ok(Waveform::new(identifier, samples, sample_rate))
}

/// Drop every character that is not an ASCII letter, digit or one of `-_.() `.
pub fn clean_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || VALID_PUNCTUATION.contains(*c))
        .collect()
}

/// Strip the last extension, if any. Dots in directory names and leading
/// dots of hidden files are left alone.
pub fn truncate_extension(name: &str) -> String {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match name[base_start..].rfind('.') {
        Some(dot) if dot > 0 => name[..base_start + dot].to_string(),
        _ => name.to_string(),
    }
}

fn decode_first_channel(path: &Path) -> Result<(Vec<f32>, u32)> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(path).map_err(decode_err)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(decode_err)?
        }
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .step_by(channels)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(decode_err)?,
    };

    if channels > 1 {
        tracing::debug!(
            path = %path.display(),
            channels,
            "Keeping first channel only"
        );
    }

    Ok((samples, spec.sample_rate))
}
