//! Audio resampling utilities.
//!
//! Uses rubato's FFT resampler, which band-limits to the target Nyquist
//! frequency before decimating. Only downsampling is supported.

use audioadapter_buffers::owned::InterleavedOwned;
use rubato::{Fft, FixedSync, Resampler};

use crate::error::{Error, Result};

/// Input chunk size handed to the FFT resampler.
const CHUNK_SIZE: usize = 1024;

/// Output length for `input_len` samples converted from `source_rate` to `target_rate`.
pub fn expected_len(input_len: usize, source_rate: u32, target_rate: u32) -> usize {
    (input_len as f64 * target_rate as f64 / source_rate as f64).round() as usize
}

/// Downsample mono `samples` to `target_rate`.
///
/// Returns exactly `round(len * target / source)` samples. Equal rates return
/// a copy of the input.
pub fn downsample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<(Vec<f32>, u32)> {
    if target_rate == 0 || source_rate == 0 || target_rate > source_rate {
        return Err(Error::UnsupportedRate {
            source_rate,
            target_rate,
        });
    }
    if target_rate == source_rate {
        return Ok((samples.to_vec(), target_rate));
    }
    if samples.is_empty() {
        return Ok((Vec::new(), target_rate));
    }

    let mut resampler = Fft::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        2,
        1,
        FixedSync::Input,
    )
    .map_err(|e| Error::Resample(format!("failed to create resampler: {e}")))?;

    let output_len = resampler.process_all_needed_output_len(samples.len());

    let input_buf = InterleavedOwned::new_from(samples.to_vec(), 1, samples.len())
        .map_err(|e| Error::Resample(format!("failed to create input buffer: {e}")))?;

    let mut output_buf = InterleavedOwned::new(0.0f32, 1, output_len);

    let (_, actual_output_len) = resampler
        .process_all_into_buffer(&input_buf, &mut output_buf, samples.len(), None)
        .map_err(|e| Error::Resample(e.to_string()))?;

    let mut output = output_buf.take_data();
    output.truncate(actual_output_len);
    // rubato rounds the tail up to whole chunks; pin the length so it only
    // depends on the input length and the two rates.
    output.resize(expected_len(samples.len(), source_rate, target_rate), 0.0);

    Ok((output, target_rate))
}
