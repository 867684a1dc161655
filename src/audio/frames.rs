//! Short-time framing shared by the mel and spectrogram branches.
//!
//! Both branches frame the signal through [`Framer`], so for a given input
//! and [`FrameConfig`] they always produce the same number of frames with the
//! same timing.

use num_complex::Complex;
use rustfft::{num_complex::Complex as FftComplex, Fft, FftPlanner};
use std::sync::Arc;
use tracing::warn;

use crate::config::FrameConfig;

/// Round half away from zero for positive lengths (`1.5 -> 2`, `2.5 -> 3`).
fn round_half_up(x: f64) -> usize {
    (x + 0.5).floor().max(0.0) as usize
}

/// Apply a first-order pre-emphasis filter: `y[0] = x[0]`, `y[i] = x[i] - coeff * x[i-1]`.
pub fn preemphasis(samples: &[f32], coeff: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len());
    if let Some(&first) = samples.first() {
        out.push(first);
    }
    out.extend(samples.windows(2).map(|w| w[1] - coeff * w[0]));
    out
}

/// Frame geometry resolved for one sample rate, plus the planned FFT.
pub struct Framer {
    frame_len: usize,
    frame_step: usize,
    nfft: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl Framer {
    pub fn new(config: &FrameConfig, sample_rate: u32) -> Self {
        let frame_len = round_half_up(config.win_seconds * sample_rate as f64).max(1);
        let frame_step = round_half_up(config.step_seconds * sample_rate as f64).max(1);
        if frame_len > config.nfft {
            warn!(
                frame_len,
                nfft = config.nfft,
                "Frame length exceeds FFT size, frames will be truncated"
            );
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.nfft);

        Self {
            frame_len,
            frame_step,
            nfft: config.nfft,
            fft,
        }
    }

    /// Samples per frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Samples between frame starts.
    pub fn frame_step(&self) -> usize {
        self.frame_step
    }

    /// Number of spectrum bins per frame (`nfft / 2 + 1`).
    pub fn n_bins(&self) -> usize {
        self.nfft / 2 + 1
    }

    /// Number of frames for a given number of samples.
    ///
    /// A signal no longer than one frame still gives one (zero-padded) frame.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        if num_samples <= self.frame_len {
            1
        } else {
            1 + (num_samples - self.frame_len).div_ceil(self.frame_step)
        }
    }

    /// Split `samples` into frames, zero-padding the last one.
    pub fn frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        (0..self.num_frames(samples.len()))
            .map(|i| {
                let start = i * self.frame_step;
                let mut frame = vec![0.0f32; self.frame_len];
                if start < samples.len() {
                    let end = (start + self.frame_len).min(samples.len());
                    frame[..end - start].copy_from_slice(&samples[start..end]);
                }
                frame
            })
            .collect()
    }

    /// Complex spectrum (`nfft / 2 + 1` bins) of one frame, rectangular window.
    fn spectrum(&self, frame: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<FftComplex<f32>> = (0..self.nfft)
            .map(|j| FftComplex::new(frame.get(j).copied().unwrap_or(0.0), 0.0))
            .collect();

        self.fft.process(&mut buffer);

        buffer
            .iter()
            .take(self.n_bins())
            .map(|c| Complex::new(c.re, c.im))
            .collect()
    }

    /// Magnitude spectrum `|X|` per frame, shape `[n_frames, nfft / 2 + 1]`.
    pub fn magnitude_spectrum(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.frames(samples)
            .iter()
            .map(|frame| self.spectrum(frame).iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Power spectrum `|X|^2 / nfft` per frame, shape `[n_frames, nfft / 2 + 1]`.
    pub fn power_spectrum(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let scale = 1.0 / self.nfft as f32;
        self.frames(samples)
            .iter()
            .map(|frame| {
                self.spectrum(frame)
                    .iter()
                    .map(|c| c.norm_sqr() * scale)
                    .collect()
            })
            .collect()
    }
}
