//! Sliding-window segmentation.
//!
//! Splits a recording into fixed-length, possibly overlapping windows. The
//! windows borrow from the parent buffer and are produced one at a time, so
//! a long recording never has more than one segment alive in the pipeline.

use std::iter::FusedIterator;

use crate::config::SegmentConfig;

/// One window of a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSegment<'a> {
    /// Parent identifier with the start offset appended: `"{parent}_{offset}"`
    pub identifier: String,
    /// Start of the window in samples of the parent buffer
    pub offset: usize,
    pub samples: &'a [f32],
    /// Sample rate of the parent buffer
    pub sample_rate: u32,
}

/// Window geometry in seconds; converted to samples per recording.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSegmenter {
    window_seconds: f64,
    step_seconds: f64,
    min_fraction: f64,
}

impl WindowSegmenter {
    pub fn new(window_seconds: f64, step_seconds: f64, min_fraction: f64) -> Self {
        Self {
            window_seconds,
            step_seconds,
            min_fraction,
        }
    }

    pub fn from_config(config: &SegmentConfig) -> Self {
        Self::new(config.window_seconds, config.step_seconds, config.min_fraction)
    }

    /// Window and step lengths in samples at `sample_rate`, each at least 1.
    pub fn lengths(&self, sample_rate: u32) -> (usize, usize) {
        let to_samples = |secs: f64| ((secs * sample_rate as f64).round() as usize).max(1);
        (to_samples(self.window_seconds), to_samples(self.step_seconds))
    }

    /// Iterate over the windows of `samples`. Call again to start over.
    pub fn segments<'a>(
        &self,
        identifier: &'a str,
        samples: &'a [f32],
        sample_rate: u32,
    ) -> Segments<'a> {
        let (window_len, step_len) = self.lengths(sample_rate);
        Segments {
            identifier,
            samples,
            sample_rate,
            window_len,
            step_len,
            min_len: self.min_fraction * window_len as f64,
            next_start: Some(0),
        }
    }
}

impl Default for WindowSegmenter {
    fn default() -> Self {
        Self::from_config(&SegmentConfig::default())
    }
}

/// Windows over `samples`, see [`WindowSegmenter::segments`].
pub fn sliding_with_filename<'a>(
    identifier: &'a str,
    samples: &'a [f32],
    sample_rate: u32,
    window_seconds: f64,
    step_seconds: f64,
    min_fraction: f64,
) -> Segments<'a> {
    WindowSegmenter::new(window_seconds, step_seconds, min_fraction).segments(
        identifier,
        samples,
        sample_rate,
    )
}

/// Lazy window sequence. Finite, forward-only.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    identifier: &'a str,
    samples: &'a [f32],
    sample_rate: u32,
    window_len: usize,
    step_len: usize,
    min_len: f64,
    next_start: Option<usize>,
}

impl Segments<'_> {
    /// Whether a window starting at `start` is emitted, and where it ends.
    fn window_at(&self, start: usize) -> Option<usize> {
        let n = self.samples.len();
        if start >= n {
            return None;
        }
        let end = (start + self.window_len).min(n);
        let len = end - start;
        // Trailing partial window: kept iff len >= min_fraction * window_len.
        if len < self.window_len && (len as f64) < self.min_len {
            return None;
        }
        Some(end)
    }

    fn following(&self, start: usize, end: usize) -> Option<usize> {
        if end >= self.samples.len() {
            None
        } else {
            Some(start + self.step_len)
        }
    }

    fn remaining(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.next_start;
        while let Some(start) = cursor {
            let Some(end) = self.window_at(start) else {
                break;
            };
            count += 1;
            cursor = self.following(start, end);
        }
        count
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = WindowSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let Some(end) = self.window_at(start) else {
            self.next_start = None;
            return None;
        };
        self.next_start = self.following(start, end);

        Some(WindowSegment {
            identifier: format!("{}_{}", self.identifier, start),
            offset: start,
            samples: &self.samples[start..end],
            sample_rate: self.sample_rate,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}
