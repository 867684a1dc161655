//! Per-file driver: WAV in, mel and spectrogram PNGs out.
//!
//! ```text
//! WAV -> windows (5 s) -> downsample (16 kHz) -> { mel filterbank, spectrogram }
//!     -> grayscale -> histeq -> clamp -> crop/pad (600 wide) -> PNG
//! ```
//!
//! Segments are processed one at a time straight off the window iterator.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::audio::{
    downsample, read_wav_dirty, CutoffSpectrogram, FeatureExtractor, MelFilterBank, WindowSegment,
    WindowSegmenter,
};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::image::{save, ImageNormalizer};

/// The two image families produced per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MelFilter,
    Spectros,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::MelFilter, Category::Spectros];

    /// Key used in the catalog.
    pub fn key(self) -> &'static str {
        match self {
            Category::MelFilter => "melfilter",
            Category::Spectros => "spectros",
        }
    }

    /// Prefix of the written file names.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Category::MelFilter => "melfilter",
            Category::Spectros => "spectrogram",
        }
    }
}

/// Paths of every image written for one input, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCatalog {
    pub melfilter: Vec<PathBuf>,
    pub spectros: Vec<PathBuf>,
}

impl ImageCatalog {
    pub fn get(&self, category: Category) -> &[PathBuf] {
        match category {
            Category::MelFilter => &self.melfilter,
            Category::Spectros => &self.spectros,
        }
    }

    fn push(&mut self, category: Category, path: PathBuf) {
        match category {
            Category::MelFilter => self.melfilter.push(path),
            Category::Spectros => self.spectros.push(path),
        }
    }

    /// Number of processed segments.
    pub fn len(&self) -> usize {
        self.melfilter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.melfilter.is_empty()
    }
}

/// Create `path` (and parents) unless it already is a directory.
///
/// A directory appearing concurrently is fine; a file at `path` is an error.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(()) if path.is_dir() => Ok(()),
        Ok(()) => Err(Error::NotADirectory(path.to_path_buf())),
        Err(_) if path.is_dir() => Ok(()),
        Err(_) if path.exists() => Err(Error::NotADirectory(path.to_path_buf())),
        Err(source) => Err(Error::OutputDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Configured feature pipeline. Cheap to reuse across many input files.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    segmenter: WindowSegmenter,
    mel: MelFilterBank,
    spectrogram: CutoffSpectrogram,
    normalizer: ImageNormalizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: WindowSegmenter::from_config(&config.segment),
            mel: MelFilterBank::new(config.frame.clone(), config.mel.clone()),
            spectrogram: CutoffSpectrogram::new(config.frame.clone(), config.spectrogram.clone()),
            normalizer: ImageNormalizer::new(config.image.clone()),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Convert one WAV file into images under `output_dir`.
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output_dir: Q,
    ) -> Result<ImageCatalog> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();
        let start = Instant::now();

        ensure_output_dir(output_dir)?;
        let waveform = read_wav_dirty(input)?;
        info!(
            input = %input.display(),
            sample_rate = waveform.sample_rate,
            samples = waveform.len(),
            duration_s = waveform.duration_secs(),
            "Loaded waveform"
        );

        let mut catalog = ImageCatalog::default();
        if waveform.is_empty() {
            warn!(input = %input.display(), "No samples, nothing to convert");
            return Ok(catalog);
        }
        let segments =
            self.segmenter
                .segments(&waveform.identifier, &waveform.samples, waveform.sample_rate);
        for segment in segments {
            self.process_segment(&segment, output_dir, &mut catalog)
                .map_err(|(stage, source)| Error::Segment {
                    input: input.to_path_buf(),
                    segment: segment.identifier.clone(),
                    stage,
                    source: Box::new(source),
                })?;
        }

        info!(
            input = %input.display(),
            segments = catalog.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Images written"
        );
        Ok(catalog)
    }

    fn process_segment(
        &self,
        segment: &WindowSegment<'_>,
        output_dir: &Path,
        catalog: &mut ImageCatalog,
    ) -> std::result::Result<(), (&'static str, Error)> {
        let (samples, sample_rate) = downsample(
            segment.samples,
            segment.sample_rate,
            self.config.target_sample_rate,
        )
        .map_err(|e| ("resample", e))?;

        let base_name = Path::new(&segment.identifier)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| segment.identifier.clone());

        for category in Category::ALL {
            let extractor: &dyn FeatureExtractor = match category {
                Category::MelFilter => &self.mel,
                Category::Spectros => &self.spectrogram,
            };
            let features = extractor.extract(&samples, sample_rate);
            let raster = self.normalizer.normalize(&features);
            debug!(
                segment = %segment.identifier,
                category = category.key(),
                frames = features.len(),
                height = raster.height(),
                "Normalized raster"
            );

            let name = format!("{}_{}", category.file_prefix(), base_name);
            let path = save(&name, &raster, output_dir).map_err(|e| ("save", e))?;
            catalog.push(category, path);
        }
        Ok(())
    }
}

/// Convert one WAV file with the default configuration.
pub fn wav_to_images<P: AsRef<Path>, Q: AsRef<Path>>(
    sound_file: P,
    output_path: Q,
) -> Result<ImageCatalog> {
    Pipeline::new(PipelineConfig::default())?.process_file(sound_file, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scratch path (file or directory tree) removed when dropped.
    struct TempPath(PathBuf);

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn temp_path(name: &str) -> TempPath {
        let path = std::env::temp_dir().join(format!("lid-preprocess-pipeline-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        let _ = std::fs::remove_file(&path);
        TempPath(path)
    }

    #[test]
    fn ensure_output_dir_creates_and_tolerates_existing() {
        let root = temp_path("mkdir");
        let dir = root.0.join("nested");
        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_output_dir(&dir).unwrap();
    }

    #[test]
    fn ensure_output_dir_rejects_files() {
        let path = temp_path("file");
        std::fs::write(&path.0, b"x").unwrap();
        assert!(matches!(ensure_output_dir(&path.0), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn catalog_serializes_with_category_keys() {
        let mut catalog = ImageCatalog::default();
        catalog.push(Category::MelFilter, PathBuf::from("out/melfilter_a_0.png"));
        catalog.push(Category::Spectros, PathBuf::from("out/spectrogram_a_0.png"));
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["melfilter"][0], "out/melfilter_a_0.png");
        assert_eq!(json["spectros"][0], "out/spectrogram_a_0.png");
        assert_eq!(catalog.get(Category::Spectros).len(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.image.width = 0;
        assert!(matches!(Pipeline::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn missing_input_is_a_decode_error() {
        let dir = temp_path("missing");
        let err = wav_to_images(dir.0.join("nope.wav"), &dir.0).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
