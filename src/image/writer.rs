//! PNG output.

use png::{BitDepth, ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::GrayRaster;
use crate::error::{Error, Result};

/// Write `raster` as `<dir>/<name>.png` (8-bit grayscale), replacing any
/// existing file. Returns the written path.
pub fn save(name: &str, raster: &GrayRaster, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.png"));
    let encode_err = |source| Error::Encode {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;

    let mut encoder = Encoder::new(BufWriter::new(file), raster.width() as u32, raster.height() as u32);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(encode_err)?;
    writer.write_image_data(raster.pixels()).map_err(encode_err)?;
    writer.finish().map_err(encode_err)?;

    Ok(path)
}
