//! lid-preprocess CLI: convert WAV files into mel-filterbank and spectrogram
//! images.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{error, info, Level};

use lid_preprocess::{ImageCatalog, Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "lid-preprocess", version, about)]
struct Cli {
    /// Input WAV files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving the PNG images
    #[arg(short, long)]
    output_dir: PathBuf,

    /// JSON pipeline config; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the image catalog as JSON here instead of stdout
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Skip inputs that fail instead of stopping at the first error
    #[arg(long)]
    keep_going: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config).context("Invalid pipeline config")?;

    let mut catalogs: BTreeMap<String, ImageCatalog> = BTreeMap::new();
    let mut failures = 0usize;
    for input in &cli.inputs {
        match pipeline.process_file(input, &cli.output_dir) {
            Ok(catalog) => {
                catalogs.insert(input.display().to_string(), catalog);
            }
            Err(e) if cli.keep_going => {
                error!("Skipping {}: {:#}", input.display(), anyhow::Error::from(e));
                failures += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to process {}", input.display()));
            }
        }
    }

    let json = serde_json::to_string_pretty(&catalogs).context("Failed to serialize catalog")?;
    match &cli.catalog {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write catalog {}", path.display()))?;
            info!(path = %path.display(), "Catalog written");
        }
        None => println!("{json}"),
    }

    if failures > 0 {
        bail!("{failures} of {} inputs failed", cli.inputs.len());
    }
    Ok(())
}
