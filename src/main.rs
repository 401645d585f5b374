//! Canetinhas counter
//!
//! Reads a photo of a marker pouch, counts the caps, and reports the
//! probable pack size and any repeated cap codes.

mod logging;
mod paths;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use canetinhas::Analyzer;
use canetinhas::config::load_settings;
use canetinhas::ocr::TesseractOcr;
use canetinhas::report::{Report, export_to_json, render_text};

#[derive(Parser, Debug)]
#[command(name = "canetinhas", version, about = "Count felt-tip markers in a pouch photo")]
struct Cli {
    /// Photo of the pouch (PNG or JPEG)
    image: PathBuf,

    /// Settings file (defaults to canetinhas.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, &paths::get_logs_dir())?;
    logging::install_panic_hook();

    let config_path = cli.config.clone().unwrap_or_else(paths::default_config_path);
    let settings = load_settings(&config_path);

    let engine = TesseractOcr::discover(&settings.tesseract)
        .context("OCR features are unavailable")?;

    info!("Analyzing {}", cli.image.display());
    let image = image::open(&cli.image)
        .with_context(|| format!("Failed to open image: {}", cli.image.display()))?
        .to_rgb8();

    let result = Analyzer::new(engine)
        .analyze(&image)
        .with_context(|| format!("Failed to analyze {}", cli.image.display()))?;

    let report = Report::new(&cli.image, result);

    if let Some(output) = &cli.output {
        export_to_json(&report, output)?;
        info!("Report saved: {}", output.display());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", render_text(&report.result));
    }

    Ok(())
}
