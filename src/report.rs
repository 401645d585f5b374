//! Presenting a result: the text summary and the JSON export.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::tally::AnalysisResult;

/// A result tagged with where and when it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub analyzed_at: String,
    pub image: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl Report {
    pub fn new(image: &Path, result: AnalysisResult) -> Self {
        Self {
            analyzed_at: Local::now().to_rfc3339(),
            image: image.display().to_string(),
            result,
        }
    }
}

/// Human-readable summary, one fact per line.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total de canetinhas detectadas: {}", result.total);
    let _ = writeln!(
        out,
        "Provavelmente é uma bolsa de {} canetinhas",
        result.pack_size
    );

    if result.has_duplicates() {
        let _ = writeln!(out, "Canetinhas repetidas detectadas:");
        for dup in &result.duplicates {
            let _ = writeln!(out, "- `{}` apareceu {} vezes", dup.label, dup.count);
        }
    } else {
        let _ = writeln!(out, "Nenhuma canetinha repetida encontrada.");
    }

    out
}

/// Export a report to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(report: &Report, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}
