//! Locating the Tesseract executable and its trained data.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::AnalysisError;

/// The combined legacy + LSTM engine mode needs Tesseract 4 or newer.
pub const MIN_ENGINE_MAJOR: u32 = 4;

const VERSION_PATTERN: &str = r"(?m)^tesseract\s+v?(\d+)\.(\d+)";

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

const COMMON_PATHS: &[&str] = &[
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
}

/// App-local install directory: `<data_local_dir>/canetinhas/tesseract/`
pub fn local_tesseract_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("canetinhas").join("tesseract"))
}

/// Finds the Tesseract executable.
///
/// Checks the configured path first, then the app-local directory, then
/// `PATH`, then common install locations.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Result<PathBuf, AnalysisError> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(AnalysisError::EngineUnavailable(format!(
            "configured Tesseract executable does not exist: {}",
            path.display()
        )));
    }

    if let Some(local_exe) = local_tesseract_dir().map(|d| d.join(EXECUTABLE_NAME)) {
        if local_exe.exists() {
            return Ok(local_exe);
        }
    }

    if let Ok(output) = Command::new(EXECUTABLE_NAME).arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from(EXECUTABLE_NAME));
        }
    }

    for path in COMMON_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(AnalysisError::EngineUnavailable(
        "Tesseract not found. Please install Tesseract-OCR or set tesseract.executable".to_string(),
    ))
}

/// Finds a tessdata directory containing `<language>.traineddata`.
///
/// Returns `None` when nothing is found, letting Tesseract use its
/// compiled-in default.
pub fn find_tessdata_dir(configured: Option<&Path>, language: &str) -> Option<PathBuf> {
    let traineddata = format!("{}.traineddata", language);

    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }

    if let Some(local) = local_tesseract_dir().map(|d| d.join("tessdata")) {
        if local.join(&traineddata).exists() {
            return Some(local);
        }
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let p = PathBuf::from(&prefix);
        if p.join(&traineddata).exists() {
            return Some(p);
        }
        let p = p.join("tessdata");
        if p.join(&traineddata).exists() {
            return Some(p);
        }
    }

    debug!("No tessdata directory found, using engine default");
    None
}

/// Runs `tesseract --version` and checks it supports the combined engine mode.
pub fn check_engine_version(executable: &Path) -> Result<EngineVersion, AnalysisError> {
    let output = Command::new(executable)
        .arg("--version")
        .output()
        .map_err(|e| {
            AnalysisError::EngineUnavailable(format!("failed to run {}: {}", executable.display(), e))
        })?;

    // Older releases print the banner on stderr.
    let banner = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let version = parse_version(&banner).ok_or_else(|| {
        AnalysisError::EngineUnavailable(format!(
            "could not read Tesseract version from {}",
            executable.display()
        ))
    })?;

    if version.major < MIN_ENGINE_MAJOR {
        return Err(AnalysisError::EngineUnavailable(format!(
            "Tesseract {}.{} is too old, need {} or newer",
            version.major, version.minor, MIN_ENGINE_MAJOR
        )));
    }

    info!(
        "Tesseract {}.{} found at: {}",
        version.major,
        version.minor,
        executable.display()
    );

    Ok(version)
}

/// Parses the first `tesseract X.Y` line of a version banner.
pub fn parse_version(banner: &str) -> Option<EngineVersion> {
    let re = Regex::new(VERSION_PATTERN).ok()?;
    let caps = re.captures(banner)?;
    Some(EngineVersion {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
    })
}
