//! Engine settings loaded from `canetinhas.json`.
//!
//! These only say where Tesseract lives; the counting thresholds are fixed
//! constants in the pipeline modules. A missing or unreadable file falls
//! back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name looked up next to the executable when no path is given.
pub const CONFIG_FILE_NAME: &str = "canetinhas.json";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tesseract: TesseractSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    /// Explicit path to the `tesseract` binary. Searched for when unset.
    pub executable: Option<PathBuf>,
    /// Directory holding `<language>.traineddata`. Engine default when unset.
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract language code passed with `-l`.
    pub language: String,
}

impl Default for TesseractSettings {
    fn default() -> Self {
        Self {
            executable: None,
            tessdata_dir: None,
            language: "eng".to_string(),
        }
    }
}

/// Loads settings from `path`, or returns defaults.
pub fn load_settings(path: &Path) -> Settings {
    info!("Looking for config at: {}", path.display());

    if !path.exists() {
        info!("{} not found. Using default config.", path.display());
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => {
                info!("Config loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tesseract.language, "eng");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "tesseract": { "executable": "/opt/tess/bin/tesseract" } }"#).unwrap();

        let settings = load_settings(&path);

        assert_eq!(
            settings.tesseract.executable,
            Some(PathBuf::from("/opt/tess/bin/tesseract"))
        );
        assert_eq!(settings.tesseract.tessdata_dir, None);
        assert_eq!(settings.tesseract.language, "eng");
    }

    #[test]
    fn test_invalid_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }
}
