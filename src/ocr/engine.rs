use image::GrayImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

use super::setup::{check_engine_version, find_tessdata_dir, find_tesseract_executable};
use super::{OcrConfig, TextRecognizer};
use crate::config::TesseractSettings;
use crate::error::{AnalysisError, OcrError};

/// Tesseract driven through its command-line interface.
#[derive(Clone, Debug)]
pub struct TesseractOcr {
    executable: PathBuf,
    tessdata_dir: Option<PathBuf>,
    language: String,
}

impl TesseractOcr {
    /// Locates Tesseract according to `settings` and verifies it can run.
    pub fn discover(settings: &TesseractSettings) -> Result<Self, AnalysisError> {
        let executable = find_tesseract_executable(settings.executable.as_deref())?;
        check_engine_version(&executable)?;
        let tessdata_dir = find_tessdata_dir(settings.tessdata_dir.as_deref(), &settings.language);

        Ok(Self {
            executable,
            tessdata_dir,
            language: settings.language.clone(),
        })
    }

    fn command_args(&self, input: &Path, config: &OcrConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![input.into(), "stdout".into()];

        if let Some(tessdata) = &self.tessdata_dir {
            args.push("--tessdata-dir".into());
            args.push(tessdata.into());
        }

        args.push("-l".into());
        args.push(self.language.clone().into());
        args.extend(config.to_tesseract_args().into_iter().map(OsString::from));
        args
    }
}

impl TextRecognizer for TesseractOcr {
    /// Saves the crop to a temporary PNG and returns Tesseract's raw stdout.
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError> {
        let temp_input = NamedTempFile::with_suffix(".png")?;
        image.save(temp_input.path())?;

        let output = Command::new(&self.executable)
            .args(self.command_args(temp_input.path(), config))
            .output()?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(raw = ?text, "Tesseract output");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_order() {
        let ocr = TesseractOcr {
            executable: PathBuf::from("tesseract"),
            tessdata_dir: Some(PathBuf::from("/share/tessdata")),
            language: "eng".to_string(),
        };

        let args = ocr.command_args(Path::new("/tmp/cap.png"), &OcrConfig::default());
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "/tmp/cap.png",
                "stdout",
                "--tessdata-dir",
                "/share/tessdata",
                "-l",
                "eng",
                "--oem",
                "3",
                "--psm",
                "11",
                "-c",
                "tessedit_char_whitelist=ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
            ]
        );
    }

    #[test]
    fn test_command_args_without_tessdata() {
        let ocr = TesseractOcr {
            executable: PathBuf::from("tesseract"),
            tessdata_dir: None,
            language: "por".to_string(),
        };

        let args = ocr.command_args(Path::new("cap.png"), &OcrConfig::default());

        assert!(!args.iter().any(|a| a == "--tessdata-dir"));
        assert_eq!(args[2], "-l");
        assert_eq!(args[3], "por");
    }
}
