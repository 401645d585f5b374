//! Reading cap labels with Tesseract.

pub mod engine;
pub mod labels;
pub mod setup;

pub use engine::TesseractOcr;
pub use labels::{LabelReader, LabelRules, normalize_crop};

use image::GrayImage;

use crate::error::OcrError;

/// Characters the engine may emit. Labels are uppercase letters and digits.
pub const OCR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Tesseract page segmentation mode 11: sparse text, no particular order.
pub const OCR_PAGE_SEG_MODE: u8 = 11;

/// Tesseract OCR engine mode 3: whatever is available, legacy + LSTM.
pub const OCR_ENGINE_MODE: u8 = 3;

/// Fixed recognition settings handed to a [`TextRecognizer`] on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcrConfig {
    pub whitelist: String,
    pub page_seg_mode: u8,
    pub engine_mode: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            whitelist: OCR_WHITELIST.to_string(),
            page_seg_mode: OCR_PAGE_SEG_MODE,
            engine_mode: OCR_ENGINE_MODE,
        }
    }
}

impl OcrConfig {
    /// Command-line form understood by the Tesseract CLI.
    pub fn to_tesseract_args(&self) -> Vec<String> {
        vec![
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_seg_mode.to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", self.whitelist),
        ]
    }
}

/// Anything that can turn a normalized grayscale crop into raw text.
pub trait TextRecognizer {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError> {
        (**self).recognize(image, config)
    }
}
