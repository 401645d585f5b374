//! Error types for the counting pipeline.
//!
//! Only conditions that make a whole run meaningless surface as
//! [`AnalysisError`]. Failures while reading a single cap are [`OcrError`]s
//! and are absorbed by the label reader.

use thiserror::Error;

/// Errors returned to the caller of [`crate::analyze`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input image: {0}")]
    InvalidInput(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),
}

/// Errors from a single OCR invocation.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to prepare OCR input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode OCR input: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Tesseract failed ({status}): {stderr}")]
    Engine { status: String, stderr: String },
}
