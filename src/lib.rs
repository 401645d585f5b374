//! Counts felt-tip markers ("canetinhas") in a photo of a pouch.
//!
//! Caps are found as mid-sized dark components of an adaptively
//! thresholded image, the code printed on each cap is read with Tesseract,
//! and the codes are tallied into a total, a list of repeated codes and the
//! closest standard pack size.

pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod report;
pub mod tally;
pub mod vision;

pub use error::{AnalysisError, OcrError};
pub use pipeline::{Analyzer, analyze, analyze_raw};
pub use tally::{AnalysisResult, DuplicateLabel, PACK_SIZES};
