//! Per-region label reading.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use tracing::{debug, warn};

use super::{OcrConfig, TextRecognizer};
use crate::vision::{Region, to_grayscale};

/// Shortest accepted label, after trimming.
pub const MIN_LABEL_LEN: usize = 2;

/// Longest accepted label, after trimming.
pub const MAX_LABEL_LEN: usize = 6;

/// Crops are stretched to a square of this side before OCR.
pub const NORMALIZED_LABEL_SIDE: u32 = 100;

/// Which OCR outputs count as a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelRules {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            min_len: MIN_LABEL_LEN,
            max_len: MAX_LABEL_LEN,
        }
    }
}

impl LabelRules {
    /// Trims `raw` and returns it if its length (in characters) is in range.
    pub fn accept(&self, raw: &str) -> Option<String> {
        let text = raw.trim();
        let len = text.chars().count();
        (self.min_len..=self.max_len)
            .contains(&len)
            .then(|| text.to_string())
    }
}

/// Crops `region` out of the color image, converts it to grayscale and
/// stretches it to a 100×100 square. Returns `None` for an empty crop.
pub fn normalize_crop(image: &RgbImage, region: &Region) -> Option<GrayImage> {
    let crop = imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image();
    if crop.width() == 0 || crop.height() == 0 {
        return None;
    }

    let gray = to_grayscale(&crop);
    // Triangle widens its support when shrinking, unlike OpenCV INTER_LINEAR,
    // so crops larger than the target side are smoothed slightly more.
    Some(imageops::resize(
        &gray,
        NORMALIZED_LABEL_SIDE,
        NORMALIZED_LABEL_SIDE,
        FilterType::Triangle,
    ))
}

/// Reads at most one label per candidate region.
///
/// Engine failures on a region are logged and treated as "no label".
pub struct LabelReader<R> {
    recognizer: R,
    config: OcrConfig,
    rules: LabelRules,
}

impl<R: TextRecognizer> LabelReader<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_rules(recognizer, OcrConfig::default(), LabelRules::default())
    }

    pub fn with_rules(recognizer: R, config: OcrConfig, rules: LabelRules) -> Self {
        Self {
            recognizer,
            config,
            rules,
        }
    }

    pub fn read(&self, image: &RgbImage, region: &Region) -> Option<String> {
        let Some(crop) = normalize_crop(image, region) else {
            debug!(?region, "Empty crop, skipping region");
            return None;
        };

        let raw = match self.recognizer.recognize(&crop, &self.config) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(?region, "OCR failed, skipping region: {}", e);
                return None;
            }
        };

        let label = self.rules.accept(&raw);
        debug!(?region, raw = ?raw, ?label, "Read cap");
        label
    }
}
