//! The full run: binarize → extract cap regions → read labels → tally.

use image::RgbImage;
use tracing::info;

use crate::config::TesseractSettings;
use crate::error::AnalysisError;
use crate::ocr::{LabelReader, TesseractOcr, TextRecognizer};
use crate::tally::{AnalysisResult, tally};
use crate::vision::{
    AdaptiveBinarizer, Binarizer, ContourRegionFinder, RegionFinder, RegionWindow,
    extract_candidates,
};

/// Counts markers in a photo using a discovered Tesseract install.
///
/// A malformed raster is rejected before the engine is looked up.
pub fn analyze(image: &RgbImage) -> Result<AnalysisResult, AnalysisError> {
    validate(image)?;
    let engine = TesseractOcr::discover(&TesseractSettings::default())?;
    Analyzer::new(engine).analyze(image)
}

/// Same as [`analyze`] for a packed 8-bit RGB buffer.
pub fn analyze_raw(width: u32, height: u32, data: Vec<u8>) -> Result<AnalysisResult, AnalysisError> {
    let image = raster_from_raw(width, height, data)?;
    analyze(&image)
}

/// One configured pipeline. Stateless between runs.
pub struct Analyzer<R, B = AdaptiveBinarizer, F = ContourRegionFinder> {
    binarizer: B,
    finder: F,
    window: RegionWindow,
    reader: LabelReader<R>,
}

impl<R: TextRecognizer> Analyzer<R> {
    /// Default thresholds with the given recognizer.
    pub fn new(recognizer: R) -> Self {
        Self::with_components(
            AdaptiveBinarizer::default(),
            ContourRegionFinder,
            LabelReader::new(recognizer),
        )
    }
}

impl<R, B, F> Analyzer<R, B, F>
where
    R: TextRecognizer,
    B: Binarizer,
    F: RegionFinder,
{
    pub fn with_components(binarizer: B, finder: F, reader: LabelReader<R>) -> Self {
        Self {
            binarizer,
            finder,
            window: RegionWindow::default(),
            reader,
        }
    }

    pub fn analyze(&self, image: &RgbImage) -> Result<AnalysisResult, AnalysisError> {
        validate(image)?;

        let binary = self.binarizer.binarize(image);
        let regions = extract_candidates(&self.finder, &binary, &self.window);

        let labels: Vec<String> = regions
            .iter()
            .filter_map(|region| self.reader.read(image, region))
            .collect();

        let result = tally(labels);

        info!(
            regions = regions.len(),
            total = result.total,
            duplicates = result.duplicates.len(),
            pack_size = result.pack_size,
            "Analysis complete"
        );

        Ok(result)
    }

    pub fn analyze_raw(
        &self,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let image = raster_from_raw(width, height, data)?;
        self.analyze(&image)
    }
}

fn validate(image: &RgbImage) -> Result<(), AnalysisError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "empty raster ({}x{})",
            width, height
        )));
    }
    Ok(())
}

fn raster_from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<RgbImage, AnalysisError> {
    let len = data.len();
    RgbImage::from_raw(width, height, data).ok_or_else(|| {
        AnalysisError::InvalidInput(format!(
            "buffer of {} bytes does not hold a {}x{} RGB raster",
            len, width, height
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::OcrConfig;
    use crate::vision::Region;
    use image::{GrayImage, Rgb};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct BlankBinarizer;

    impl Binarizer for BlankBinarizer {
        fn binarize(&self, image: &RgbImage) -> GrayImage {
            GrayImage::new(image.width(), image.height())
        }
    }

    struct FixedRegions(Vec<Region>);

    impl RegionFinder for FixedRegions {
        fn find_external_regions(&self, _binary: &GrayImage) -> Vec<Region> {
            self.0.clone()
        }
    }

    /// Answers OCR calls from a script, in call order.
    struct ScriptedOcr(RefCell<VecDeque<Result<String, OcrError>>>);

    impl ScriptedOcr {
        fn new(answers: Vec<Result<&str, &str>>) -> Self {
            let script = answers
                .into_iter()
                .map(|a| match a {
                    Ok(text) => Ok(text.to_string()),
                    Err(msg) => Err(OcrError::Engine {
                        status: "exit status: 1".to_string(),
                        stderr: msg.to_string(),
                    }),
                })
                .collect();
            Self(RefCell::new(script))
        }
    }

    impl TextRecognizer for ScriptedOcr {
        fn recognize(&self, _image: &GrayImage, _config: &OcrConfig) -> Result<String, OcrError> {
            self.0
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn cap_regions(n: u32) -> Vec<Region> {
        (0..n).map(|i| Region::new((i % 10) * 60, (i / 10) * 60, 50, 50)).collect()
    }

    fn photo() -> RgbImage {
        RgbImage::from_pixel(640, 480, Rgb([220, 220, 220]))
    }

    fn analyzer(regions: Vec<Region>, ocr: ScriptedOcr) -> Analyzer<ScriptedOcr, BlankBinarizer, FixedRegions> {
        Analyzer::with_components(BlankBinarizer, FixedRegions(regions), LabelReader::new(ocr))
    }

    #[test]
    fn test_repeated_markers() {
        let ocr = ScriptedOcr::new(vec![Ok("A1"), Ok("B2"), Ok("A1"), Ok("C3"), Ok("A1")]);
        let result = analyzer(cap_regions(5), ocr).analyze(&photo()).unwrap();

        assert_eq!(result.total, 5);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicate_count("A1"), Some(3));
        assert_eq!(result.pack_size, 12);
    }

    #[test]
    fn test_no_regions() {
        let result = analyzer(Vec::new(), ScriptedOcr::new(Vec::new()))
            .analyze(&photo())
            .unwrap();

        assert_eq!(result.total, 0);
        assert!(result.duplicates.is_empty());
        assert_eq!(result.pack_size, 12);
    }

    #[test]
    fn test_full_distinct_pack() {
        let names: Vec<String> = (0..24).map(|i| format!("K{:02}", i)).collect();
        let ocr = ScriptedOcr::new(names.iter().map(|n| Ok(n.as_str())).collect());

        let result = analyzer(cap_regions(24), ocr).analyze(&photo()).unwrap();

        assert_eq!(result.total, 24);
        assert!(result.duplicates.is_empty());
        assert_eq!(result.pack_size, 24);
    }

    #[test]
    fn test_unreadable_and_failed_regions_are_skipped() {
        let ocr = ScriptedOcr::new(vec![
            Ok("A1\n"),
            Ok("X"),
            Err("engine crashed"),
            Ok("TOOLONG1"),
            Ok(""),
            Ok("A1"),
        ]);

        let result = analyzer(cap_regions(6), ocr).analyze(&photo()).unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.duplicate_count("A1"), Some(2));
    }

    #[test]
    fn test_out_of_window_regions_never_reach_ocr() {
        let regions = vec![
            Region::new(0, 0, 50, 50),
            Region::new(100, 0, 150, 40),
            Region::new(0, 100, 20, 20),
        ];
        let ocr = ScriptedOcr::new(vec![Ok("D4"), Ok("E5"), Ok("F6")]);

        let result = analyzer(regions, ocr).analyze(&photo()).unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.duplicates, Vec::new());
    }

    #[test]
    fn test_total_matches_labels_read() {
        let ocr = ScriptedOcr::new(vec![Ok("AA"), Ok("?"), Ok("BB"), Ok("AA")]);
        let a = analyzer(cap_regions(4), ocr);

        let result = a.analyze(&photo()).unwrap();

        let repeated: usize = result.duplicates.iter().map(|d| d.count).sum();
        assert_eq!(result.total, 3);
        assert_eq!(repeated, 2);
    }

    #[test]
    fn test_empty_raster_is_invalid() {
        let err = analyzer(Vec::new(), ScriptedOcr::new(Vec::new()))
            .analyze(&RgbImage::new(0, 10))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_free_analyze_rejects_empty_raster_first() {
        let err = analyze(&RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let err = analyze_raw(0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let err = analyze_raw(3, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_raw_buffer_length_checked() {
        let a = analyzer(Vec::new(), ScriptedOcr::new(Vec::new()));

        let err = a.analyze_raw(4, 4, vec![0; 10]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let ok = a.analyze_raw(4, 4, vec![0; 48]).unwrap();
        assert_eq!(ok.total, 0);
    }

    #[test]
    fn test_real_vision_stages_with_scripted_ocr() {
        // Two dark 60x60 caps on a light photo; the default binarizer marks
        // their borders and the contour finder yields one box per cap.
        let image = RgbImage::from_fn(300, 200, |x, y| {
            let cap_a = (40..100).contains(&x) && (60..120).contains(&y);
            let cap_b = (180..240).contains(&x) && (60..120).contains(&y);
            if cap_a || cap_b {
                Rgb([30, 30, 30])
            } else {
                Rgb([230, 230, 230])
            }
        });
        let ocr = ScriptedOcr::new(vec![Ok("G7"), Ok("G7")]);

        let result = Analyzer::new(ocr).analyze(&image).unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.duplicate_count("G7"), Some(2));
        assert_eq!(result.pack_size, 12);
    }
}
