//! Image-side stages of the pipeline: binarization and cap-region extraction.
//!
//! Both stages sit behind small traits so the rest of the pipeline can be
//! driven by fixed geometries in tests.

pub mod preprocess;
pub mod regions;

pub use preprocess::{AdaptiveBinarizer, ThresholdParams, to_grayscale};
pub use regions::{ContourRegionFinder, RegionWindow, extract_candidates};

use image::{GrayImage, RgbImage};

/// Axis-aligned bounding box over the input image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Turns a color photo into a single-channel {0, 255} raster of the same size.
pub trait Binarizer {
    fn binarize(&self, image: &RgbImage) -> GrayImage;
}

/// Finds the bounding boxes of outermost foreground components.
///
/// Implementations keep whatever order the underlying detection produces.
pub trait RegionFinder {
    fn find_external_regions(&self, binary: &GrayImage) -> Vec<Region>;
}
