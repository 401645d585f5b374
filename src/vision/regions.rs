use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use tracing::debug;

use super::{Region, RegionFinder};

/// Both sides of a cap region must be strictly greater than this.
pub const MIN_REGION_SIDE: u32 = 30;

/// Both sides of a cap region must be strictly less than this.
pub const MAX_REGION_SIDE: u32 = 120;

/// Open size window a bounding box has to fall into to count as a marker cap.
///
/// Boxes covering two touching caps exceed the window and are dropped, so
/// overlapping caps undercount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionWindow {
    pub min_side: u32,
    pub max_side: u32,
}

impl Default for RegionWindow {
    fn default() -> Self {
        Self {
            min_side: MIN_REGION_SIDE,
            max_side: MAX_REGION_SIDE,
        }
    }
}

impl RegionWindow {
    pub fn admits(&self, region: &Region) -> bool {
        let fits = |side: u32| self.min_side < side && side < self.max_side;
        fits(region.width) && fits(region.height)
    }
}

/// Region finder backed by `imageproc` border following.
///
/// Only outermost borders are kept; components nested inside holes of
/// other components are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContourRegionFinder;

impl RegionFinder for ContourRegionFinder {
    fn find_external_regions(&self, binary: &GrayImage) -> Vec<Region> {
        find_contours::<u32>(binary)
            .iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .filter_map(|contour| bounding_box(&contour.points))
            .collect()
    }
}

/// Inclusive bounding box of a set of points.
pub fn bounding_box(points: &[Point<u32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Runs `finder` on the binary raster and keeps regions inside `window`,
/// preserving detection order.
pub fn extract_candidates<F: RegionFinder + ?Sized>(
    finder: &F,
    binary: &GrayImage,
    window: &RegionWindow,
) -> Vec<Region> {
    let all = finder.find_external_regions(binary);
    let total = all.len();

    let candidates: Vec<Region> = all.into_iter().filter(|r| window.admits(r)).collect();

    debug!(
        contours = total,
        candidates = candidates.len(),
        "Filtered regions by cap size window"
    );

    candidates
}
