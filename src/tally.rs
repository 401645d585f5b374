//! Counting labels, spotting repeats and guessing the pack size.

use serde::Serialize;
use std::collections::HashMap;

/// Standard marker-set sizes, ascending.
pub const PACK_SIZES: [u32; 7] = [12, 24, 36, 48, 60, 80, 120];

/// A label read more than once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateLabel {
    pub label: String,
    pub count: usize,
}

/// Outcome of one analysis run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Number of labels read
    pub total: usize,
    /// Labels seen at least twice, in order of first appearance
    pub duplicates: Vec<DuplicateLabel>,
    /// Closest entry of [`PACK_SIZES`] to `total`
    pub pack_size: u32,
}

impl AnalysisResult {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Occurrences of `label`, if it is a duplicate.
    pub fn duplicate_count(&self, label: &str) -> Option<usize> {
        self.duplicates
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.count)
    }
}

/// Tallies labels into an [`AnalysisResult`].
pub fn tally<I>(labels: I) -> AnalysisResult
where
    I: IntoIterator<Item = String>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0;

    for label in labels {
        total += 1;
        match index.get(&label) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, 1));
            }
        }
    }

    let duplicates = order
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(label, count)| DuplicateLabel { label, count })
        .collect();

    AnalysisResult {
        total,
        duplicates,
        pack_size: nearest_pack_size(total),
    }
}

/// Pack size closest to `total`. Ties go to the smaller size.
pub fn nearest_pack_size(total: usize) -> u32 {
    // min_by_key keeps the first of equal minima, and PACK_SIZES is ascending.
    PACK_SIZES
        .iter()
        .copied()
        .min_by_key(|&size| (size as i64 - total as i64).unsigned_abs())
        .unwrap_or(PACK_SIZES[0])
}
