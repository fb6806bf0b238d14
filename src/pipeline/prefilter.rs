use palette::Srgb;

use crate::catalog::{Catalog, CatalogColor};
use crate::colorimetry::Colorimetry;

/// A catalog entry that survived the cheap first pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub entry: &'a CatalogColor,
    /// Distance to the target in the fast space.
    pub cheap_distance: f32,
}

/// Rank every catalog entry by cheap distance to `target` and keep the closest
/// `filter_size`.
///
/// Each color is converted to the fast space exactly once. The sort is stable,
/// so equal distances keep catalog order.
pub fn prefilter<'a, C: Colorimetry>(
    colorimetry: &C,
    target: Srgb<f32>,
    catalog: &'a Catalog,
    filter_size: usize,
) -> Vec<Candidate<'a>> {
    if filter_size == 0 || catalog.is_empty() {
        return Vec::new();
    }

    let target = colorimetry.to_fast_space(target);
    let mut candidates: Vec<Candidate<'a>> = catalog
        .iter()
        .map(|entry| {
            let fast = colorimetry.to_fast_space(entry.color().to_srgb());
            Candidate {
                entry,
                cheap_distance: colorimetry.cheap_distance(&target, &fast),
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.cheap_distance.total_cmp(&b.cheap_distance));
    candidates.truncate(filter_size);
    candidates
}
