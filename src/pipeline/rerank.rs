use palette::Srgb;
use tracing::{debug, warn};

use crate::catalog::CatalogColor;
use crate::colorimetry::Colorimetry;

use super::prefilter::Candidate;

/// Which distance the final ranking uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Reuse the prefilter distance. No precise-space conversion happens.
    Cheap,
    /// Recompute every candidate with the precise metric (CIEDE2000).
    #[default]
    Precise,
}

impl Metric {
    pub fn from_fast_mode(fast_mode: bool) -> Self {
        if fast_mode {
            Metric::Cheap
        } else {
            Metric::Precise
        }
    }
}

/// A candidate with the distance it was finally ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    pub entry: &'a CatalogColor,
    pub distance: f32,
}

/// Order `candidates` by `metric` and keep the closest `count`.
///
/// Stable on ties, so equal distances keep prefilter order. Candidates that
/// cannot be converted to the precise space, or whose precise distance is not
/// finite, are left out.
pub fn rerank<'a, C: Colorimetry>(
    colorimetry: &C,
    target: Srgb<f32>,
    candidates: Vec<Candidate<'a>>,
    count: usize,
    metric: Metric,
) -> Vec<Ranked<'a>> {
    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<Ranked<'a>> = match metric {
        Metric::Cheap => candidates
            .into_iter()
            .map(|c| Ranked {
                entry: c.entry,
                distance: c.cheap_distance,
            })
            .collect(),
        Metric::Precise => {
            let Some(target) = colorimetry.to_precise_space(target) else {
                warn!("target has no precise-space representation");
                return Vec::new();
            };
            candidates
                .into_iter()
                .filter_map(|c| {
                    let Some(precise) = colorimetry.to_precise_space(c.entry.color().to_srgb())
                    else {
                        debug!(
                            name = c.entry.name(),
                            "excluding candidate without precise coordinates"
                        );
                        return None;
                    };
                    let distance = colorimetry.precise_distance(&target, &precise);
                    if !distance.is_finite() {
                        debug!(
                            name = c.entry.name(),
                            "excluding candidate with non-finite precise distance"
                        );
                        return None;
                    }
                    Some(Ranked {
                        entry: c.entry,
                        distance,
                    })
                })
                .collect()
        }
    };

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(count);
    ranked
}
