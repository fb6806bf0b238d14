//! Match quality tiers and human-facing scores.

use std::cmp::Ordering;

/// One row of the quality table.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityTier {
    /// Stable identifier, e.g. `EXCELLENT`.
    pub key: &'static str,
    /// Inclusive upper bound on distance. The last tier uses `f32::INFINITY`.
    pub max: f32,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Display color as `#rrggbb`.
    pub color: &'static str,
}

/// Ordered, exhaustive tier table. Bounds ascend and the last bound is infinite,
/// so every non-negative distance lands in exactly one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityTable {
    tiers: Vec<QualityTier>,
}

/// Error building a [`QualityTable`] from custom tiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityTableError {
    #[error("quality table must have at least one tier")]
    Empty,
    #[error("tier bounds must strictly ascend (tier {0})")]
    NotAscending(usize),
    #[error("last tier must have an unbounded upper limit")]
    NotExhaustive,
}

impl QualityTable {
    /// Build a table from tiers ordered by ascending upper bound.
    pub fn new(tiers: Vec<QualityTier>) -> Result<Self, QualityTableError> {
        let last = tiers.last().ok_or(QualityTableError::Empty)?;
        if last.max != f32::INFINITY {
            return Err(QualityTableError::NotExhaustive);
        }
        if let Some(i) = tiers
            .windows(2)
            .position(|w| w[0].max.partial_cmp(&w[1].max) != Some(Ordering::Less))
        {
            return Err(QualityTableError::NotAscending(i + 1));
        }
        Ok(Self { tiers })
    }

    /// Return the first tier whose bound is >= `distance`.
    ///
    /// Negative distances fall into the first tier; NaN falls into the last.
    pub fn classify(&self, distance: f32) -> &QualityTier {
        self.tiers
            .iter()
            .find(|tier| distance <= tier.max)
            .unwrap_or_else(|| &self.tiers[self.tiers.len() - 1])
    }

    pub fn tiers(&self) -> &[QualityTier] {
        &self.tiers
    }
}

impl Default for QualityTable {
    /// Thresholds follow common print-industry ΔE tolerances.
    fn default() -> Self {
        Self {
            tiers: vec![
                QualityTier {
                    key: "EXCELLENT",
                    max: 1.0,
                    label: "Excellent Match",
                    description: "Imperceptible difference - suitable for luxury brands and proofing",
                    icon: "🎯",
                    color: "#22c55e",
                },
                QualityTier {
                    key: "GOOD",
                    max: 2.0,
                    label: "Good Match",
                    description: "Perceptible only under close observation - professional standard",
                    icon: "✅",
                    color: "#84cc16",
                },
                QualityTier {
                    key: "ACCEPTABLE",
                    max: 3.0,
                    label: "Acceptable Match",
                    description: "Standard professional tolerance - suitable for most applications",
                    icon: "⚠️",
                    color: "#eab308",
                },
                QualityTier {
                    key: "FAIR",
                    max: 5.0,
                    label: "Fair Match",
                    description: "Noticeable difference - acceptable for less critical work",
                    icon: "⚡",
                    color: "#f97316",
                },
                QualityTier {
                    key: "POOR",
                    max: f32::INFINITY,
                    label: "Poor Match",
                    description: "Very noticeable difference - not recommended",
                    icon: "❌",
                    color: "#ef4444",
                },
            ],
        }
    }
}

/// Similarity on a 0-100 scale; reaches 0 at distance 10. NaN scores 0.
pub fn similarity(distance: f32) -> f32 {
    if distance.is_nan() {
        return 0.0;
    }
    ((1.0 - distance / 10.0) * 100.0).clamp(0.0, 100.0)
}

/// Match percentage on a 0-100 scale; reaches 0 at distance 5.
///
/// Falls off twice as fast as [`similarity`]. Both are kept because consumers
/// read them separately.
pub fn match_percentage(distance: f32) -> f32 {
    if distance.is_nan() {
        return 0.0;
    }
    (100.0 - (distance / 5.0) * 100.0).clamp(0.0, 100.0)
}
