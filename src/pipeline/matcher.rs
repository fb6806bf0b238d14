use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::color::{Color, TargetColor};
use crate::colorimetry::{Colorimetry, PaletteColorimetry};
use crate::error::MatchError;
use crate::quality::{match_percentage, similarity, QualityTable, QualityTier};

use super::prefilter::prefilter;
use super::rerank::{rerank, Metric, Ranked};

pub const DEFAULT_FILTER_SIZE: usize = 50;
pub const DEFAULT_COUNT: usize = 5;

/// Static configuration owned by a [`Matcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub tiers: QualityTable,
    /// Prefilter size used when a query does not set one. Always capped at
    /// the catalog size.
    pub default_filter_size: usize,
    /// Result count front ends use when the user does not ask for one.
    pub default_count: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tiers: QualityTable::default(),
            default_filter_size: DEFAULT_FILTER_SIZE,
            default_count: DEFAULT_COUNT,
        }
    }
}

/// Per-query knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Rank by the cheap metric only.
    pub fast_mode: bool,
    /// Number of prefilter candidates; `None` uses the configured default.
    pub filter_size: Option<usize>,
}

impl MatchOptions {
    pub fn metric(&self) -> Metric {
        Metric::from_fast_mode(self.fast_mode)
    }
}

/// One ranked match, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub name: String,
    /// `rgb(r, g, b)`.
    pub rgb: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub distance: f32,
    /// Same value as `distance`.
    pub delta_e: f32,
    pub quality: &'static str,
    pub quality_label: &'static str,
    pub quality_icon: &'static str,
    pub quality_color: &'static str,
    pub quality_description: &'static str,
    pub similarity: f32,
    pub match_percentage: f32,
}

impl MatchResult {
    fn new(ranked: &Ranked<'_>, tier: &QualityTier) -> Self {
        let color = ranked.entry.color();
        Self {
            name: ranked.entry.name().to_string(),
            rgb: color.to_css_rgb(),
            r: color.r,
            g: color.g,
            b: color.b,
            distance: ranked.distance,
            delta_e: ranked.distance,
            quality: tier.key,
            quality_label: tier.label,
            quality_icon: tier.icon,
            quality_color: tier.color,
            quality_description: tier.description,
            similarity: similarity(ranked.distance),
            match_percentage: match_percentage(ranked.distance),
        }
    }

    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }
}

/// Nearest-color search over a catalog.
///
/// Holds no per-query state, so one matcher can serve concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct Matcher<C = PaletteColorimetry> {
    colorimetry: C,
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self::with_colorimetry(PaletteColorimetry, config)
    }
}

impl<C: Colorimetry> Matcher<C> {
    pub fn with_colorimetry(colorimetry: C, config: MatchConfig) -> Self {
        Self {
            colorimetry,
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn colorimetry(&self) -> &C {
        &self.colorimetry
    }

    /// Find the `count` catalog colors closest to `target`.
    ///
    /// Results are ordered by ascending distance; ties keep prefilter order.
    /// At most `min(count, filter_size, catalog.len())` results are returned.
    /// An empty catalog or `count == 0` gives an empty list, not an error.
    pub fn find_nearest_colors(
        &self,
        target: &TargetColor,
        catalog: &Catalog,
        count: usize,
        options: &MatchOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let Some(target_rgb) = self.colorimetry.lch_to_rgb(target) else {
            warn!(%target, "target color cannot be converted to RGB");
            return Err(MatchError::InvalidTarget(*target));
        };

        let filter_size = options
            .filter_size
            .unwrap_or(self.config.default_filter_size)
            .min(catalog.len());
        let metric = options.metric();

        let candidates = prefilter(&self.colorimetry, target_rgb, catalog, filter_size);
        let candidate_count = candidates.len();
        let ranked = rerank(&self.colorimetry, target_rgb, candidates, count, metric);

        debug!(
            %target,
            catalog = catalog.len(),
            filter_size,
            candidates = candidate_count,
            results = ranked.len(),
            ?metric,
            "match complete"
        );

        Ok(ranked
            .iter()
            .map(|r| MatchResult::new(r, self.config.tiers.classify(r.distance)))
            .collect())
    }
}

/// Run a query with the default configuration and colorimetry.
pub fn find_nearest_colors(
    target: &TargetColor,
    catalog: &Catalog,
    count: usize,
    options: &MatchOptions,
) -> Result<Vec<MatchResult>, MatchError> {
    Matcher::new(MatchConfig::default()).find_nearest_colors(target, catalog, count, options)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use palette::Srgb;

    use super::*;
    use crate::catalog::RawRecord;

    fn red_blue() -> Catalog {
        Catalog::from_records(&[
            RawRecord::new("Red", "rgb(255, 0, 0)"),
            RawRecord::new("Blue", "rgb(0, 0, 255)"),
        ])
    }

    const REDDISH: TargetColor = TargetColor::new(0.6, 0.2, 30.0);
    const BLUISH: TargetColor = TargetColor::new(0.5, 0.25, 250.0);

    /// Counts precise-space conversions made through the wrapped colorimetry.
    #[derive(Default)]
    struct CountingColorimetry {
        inner: PaletteColorimetry,
        precise_conversions: Cell<usize>,
    }

    impl Colorimetry for CountingColorimetry {
        type Fast = <PaletteColorimetry as Colorimetry>::Fast;
        type Precise = <PaletteColorimetry as Colorimetry>::Precise;

        fn to_fast_space(&self, rgb: Srgb<f32>) -> Self::Fast {
            self.inner.to_fast_space(rgb)
        }

        fn to_precise_space(&self, rgb: Srgb<f32>) -> Option<Self::Precise> {
            self.precise_conversions.set(self.precise_conversions.get() + 1);
            self.inner.to_precise_space(rgb)
        }

        fn cheap_distance(&self, a: &Self::Fast, b: &Self::Fast) -> f32 {
            self.inner.cheap_distance(a, b)
        }

        fn precise_distance(&self, a: &Self::Precise, b: &Self::Precise) -> f32 {
            self.inner.precise_distance(a, b)
        }

        fn lch_to_rgb(&self, target: &TargetColor) -> Option<Srgb<f32>> {
            self.inner.lch_to_rgb(target)
        }

        fn rgb_to_lch(&self, rgb: Srgb<f32>) -> Option<TargetColor> {
            self.inner.rgb_to_lch(rgb)
        }
    }

    /// Fails to place pure blue in the precise space.
    struct BlueBlindColorimetry;

    impl Colorimetry for BlueBlindColorimetry {
        type Fast = <PaletteColorimetry as Colorimetry>::Fast;
        type Precise = <PaletteColorimetry as Colorimetry>::Precise;

        fn to_fast_space(&self, rgb: Srgb<f32>) -> Self::Fast {
            PaletteColorimetry.to_fast_space(rgb)
        }

        fn to_precise_space(&self, rgb: Srgb<f32>) -> Option<Self::Precise> {
            if rgb == Color::new(0, 0, 255).to_srgb() {
                return None;
            }
            PaletteColorimetry.to_precise_space(rgb)
        }

        fn cheap_distance(&self, a: &Self::Fast, b: &Self::Fast) -> f32 {
            PaletteColorimetry.cheap_distance(a, b)
        }

        fn precise_distance(&self, a: &Self::Precise, b: &Self::Precise) -> f32 {
            PaletteColorimetry.precise_distance(a, b)
        }

        fn lch_to_rgb(&self, target: &TargetColor) -> Option<Srgb<f32>> {
            PaletteColorimetry.lch_to_rgb(target)
        }

        fn rgb_to_lch(&self, rgb: Srgb<f32>) -> Option<TargetColor> {
            PaletteColorimetry.rgb_to_lch(rgb)
        }
    }

    #[test]
    fn reddish_target_finds_red() {
        let results =
            find_nearest_colors(&REDDISH, &red_blue(), 1, &MatchOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Red");
        assert_eq!(results[0].rgb, "rgb(255, 0, 0)");
        assert_eq!((results[0].r, results[0].g, results[0].b), (255, 0, 0));
    }

    #[test]
    fn bluish_target_finds_blue() {
        let results =
            find_nearest_colors(&BLUISH, &red_blue(), 1, &MatchOptions::default()).unwrap();
        assert_eq!(results[0].name, "Blue");
    }

    #[test]
    fn red_is_closer_to_reddish_than_to_bluish() {
        let catalog = red_blue();
        let red_from = |target: &TargetColor| {
            find_nearest_colors(target, &catalog, 2, &MatchOptions::default())
                .unwrap()
                .into_iter()
                .find(|m| m.name == "Red")
                .unwrap()
                .distance
        };
        assert!(red_from(&REDDISH) < red_from(&BLUISH));
    }

    #[test]
    fn invalid_target_is_reported() {
        let target = TargetColor::new(f32::NAN, 0.1, 10.0);
        let result = find_nearest_colors(&target, &red_blue(), 5, &MatchOptions::default());
        assert!(matches!(result, Err(MatchError::InvalidTarget(_))));
    }

    #[test]
    fn zero_count_or_empty_catalog_is_empty() {
        let options = MatchOptions::default();
        assert!(find_nearest_colors(&REDDISH, &red_blue(), 0, &options)
            .unwrap()
            .is_empty());
        assert!(find_nearest_colors(&REDDISH, &Catalog::default(), 5, &options)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn result_fields_are_consistent() {
        let results =
            find_nearest_colors(&REDDISH, &red_blue(), 2, &MatchOptions::default()).unwrap();
        let table = QualityTable::default();
        for m in &results {
            assert_eq!(m.distance, m.delta_e);
            let tier = table.classify(m.distance);
            assert_eq!(m.quality, tier.key);
            assert_eq!(m.quality_label, tier.label);
            assert_eq!(m.quality_icon, tier.icon);
            assert_eq!(m.quality_color, tier.color);
            assert_eq!(m.quality_description, tier.description);
            assert_eq!(m.similarity, similarity(m.distance));
            assert_eq!(m.match_percentage, match_percentage(m.distance));
        }
    }

    #[test]
    fn exact_match_is_excellent() {
        let cm = PaletteColorimetry;
        let target = cm.rgb_to_lch(Color::new(0, 0, 255).to_srgb()).unwrap();
        let results = find_nearest_colors(&target, &red_blue(), 1, &MatchOptions::default())
            .unwrap();
        assert_eq!(results[0].name, "Blue");
        assert!(results[0].distance < 0.05, "got {}", results[0].distance);
        assert_eq!(results[0].quality, "EXCELLENT");
        assert!(results[0].similarity > 99.0);
        assert!(results[0].match_percentage > 99.0);
    }

    #[test]
    fn fast_mode_makes_no_precise_conversions() {
        let matcher =
            Matcher::with_colorimetry(CountingColorimetry::default(), MatchConfig::default());
        let options = MatchOptions {
            fast_mode: true,
            filter_size: None,
        };

        let results = matcher
            .find_nearest_colors(&REDDISH, &red_blue(), 2, &options)
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(matcher.colorimetry().precise_conversions.get(), 0);

        let cm = PaletteColorimetry;
        let target = cm.to_fast_space(cm.lch_to_rgb(&REDDISH).unwrap());
        for m in &results {
            let fast = cm.to_fast_space(m.color().to_srgb());
            assert_eq!(m.distance, cm.cheap_distance(&target, &fast));
        }
    }

    #[test]
    fn precise_mode_converts_target_and_candidates() {
        let matcher =
            Matcher::with_colorimetry(CountingColorimetry::default(), MatchConfig::default());
        matcher
            .find_nearest_colors(&REDDISH, &red_blue(), 2, &MatchOptions::default())
            .unwrap();
        assert_eq!(matcher.colorimetry().precise_conversions.get(), 3);
    }

    #[test]
    fn filter_size_caps_result_count() {
        let catalog = Catalog::from_records(&[
            RawRecord::new("A", "rgb(255, 0, 0)"),
            RawRecord::new("B", "rgb(0, 255, 0)"),
            RawRecord::new("C", "rgb(0, 0, 255)"),
            RawRecord::new("D", "rgb(255, 255, 0)"),
        ]);
        let options = MatchOptions {
            fast_mode: false,
            filter_size: Some(2),
        };
        let results = find_nearest_colors(&REDDISH, &catalog, 4, &options).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn configured_default_filter_size_applies() {
        let config = MatchConfig {
            default_filter_size: 1,
            ..MatchConfig::default()
        };
        let results = Matcher::new(config)
            .find_nearest_colors(&REDDISH, &red_blue(), 5, &MatchOptions::default())
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Red");
    }

    #[test]
    fn degenerate_candidates_are_excluded() {
        let matcher = Matcher::with_colorimetry(BlueBlindColorimetry, MatchConfig::default());
        let results = matcher
            .find_nearest_colors(&BLUISH, &red_blue(), 5, &MatchOptions::default())
            .unwrap();
        let names: Vec<&str> = results.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Red"]);
    }

    #[test]
    fn custom_tier_table_is_used() {
        let tiers = QualityTable::new(vec![
            QualityTier {
                key: "ANY",
                max: f32::INFINITY,
                label: "Any",
                description: "Everything",
                icon: "*",
                color: "#000000",
            },
        ])
        .unwrap();
        let matcher = Matcher::new(MatchConfig {
            tiers,
            ..MatchConfig::default()
        });
        let results = matcher
            .find_nearest_colors(&BLUISH, &red_blue(), 2, &MatchOptions::default())
            .unwrap();
        assert!(results.iter().all(|m| m.quality == "ANY"));
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let results =
            find_nearest_colors(&REDDISH, &red_blue(), 1, &MatchOptions::default()).unwrap();
        let json = serde_json::to_value(&results[0]).unwrap();
        for field in [
            "name",
            "rgb",
            "r",
            "g",
            "b",
            "distance",
            "deltaE",
            "quality",
            "qualityLabel",
            "qualityIcon",
            "qualityColor",
            "qualityDescription",
            "similarity",
            "matchPercentage",
        ] {
            assert!(json.get(field).is_some(), "missing field {field} in {json}");
        }
        assert_eq!(json.as_object().unwrap().len(), 14);
    }
}
