//! Perceptual nearest-color search over a fixed reference catalog.
//!
//! A target given in OKLCH is matched against the catalog in two phases: an
//! OKLab Euclidean prefilter narrows the catalog to a few dozen candidates,
//! then CIEDE2000 ranks them. Every result carries a quality tier and two
//! percentage scores.

pub mod catalog;
pub mod cli;
pub mod color;
pub mod colorimetry;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod report;

pub use catalog::{Catalog, CatalogColor, RawRecord, SharedCatalog};
pub use color::{Color, TargetColor};
pub use colorimetry::{Colorimetry, PaletteColorimetry};
pub use error::MatchError;
pub use pipeline::matcher::{find_nearest_colors, MatchConfig, MatchOptions, MatchResult, Matcher};
pub use pipeline::rerank::Metric;
pub use quality::{QualityTable, QualityTier};
