//! The reference color catalog and its load-time validation.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{RecordError, RgbParseError};

/// A validated catalog entry. Built once at load and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColor {
    name: String,
    color: Color,
}

impl CatalogColor {
    pub fn new(name: impl Into<String>, color: Color) -> Result<Self, RecordError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }
        Ok(Self { name, color })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// An RGB value as it may appear in catalog data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRgb {
    /// `rgb(R, G, B)` or `#rrggbb`.
    Text(String),
    /// `[R, G, B]`.
    Triple(Vec<i64>),
}

/// A loosely typed catalog record, as produced by the color extraction step.
///
/// When `rgb` is present it is authoritative; the separate `r`/`g`/`b` fields
/// are only consulted when it is absent. A channel field that is not an
/// integer reads as missing instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rgb: Option<RawRgb>,
    #[serde(default, deserialize_with = "lenient_channel")]
    pub r: Option<i64>,
    #[serde(default, deserialize_with = "lenient_channel")]
    pub g: Option<i64>,
    #[serde(default, deserialize_with = "lenient_channel")]
    pub b: Option<i64>,
}

fn lenient_channel<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_i64))
}

impl RawRecord {
    pub fn new(name: impl Into<String>, rgb: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rgb: Some(RawRgb::Text(rgb.into())),
            ..Self::default()
        }
    }

    fn parse_rgb(&self) -> Result<Color, RgbParseError> {
        match (&self.rgb, self.r, self.g, self.b) {
            (Some(RawRgb::Text(text)), ..) => text.parse(),
            (Some(RawRgb::Triple(channels)), ..) => match channels.as_slice() {
                &[r, g, b] => Color::from_channels(r, g, b),
                other => Err(RgbParseError::ChannelCount(other.len())),
            },
            (None, Some(r), Some(g), Some(b)) => Color::from_channels(r, g, b),
            _ => Err(RgbParseError::Missing),
        }
    }

    /// Validate into a [`CatalogColor`].
    pub fn validate(&self) -> Result<CatalogColor, RecordError> {
        let color = self.parse_rgb()?;
        CatalogColor::new(self.name.clone(), color)
    }
}

/// Immutable, ordered collection of reference colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    colors: Vec<CatalogColor>,
}

impl Catalog {
    pub fn new(colors: Vec<CatalogColor>) -> Self {
        Self { colors }
    }

    /// Validate raw records, silently dropping the ones that do not parse.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> Self {
        let mut dropped = 0usize;
        let colors: Vec<CatalogColor> = records
            .into_iter()
            .filter_map(|record| match record.validate() {
                Ok(color) => Some(color),
                Err(err) => {
                    debug!(name = %record.name, %err, "dropping catalog record");
                    dropped += 1;
                    None
                }
            })
            .collect();

        info!(kept = colors.len(), dropped, "catalog validated");
        Self { colors }
    }

    /// Parse a JSON array of records.
    ///
    /// A document that is not a JSON array is an error; individual records of
    /// the wrong shape are dropped like any other malformed record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).context("catalog must be a JSON array of records")?;

        let records: Vec<RawRecord> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawRecord>(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    let err = RecordError::Malformed(err.to_string());
                    debug!(%err, "dropping catalog record");
                    None
                }
            })
            .collect();

        Ok(Self::from_records(&records))
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| {
            if !path.exists() {
                format!("catalog not found: {}", path.display())
            } else {
                format!("failed to read catalog: {}", path.display())
            }
        })?;
        Self::from_json_str(&json).with_context(|| format!("invalid catalog: {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[CatalogColor] {
        &self.colors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogColor> {
        self.colors.iter()
    }

    /// Case-insensitive substring search on names, in catalog order.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&CatalogColor> {
        let query = query.trim().to_lowercase();
        self.colors
            .iter()
            .filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogColor;
    type IntoIter = std::slice::Iter<'a, CatalogColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

/// A catalog reference that can be swapped while queries are running.
///
/// Readers take an `Arc` snapshot and keep using it for the whole query;
/// `replace` installs a new catalog without touching existing snapshots.
#[derive(Debug, Default)]
pub struct SharedCatalog {
    current: RwLock<Arc<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `catalog`, returning the one it replaced.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }
}
