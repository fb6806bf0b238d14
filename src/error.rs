//! Error types for the matching engine.

use thiserror::Error;

use crate::color::TargetColor;

/// Errors surfaced to callers of the match pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// The target could not be converted to RGB (non-finite components,
    /// lightness outside [0, 1] or negative chroma).
    #[error("invalid target color: {0}")]
    InvalidTarget(TargetColor),
}

/// Why a textual or structured RGB value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RgbParseError {
    #[error("unrecognized color syntax: {0:?}")]
    Syntax(String),

    #[error("expected 3 channels, got {0}")]
    ChannelCount(usize),

    #[error("channel value {0:?} is not an integer")]
    NotAnInteger(String),

    #[error("channel value {0} is outside 0..=255")]
    OutOfRange(i64),

    #[error("invalid hex color: {0}")]
    Hex(String),

    #[error("record has no rgb value")]
    Missing,
}

/// Why a raw catalog record was dropped at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("record has an empty name")]
    EmptyName,

    #[error(transparent)]
    Rgb(#[from] RgbParseError),
}
