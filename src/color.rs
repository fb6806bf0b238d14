use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::RgbParseError;

/// 8-bit sRGB color used for catalog entries and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// Tolerance for float channels that land a hair outside [0, 1] after a round trip.
const GAMUT_EPSILON: f32 = 0.5 / 255.0;

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from wide integer channels, rejecting anything outside 0..=255.
    pub fn from_channels(r: i64, g: i64, b: i64) -> Result<Self, RgbParseError> {
        let channel = |v: i64| u8::try_from(v).map_err(|_| RgbParseError::OutOfRange(v));
        Ok(Self {
            r: channel(r)?,
            g: channel(g)?,
            b: channel(b)?,
        })
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self, RgbParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RgbParseError::Hex(hex.to_string()));
        }
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| RgbParseError::Hex(hex.to_string()))
        };
        Ok(Self {
            r: byte(0..2)?,
            g: byte(2..4)?,
            b: byte(4..6)?,
        })
    }

    /// Parse the CSS functional form `rgb(R, G, B)` with integer channels.
    pub fn from_css_rgb(text: &str) -> Result<Self, RgbParseError> {
        let inner = text
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| RgbParseError::Syntax(text.to_string()))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(RgbParseError::ChannelCount(parts.len()));
        }

        let mut channels = [0i64; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            // Plain decimal digits only; a minus sign survives so it can be
            // reported as out of range.
            let digits = part.strip_prefix('-').unwrap_or(*part);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RgbParseError::NotAnInteger(part.to_string()));
            }
            *slot = part
                .parse::<i64>()
                .map_err(|_| RgbParseError::NotAnInteger(part.to_string()))?;
        }
        Self::from_channels(channels[0], channels[1], channels[2])
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Serialize to the CSS functional form `rgb(r, g, b)`.
    pub fn to_css_rgb(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Convert to `palette::Srgb<u8>`.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Convert to floating point sRGB in [0, 1].
    pub fn to_srgb(self) -> Srgb<f32> {
        self.to_srgb_u8().into_format()
    }

    /// Quantize a float sRGB color, or `None` if any channel is non-finite or
    /// outside the displayable gamut. Never clamps a far-off value into range.
    pub fn from_srgb_in_gamut(srgb: Srgb<f32>) -> Option<Self> {
        let channel = |v: f32| {
            if !v.is_finite() || v < -GAMUT_EPSILON || v > 1.0 + GAMUT_EPSILON {
                return None;
            }
            Some((v.clamp(0.0, 1.0) * 255.0).round() as u8)
        };
        Some(Self {
            r: channel(srgb.red)?,
            g: channel(srgb.green)?,
            b: channel(srgb.blue)?,
        })
    }
}

impl FromStr for Color {
    type Err = RgbParseError;

    /// Accepts `rgb(R, G, B)` or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("rgb(") {
            Self::from_css_rgb(s)
        } else if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Err(RgbParseError::Syntax(s.to_string()))
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A query color in OKLCH: lightness in [0, 1], chroma >= 0, hue in degrees.
///
/// Values are stored as given; validation happens when the pipeline converts
/// the target to RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetColor {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl TargetColor {
    pub const fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Render as a CSS `oklch()` string, e.g. `oklch(60.0% 0.200 30.0)`.
    pub fn to_css(&self) -> String {
        format!("oklch({:.1}% {:.3} {:.1})", self.l * 100.0, self.c, self.h)
    }
}

impl fmt::Display for TargetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oklch({} {} {})", self.l, self.c, self.h)
    }
}
