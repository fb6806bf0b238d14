//! Color-space conversions and distance functions used by the matcher.
//!
//! The matcher only talks to the [`Colorimetry`] trait. [`PaletteColorimetry`]
//! is the production implementation on top of the `palette` crate: OKLab is the
//! fast space (Euclidean distance), CIELAB under D65 is the precise space
//! (CIEDE2000).

use palette::color_difference::Ciede2000;
use palette::convert::FromColorUnclamped;
use palette::{Lab, Oklab, Oklch, Srgb};

use crate::color::{Color, TargetColor};

/// Conversions and distances the match pipeline depends on.
///
/// Implementations must be pure and deterministic. `precise_distance` is not
/// required to satisfy the triangle inequality.
pub trait Colorimetry {
    /// Coordinates in the perceptually uniform space used for prefiltering.
    type Fast: Copy;
    /// Coordinates in the reference space used for final ranking.
    type Precise: Copy;

    fn to_fast_space(&self, rgb: Srgb<f32>) -> Self::Fast;

    /// `None` when the color has no meaningful precise-space representation.
    fn to_precise_space(&self, rgb: Srgb<f32>) -> Option<Self::Precise>;

    fn cheap_distance(&self, a: &Self::Fast, b: &Self::Fast) -> f32;

    fn precise_distance(&self, a: &Self::Precise, b: &Self::Precise) -> f32;

    /// Convert a cylindrical target to unclamped float sRGB.
    ///
    /// Out-of-gamut targets still convert (channels may leave [0, 1]); `None`
    /// means the target itself is invalid.
    fn lch_to_rgb(&self, target: &TargetColor) -> Option<Srgb<f32>>;

    /// Convert sRGB to the cylindrical representation, hue in [0, 360).
    fn rgb_to_lch(&self, rgb: Srgb<f32>) -> Option<TargetColor>;

    /// Convert a target to a displayable 8-bit color, or `None` if it is
    /// invalid or outside the sRGB gamut.
    fn lch_to_color(&self, target: &TargetColor) -> Option<Color> {
        self.lch_to_rgb(target).and_then(Color::from_srgb_in_gamut)
    }
}

/// [`Colorimetry`] backed by the `palette` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteColorimetry;

impl Colorimetry for PaletteColorimetry {
    type Fast = Oklab;
    type Precise = Lab;

    fn to_fast_space(&self, rgb: Srgb<f32>) -> Oklab {
        Oklab::from_color_unclamped(rgb)
    }

    fn to_precise_space(&self, rgb: Srgb<f32>) -> Option<Lab> {
        let lab: Lab = Lab::from_color_unclamped(rgb);
        (lab.l.is_finite() && lab.a.is_finite() && lab.b.is_finite()).then_some(lab)
    }

    fn cheap_distance(&self, a: &Oklab, b: &Oklab) -> f32 {
        ((a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)).sqrt()
    }

    fn precise_distance(&self, a: &Lab, b: &Lab) -> f32 {
        a.difference(*b)
    }

    fn lch_to_rgb(&self, target: &TargetColor) -> Option<Srgb<f32>> {
        let TargetColor { l, c, h } = *target;
        if !(l.is_finite() && c.is_finite() && h.is_finite()) {
            return None;
        }
        if !(0.0..=1.0).contains(&l) || c < 0.0 {
            return None;
        }

        let rgb: Srgb<f32> = Srgb::from_color_unclamped(Oklch::new(l, c, h));
        (rgb.red.is_finite() && rgb.green.is_finite() && rgb.blue.is_finite()).then_some(rgb)
    }

    fn rgb_to_lch(&self, rgb: Srgb<f32>) -> Option<TargetColor> {
        let oklch: Oklch = Oklch::from_color_unclamped(rgb);
        let lch = TargetColor::new(oklch.l, oklch.chroma, oklch.hue.into_positive_degrees());
        (lch.l.is_finite() && lch.c.is_finite() && lch.h.is_finite()).then_some(lch)
    }
}
