//! Plain-text rendering of query results for the terminal.

use serde::Serialize;

use crate::catalog::CatalogColor;
use crate::color::TargetColor;
use crate::colorimetry::Colorimetry;
use crate::pipeline::matcher::MatchResult;

/// Ranked match table, best match first.
pub fn matches_table(target: &TargetColor, results: &[MatchResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Nearest matches for {}\n", target.to_css()));
    if results.is_empty() {
        out.push_str("No matching colors found\n");
        return out;
    }

    for (rank, m) in results.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<28} {:<18} ΔE {:>6.2}  {} {:<16} {:>3.0}% match\n",
            rank + 1,
            m.name,
            m.rgb,
            m.distance,
            m.quality_icon,
            m.quality_label,
            m.match_percentage,
        ));
    }
    out
}

/// One line per catalog entry: name and rgb.
pub fn search_listing(entries: &[&CatalogColor]) -> String {
    let mut out = String::new();
    for entry in entries {
        let color = entry.color();
        out.push_str(&format!(
            "{:<28} {:<18} {}\n",
            entry.name(),
            color.to_css_rgb(),
            color
        ));
    }
    out.push_str(&format!("{} color(s)\n", entries.len()));
    out
}

/// Renderings of a target color. `hex` and `rgb` are `None` outside the sRGB gamut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub css: String,
    pub hex: Option<String>,
    pub rgb: Option<String>,
}

impl Conversion {
    pub fn new<C: Colorimetry>(colorimetry: &C, target: &TargetColor) -> Self {
        let color = colorimetry.lch_to_color(target);
        Self {
            css: target.to_css(),
            hex: color.map(|c| c.to_hex()),
            rgb: color.map(|c| c.to_css_rgb()),
        }
    }

    pub fn render(&self) -> String {
        const OUT_OF_GAMUT: &str = "(out of sRGB gamut)";
        format!(
            "css  {}\nhex  {}\nrgb  {}\n",
            self.css,
            self.hex.as_deref().unwrap_or(OUT_OF_GAMUT),
            self.rgb.as_deref().unwrap_or(OUT_OF_GAMUT),
        )
    }
}
