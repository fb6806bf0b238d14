use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::TargetColor;
use crate::pipeline::matcher::MatchOptions;

/// Find the closest reference catalog colors to an OKLCH color.
#[derive(Parser, Debug)]
#[command(name = "huematch", version, about)]
pub struct Args {
    /// Path to the catalog JSON file
    #[arg(short = 'C', long, global = true, default_value = "colors.json")]
    pub catalog: PathBuf,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank catalog colors by perceptual distance to a target
    Match {
        #[command(flatten)]
        target: TargetArgs,

        /// Number of matches to return
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Rank by OKLab distance only, skipping CIEDE2000
        #[arg(long)]
        fast: bool,

        /// Candidates kept by the OKLab prefilter
        #[arg(long)]
        filter_size: Option<usize>,
    },

    /// List catalog colors whose name contains the query
    Search {
        /// Case-insensitive name fragment; empty lists everything
        #[arg(default_value = "")]
        query: String,
    },

    /// Show CSS, hex and rgb renderings of a target
    Convert {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// An OKLCH color given on the command line.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct TargetArgs {
    /// Lightness in [0, 1]
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    pub lightness: f32,

    /// Chroma, typically [0, 0.4]
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub chroma: f32,

    /// Hue in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub hue: f32,
}

impl TargetArgs {
    pub fn target(&self) -> TargetColor {
        TargetColor::new(self.lightness, self.chroma, self.hue)
    }
}

impl Command {
    /// Match options for the `match` subcommand.
    pub fn match_options(&self) -> Option<MatchOptions> {
        match self {
            Command::Match {
                fast, filter_size, ..
            } => Some(MatchOptions {
                fast_mode: *fast,
                filter_size: *filter_size,
            }),
            _ => None,
        }
    }
}
