use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use huematch::catalog::Catalog;
use huematch::cli::{Args, Command};
use huematch::pipeline::matcher::{MatchConfig, Matcher};
use huematch::report::{self, Conversion};

fn main() -> Result<()> {
    init_tracing();
    run(Args::parse())
}

/// Log to stderr so stdout stays clean for `--json`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let matcher = Matcher::new(MatchConfig::default());

    match &args.command {
        Command::Match { target, count, .. } => {
            let catalog = Catalog::load(&args.catalog)?;
            let target = target.target();
            let count = count.unwrap_or(matcher.config().default_count);
            let options = args.command.match_options().unwrap_or_default();

            let results = matcher
                .find_nearest_colors(&target, &catalog, count, &options)
                .context("matching failed")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", report::matches_table(&target, &results));
            }
        }
        Command::Search { query } => {
            let catalog = Catalog::load(&args.catalog)?;
            let found = catalog.search(query);

            if args.json {
                let found: Vec<_> = found
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "name": entry.name(),
                            "rgb": entry.color().to_css_rgb(),
                            "hex": entry.color().to_hex(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print!("{}", report::search_listing(&found));
            }
        }
        Command::Convert { target } => {
            let conversion = Conversion::new(matcher.colorimetry(), &target.target());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                print!("{}", conversion.render());
            }
        }
    }

    Ok(())
}
