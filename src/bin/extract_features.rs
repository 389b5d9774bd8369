use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use asia_sweep::config::Config;
use asia_sweep::features::FeatureExtractor;
use asia_sweep::io::{CandleFeed, CsvCandleFeed, CsvFeatureSink, FeatureSink};

#[derive(Parser, Debug)]
#[command(name = "extract-features")]
#[command(about = "Build the Asian-range sweep training table from a price file")]
struct Args {
    /// Price CSV (Date,Open,High,Low,Close,Volume[,Index][,Session])
    #[arg(short, long)]
    candles: PathBuf,

    /// Output feature CSV
    #[arg(short, long, default_value = "data/features/asian_range.csv")]
    out: PathBuf,

    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Override engine.lookahead
    #[arg(long)]
    lookahead: Option<usize>,

    /// Keep scanning a day after a London close outside the range
    #[arg(long)]
    no_void: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load_from(&args.config)?;
    if let Some(lookahead) = args.lookahead {
        config.engine.lookahead = lookahead;
    }
    if args.no_void {
        config.engine.void_on_outside_close = false;
    }
    config.engine.validate()?;

    asia_sweep::logging::init(&config.logging);

    let candles = CsvCandleFeed::new(&args.candles).load()?;
    let rows = FeatureExtractor::new(config.engine.clone())
        .extract(&candles)
        .context("feature extraction failed")?;

    let mut sink = CsvFeatureSink::create(&args.out)?;
    sink.write_rows(&rows)?;
    tracing::info!(
        rows = rows.len(),
        out = %args.out.display(),
        "Feature table written"
    );
    Ok(())
}
