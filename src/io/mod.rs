//! File adapters around the engine: candle input and feature output.

pub mod candles;
pub mod features;

use anyhow::Result;

use crate::model::candle::Candle;
use crate::model::feature::FeatureRow;

pub use candles::{parse_timestamp, read_candles, CsvCandleFeed};
pub use features::{rows_to_csv_string, CsvFeatureSink};

/// Source of the latest full candle snapshot.
pub trait CandleFeed {
    fn load(&self) -> Result<Vec<Candle>>;
}

pub trait FeatureSink {
    fn write_rows(&mut self, rows: &[FeatureRow]) -> Result<()>;
}
