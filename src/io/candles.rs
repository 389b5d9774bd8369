use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use super::CandleFeed;
use crate::error::AppError;
use crate::model::candle::{validate_candles, Candle};
use crate::session::Session;

/// Price file row: `Date,Open,High,Low,Close,Volume,Index,Session` in any
/// column order. `Index`, `Volume` and `Session` are optional.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Index", default)]
    index: Option<usize>,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
    #[serde(rename = "Session", default)]
    session: Option<String>,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a broker timestamp. Offsets are dropped and the wall-clock time is
/// kept, since the session table is defined on broker wall-clock hours.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AppError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| AppError::InvalidInput(format!("unparseable timestamp '{}'", raw)))
}

/// Read and validate candles from CSV. A row without a `Session` cell is
/// classified from its timestamp.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut candles = Vec::new();
    for (pos, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result.with_context(|| format!("failed to parse candle row {}", pos))?;
        let timestamp = parse_timestamp(&row.date)?;
        let mut candle = Candle::new(
            row.index.unwrap_or(pos),
            timestamp,
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume.unwrap_or_default(),
        );
        if let Some(label) = row.session.as_deref().filter(|s| !s.trim().is_empty()) {
            let session: Session = label.parse()?;
            candle = candle.with_session(session);
        }
        candles.push(candle);
    }
    validate_candles(&candles)?;
    Ok(candles)
}

/// Re-reads a price file on every load.
#[derive(Debug, Clone)]
pub struct CsvCandleFeed {
    path: PathBuf,
}

impl CsvCandleFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CandleFeed for CsvCandleFeed {
    fn load(&self) -> Result<Vec<Candle>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        read_candles(std::io::BufReader::new(file))
            .with_context(|| format!("failed to load candles from {}", self.path.display()))
    }
}
