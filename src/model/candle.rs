use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::session::{self, Session};

/// One OHLCV bar in broker time, tagged with its trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Position of the bar in the source series.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub session: Session,
}

impl Candle {
    /// Build a candle and classify its session from the timestamp.
    pub fn new(
        index: usize,
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            index,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            session: session::classify(timestamp),
        }
    }

    /// Replace the classified session with a pre-assigned label.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Calendar day of the bar.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    fn prices_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite())
    }
}

/// Check the input contract: finite prices and strictly increasing timestamps.
pub fn validate_candles(candles: &[Candle]) -> Result<(), AppError> {
    for (pos, candle) in candles.iter().enumerate() {
        if !candle.prices_finite() {
            return Err(AppError::InvalidInput(format!(
                "candle {} at {} has a non-finite price",
                candle.index, candle.timestamp
            )));
        }
        if pos > 0 && candles[pos - 1].timestamp >= candle.timestamp {
            return Err(AppError::InvalidInput(format!(
                "timestamps must be strictly increasing: {} follows {}",
                candle.timestamp,
                candles[pos - 1].timestamp
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn new_classifies_session() {
        let c = Candle::new(0, at("2024-05-06 10:30"), 1.0, 1.1, 0.9, 1.05, 10.0);
        assert_eq!(c.session, Session::London);
        assert!(c.is_bullish());
        assert!((c.range() - 0.2).abs() < 1e-12);

        let c = c.with_session(Session::Other);
        assert_eq!(c.session, Session::Other);
    }

    #[test]
    fn validation_rejects_duplicate_timestamps() {
        let a = Candle::new(0, at("2024-05-06 10:00"), 1.0, 1.0, 1.0, 1.0, 0.0);
        let b = Candle::new(1, at("2024-05-06 10:00"), 1.0, 1.0, 1.0, 1.0, 0.0);
        assert!(validate_candles(&[a.clone()]).is_ok());
        assert!(matches!(
            validate_candles(&[a, b]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn validation_rejects_nan_prices() {
        let a = Candle::new(0, at("2024-05-06 10:00"), 1.0, f64::NAN, 1.0, 1.0, 0.0);
        assert!(validate_candles(&[a]).is_err());
    }

    #[test]
    fn empty_series_is_valid() {
        assert!(validate_candles(&[]).is_ok());
    }
}
