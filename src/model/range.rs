use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Finalized Asian-session high/low envelope for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRange {
    pub day: NaiveDate,
    pub high: f64,
    pub low: f64,
    /// Positions of the first and last Asia candle in the scanned series.
    pub first_position: usize,
    pub last_position: usize,
    pub candle_count: usize,
}

impl SessionRange {
    pub fn volatility(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// A range with no width cannot be swept meaningfully.
    pub fn is_degenerate(&self) -> bool {
        self.high <= self.low
    }

    /// `true` when `price` closes strictly outside the envelope.
    pub fn is_outside(&self, price: f64) -> bool {
        price > self.high || price < self.low
    }
}
