//! Manually computed indicator arrays, aligned by candle index.
//!
//! Every series has the same length as the candle slice. Positions inside the
//! warmup window hold `None`; a missing value is never replaced by zero.
//! Price-scale outputs are rounded to 5 decimals and percentage-scale outputs
//! to 2 decimals.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;

use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::model::candle::Candle;

pub const PRICE_DECIMALS: i32 = 5;
pub const PERCENT_DECIMALS: i32 = 2;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Indicator values captured at one candle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub atr: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub atr: Vec<Option<f64>>,
    pub ema: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle], cfg: &IndicatorConfig) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Self {
            atr: atr::atr_series(candles, cfg.atr_period),
            ema: ema::ema_series(&closes, cfg.ema_period),
            rsi: rsi::rsi_series(&closes, cfg.rsi_period),
            macd: macd::macd_series(&closes, cfg.macd_fast, cfg.macd_slow),
        }
    }

    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    /// Values at `index`; out-of-range positions are all unavailable.
    pub fn snapshot(&self, index: usize) -> IndicatorSnapshot {
        let at = |series: &[Option<f64>]| series.get(index).copied().flatten();
        IndicatorSnapshot {
            atr: at(&self.atr),
            ema: at(&self.ema),
            rsi: at(&self.rsi),
            macd: at(&self.macd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_precision() {
        assert_eq!(round_to(1.123456, PRICE_DECIMALS), 1.12346);
        assert_eq!(round_to(55.5551, PERCENT_DECIMALS), 55.56);
        assert_eq!(round_to(-0.000004, PRICE_DECIMALS), 0.0);
    }
}
