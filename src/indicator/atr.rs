use super::rolling::RollingMean;
use super::{round_to, PRICE_DECIMALS};
use crate::model::candle::Candle;

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    (candle.high - candle.low)
        .max((candle.high - prev_close).abs())
        .max((candle.low - prev_close).abs())
}

/// Average true range as a plain trailing mean of the last `period` true
/// ranges. The first true range needs a previous close, so the first value
/// lands at index `period`.
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; candles.len()];
    if period == 0 {
        return out;
    }
    let mut mean = RollingMean::new(period);
    for i in 1..candles.len() {
        let tr = true_range(&candles[i], candles[i - 1].close);
        out[i] = mean.push(tr).map(|v| round_to(v, PRICE_DECIMALS));
    }
    out
}
