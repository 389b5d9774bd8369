use super::ema::ema_series;
use super::{round_to, PRICE_DECIMALS};

/// MACD line: fast EMA minus slow EMA, defined only where both are.
///
/// Works on the rounded EMA outputs so the line matches what a reader of the
/// exported EMA columns would compute.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize) -> Vec<Option<f64>> {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);
    fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(round_to(f - s, PRICE_DECIMALS)),
            _ => None,
        })
        .collect()
}
