use super::{round_to, PRICE_DECIMALS};

/// Exponential moving average of `closes`, aligned by index.
///
/// The first value sits at `period` and is the simple mean of the first
/// `period` closes. Every later value blends the current close with
/// `k = 2 / (period + 1)`. The recursion runs on unrounded values; only the
/// output is rounded.
pub fn ema_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if period == 0 || n <= period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = closes[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(round_to(prev, PRICE_DECIMALS));

    for i in (period + 1)..n {
        prev = closes[i] * k + prev * (1.0 - k);
        out[i] = Some(round_to(prev, PRICE_DECIMALS));
    }
    out
}
