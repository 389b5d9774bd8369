use super::rolling::RollingMean;
use super::{round_to, PERCENT_DECIMALS};

/// Relative strength index with simple (not Wilder) averaging of gains and
/// losses over the last `period` close-to-close changes.
///
/// A window without losses has RS = 0, which puts the RSI at 0 rather than
/// 100. Downstream datasets were built with that convention.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }
    let mut gains = RollingMean::new(period);
    let mut losses = RollingMean::new(period);
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let avg_gain = gains.push(delta.max(0.0));
        let avg_loss = losses.push((-delta).max(0.0));
        if let (Some(avg_gain), Some(avg_loss)) = (avg_gain, avg_loss) {
            let rs = if avg_loss == 0.0 {
                0.0
            } else {
                avg_gain / avg_loss
            };
            out[i] = Some(round_to(100.0 - 100.0 / (1.0 + rs), PERCENT_DECIMALS));
        }
    }
    out
}
