use std::collections::VecDeque;

/// Trailing arithmetic mean over the last `period` pushed values.
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    window: VecDeque<f64>,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "rolling mean period must be > 0");
        Self {
            period,
            window: VecDeque::with_capacity(period),
        }
    }

    /// Push a value, return the mean once `period` values have been seen.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            // No running total: re-summed on every call.
            Some(self.window.iter().sum::<f64>() / self.period as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.window.len() == self.period
    }
}
