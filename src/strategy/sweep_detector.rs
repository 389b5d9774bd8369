use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::candle::Candle;
use crate::model::range::SessionRange;
use crate::model::signal::Direction;
use crate::model::trade::SweepEvent;
use crate::session::Session;

/// Result of inspecting one candle against the day's Asian range.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepScan {
    /// Not a London candle of the range's day.
    NotEligible,
    /// The day already produced a sweep or was voided.
    AlreadyResolved,
    NoSweep,
    /// Closed outside the range before any sweep; the day is closed.
    Voided,
    Sweep(SweepEvent),
}

/// Short when the high pierces above and the close comes back below the
/// range high; Long for the mirror case at the low. A candle that does both
/// is ambiguous and yields nothing.
///
/// Returns `(direction, entry, stop)`.
pub fn detect_sweep(candle: &Candle, range: &SessionRange) -> Option<(Direction, f64, f64)> {
    let short = candle.high > range.high && candle.close < range.high;
    let long = candle.low < range.low && candle.close > range.low;
    match (short, long) {
        (true, false) => Some((Direction::Short, candle.close, candle.high)),
        (false, true) => Some((Direction::Long, candle.close, candle.low)),
        _ => None,
    }
}

#[derive(Debug)]
pub struct SweepDetector {
    void_on_outside_close: bool,
    resolved: BTreeSet<NaiveDate>,
}

impl SweepDetector {
    pub fn new(void_on_outside_close: bool) -> Self {
        Self {
            void_on_outside_close,
            resolved: BTreeSet::new(),
        }
    }

    pub fn inspect(&mut self, position: usize, candle: &Candle, range: &SessionRange) -> SweepScan {
        if candle.session != Session::London || candle.date() != range.day {
            return SweepScan::NotEligible;
        }
        if self.resolved.contains(&range.day) {
            return SweepScan::AlreadyResolved;
        }
        if self.void_on_outside_close && range.is_outside(candle.close) {
            debug!(day = %range.day, close = candle.close, "london close outside asian range, day voided");
            self.resolved.insert(range.day);
            return SweepScan::Voided;
        }
        match detect_sweep(candle, range) {
            Some((direction, entry_price, stop_price)) => {
                debug!(
                    day = %range.day,
                    position,
                    direction = %direction,
                    entry = entry_price,
                    stop = stop_price,
                    "sweep detected"
                );
                self.resolved.insert(range.day);
                SweepScan::Sweep(SweepEvent {
                    day: range.day,
                    position,
                    trigger: candle.clone(),
                    direction,
                    entry_price,
                    stop_price,
                    range: range.clone(),
                })
            }
            None => SweepScan::NoSweep,
        }
    }

    pub fn is_resolved(&self, day: NaiveDate) -> bool {
        self.resolved.contains(&day)
    }

    pub fn reset(&mut self) {
        self.resolved.clear();
    }
}
