use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::candle::Candle;
use crate::model::range::SessionRange;
use crate::session::Session;

#[derive(Debug, Clone)]
struct OpenRun {
    day: NaiveDate,
    high: f64,
    low: f64,
    first_position: usize,
    last_position: usize,
    candle_count: usize,
}

impl OpenRun {
    fn start(position: usize, candle: &Candle) -> Self {
        Self {
            day: candle.date(),
            high: candle.high,
            low: candle.low,
            first_position: position,
            last_position: position,
            candle_count: 1,
        }
    }

    fn extend(&mut self, position: usize, candle: &Candle) {
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.last_position = position;
        self.candle_count += 1;
    }

    fn finish(self) -> SessionRange {
        SessionRange {
            day: self.day,
            high: self.high,
            low: self.low,
            first_position: self.first_position,
            last_position: self.last_position,
            candle_count: self.candle_count,
        }
    }
}

/// Builds one Asian range per calendar day from a candle stream.
///
/// A run of consecutive Asia candles is finalized on the first candle of any
/// other session. A run still open when the data ends stays pending.
#[derive(Debug, Default)]
pub struct RangeTracker {
    open: Option<OpenRun>,
    ranges: BTreeMap<NaiveDate, SessionRange>,
}

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the candle at `position`; returns a range when this candle
    /// finalized one.
    pub fn push(&mut self, position: usize, candle: &Candle) -> Option<SessionRange> {
        if candle.session == Session::Asia {
            match self.open.as_mut() {
                Some(run) if run.day == candle.date() => {
                    run.extend(position, candle);
                    None
                }
                _ => {
                    let previous = self.open.replace(OpenRun::start(position, candle));
                    previous.and_then(|run| self.finalize(run))
                }
            }
        } else {
            self.open.take().and_then(|run| self.finalize(run))
        }
    }

    fn finalize(&mut self, run: OpenRun) -> Option<SessionRange> {
        let range = run.finish();
        if range.is_degenerate() {
            debug!(day = %range.day, high = range.high, low = range.low, "dropping zero-width asian range");
            return None;
        }
        if self.ranges.contains_key(&range.day) {
            debug!(day = %range.day, "ignoring second asian run for day");
            return None;
        }
        debug!(
            day = %range.day,
            high = range.high,
            low = range.low,
            candles = range.candle_count,
            "asian range finalized"
        );
        self.ranges.insert(range.day, range.clone());
        Some(range)
    }

    pub fn range_for(&self, day: NaiveDate) -> Option<&SessionRange> {
        self.ranges.get(&day)
    }

    pub fn ranges(&self) -> &BTreeMap<NaiveDate, SessionRange> {
        &self.ranges
    }

    pub fn has_open_run(&self) -> bool {
        self.open.is_some()
    }

    pub fn reset(&mut self) {
        self.open = None;
        self.ranges.clear();
    }
}

/// Finalized ranges of a whole candle sequence, keyed by day.
pub fn track(candles: &[Candle]) -> BTreeMap<NaiveDate, SessionRange> {
    let mut tracker = RangeTracker::new();
    for (pos, candle) in candles.iter().enumerate() {
        tracker.push(pos, candle);
    }
    tracker.ranges
}
