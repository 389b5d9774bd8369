#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use asia_sweep::model::candle::Candle;

/// (hour, open, high, low, close)
pub type Bar = (u32, f64, f64, f64, f64);

/// Inside-range bar; every quiet day has an Asian range of 1.1040 / 1.1010.
pub const QUIET: (f64, f64, f64, f64) = (1.1025, 1.1040, 1.1010, 1.1025);

/// Pierces the range high and closes back inside: Short, entry 1.1030, stop 1.1060.
pub const SHORT_SWEEP: (f64, f64, f64, f64) = (1.1030, 1.1060, 1.1020, 1.1030);

/// Pierces the range low and closes back inside: Long, entry 1.1020, stop 1.0990.
pub const LONG_SWEEP: (f64, f64, f64, f64) = (1.1020, 1.1030, 1.0990, 1.1020);

/// Trades through the Short stop at 1.1060.
pub const SHORT_STOPPED: (f64, f64, f64, f64) = (1.1040, 1.1065, 1.1030, 1.1035);

/// Drifts between the Short TP1 (1.1025) and stop (1.1060) without touching either.
pub const DRIFT: (f64, f64, f64, f64) = (1.1030, 1.1035, 1.1028, 1.1030);

/// Trades down through the Short TP2 at 1.1010.
pub const SHORT_TARGET: (f64, f64, f64, f64) = (1.1030, 1.1035, 1.1005, 1.1010);

/// Closes above the range high without a sweep.
pub const BREAKOUT: (f64, f64, f64, f64) = (1.1040, 1.1050, 1.1035, 1.1045);

pub fn at(hour: u32, bar: (f64, f64, f64, f64)) -> Bar {
    (hour, bar.0, bar.1, bar.2, bar.3)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

/// Hourly candles, one full day at a time.
#[derive(Default)]
pub struct Tape {
    pub candles: Vec<Candle>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(mut self, day: &str, bars: &[Bar]) -> Self {
        let d = date(day);
        for hour in 0..24 {
            let (o, h, l, c) = bars
                .iter()
                .find(|b| b.0 == hour)
                .map(|b| (b.1, b.2, b.3, b.4))
                .unwrap_or(QUIET);
            let ts = d.and_hms_opt(hour, 0, 0).unwrap();
            let index = self.candles.len();
            self.candles.push(Candle::new(index, ts, o, h, l, c, 100.0));
        }
        self
    }

    pub fn build(self) -> Vec<Candle> {
        self.candles
    }
}

/// Mon..Fri 2024-05-06..10: TP2 Short, TP2 Long, quiet, SL Short, void then sweep.
pub fn week() -> Vec<Candle> {
    Tape::new()
        .day("2024-05-06", &[at(10, SHORT_SWEEP)])
        .day("2024-05-07", &[at(10, LONG_SWEEP)])
        .day("2024-05-08", &[])
        .day("2024-05-09", &[at(10, SHORT_SWEEP), at(11, SHORT_STOPPED)])
        .day("2024-05-10", &[at(10, BREAKOUT), at(11, SHORT_SWEEP)])
        .build()
}

/// Monday Short sweep that drifts until Tuesday 00:00 reaches TP2, then a
/// Tuesday Long sweep at 10:00.
pub fn overnight_resolution() -> Vec<Candle> {
    let monday: Vec<Bar> = std::iter::once(at(10, SHORT_SWEEP))
        .chain((11..24).map(|h| at(h, DRIFT)))
        .collect();
    Tape::new()
        .day("2024-05-06", &monday)
        .day("2024-05-07", &[at(0, SHORT_TARGET), at(10, LONG_SWEEP)])
        .build()
}

/// Index of the candle at `stamp` ("%Y-%m-%d %H:%M") in `candles`.
pub fn position(candles: &[Candle], stamp: &str) -> usize {
    let t = ts(stamp);
    candles
        .iter()
        .position(|c| c.timestamp == t)
        .expect("timestamp present in tape")
}
