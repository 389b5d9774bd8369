//! Trading-session classification for broker-time timestamps.
//!
//! Timestamps are expected in the broker's reference clock. During the EU
//! daylight-saving window (last Sunday of March 00:00 up to, but excluding,
//! the last Sunday of October 00:00) the broker hour is used as-is; outside
//! of it the clock runs one hour ahead of the session table and is shifted
//! back first.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    Asia,
    Frankfurt,
    London,
    #[serde(rename = "New-York")]
    NewYork,
    Other,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Asia => "Asia",
            Session::Frankfurt => "Frankfurt",
            Session::London => "London",
            Session::NewYork => "New-York",
            Session::Other => "Other",
        }
    }

    /// Session for a local (DST-adjusted) hour of day.
    pub fn from_local_hour(hour: u32) -> Self {
        match hour {
            2..=8 => Session::Asia,
            9 => Session::Frankfurt,
            10..=14 => Session::London,
            15..=22 => Session::NewYork,
            _ => Session::Other,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Asia" => Ok(Session::Asia),
            "Frankfurt" => Ok(Session::Frankfurt),
            "London" => Ok(Session::London),
            "New-York" | "NewYork" => Ok(Session::NewYork),
            "Other" => Ok(Session::Other),
            other => Err(AppError::InvalidInput(format!(
                "unknown session label '{}'",
                other
            ))),
        }
    }
}

/// Classify a broker-time timestamp into its trading session.
pub fn classify(ts: NaiveDateTime) -> Session {
    let in_dst = eu_dst_window(ts.year())
        .map(|(start, end)| start <= ts && ts < end)
        .unwrap_or(false);
    let local_hour = if in_dst {
        ts.hour()
    } else {
        (ts.hour() + 23) % 24
    };
    Session::from_local_hour(local_hour)
}

/// EU daylight-saving window `[start, end)` for `year`, both at midnight.
pub fn eu_dst_window(year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = last_sunday(year, 3)?.and_hms_opt(0, 0, 0)?;
    let end = last_sunday(year, 10)?.and_hms_opt(0, 0, 0)?;
    Some((start, end))
}

/// Last Sunday of `month` in `year`.
pub fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_day = first_of_next.pred_opt()?;
    let back = last_day.weekday().num_days_from_sunday();
    last_day.checked_sub_days(Days::new(u64::from(back)))
}
