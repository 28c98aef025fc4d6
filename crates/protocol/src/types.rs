use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An axis-aligned screen rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Pagination granularity of the timeline.
///
/// Selects how many day columns one page spans and therefore which
/// page window is active. Switching mode preserves the focused date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    Day,
    ThreeDay,
    Week,
}

impl ViewMode {
    /// Number of day columns one page of this mode spans.
    pub fn days_per_page(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::ThreeDay => 3,
            Self::Week => 7,
        }
    }
}

/// Error for malformed day keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid day key {input:?} (expected YYYY-MM-DD)")]
pub struct DayKeyError {
    /// The rejected input string.
    pub input: String,
}

/// A calendar-date page key, serialized as `YYYY-MM-DD`.
///
/// Wraps `chrono::NaiveDate` so keys order chronologically and day
/// arithmetic (page-window extension, week snapping) stays infallible
/// once a key exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The key `n` days after (`n < 0`: before) this one.
    pub fn offset(self, n: i64) -> Self {
        let shifted = if n >= 0 {
            self.0
                .checked_add_days(Days::new(n as u64))
                .unwrap_or(NaiveDate::MAX)
        } else {
            self.0
                .checked_sub_days(Days::new(n.unsigned_abs()))
                .unwrap_or(NaiveDate::MIN)
        };
        Self(shifted)
    }

    /// Whole days from `other` to `self` (positive when `self` is later).
    pub fn days_since(self, other: DayKey) -> i64 {
        (self.0 - other.0).num_days()
    }

    /// The Monday starting the week containing this key.
    pub fn week_start(self) -> Self {
        let back = self.0.weekday().num_days_from_monday();
        self.offset(-i64::from(back))
    }

    /// Whether this key starts a week (Monday).
    pub fn is_week_start(self) -> bool {
        self.0.weekday() == Weekday::Mon
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DayKeyError { input: s.to_string() })
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
