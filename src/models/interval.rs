use crate::error::{AppError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling/staleness granularity for a price series.
///
/// The set is fixed by the provider; anything outside it is rejected at
/// the API boundary rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    Min1,
    Min5,
    Min15,
    Min30,
    Min45,
    Hour1,
    Hour2,
    Hour4,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    /// Provider wire format ("1min", "1h", "1day", ...).
    pub fn to_api_format(&self) -> &'static str {
        match self {
            Interval::Min1 => "1min",
            Interval::Min5 => "5min",
            Interval::Min15 => "15min",
            Interval::Min30 => "30min",
            Interval::Min45 => "45min",
            Interval::Hour1 => "1h",
            Interval::Hour2 => "2h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1day",
            Interval::Week1 => "1week",
            Interval::Month1 => "1month",
        }
    }

    /// How old the last cached sample may be before the series counts as
    /// stale. Months are normalized to 30-day blocks.
    pub fn duration(&self) -> Duration {
        let (magnitude, unit) = self.parts();
        match unit {
            "min" => Duration::minutes(magnitude),
            "h" => Duration::hours(magnitude),
            "day" => Duration::days(magnitude),
            "week" => Duration::weeks(magnitude),
            "month" => Duration::days(30 * magnitude),
            _ => unreachable!("unit comes from to_api_format"),
        }
    }

    /// Split the wire format into magnitude and unit suffix.
    fn parts(&self) -> (i64, &'static str) {
        let raw = self.to_api_format();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .expect("interval format always has a unit suffix");
        let magnitude = raw[..split].parse::<i64>().expect("digit prefix");
        (magnitude, &raw[split..])
    }

    /// All supported intervals.
    pub fn all() -> Vec<Interval> {
        vec![
            Interval::Min1,
            Interval::Min5,
            Interval::Min15,
            Interval::Min30,
            Interval::Min45,
            Interval::Hour1,
            Interval::Hour2,
            Interval::Hour4,
            Interval::Day1,
            Interval::Week1,
            Interval::Month1,
        ]
    }
}

impl FromStr for Interval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Interval::all()
            .into_iter()
            .find(|interval| interval.to_api_format() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown interval: {}", s)))
    }
}

impl TryFrom<String> for Interval {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.to_api_format().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_api_format())
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Day1
    }
}
