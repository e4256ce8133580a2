//! Core data types for the pair universe.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Primary key of a trading pair, as delivered by the server.
pub type PairId = u64;

/// A UTC instant. Every timestamp is normalized to this before comparison.
pub type Timestamp = DateTime<Utc>;

/// Default name of the key column.
pub const PAIR_ID_COLUMN: &str = "pair_id";

/// Default name of the timestamp column.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Nominal bar size of candle and liquidity samples.
///
/// Metadata only: rows are never validated or resampled against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeBucket {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[default]
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "30d")]
    D30,
}

impl TimeBucket {
    /// All buckets the server publishes, shortest first.
    pub fn all() -> &'static [TimeBucket] {
        &[
            TimeBucket::M1,
            TimeBucket::M5,
            TimeBucket::M15,
            TimeBucket::H1,
            TimeBucket::H4,
            TimeBucket::D1,
            TimeBucket::D7,
            TimeBucket::D30,
        ]
    }

    /// Wire name, e.g. `"4h"`.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeBucket::M1 => "1m",
            TimeBucket::M5 => "5m",
            TimeBucket::M15 => "15m",
            TimeBucket::H1 => "1h",
            TimeBucket::H4 => "4h",
            TimeBucket::D1 => "1d",
            TimeBucket::D7 => "7d",
            TimeBucket::D30 => "30d",
        }
    }

    /// Nominal spacing between two consecutive samples.
    pub fn to_duration(self) -> Duration {
        match self {
            TimeBucket::M1 => Duration::minutes(1),
            TimeBucket::M5 => Duration::minutes(5),
            TimeBucket::M15 => Duration::minutes(15),
            TimeBucket::H1 => Duration::hours(1),
            TimeBucket::H4 => Duration::hours(4),
            TimeBucket::D1 => Duration::days(1),
            TimeBucket::D7 => Duration::days(7),
            TimeBucket::D30 => Duration::days(30),
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TimeBucket::all()
            .iter()
            .copied()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("unknown time bucket {s:?}")))
    }
}

/// Anything that can be read as a UTC instant.
///
/// Naive values are taken to already be in UTC.
pub trait ToUtc {
    /// Convert to a UTC timestamp.
    fn try_to_utc(&self) -> Result<Timestamp>;
}

impl<Tz: TimeZone> ToUtc for DateTime<Tz> {
    fn try_to_utc(&self) -> Result<Timestamp> {
        Ok(self.with_timezone(&Utc))
    }
}

impl ToUtc for NaiveDateTime {
    fn try_to_utc(&self) -> Result<Timestamp> {
        Ok(Utc.from_utc_datetime(self))
    }
}

impl<T: ToUtc + ?Sized> ToUtc for &T {
    fn try_to_utc(&self) -> Result<Timestamp> {
        (**self).try_to_utc()
    }
}
