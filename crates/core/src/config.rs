//! Configuration for building a grouped universe.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{TimeBucket, PAIR_ID_COLUMN, TIMESTAMP_COLUMN};

/// Construction options for a grouped universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Bar size of the samples. Metadata only.
    pub time_bucket: TimeBucket,
    /// Column the time index is built on.
    pub timestamp_column: String,
    /// Column holding the pair id.
    pub pair_column: String,
    /// Build the time index at construction. When off, it is built on the
    /// first time-based query instead.
    pub auto_index: bool,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            time_bucket: TimeBucket::D1,
            timestamp_column: TIMESTAMP_COLUMN.to_string(),
            pair_column: PAIR_ID_COLUMN.to_string(),
            auto_index: true,
        }
    }
}

impl UniverseConfig {
    /// Default configuration for a given bar size.
    pub fn with_time_bucket(time_bucket: TimeBucket) -> Self {
        Self {
            time_bucket,
            ..Self::default()
        }
    }

    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
