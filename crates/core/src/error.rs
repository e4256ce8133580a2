//! Error types for the pair universe.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pair universe.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input (table shape, key column, descriptor).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A timestamp is not well-formed or not comparable to the time index.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Reverse or empty range passed to a range query.
    #[error("Invalid range: got reverse timestamp range {start} - {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Well-formed lookup with no data behind it.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(msg: impl Into<String>) -> Self {
        Error::InvalidTimestamp(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Absence of data, as opposed to a caller bug.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
