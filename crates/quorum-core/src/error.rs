//! Core error types for quorum-core.
//!
//! This module defines the error hierarchy using thiserror. Failures are
//! always reported to the caller of the specific operation; the engine
//! never swaps a failed computation for a default value.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Core error type for quorum-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Busy-interval parsing errors
    #[error("Busy interval error: {0}")]
    IntervalParse(#[from] IntervalParseError),

    /// Storage errors, propagated from the store without retrying
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Timezone name not present in the IANA database
    #[error("Unknown timezone: '{name}'")]
    UnknownTimezone { name: String },

    /// Invalid configuration value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Failed to load application configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save application configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Busy-interval parsing errors.
///
/// Every variant carries the index of the offending entry; a bad entry
/// aborts the whole parse rather than being skipped, since a dropped busy
/// interval would understate a participant's unavailability.
#[derive(Error, Debug)]
pub enum IntervalParseError {
    #[error("Busy interval {index}: missing or empty '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Busy interval {index}: unparsable datetime '{value}'")]
    UnparsableDatetime { index: usize, value: String },

    #[error("Busy interval {index}: end ({end}) must be after start ({start})")]
    EndNotAfterStart {
        index: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Meeting id not present in the store
    #[error("Meeting not found: {0}")]
    MeetingNotFound(Uuid),

    /// Participant id not present in the store
    #[error("Participant not found: {0}")]
    ParticipantNotFound(Uuid),

    /// Data directory unavailable
    #[error("Failed to access data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
