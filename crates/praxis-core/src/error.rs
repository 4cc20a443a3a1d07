//! Core error types for praxis-core.
//!
//! This module defines the error hierarchy using thiserror. Store failures
//! are kept distinct from validation failures because callers must treat
//! them fail-closed: a ledger that cannot be reached never means "access
//! granted" or "no progress".

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for praxis-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors. Fail-closed: deny access and retry later.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Day argument outside the program range, rejected (never clamped)
    #[error("invalid day {day}: must be within 1..=28")]
    InvalidDay { day: u32 },

    /// Topic id outside the program range; no default topic is substituted
    #[error("unknown topic id {topic_id}: must be within 1..=8")]
    TopicNotFound { topic_id: u8 },

    /// The content catalog had nothing for valid day coordinates
    #[error("no content for topic {topic_id}, day {day}")]
    ContentNotFound { topic_id: u8, day: u32 },
}

/// Persistent-store errors.
///
/// `Unavailable` covers everything a caller should retry later: the store
/// cannot be opened, the connection is gone, or the busy timeout elapsed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable, locked, or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Statement execution failed
    #[error("query failed: {0}")]
    Query(String),

    /// A persisted value could not be decoded
    #[error("corrupt ledger record: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("failed to resolve data directory: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseBusy
                    || code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
