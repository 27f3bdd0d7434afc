//! Core error types for smartchore-core.
//!
//! This module defines the error hierarchy using thiserror. Only
//! `CoreError::NoMembers` is fatal to an assignment run; malformed chore
//! data and advisor failures degrade gracefully and are reported through
//! logging instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for smartchore-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The roster handed to an assignment run was empty
    #[error("No household members to assign chores to")]
    NoMembers,

    /// Storage-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Text advisor errors (only surfaced by direct advisor calls)
    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored record could not be decoded
    #[error("Corrupt record in '{table}': {message}")]
    Corrupt { table: String, message: String },

    /// Member lookup failed
    #[error("Unknown member: {0}")]
    UnknownMember(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not resolve the data directory
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
}

/// Errors from an external text-generation collaborator.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// No advisor configured or it refused to run
    #[error("Text advisor unavailable: {0}")]
    Unavailable(String),

    /// Transport failure
    #[error("Text advisor request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status
    #[error("Text advisor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be understood
    #[error("Malformed text advisor response: {0}")]
    MalformedResponse(String),

    /// The call did not finish within its budget
    #[error("Text advisor timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

/// Validation errors.
///
/// `InvalidChoreData` and `InvalidMemberData` are intake issues: the record
/// is still accepted with the documented default filled in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A chore record was missing or had an out-of-range field
    #[error("Chore '{chore_id}' has invalid {field}; using default {default}")]
    InvalidChoreData {
        chore_id: String,
        field: &'static str,
        default: String,
    },

    /// A member record was missing or had an out-of-range field
    #[error("Member '{member_id}' has invalid {field}; using default {default}")]
    InvalidMemberData {
        member_id: String,
        field: &'static str,
        default: String,
    },

    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdvisorError::Timeout { timeout_ms: 0 }
        } else if err.is_decode() {
            AdvisorError::MalformedResponse(err.to_string())
        } else {
            AdvisorError::Request(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
