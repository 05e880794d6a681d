//! Core error types for mindscape-core.
//!
//! This module defines the error hierarchy using thiserror. Read failures in
//! the ledgers are swallowed as "no data"; these types surface write
//! failures, configuration problems and network failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mindscape-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Text-generation service errors
    #[error("Coach error: {0}")]
    Coach(#[from] CoachError),

    /// Weather service errors
    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Failures talking to the text-generation endpoint.
#[derive(Error, Debug)]
pub enum CoachError {
    /// No API key in the environment or the keyring
    #[error("API key not configured")]
    MissingCredential,

    /// Non-2xx response
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Connection, TLS or timeout failure before a status arrived
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures resolving current weather conditions.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Endpoint URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Non-2xx response
    #[error("HTTP {0}")]
    Status(u16),

    /// Connection, TLS or timeout failure
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body did not match the forecast schema
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = CoachError::Status {
            code: 429,
            body: "slow down".into(),
        };
        assert_eq!(err.to_string(), "HTTP 429: slow down");
    }

    #[test]
    fn storage_error_wraps_into_core() {
        let err: CoreError = StorageError::Locked.into();
        assert!(matches!(err, CoreError::Storage(StorageError::Locked)));
        assert_eq!(err.to_string(), "Storage error: Database is locked");
    }
}
