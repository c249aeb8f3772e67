//! Core error types for rhythm-core.
//!
//! Every failure is handled at its call site: storage write failures
//! propagate to the CLI, validation failures are raised before a write
//! is attempted, and missing ids are `Option` sentinels, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rhythm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read from the store failed (not a corrupt-value condition;
    /// unparseable values are recovered to empty collections upstream)
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// Write to the store failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl StorageError {
    /// Classify a rusqlite failure raised by a read.
    pub(crate) fn read(err: rusqlite::Error) -> Self {
        if locked(&err) {
            StorageError::Locked
        } else {
            StorageError::ReadFailed(err.to_string())
        }
    }

    /// Classify a rusqlite failure raised by a write.
    pub(crate) fn write(err: rusqlite::Error) -> Self {
        if locked(&err) {
            StorageError::Locked
        } else {
            StorageError::WriteFailed(err.to_string())
        }
    }
}

fn locked(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::DatabaseLocked
    )
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

/// Validation errors, raised before any persisted state changes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
