//! Error types for skyrecords.
//!
//! This module defines all error types used throughout the skyrecords crate.
//! The record-level variants (`InvalidName`, `AlreadyExists`, `NotFound`) are
//! ordinary outcomes the shell reports to the operator and recovers from.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for skyrecords operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// The client name is empty once normalized into a key.
    #[error("invalid client name: {raw:?}")]
    InvalidName {
        /// The name as it was entered.
        raw: String,
    },

    /// A record already exists for this key.
    #[error("client record '{key}' already exists at {path}")]
    AlreadyExists {
        /// Normalized key of the record.
        key: String,
        /// Location of the existing record.
        path: PathBuf,
    },

    /// No record exists for this key.
    #[error("client record '{key}' not found")]
    NotFound {
        /// Normalized key that was looked up.
        key: String,
    },

    /// A record file could not be parsed.
    #[error("malformed record at {path}: {message}")]
    MalformedRecord {
        /// Path of the record file.
        path: PathBuf,
        /// Description of what is wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for skyrecords operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid name error.
    #[must_use]
    pub fn invalid_name(raw: impl Into<String>) -> Self {
        Self::InvalidName { raw: raw.into() }
    }

    /// Create a not found error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a malformed record error.
    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the name normalized to nothing.
    #[must_use]
    pub fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    /// Check if this error means the record already exists.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Check if this error means the record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
