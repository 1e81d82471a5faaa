//! Storage error types for spellcascade

use std::path::PathBuf;
use thiserror::Error;

/// Result type for property store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Property store error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Property absent and no default supplied by the caller
    #[error("Property '{name}' is not defined and has no default")]
    MissingProperty { name: String },

    /// Property present but its value cannot be interpreted
    #[error("Invalid value for property '{name}': {message}")]
    InvalidPropertyValue { name: String, message: String },

    /// The store could not be loaded (corrupt file, unreadable medium)
    #[error("Property store unavailable at {location}: {message}")]
    StorageUnavailable { location: String, message: String },

    /// File read/write failed
    #[error("IO error on {path} ({operation}): {source}")]
    IoError {
        path: PathBuf,
        operation: IoOperation,
        source: std::io::Error,
    },

    /// Store contents could not be parsed
    #[error("Failed to parse {path} as {format}: {message}")]
    ParseError {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// IO operation type for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Read,
    Write,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoOperation::Read => write!(f, "read"),
            IoOperation::Write => write!(f, "write"),
        }
    }
}

impl StorageError {
    /// Create a missing property error
    pub fn missing_property(name: impl Into<String>) -> Self {
        StorageError::MissingProperty { name: name.into() }
    }

    /// Create an invalid property value error
    pub fn invalid_value(name: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::InvalidPropertyValue {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a storage unavailable error
    pub fn storage_unavailable(location: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::StorageUnavailable {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io_error(path: PathBuf, operation: IoOperation, source: std::io::Error) -> Self {
        StorageError::IoError {
            path,
            operation,
            source,
        }
    }

    /// Create a parse error
    pub fn parse_error(
        path: PathBuf,
        format: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StorageError::ParseError {
            path,
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StorageError::Internal(message.into())
    }

    /// True when the failure concerns one value and the rest of the store is usable.
    ///
    /// Callers resolving a configuration treat such a value as absent at this
    /// store; any other error means the store as a whole cannot be trusted.
    pub fn is_value_error(&self) -> bool {
        matches!(self, StorageError::InvalidPropertyValue { .. })
    }
}
