//! Configuration error types
//!
//! Store failures met while resolving a configuration never surface here;
//! the cascade absorbs them. What remains are misuse errors and failures of
//! explicit editing or file operations.

use spellcascade_storage::StorageError;
use thiserror::Error;

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot resolve a configuration from an empty tier chain")]
    EmptyTierChain,

    #[error("Invalid tier chain: {0}")]
    InvalidTierChain(String),

    #[error("Property '{property}' cannot be inherited in the global configuration")]
    InheritedOnGlobal { property: String },

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Path resolution failed: {0}")]
    PathResolution(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
