//! Error types for the store module.

use g2config_core::{ConfigId, CoreError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration not found.
    #[error("configuration not found: {0}")]
    NotFound(ConfigId),

    /// A different document already occupies this config ID.
    #[error("config id {0} already holds a different document")]
    IdCollision(ConfigId),

    /// The default configuration changed underneath a compare-and-swap.
    #[error("default config changed: expected {expected}, found {actual:?}")]
    DefaultChanged {
        expected: ConfigId,
        actual: Option<ConfigId>,
    },

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for StoreError {
    fn from(e: CoreError) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
