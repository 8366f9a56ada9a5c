//! Error types for the engine.

use g2config_core::{ConfigHandle, ConfigId, CoreError, ValidationError};
use g2config_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// Every variant has a stable numeric [`code`](EngineError::code); the same
/// code is latched as the engine's last exception when an operation fails.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine parameters malformed or storage unreachable.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// Operation issued before `init`.
    #[error("engine is not initialized")]
    NotInitialized,

    /// Operation issued after `destroy`.
    #[error("engine has been destroyed")]
    Destroyed,

    /// Handle unknown, closed, or issued by another engine.
    #[error("invalid configuration handle: {0}")]
    InvalidHandle(ConfigHandle),

    /// A data source or attribute with this code or ID already exists.
    #[error("duplicate: {0}")]
    Duplicate(ValidationError),

    /// Input document could not be parsed or is inconsistent.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rejected code, ID or attribute operation.
    #[error("validation error: {0}")]
    Validation(ValidationError),

    /// Unrecognized argument, e.g. an unknown log level.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Open-handle limit reached.
    #[error("resource exhausted: {0} configuration handles open")]
    ResourceExhausted(usize),

    /// Persisted configuration not found.
    #[error("configuration not found: {0}")]
    ConfigNotFound(ConfigId),

    /// Document could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl EngineError {
    /// Stable numeric code of this error.
    pub fn code(&self) -> i64 {
        match self {
            EngineError::InvalidHandle(_) => 7,
            EngineError::Duplicate(_) => 23,
            EngineError::Parse(_) => 24,
            EngineError::Validation(_) => 25,
            EngineError::InvalidArgument(_) => 26,
            EngineError::ResourceExhausted(_) => 30,
            EngineError::ConfigNotFound(_) => 37,
            EngineError::Initialization(_) => 48,
            EngineError::NotInitialized => 49,
            EngineError::Destroyed => 50,
            EngineError::Encoding(_) => 55,
            EngineError::Store(_) => 60,
        }
    }

    /// Message in the latched form `"0023E|duplicate: ..."`.
    pub fn latched_message(&self) -> String {
        format!("{:04}E|{}", self.code(), self)
    }
}

impl From<ValidationError> for EngineError {
    fn from(e: ValidationError) -> Self {
        if e.is_duplicate() {
            EngineError::Duplicate(e)
        } else {
            EngineError::Validation(e)
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => EngineError::ConfigNotFound(id),
            other => EngineError::Store(other),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Encoding(msg) => EngineError::Encoding(msg),
            CoreError::InvalidLogLevel(level) => {
                EngineError::InvalidArgument(format!("unrecognized log level {level:?}"))
            }
            CoreError::InvalidSettings(msg) => EngineError::Initialization(msg),
            CoreError::Decoding(msg) => EngineError::Parse(msg),
            CoreError::Inconsistent(v) => EngineError::Parse(v.to_string()),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_validation_maps_to_duplicate() {
        let err = EngineError::from(ValidationError::DuplicateDataSourceCode("X".into()));
        assert!(matches!(err, EngineError::Duplicate(_)));
        assert_eq!(err.code(), 23);
    }

    #[test]
    fn test_store_not_found_maps_to_config_not_found() {
        let err = EngineError::from(StoreError::NotFound(ConfigId(9)));
        assert!(matches!(err, EngineError::ConfigNotFound(ConfigId(9))));
    }

    #[test]
    fn test_latched_message_format() {
        let err = EngineError::InvalidHandle(ConfigHandle::from_raw(0));
        assert_eq!(
            err.latched_message(),
            "0007E|invalid configuration handle: 0"
        );
    }

    #[test]
    fn test_codes_are_nonzero() {
        let samples = [
            EngineError::NotInitialized,
            EngineError::Destroyed,
            EngineError::Parse(String::new()),
            EngineError::InvalidArgument(String::new()),
        ];
        assert!(samples.iter().all(|e| e.code() != 0));
    }
}
