//! Error types for the configuration core.

use thiserror::Error;

use crate::types::{AttributeId, DataSourceId};

/// Core errors raised while encoding, decoding or interpreting inputs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),

    #[error("unrecognized log level: {0:?}")]
    InvalidLogLevel(String),

    #[error("document is inconsistent: {0}")]
    Inconsistent(#[from] ValidationError),
}

/// Validation errors for codes, IDs and document structure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("code must not be empty")]
    EmptyCode,

    #[error("code {code:?} exceeds maximum length of {max}")]
    CodeTooLong { code: String, max: usize },

    #[error("code {code:?} contains invalid character {ch:?}")]
    InvalidCodeCharacter { code: String, ch: char },

    #[error("data source code already exists: {0}")]
    DuplicateDataSourceCode(String),

    #[error("data source id already exists: {0}")]
    DuplicateDataSourceId(DataSourceId),

    #[error("attribute code already exists: {0}")]
    DuplicateAttributeCode(String),

    #[error("attribute id already exists: {0}")]
    DuplicateAttributeId(AttributeId),

    #[error("id must be positive, got {0}")]
    NonPositiveId(i64),

    /// No ID can follow this one.
    #[error("id {0} is out of range")]
    IdOutOfRange(i64),

    #[error("attribute {0} is internal and cannot be removed")]
    InternalAttribute(String),
}

impl ValidationError {
    /// Whether this error reports a code or ID collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ValidationError::DuplicateDataSourceCode(_)
                | ValidationError::DuplicateDataSourceId(_)
                | ValidationError::DuplicateAttributeCode(_)
                | ValidationError::DuplicateAttributeId(_)
        )
    }
}
