//! Code normalization and whole-document consistency checks.

use std::collections::HashSet;

use crate::document::ConfigDocument;
use crate::error::ValidationError;

/// Maximum length of a data-source or attribute code.
pub const MAX_CODE_LEN: usize = 25;

/// Normalize a code: trim surrounding whitespace and upper-case it.
///
/// Accepts `A-Z`, `0-9`, `_` and `-` after upper-casing.
pub fn normalize_code(raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim().to_ascii_uppercase();

    if code.is_empty() {
        return Err(ValidationError::EmptyCode);
    }

    if code.chars().count() > MAX_CODE_LEN {
        return Err(ValidationError::CodeTooLong {
            code,
            max: MAX_CODE_LEN,
        });
    }

    if let Some(ch) = code
        .chars()
        .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_' || *c == '-'))
    {
        return Err(ValidationError::InvalidCodeCharacter { code, ch });
    }

    Ok(code)
}

/// Check a document for duplicate codes/IDs and IDs outside `1..i64::MAX`.
///
/// Codes are compared as stored; documents produced by this crate always
/// hold normalized codes.
pub fn validate_document(doc: &ConfigDocument) -> Result<(), ValidationError> {
    let mut codes = HashSet::new();
    let mut ids = HashSet::new();
    for ds in doc.data_sources() {
        check_id(ds.id.0)?;
        if !codes.insert(ds.code.as_str()) {
            return Err(ValidationError::DuplicateDataSourceCode(ds.code.clone()));
        }
        if !ids.insert(ds.id) {
            return Err(ValidationError::DuplicateDataSourceId(ds.id));
        }
    }

    let mut codes = HashSet::new();
    let mut ids = HashSet::new();
    for attr in doc.attributes() {
        check_id(attr.id.0)?;
        if !codes.insert(attr.code.as_str()) {
            return Err(ValidationError::DuplicateAttributeCode(attr.code.clone()));
        }
        if !ids.insert(attr.id) {
            return Err(ValidationError::DuplicateAttributeId(attr.id));
        }
    }

    Ok(())
}

/// An ID must be positive and leave room for the one after it.
pub fn check_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::NonPositiveId(id));
    }
    if id == i64::MAX {
        return Err(ValidationError::IdOutOfRange(id));
    }
    Ok(())
}
