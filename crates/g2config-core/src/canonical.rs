//! Canonical bytes and content-addressed IDs for configuration documents.
//!
//! The canonical form is compact JSON with struct fields in declaration
//! order and every free-form map sorted by key, so equal documents always
//! produce equal bytes.

use crate::document::ConfigDocument;
use crate::error::CoreError;
use crate::types::ConfigId;

/// Domain separator mixed into the config ID hash.
pub const CONFIG_ID_DOMAIN: &[u8] = b"g2config-document-v1:";

/// Canonical byte encoding of a document.
pub fn canonical_bytes(doc: &ConfigDocument) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(doc).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Content-addressed ID: first four bytes of `Blake3(domain || canonical)`.
///
/// A zero hash prefix maps to 1 so IDs are always non-zero.
pub fn config_id_for(doc: &ConfigDocument) -> Result<ConfigId, CoreError> {
    let bytes = canonical_bytes(doc)?;
    Ok(config_id_from_bytes(&bytes))
}

/// Config ID of already-encoded canonical bytes.
pub fn config_id_from_bytes(canonical: &[u8]) -> ConfigId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CONFIG_ID_DOMAIN);
    hasher.update(canonical);
    let hash = hasher.finalize();
    let prefix = &hash.as_bytes()[..4];
    let id = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    ConfigId(id.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DataSource;
    use crate::template::default_document;
    use crate::types::DataSourceId;

    #[test]
    fn test_config_id_deterministic() {
        let a = config_id_for(&default_document()).unwrap();
        let b = config_id_for(&default_document()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.as_u32(), 0);
    }

    #[test]
    fn test_config_id_changes_with_content() {
        let base = default_document();
        let mut changed = default_document();
        changed
            .body
            .data_sources
            .push(DataSource::new(DataSourceId(1001), "EXTRA"));
        assert_ne!(
            config_id_for(&base).unwrap(),
            config_id_for(&changed).unwrap()
        );
    }

    #[test]
    fn test_canonical_bytes_survive_reparse() {
        let doc = default_document();
        let bytes = canonical_bytes(&doc).unwrap();
        let reparsed = ConfigDocument::from_json(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(canonical_bytes(&reparsed).unwrap(), bytes);
    }
}
