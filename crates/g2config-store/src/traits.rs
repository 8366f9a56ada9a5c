//! Store trait: the abstract interface for configuration persistence.
//!
//! This trait allows the engine to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests and `:memory:` URLs).

use g2config_core::{canonical_bytes, config_id_from_bytes, ConfigDocument, ConfigId};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of inserting a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Configuration was inserted.
    Inserted,
    /// Identical configuration already stored (idempotent, not an error).
    AlreadyExists,
}

/// A persisted configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(rename = "CONFIG_ID")]
    pub id: ConfigId,
    #[serde(rename = "CONFIG_COMMENTS")]
    pub comment: String,
    /// Unix milliseconds.
    #[serde(rename = "SYS_CREATE_DT")]
    pub created_at: i64,
    /// Canonical JSON of the document.
    #[serde(rename = "CONFIG_DATA")]
    pub document: String,
}

impl ConfigRecord {
    /// Build a record for a document, deriving its ID from the canonical bytes.
    pub fn for_document(doc: &ConfigDocument, comment: &str, created_at: i64) -> Result<Self> {
        let bytes = canonical_bytes(doc)?;
        let id = config_id_from_bytes(&bytes);
        let document = String::from_utf8(bytes)
            .map_err(|e| crate::error::StoreError::Serialization(e.to_string()))?;
        Ok(Self {
            id,
            comment: comment.to_string(),
            created_at,
            document,
        })
    }

    /// Parse the stored document.
    pub fn parse_document(&self) -> Result<ConfigDocument> {
        Ok(ConfigDocument::from_json(&self.document)?)
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            id: self.id,
            comment: self.comment.clone(),
            created_at: self.created_at,
        }
    }
}

/// A persisted configuration without its document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    #[serde(rename = "CONFIG_ID")]
    pub id: ConfigId,
    #[serde(rename = "CONFIG_COMMENTS")]
    pub comment: String,
    #[serde(rename = "SYS_CREATE_DT")]
    pub created_at: i64,
}

/// The Store trait: synchronous interface for configuration persistence.
///
/// # Design Notes
///
/// - **Idempotent inserts**: Inserting the same document twice returns `AlreadyExists`.
/// - **Collision detection**: Inserting a different document under an existing
///   ID returns `StoreError::IdCollision`.
/// - **Single default**: At most one configuration is the default; it must exist.
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a configuration record.
    fn insert_config(&self, record: &ConfigRecord) -> Result<InsertResult>;

    /// Get a configuration by ID.
    fn get_config(&self, id: ConfigId) -> Result<Option<ConfigRecord>>;

    /// Check if a configuration exists.
    fn has_config(&self, id: ConfigId) -> Result<bool>;

    /// All stored configurations, oldest first.
    fn list_configs(&self) -> Result<Vec<ConfigSummary>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Default Configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// The current default configuration, if one was set.
    fn get_default_config_id(&self) -> Result<Option<ConfigId>>;

    /// Make `id` the default. Fails with `NotFound` if it is not stored.
    fn set_default_config_id(&self, id: ConfigId) -> Result<()>;

    /// Move the default from `current` to `new` atomically.
    ///
    /// Fails with `DefaultChanged` if the default is not `current`, and with
    /// `NotFound` if `new` is not stored.
    fn replace_default_config_id(&self, current: ConfigId, new: ConfigId) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// Encode, hash and insert a document in one step.
    fn add_document(
        &self,
        doc: &ConfigDocument,
        comment: &str,
        now: i64,
    ) -> Result<(ConfigId, InsertResult)>;

    /// Fetch and parse a stored document.
    fn load_document(&self, id: ConfigId) -> Result<Option<ConfigDocument>>;
}

impl<S: Store + ?Sized> StoreExt for S {
    fn add_document(
        &self,
        doc: &ConfigDocument,
        comment: &str,
        now: i64,
    ) -> Result<(ConfigId, InsertResult)> {
        let record = ConfigRecord::for_document(doc, comment, now)?;
        let result = self.insert_config(&record)?;
        Ok((record.id, result))
    }

    fn load_document(&self, id: ConfigId) -> Result<Option<ConfigDocument>> {
        self.get_config(id)?
            .map(|record| record.parse_document())
            .transpose()
    }
}
