//! In-memory implementation of the Store trait.
//!
//! Same semantics as SQLite but keeps everything in memory with no
//! persistence. Selected by a `:memory:` database URL.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use g2config_core::ConfigId;

use crate::error::{Result, StoreError};
use crate::traits::{ConfigRecord, ConfigSummary, InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Records indexed by ID.
    configs: HashMap<ConfigId, ConfigRecord>,

    /// Insertion order, for listing.
    order: Vec<ConfigId>,

    default_id: Option<ConfigId>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    // A panic while holding the lock cannot leave the maps half-updated:
    // every write path mutates only after all checks pass.
    fn read(&self) -> RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn insert_config(&self, record: &ConfigRecord) -> Result<InsertResult> {
        let mut inner = self.write();

        if let Some(existing) = inner.configs.get(&record.id) {
            if existing.document == record.document {
                return Ok(InsertResult::AlreadyExists);
            }
            return Err(StoreError::IdCollision(record.id));
        }

        inner.configs.insert(record.id, record.clone());
        inner.order.push(record.id);
        Ok(InsertResult::Inserted)
    }

    fn get_config(&self, id: ConfigId) -> Result<Option<ConfigRecord>> {
        Ok(self.read().configs.get(&id).cloned())
    }

    fn has_config(&self, id: ConfigId) -> Result<bool> {
        Ok(self.read().configs.contains_key(&id))
    }

    fn list_configs(&self) -> Result<Vec<ConfigSummary>> {
        let inner = self.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.configs.get(id))
            .map(ConfigRecord::summary)
            .collect())
    }

    fn get_default_config_id(&self) -> Result<Option<ConfigId>> {
        Ok(self.read().default_id)
    }

    fn set_default_config_id(&self, id: ConfigId) -> Result<()> {
        let mut inner = self.write();
        if !inner.configs.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        inner.default_id = Some(id);
        Ok(())
    }

    fn replace_default_config_id(&self, current: ConfigId, new: ConfigId) -> Result<()> {
        let mut inner = self.write();
        if inner.default_id != Some(current) {
            return Err(StoreError::DefaultChanged {
                expected: current,
                actual: inner.default_id,
            });
        }
        if !inner.configs.contains_key(&new) {
            return Err(StoreError::NotFound(new));
        }
        inner.default_id = Some(new);
        Ok(())
    }
}
