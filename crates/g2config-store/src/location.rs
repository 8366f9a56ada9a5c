//! Opening the backend named by engine settings.

use g2config_core::StoreLocation;

use crate::error::Result;
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::traits::Store;

/// Open the store a location points at.
///
/// Missing parent directories of a SQLite file are created.
pub fn open_store(location: &StoreLocation) -> Result<Box<dyn Store>> {
    match location {
        StoreLocation::Memory => {
            tracing::debug!("opening in-memory config store");
            Ok(Box::new(MemoryStore::new()))
        }
        StoreLocation::Sqlite(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            tracing::debug!(path = %path.display(), "opening sqlite config store");
            Ok(Box::new(SqliteStore::open(path)?))
        }
    }
}
