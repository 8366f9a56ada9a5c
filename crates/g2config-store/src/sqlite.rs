//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite; the connection sits behind a mutex so the store is `Sync`.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use g2config_core::ConfigId;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{ConfigRecord, ConfigSummary, InsertResult, Store};

/// SQLite-based store implementation.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&mut conn)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConfigRecord> {
    Ok(ConfigRecord {
        id: ConfigId(row.get("config_id")?),
        comment: row.get("config_comments")?,
        created_at: row.get("created_at")?,
        document: row.get("config_data")?,
    })
}

fn current_default(conn: &Connection) -> rusqlite::Result<Option<ConfigId>> {
    conn.query_row(
        "SELECT config_id FROM sys_default_cfg WHERE singleton = 1",
        [],
        |row| row.get(0).map(ConfigId),
    )
    .optional()
}

fn config_exists(conn: &Connection, id: ConfigId) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sys_cfg WHERE config_id = ?1)",
        params![id.0],
        |row| row.get(0),
    )
}

fn write_default(conn: &Connection, id: ConfigId) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO sys_default_cfg (singleton, config_id) VALUES (1, ?1)
         ON CONFLICT(singleton) DO UPDATE SET config_id = excluded.config_id",
        params![id.0],
    )
}

impl Store for SqliteStore {
    fn insert_config(&self, record: &ConfigRecord) -> Result<InsertResult> {
        self.with_conn(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT config_data FROM sys_cfg WHERE config_id = ?1",
                    params![record.id.0],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing) = existing {
                if existing == record.document {
                    return Ok(InsertResult::AlreadyExists);
                }
                return Err(StoreError::IdCollision(record.id));
            }

            conn.execute(
                "INSERT INTO sys_cfg (config_id, config_comments, config_data, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id.0,
                    record.comment,
                    record.document,
                    record.created_at
                ],
            )?;

            tracing::debug!(config_id = %record.id, "stored configuration");
            Ok(InsertResult::Inserted)
        })
    }

    fn get_config(&self, id: ConfigId) -> Result<Option<ConfigRecord>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT config_id, config_comments, config_data, created_at
                 FROM sys_cfg WHERE config_id = ?1",
                params![id.0],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
    }

    fn has_config(&self, id: ConfigId) -> Result<bool> {
        self.with_conn(|conn| Ok(config_exists(conn, id)?))
    }

    fn list_configs(&self) -> Result<Vec<ConfigSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT config_id, config_comments, created_at
                 FROM sys_cfg ORDER BY created_at, rowid",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ConfigSummary {
                    id: ConfigId(row.get(0)?),
                    comment: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    fn get_default_config_id(&self) -> Result<Option<ConfigId>> {
        self.with_conn(|conn| Ok(current_default(conn)?))
    }

    fn set_default_config_id(&self, id: ConfigId) -> Result<()> {
        self.with_conn(|conn| {
            if !config_exists(conn, id)? {
                return Err(StoreError::NotFound(id));
            }
            write_default(conn, id)?;
            Ok(())
        })
    }

    fn replace_default_config_id(&self, current: ConfigId, new: ConfigId) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;

            let actual = current_default(&tx)?;
            if actual != Some(current) {
                return Err(StoreError::DefaultChanged {
                    expected: current,
                    actual,
                });
            }
            if !config_exists(&tx, new)? {
                return Err(StoreError::NotFound(new));
            }

            write_default(&tx, new)?;
            tx.commit()?;
            Ok(())
        })
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;
    use g2config_core::{default_document, DataSource, DataSourceId};

    fn variant(code: &str) -> g2config_core::ConfigDocument {
        let mut doc = default_document();
        doc.body
            .data_sources
            .push(DataSource::new(DataSourceId(1001), code));
        doc
    }

    #[test]
    fn test_insert_and_get_config() {
        let store = SqliteStore::open_memory().unwrap();
        let doc = default_document();

        let (id, result) = store.add_document(&doc, "initial", 10).unwrap();
        assert_eq!(result, InsertResult::Inserted);
        assert!(store.has_config(id).unwrap());

        let record = store.get_config(id).unwrap().unwrap();
        assert_eq!(record.comment, "initial");
        assert_eq!(record.created_at, 10);
        assert_eq!(record.parse_document().unwrap(), doc);
    }

    #[test]
    fn test_idempotent_insert() {
        let store = SqliteStore::open_memory().unwrap();
        let doc = default_document();

        store.add_document(&doc, "a", 1).unwrap();
        let (_, again) = store.add_document(&doc, "b", 2).unwrap();
        assert_eq!(again, InsertResult::AlreadyExists);
    }

    #[test]
    fn test_list_in_creation_order() {
        let store = SqliteStore::open_memory().unwrap();
        let (a, _) = store.add_document(&variant("A"), "a", 1).unwrap();
        let (b, _) = store.add_document(&variant("B"), "b", 2).unwrap();

        let ids: Vec<_> = store.list_configs().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_default_config() {
        let store = SqliteStore::open_memory().unwrap();
        let (a, _) = store.add_document(&variant("A"), "a", 1).unwrap();
        let (b, _) = store.add_document(&variant("B"), "b", 2).unwrap();

        assert_eq!(store.get_default_config_id().unwrap(), None);
        store.set_default_config_id(a).unwrap();
        assert_eq!(store.get_default_config_id().unwrap(), Some(a));

        store.replace_default_config_id(a, b).unwrap();
        assert_eq!(store.get_default_config_id().unwrap(), Some(b));
    }

    #[test]
    fn test_replace_default_detects_race() {
        let store = SqliteStore::open_memory().unwrap();
        let (a, _) = store.add_document(&variant("A"), "a", 1).unwrap();
        let (b, _) = store.add_document(&variant("B"), "b", 2).unwrap();
        store.set_default_config_id(b).unwrap();

        let err = store.replace_default_config_id(a, b).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DefaultChanged { expected, actual: Some(found) } if expected == a && found == b
        ));
    }
}
