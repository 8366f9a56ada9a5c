//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::{Path, PathBuf};

use g2config::logging::level_filter;
use g2config::{
    ConfigHandle, DataSourceId, DataSourceSpec, Engine, EngineConfig, EngineSettings, LogLevel,
};
use tempfile::TempDir;

use crate::generators::Edit;

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(level_filter(LogLevel::Debug))
        .try_init();
}

/// Engine parameters selecting the in-memory store.
pub fn memory_settings_json() -> String {
    EngineSettings::simple("")
        .to_json()
        .expect("settings encode")
}

/// Engine parameters selecting a SQLite file.
pub fn sqlite_settings_json(path: &Path) -> String {
    EngineSettings::simple(&format!("sqlite3://na:na@{}", path.display()))
        .to_json()
        .expect("settings encode")
}

/// An initialized engine, optionally backed by a temporary database.
pub struct TestFixture {
    pub engine: Engine,
    dir: Option<TempDir>,
}

impl TestFixture {
    /// Initialized engine over the in-memory store.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_tracing();
        let engine = Engine::with_config(config);
        engine
            .init("g2config-testkit", &memory_settings_json(), 0)
            .expect("init in-memory engine");
        Self { engine, dir: None }
    }

    /// Initialized engine over a SQLite file in a fresh temporary directory.
    pub fn on_disk() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let engine = Engine::new();
        engine
            .init(
                "g2config-testkit",
                &sqlite_settings_json(&dir.path().join("G2C.db")),
                0,
            )
            .expect("init sqlite engine");
        Self {
            engine,
            dir: Some(dir),
        }
    }

    /// Path of the backing database, if any.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().join("G2C.db"))
    }

    /// Open a second engine on the same database file.
    pub fn reopen(&self) -> Option<Engine> {
        let path = self.db_path()?;
        let engine = Engine::new();
        engine
            .init("g2config-testkit", &sqlite_settings_json(&path), 0)
            .expect("reopen sqlite engine");
        Some(engine)
    }

    pub fn create(&self) -> ConfigHandle {
        self.engine.create().expect("create handle")
    }

    /// Add a data source by code and return its ID.
    pub fn add(&self, handle: ConfigHandle, code: &str) -> DataSourceId {
        self.engine
            .add_data_source(handle, &DataSourceSpec::new(code))
            .expect("add data source")
            .id
    }

    /// Data-source codes of a handle in listing order.
    pub fn codes(&self, handle: ConfigHandle) -> Vec<String> {
        self.engine
            .list_data_sources(handle)
            .expect("list data sources")
            .codes()
            .map(String::from)
            .collect()
    }

    /// Apply an edit script, returning the IDs handed out by successful adds.
    ///
    /// Duplicate adds are expected and skipped; any other failure panics.
    pub fn apply(&self, handle: ConfigHandle, script: &[Edit]) -> Vec<DataSourceId> {
        let mut assigned = Vec::new();
        for edit in script {
            match edit {
                Edit::Add(code) => {
                    match self.engine.add_data_source(handle, &DataSourceSpec::new(code)) {
                        Ok(a) => assigned.push(a.id),
                        Err(g2config::EngineError::Duplicate(_)) => {}
                        Err(e) => panic!("add {code:?} failed: {e}"),
                    }
                }
                Edit::Delete(code) => {
                    self.engine
                        .delete_data_source(handle, &DataSourceSpec::new(code))
                        .expect("delete data source");
                }
            }
        }
        assigned
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple independent engines.
pub fn multi_engine_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count).map(|_| TestFixture::new()).collect()
}
