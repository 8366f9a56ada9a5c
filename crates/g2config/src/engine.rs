//! The Engine: handle-based configuration sessions.
//!
//! The Engine brings together the document model, the handle registry and
//! the configuration store behind one synchronous interface. All calls on
//! one instance are serialized by a single lock; the latched exception has
//! its own lock so it can be read while another call is running.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use g2config_core::{
    default_document, validate_document, AssignedAttribute, AssignedDataSource, AttributeSpec,
    AttributeType, ConfigDocument, ConfigHandle, ConfigId, CoreError, DataSourceList,
    DataSourceSpec, EngineSettings, LogLevel, WorkingDocument, FIRST_USER_DSRC_ID,
};
use g2config_store::{open_store, ConfigSummary, InsertResult, Store, StoreExt};
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::exception::{ExceptionLatch, LastException};
use crate::logging::Verbosity;
use crate::registry::HandleRegistry;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// First ID the engine assigns to a data source added without one.
    pub first_user_dsrc_id: i64,
    /// Maximum number of simultaneously open handles. `None` means no limit.
    pub max_open_handles: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_user_dsrc_id: FIRST_USER_DSRC_ID,
            max_open_handles: None,
        }
    }
}

/// Where an engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Destroyed,
}

struct Session {
    module_name: String,
    settings: EngineSettings,
    store: Box<dyn Store>,
    documents: HandleRegistry<WorkingDocument>,
}

impl Session {
    fn document(&self, handle: ConfigHandle) -> Result<&WorkingDocument> {
        self.documents
            .get(handle)
            .ok_or(EngineError::InvalidHandle(handle))
    }

    fn document_mut(&mut self, handle: ConfigHandle) -> Result<&mut WorkingDocument> {
        self.documents
            .get_mut(handle)
            .ok_or(EngineError::InvalidHandle(handle))
    }

    /// Register a document under a fresh handle, honouring the handle limit.
    fn open(&mut self, document: WorkingDocument, limit: Option<usize>) -> Result<ConfigHandle> {
        let open = self.documents.len();
        if limit.is_some_and(|max| open >= max) {
            return Err(EngineError::ResourceExhausted(open));
        }
        self.documents
            .insert(document)
            .ok_or(EngineError::ResourceExhausted(open))
    }
}

enum Lifecycle {
    Uninitialized,
    Initialized(Session),
    Destroyed,
}

/// The main Engine struct.
///
/// Provides a unified API for:
/// - Creating, editing and closing configuration documents via handles
/// - Saving and loading documents as JSON
/// - Persisting documents and managing the default configuration
/// - Inspecting the most recent failure
///
/// `Engine` is `Send + Sync`; share it through an `Arc`.
pub struct Engine {
    config: EngineConfig,
    state: Mutex<Lifecycle>,
    latch: ExceptionLatch,
    verbosity: Verbosity,
    /// Initial handle generation, distinct per engine.
    seed: u32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an uninitialized engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(Lifecycle::Uninitialized),
            latch: ExceptionLatch::default(),
            verbosity: Verbosity::new(LogLevel::Info),
            seed: next_seed(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, Lifecycle> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn logs(&self, level: LogLevel) -> bool {
        self.verbosity.enabled(level)
    }

    /// Latch a failure and pass the result through.
    fn latched<T>(&self, op: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.latch.record(err);
            if self.logs(LogLevel::Warn) {
                warn!(op, code = err.code(), error = %err, "operation failed");
            }
        }
        result
    }

    /// Run `f` against the live session.
    fn run<T>(&self, op: &'static str, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let result = {
            let mut state = self.lock_state();
            match &mut *state {
                Lifecycle::Initialized(session) => f(session),
                Lifecycle::Uninitialized => Err(EngineError::NotInitialized),
                Lifecycle::Destroyed => Err(EngineError::Destroyed),
            }
        };
        self.latched(op, result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Initialize the engine from its JSON configuration parameters.
    ///
    /// `verbose_logging` of 0 keeps the level at `info`; anything else
    /// selects `debug`.
    pub fn init(&self, module_name: &str, settings_json: &str, verbose_logging: i64) -> Result<()> {
        let result = EngineSettings::parse(settings_json)
            .map_err(EngineError::from)
            .and_then(|settings| self.start(module_name, settings, verbose_logging));
        self.latched("init", result)
    }

    /// Initialize the engine from already parsed settings.
    pub fn init_with_settings(
        &self,
        module_name: &str,
        settings: EngineSettings,
        verbose_logging: i64,
    ) -> Result<()> {
        let result = self.start(module_name, settings, verbose_logging);
        self.latched("init", result)
    }

    fn start(&self, module_name: &str, settings: EngineSettings, verbose_logging: i64) -> Result<()> {
        let mut state = self.lock_state();
        match &mut *state {
            Lifecycle::Destroyed => return Err(EngineError::Destroyed),
            Lifecycle::Initialized(session) => {
                // Open handles survive a re-init; the store is swapped only
                // when it points somewhere else.
                if session.settings.sql != settings.sql {
                    session.store = open_backend(&settings)?;
                }
                session.module_name = module_name.to_string();
                session.settings = settings;
            }
            Lifecycle::Uninitialized => {
                let store = open_backend(&settings)?;
                *state = Lifecycle::Initialized(Session {
                    module_name: module_name.to_string(),
                    settings,
                    store,
                    documents: HandleRegistry::new(self.seed),
                });
            }
        }

        self.verbosity.set(LogLevel::from_verbosity(verbose_logging));
        if self.logs(LogLevel::Info) {
            info!(module = module_name, level = %self.verbosity.get(), "engine initialized");
        }
        Ok(())
    }

    /// Release all handles and the store. Every later call fails with
    /// `Destroyed`.
    pub fn destroy(&self) -> Result<()> {
        let result = {
            let mut state = self.lock_state();
            match std::mem::replace(&mut *state, Lifecycle::Destroyed) {
                Lifecycle::Initialized(mut session) => {
                    let closed = session.documents.clear();
                    if self.logs(LogLevel::Info) {
                        info!(module = %session.module_name, closed, "engine destroyed");
                    }
                    Ok(())
                }
                Lifecycle::Uninitialized => {
                    *state = Lifecycle::Uninitialized;
                    Err(EngineError::NotInitialized)
                }
                Lifecycle::Destroyed => Err(EngineError::Destroyed),
            }
        };
        self.latched("destroy", result)
    }

    pub fn lifecycle(&self) -> LifecycleState {
        match &*self.lock_state() {
            Lifecycle::Uninitialized => LifecycleState::Uninitialized,
            Lifecycle::Initialized(_) => LifecycleState::Initialized,
            Lifecycle::Destroyed => LifecycleState::Destroyed,
        }
    }

    /// Module name given to the most recent `init`.
    pub fn module_name(&self) -> Option<String> {
        match &*self.lock_state() {
            Lifecycle::Initialized(session) => Some(session.module_name.clone()),
            _ => None,
        }
    }

    /// Settings given to the most recent `init`.
    pub fn settings(&self) -> Option<EngineSettings> {
        match &*self.lock_state() {
            Lifecycle::Initialized(session) => Some(session.settings.clone()),
            _ => None,
        }
    }

    /// Number of handles currently open.
    pub fn open_handles(&self) -> usize {
        match &*self.lock_state() {
            Lifecycle::Initialized(session) => session.documents.len(),
            _ => 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handle Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a new document populated from the default template.
    pub fn create(&self) -> Result<ConfigHandle> {
        self.run("create", |session| {
            let working = WorkingDocument::new(default_document(), self.config.first_user_dsrc_id);
            let handle = session.open(working, self.config.max_open_handles)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, "created configuration");
            }
            Ok(handle)
        })
    }

    /// Close a handle. The handle is invalid afterwards.
    pub fn close(&self, handle: ConfigHandle) -> Result<()> {
        self.run("close", |session| {
            session
                .documents
                .remove(handle)
                .ok_or(EngineError::InvalidHandle(handle))?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, "closed configuration");
            }
            Ok(())
        })
    }

    /// Serialize the document behind a handle.
    pub fn save(&self, handle: ConfigHandle) -> Result<String> {
        self.run("save", |session| Ok(session.document(handle)?.to_json()?))
    }

    /// Replace the document behind a handle with a serialized one.
    ///
    /// A rejected document leaves the handle's contents unchanged.
    pub fn load(&self, handle: ConfigHandle, json: &str) -> Result<()> {
        self.run("load", |session| {
            session.document_mut(handle)?.load_json(json)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, bytes = json.len(), "loaded configuration");
            }
            Ok(())
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data Sources
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a data source. Returns the ID it was given.
    pub fn add_data_source(
        &self,
        handle: ConfigHandle,
        spec: &DataSourceSpec,
    ) -> Result<AssignedDataSource> {
        self.run("add_data_source", |session| {
            let assigned = session.document_mut(handle)?.add_data_source(spec)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, code = %spec.code, id = %assigned.id, "added data source");
            }
            Ok(assigned)
        })
    }

    /// Add a data source described as `{"DSRC_CODE": ...}` and answer with
    /// `{"DSRC_ID": ...}`.
    pub fn add_data_source_json(&self, handle: ConfigHandle, descriptor: &str) -> Result<String> {
        let spec = self.latched("add_data_source", parse_descriptor::<DataSourceSpec>(descriptor))?;
        let assigned = self.add_data_source(handle, &spec)?;
        self.latched("add_data_source", assigned.to_json().map_err(EngineError::from))
    }

    /// Remove a data source by code. Removing an absent code is not an
    /// error; the result reports whether anything was removed.
    pub fn delete_data_source(&self, handle: ConfigHandle, spec: &DataSourceSpec) -> Result<bool> {
        self.run("delete_data_source", |session| {
            let removed = session.document_mut(handle)?.delete_data_source(spec)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, code = %spec.code, removed, "deleted data source");
            }
            Ok(removed)
        })
    }

    pub fn delete_data_source_json(&self, handle: ConfigHandle, descriptor: &str) -> Result<bool> {
        let spec =
            self.latched("delete_data_source", parse_descriptor::<DataSourceSpec>(descriptor))?;
        self.delete_data_source(handle, &spec)
    }

    /// Data sources of a document in insertion order.
    pub fn list_data_sources(&self, handle: ConfigHandle) -> Result<DataSourceList> {
        self.run("list_data_sources", |session| {
            Ok(session.document(handle)?.list_data_sources())
        })
    }

    /// Listing as `{"DATA_SOURCES":[...]}`.
    pub fn list_data_sources_json(&self, handle: ConfigHandle) -> Result<String> {
        self.run("list_data_sources", |session| {
            Ok(session.document(handle)?.list_data_sources().to_json()?)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute Types
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_attributes(&self, handle: ConfigHandle) -> Result<Vec<AttributeType>> {
        self.run("list_attributes", |session| {
            Ok(session.document(handle)?.attributes().to_vec())
        })
    }

    pub fn add_attribute(
        &self,
        handle: ConfigHandle,
        spec: &AttributeSpec,
    ) -> Result<AssignedAttribute> {
        self.run("add_attribute", |session| {
            let assigned = session.document_mut(handle)?.add_attribute(spec)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, code = %spec.code, id = %assigned.id, "added attribute");
            }
            Ok(assigned)
        })
    }

    /// Remove an attribute type by code. Internal attributes are refused.
    pub fn delete_attribute(&self, handle: ConfigHandle, code: &str) -> Result<bool> {
        self.run("delete_attribute", |session| {
            Ok(session.document_mut(handle)?.delete_attribute(code)?)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Repository
    // ─────────────────────────────────────────────────────────────────────────

    /// Store the document behind a handle. Storing an identical document
    /// again returns the same ID.
    pub fn persist(&self, handle: ConfigHandle, comment: &str) -> Result<ConfigId> {
        self.run("persist", |session| {
            let working = session
                .documents
                .get(handle)
                .ok_or(EngineError::InvalidHandle(handle))?;
            let (id, result) = session
                .store
                .add_document(working.document(), comment, now_millis())?;
            if self.logs(LogLevel::Debug) {
                let fresh = result == InsertResult::Inserted;
                debug!(%handle, config_id = %id, fresh, "persisted configuration");
            }
            Ok(id)
        })
    }

    /// Open a stored configuration under a new handle.
    pub fn open_config(&self, id: ConfigId) -> Result<ConfigHandle> {
        self.run("open_config", |session| {
            let document: ConfigDocument = session
                .store
                .load_document(id)?
                .ok_or(EngineError::ConfigNotFound(id))?;
            validate_document(&document).map_err(CoreError::from)?;

            let working = WorkingDocument::new(document, self.config.first_user_dsrc_id);
            let handle = session.open(working, self.config.max_open_handles)?;
            if self.logs(LogLevel::Debug) {
                debug!(%handle, config_id = %id, "opened stored configuration");
            }
            Ok(handle)
        })
    }

    /// Stored configurations, oldest first.
    pub fn list_configs(&self) -> Result<Vec<ConfigSummary>> {
        self.run("list_configs", |session| Ok(session.store.list_configs()?))
    }

    pub fn default_config_id(&self) -> Result<Option<ConfigId>> {
        self.run("default_config_id", |session| {
            Ok(session.store.get_default_config_id()?)
        })
    }

    pub fn set_default_config_id(&self, id: ConfigId) -> Result<()> {
        self.run("set_default_config_id", |session| {
            session.store.set_default_config_id(id)?;
            if self.logs(LogLevel::Info) {
                info!(config_id = %id, "default configuration set");
            }
            Ok(())
        })
    }

    /// Move the default from `current` to `new`, failing if another caller
    /// moved it first.
    pub fn replace_default_config_id(&self, current: ConfigId, new: ConfigId) -> Result<()> {
        self.run("replace_default_config_id", |session| {
            session.store.replace_default_config_id(current, new)?;
            if self.logs(LogLevel::Info) {
                info!(from = %current, to = %new, "default configuration replaced");
            }
            Ok(())
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Last Exception
    // ─────────────────────────────────────────────────────────────────────────

    /// Message of the most recent failure, empty if none.
    pub fn last_exception(&self) -> String {
        self.latch.get().message
    }

    /// Code of the most recent failure, 0 if none.
    pub fn last_exception_code(&self) -> i64 {
        self.latch.get().code
    }

    pub fn last_exception_detail(&self) -> LastException {
        self.latch.get()
    }

    pub fn clear_last_exception(&self) {
        self.latch.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the engine level by name: trace, debug, info, warn, error, fatal
    /// or panic.
    pub fn set_log_level(&self, level: &str) -> Result<()> {
        let result = level
            .parse::<LogLevel>()
            .map_err(EngineError::from)
            .map(|level| self.set_log_level_typed(level));
        self.latched("set_log_level", result)
    }

    pub fn set_log_level_typed(&self, level: LogLevel) {
        self.verbosity.set(level);
    }

    pub fn log_level(&self) -> LogLevel {
        self.verbosity.get()
    }
}

fn open_backend(settings: &EngineSettings) -> Result<Box<dyn Store>> {
    let location = settings.location()?;
    open_store(&location).map_err(|e| {
        EngineError::Initialization(format!(
            "cannot open config store {:?}: {e}",
            settings.sql.connection
        ))
    })
}

fn parse_descriptor<T: std::str::FromStr<Err = CoreError>>(descriptor: &str) -> Result<T> {
    descriptor.parse::<T>().map_err(EngineError::from)
}

fn next_seed() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed).wrapping_mul(0x9E37_79B1)
}

/// Get current time in milliseconds since Unix epoch.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
