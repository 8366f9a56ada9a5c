//! # G2config
//!
//! Handle-based sessions over configuration documents: data sources,
//! attribute types, and a repository of persisted configurations.
//!
//! ## Overview
//!
//! An [`Engine`] is initialized once with its JSON configuration parameters
//! and then hands out [`ConfigHandle`]s. Each handle owns one mutable
//! configuration document:
//!
//! - **Data sources**: named input categories with numeric IDs
//! - **Attribute types**: the fields records may carry
//! - **Save / Load**: the document as `{"G2_CONFIG":{...}}` JSON
//! - **Repository**: content-addressed persisted configurations and a default
//!
//! ## Key Concepts
//!
//! - **Handle**: Opaque, engine-scoped. Stale or foreign handles are rejected.
//! - **High-water IDs**: Engine-chosen data-source IDs start at 1001 and are
//!   never reused by the same handle.
//! - **Last exception**: Every failure is returned *and* latched until cleared.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use g2config::{DataSourceSpec, Engine, EngineSettings};
//!
//! fn example() -> g2config::Result<()> {
//!     let engine = Engine::new();
//!     let settings = EngineSettings::simple("sqlite3://na:na@/var/opt/g2/G2C.db");
//!     engine.init_with_settings("my-module", settings, 0)?;
//!
//!     let handle = engine.create()?;
//!     let assigned = engine.add_data_source(handle, &DataSourceSpec::new("CUSTOMERS"))?;
//!     println!("{}", assigned.to_json()?); // {"DSRC_ID":1001}
//!
//!     let id = engine.persist(handle, "added CUSTOMERS")?;
//!     engine.set_default_config_id(id)?;
//!     engine.close(handle)?;
//!     engine.destroy()
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `g2config::core` - Document model, descriptors and settings
//! - `g2config::store` - Storage abstraction and SQLite

pub mod engine;
pub mod error;
pub mod exception;
pub mod logging;
pub mod registry;

// Re-export component crates
pub use g2config_core as core;
pub use g2config_store as store;

// Re-export main types for convenience
pub use engine::{Engine, EngineConfig, LifecycleState};
pub use error::{EngineError, Result};
pub use exception::LastException;

// Re-export commonly used core types
pub use g2config_core::{
    AssignedAttribute, AssignedDataSource, AttributeSpec, AttributeType, ConfigDocument,
    ConfigHandle, ConfigId, DataSourceId, DataSourceList, DataSourceSpec, EngineSettings,
    LogLevel,
};
pub use g2config_store::ConfigSummary;
