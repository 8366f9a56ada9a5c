//! # G2config Store
//!
//! Configuration repository for the engine. Provides a trait-based interface
//! for persisting configuration documents with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The engine keeps documents it is editing in memory behind handles. When a
//! caller persists a document it lands here, keyed by its content-addressed
//! [`ConfigId`](g2config_core::ConfigId). One persisted configuration may be
//! marked as the default.
//!
//! ## Key Types
//!
//! - [`Store`] - The trait for all repository operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests and `:memory:` settings
//! - [`ConfigRecord`] / [`ConfigSummary`] - Stored configurations
//! - [`open_store`] - Open the backend named by engine settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use g2config_core::default_document;
//! use g2config_store::{SqliteStore, Store, StoreExt};
//!
//! let store = SqliteStore::open("G2C.db").unwrap();
//! let (config_id, _) = store
//!     .add_document(&default_document(), "initial", 0)
//!     .unwrap();
//! store.set_default_config_id(config_id).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent inserts**: Persisting the same document twice returns `AlreadyExists`
//! - **Collision detection**: A different document hashing to the same ID is an error
//! - **Compare-and-swap default**: `replace_default_config_id` fails if the default moved

pub mod error;
pub mod location;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use location::open_store;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ConfigRecord, ConfigSummary, InsertResult, Store, StoreExt};
