//! # G2config Core
//!
//! Pure primitives for the configuration engine: configuration documents,
//! data sources, attribute types, handles and engine settings.
//!
//! This crate contains no I/O and no storage. It is pure computation over the
//! configuration document model.
//!
//! ## Key Types
//!
//! - [`ConfigDocument`] - The serializable configuration document
//! - [`WorkingDocument`] - A document plus its data-source ID allocator
//! - [`ConfigHandle`] - Opaque handle (slot index + generation)
//! - [`ConfigId`] - Content-addressed identifier of a persisted document
//! - [`DataSourceSpec`] / [`AssignedDataSource`] - Data-source descriptors
//! - [`EngineSettings`] - Parsed engine configuration parameters
//!
//! ## Wire Format
//!
//! Documents serialize to `{"G2_CONFIG":{"CFG_ATTR":[...],"CFG_DSRC":[...]}}`.
//! Sections and fields this crate does not model are carried through
//! untouched. See [`canonical`] for the byte form used for hashing.

pub mod canonical;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod level;
pub mod settings;
pub mod template;
pub mod types;
pub mod validation;
pub mod working;

pub use canonical::{canonical_bytes, config_id_for, config_id_from_bytes};
pub use descriptor::{
    AssignedAttribute, AssignedDataSource, AttributeSpec, DataSourceList, DataSourceRef,
    DataSourceSpec,
};
pub use document::{AttributeType, ConfigBody, ConfigDocument, DataSource};
pub use error::{CoreError, ValidationError};
pub use level::LogLevel;
pub use settings::{EngineSettings, PipelineSettings, SqlSettings, StoreLocation};
pub use template::{default_document, FIRST_USER_DSRC_ID};
pub use types::{AttributeId, ConfigHandle, ConfigId, DataSourceId};
pub use validation::{check_id, normalize_code, validate_document, MAX_CODE_LEN};
pub use working::WorkingDocument;
