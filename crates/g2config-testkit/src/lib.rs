//! # G2config Testkit
//!
//! Testing utilities for the g2config engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known operation sequences with their exact JSON outputs
//! - **Generators**: Proptest strategies for codes, descriptors and edit sequences
//! - **Fixtures**: Initialized engines backed by memory or a temporary SQLite file
//!
//! ## Golden Vectors
//!
//! ```rust
//! use g2config_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, detail) in verify_all_vectors() {
//!     assert!(ok, "{name}: {detail}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use g2config_testkit::{generators::edit_script, TestFixture};
//!
//! proptest! {
//!     #[test]
//!     fn codes_stay_unique(script in edit_script(32)) {
//!         let fixture = TestFixture::new();
//!         let handle = fixture.create();
//!         fixture.apply(handle, &script);
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use g2config_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let handle = fixture.create();
//! let id = fixture.add(handle, "CUSTOMERS");
//! assert_eq!(id.0, 1001);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, multi_engine_fixtures, TestFixture};
pub use generators::{edit_script, Edit};
pub use vectors::{all_vectors, truncate, verify_all_vectors, GoldenVector, DEFAULT_TRUNCATION};
