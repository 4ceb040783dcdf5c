//! # rangesync testkit
//!
//! Testing utilities for rangesync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known field sequences with their expected digests
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Seeded stores and a fault-injecting store wrapper
//! - **Log capture**: Assert on what the engine logged
//!
//! ## Golden Vectors
//!
//! ```rust
//! use rangesync_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, hex);
//! }
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use rangesync_core::{Component, KeyRange};
//! use rangesync_store::{MemoryStore, RowStore};
//! use rangesync_testkit::fixtures::FaultyStore;
//!
//! let store = FaultyStore::new(MemoryStore::new());
//! store.fail_deletes(true);
//! assert!(store.delete_range(Component::Fim, &KeyRange::full(), None).is_err());
//! assert_eq!(store.deletes(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod logs;
pub mod vectors;

pub use fixtures::{copy_rows, row_checksum, row_key, seed_rows, FaultyStore, TestFixture};
pub use generators::{range_payload, CheckParams};
pub use logs::LogCapture;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
