//! # rangesync store
//!
//! Storage abstraction for range reconciliation. The engine reads and
//! prunes rows, and writes sync state, through the [`RowStore`] trait.
//!
//! ## Key Types
//!
//! - [`RowStore`] - The synchronous trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`ChecksumRow`] - One `(key, checksum)` pair yielded by a range scan
//! - [`AttemptMode`] - Selects how an attempt is recorded
//!
//! ## Usage
//!
//! ```rust
//! use rangesync_core::{Component, KeyRange};
//! use rangesync_store::{RowStore, RowStoreExt, SqliteStore};
//!
//! let store = SqliteStore::open_memory().unwrap();
//! store.put_row(Component::Fim, "/etc/hosts", Some("a1b2")).unwrap();
//!
//! let keys = store.keys(Component::Fim, &KeyRange::full()).unwrap();
//! assert_eq!(keys, vec!["/etc/hosts".to_string()]);
//! ```
//!
//! ## Design Notes
//!
//! - **Ordered scans**: rows are always visited in ascending byte order of key
//! - **Nullable checksums**: a row may lack its checksum; scans report it as `None`
//! - **Upserts**: sync state is created on first write and updated in place

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{AttemptMode, ChecksumRow, RowStore, RowStoreExt};
