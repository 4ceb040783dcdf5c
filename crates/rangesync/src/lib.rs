//! # rangesync
//!
//! Anti-entropy range reconciliation between two peers holding keyed rows.
//!
//! ## Overview
//!
//! Each row carries a precomputed checksum. To check whether a key range
//! agrees, a peer sends the SHA-1 aggregate it computes over that range;
//! this side folds its own row checksums for the same range and answers
//! with a [`Classification`]. A whole-range check that fails prunes the
//! local rows so the peer can resend them; one that succeeds marks the
//! component as in sync.
//!
//! ## Key Concepts
//!
//! - **Component**: One logical dataset (file integrity, packages, ports...)
//! - **Aggregate**: SHA-1 over every row checksum in a range, in key order
//! - **Global check**: Whole-range check that may prune and records state
//! - **Probe**: Half-range check used while bisecting; never writes
//! - **Clear**: The peer confirmed receipt; record completion
//!
//! ## Usage
//!
//! ```rust
//! use rangesync::{Classification, Component, Engine, EngineConfig, Response};
//! use rangesync::store::RowStore;
//!
//! let engine = Engine::open(EngineConfig::default()).unwrap();
//! engine.store().put_row(Component::Packages, "bash", Some("aa")).unwrap();
//!
//! let claimed = rangesync::digest(["aa"]).to_hex();
//! let payload = format!(r#"{{"begin":"","end":"","checksum":"{}","id":42}}"#, claimed);
//! let response = engine
//!     .dispatch(Component::Packages, "integrity_check_global", &payload)
//!     .unwrap();
//!
//! assert_eq!(response, Response::Classified(Classification::Match));
//! assert!(engine.sync_state(Component::Packages).unwrap().unwrap().is_synced());
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `rangesync::core` - Digests, components, ranges, sync state
//! - `rangesync::store` - Storage abstraction, SQLite and memory backends
//! - `rangesync::sync` - Aggregation, pruning, tracking, dispatch

pub mod config;
pub mod engine;
pub mod error;

// Re-export component crates
pub use rangesync_core as core;
pub use rangesync_store as store;
pub use rangesync_sync as sync;

// Re-export main types for convenience
pub use config::{DatabaseConfig, EngineConfig};
pub use engine::Engine;
pub use error::{EngineError, Result};

// Re-export commonly used types
pub use rangesync_core::{digest, Classification, Component, Digest, KeyRange, SyncState};
pub use rangesync_sync::{ClearScope, Command, Response};
