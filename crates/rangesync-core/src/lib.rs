//! # rangesync core
//!
//! Pure primitives for range reconciliation: digests, components, key ranges,
//! classifications and the persisted per-component sync state.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Digest`] - A 20-byte SHA-1 value rendered as 40 hex characters
//! - [`DigestContext`] - Streaming digest accumulator
//! - [`Component`] - One logical dataset inside a peer's store
//! - [`KeyRange`] - Inclusive key bounds, empty string meaning unbounded
//! - [`Classification`] - The three-way reconciliation verdict
//! - [`SyncState`] - Per-component attempt/completion bookkeeping
//!
//! ## Digests
//!
//! ```rust
//! use rangesync_core::{digest, Digest, DigestContext};
//!
//! assert_eq!(digest::<_, &[u8]>([]), Digest::EMPTY);
//!
//! let whole = digest(["First", "Second"]);
//! let incremental = DigestContext::new().field("First").field("Second").finalize();
//! assert_eq!(whole, incremental);
//! ```

pub mod digest;
pub mod error;
pub mod state;
pub mod types;

pub use digest::{digest, Digest, DigestContext};
pub use error::CoreError;
pub use state::SyncState;
pub use types::{Classification, Component, KeyRange};
