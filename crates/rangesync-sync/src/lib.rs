//! # rangesync sync
//!
//! The reconciliation engine: range aggregation, classification, pruning
//! and sync state tracking, behind a dispatcher that serves one request
//! per call.
//!
//! ## Overview
//!
//! Two peers hold keyed rows, each with a checksum. Instead of shipping
//! rows, a peer sends a digest claimed for a key range. The receiving side
//! folds its own row checksums for that range and answers with a
//! [`Classification`](rangesync_core::Classification):
//!
//! - **Empty**: no local rows in the range
//! - **Mismatch**: local rows exist but disagree with the claim
//! - **Match**: local aggregate equals the claim
//!
//! ## Usage
//!
//! ```rust
//! use rangesync_core::{Classification, Component};
//! use rangesync_store::{MemoryStore, RowStore};
//! use rangesync_sync::{DispatchConfig, Dispatcher, Response};
//!
//! let store = MemoryStore::new();
//! store.put_row(Component::Fim, "/etc/hosts", Some("a1b2")).unwrap();
//!
//! let dispatcher = Dispatcher::new(&store, DispatchConfig::default());
//! let response = dispatcher
//!     .dispatch(
//!         Component::Fim,
//!         "integrity_check_left",
//!         r#"{"begin":"","end":"","checksum":"00","id":1}"#,
//!     )
//!     .unwrap();
//! assert_eq!(response, Response::Classified(Classification::Mismatch));
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Agent                                  Manager
//!   |-- integrity_check_global [a..z] ---->|  Mismatch: prune [a..z], record attempt
//!   |-- integrity_check_left   [a..m] ---->|  probe only
//!   |-- integrity_check_right  [n..z] ---->|  probe only
//!   |          ... agent resends rows of the mismatching halves ...
//!   |-- integrity_check_global [a..z] ---->|  Match: record completion
//!   |-- integrity_clear        id ------->|  record completion over clear scope
//! ```

pub mod aggregate;
pub mod dispatch;
pub mod error;
pub mod prune;
pub mod request;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use aggregate::{aggregate, RangeChecksum};
pub use dispatch::{ClearScope, DispatchConfig, Dispatcher, Response};
pub use error::{Result, SyncError};
pub use prune::prune;
pub use request::{ClearRequest, Command, ReconciliationRequest};
pub use tracker::{record_attempt, record_completion};
