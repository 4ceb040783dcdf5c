//! Sync state tracking.
//!
//! Both recorders are fire-and-forget: a storage failure is logged and
//! dropped, and nothing is returned to the caller. The recorded state is
//! for observers only and never feeds back into a classification.

use tracing::{debug, warn};

use rangesync_core::Component;
use rangesync_store::{AttemptMode, RowStore};

/// Record that a reconciliation of `component` was attempted at `timestamp`
/// with the peer claiming `claimed`.
pub fn record_attempt<S: RowStore + ?Sized>(
    store: &S,
    component: Component,
    timestamp: i64,
    mode: AttemptMode,
    claimed: &str,
) {
    match store.upsert_attempt(component, timestamp, mode, claimed) {
        Ok(()) => debug!(%component, timestamp, ?mode, "recorded sync attempt"),
        Err(e) => warn!(%component, timestamp, error = %e, "cannot record sync attempt"),
    }
}

/// Record that `component` was found in sync at `timestamp` with local
/// aggregate `checksum`.
pub fn record_completion<S: RowStore + ?Sized>(
    store: &S,
    component: Component,
    timestamp: i64,
    checksum: &str,
) {
    match store.upsert_completion(component, timestamp, checksum) {
        Ok(()) => debug!(%component, timestamp, checksum, "recorded sync completion"),
        Err(e) => warn!(%component, timestamp, error = %e, "cannot record sync completion"),
    }
}
