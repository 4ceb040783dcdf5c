//! Per-component synchronization bookkeeping.
//!
//! The state is observational: it records when a peer last tried to
//! reconcile a component and when the two sides last agreed. Nothing in the
//! reconciliation path reads it back.

use serde::{Deserialize, Serialize};

use crate::types::Component;

/// Persisted sync markers for one component.
///
/// Timestamps are supplied by the peer and stored as given; they are not
/// checked for monotonicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub component: Component,

    /// Last time a reconciliation was attempted (0 = never).
    pub last_attempt: i64,

    /// Last time the component was confirmed in sync (0 = never).
    pub last_completion: i64,

    /// Digest the peer claimed on the last attempt.
    pub last_agent_checksum: String,

    /// Local digest recorded on the last completion.
    pub last_checksum: String,
}

impl SyncState {
    /// A component that has never been reconciled.
    pub fn new(component: Component) -> Self {
        Self {
            component,
            last_attempt: 0,
            last_completion: 0,
            last_agent_checksum: String::new(),
            last_checksum: String::new(),
        }
    }

    /// Record an attempt. `claimed` is `None` when the caller asked for the
    /// legacy update that leaves the stored agent checksum alone.
    pub fn record_attempt(&mut self, timestamp: i64, claimed: Option<&str>) {
        self.last_attempt = timestamp;
        if let Some(claimed) = claimed {
            self.last_agent_checksum = claimed.to_string();
        }
    }

    /// Record a completion. A completion is also an attempt.
    pub fn record_completion(&mut self, timestamp: i64, checksum: &str) {
        self.last_attempt = timestamp;
        self.last_completion = timestamp;
        self.last_checksum = checksum.to_string();
    }

    /// Whether the last attempt ended in agreement.
    pub fn is_synced(&self) -> bool {
        self.last_completion != 0 && self.last_completion == self.last_attempt
    }
}
