//! Reconciliation commands and request payloads.
//!
//! A request arrives as a command name plus a JSON payload:
//!
//! ```text
//! integrity_check_global {"begin":"/a","end":"/z","checksum":"<40 hex>","id":1700000000}
//! integrity_check_left   {"begin":"/a","end":"/m","checksum":"<40 hex>","id":1700000000,"tail":"/n"}
//! integrity_clear        {"id":1700000000}
//! ```

use serde::Deserialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use rangesync_core::KeyRange;

use crate::error::{Result, SyncError};

/// A reconciliation command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Whole-range check that settles the component's state.
    Global,
    /// Probe of the lower half while bisecting a mismatch.
    ProbeLeft,
    /// Probe of the upper half while bisecting a mismatch.
    ProbeRight,
    /// The peer confirmed full receipt; collapse pending state.
    Clear,
    /// A command this engine does not know. Handled like a probe.
    Unknown(String),
}

impl Command {
    pub const GLOBAL: &'static str = "integrity_check_global";
    pub const PROBE_LEFT: &'static str = "integrity_check_left";
    pub const PROBE_RIGHT: &'static str = "integrity_check_right";
    pub const CLEAR: &'static str = "integrity_clear";

    pub fn parse(name: &str) -> Self {
        match name {
            Self::GLOBAL => Command::Global,
            Self::PROBE_LEFT => Command::ProbeLeft,
            Self::PROBE_RIGHT => Command::ProbeRight,
            Self::CLEAR => Command::Clear,
            other => Command::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Command::Global => Self::GLOBAL,
            Command::ProbeLeft => Self::PROBE_LEFT,
            Command::ProbeRight => Self::PROBE_RIGHT,
            Command::Clear => Self::CLEAR,
            Command::Unknown(name) => name,
        }
    }

    /// Whether classifying under this command may prune rows or write
    /// sync state.
    pub fn settles_state(&self) -> bool {
        matches!(self, Command::Global)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[derive(Deserialize)]
struct RangePayload {
    begin: String,
    end: String,
    checksum: String,
    id: i64,
    #[serde(default)]
    tail: Option<String>,
}

#[derive(Deserialize)]
struct ClearPayload {
    id: i64,
}

fn decode_payload<'a, T: Deserialize<'a>>(payload: &'a str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| {
        debug!(payload, error = %e, "cannot parse checksum range payload");
        SyncError::RequestMalformed(format!(
            "cannot parse checksum range payload '{}': {}",
            payload, e
        ))
    })
}

/// A decoded range check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRequest {
    pub command: Command,
    pub range: KeyRange,
    /// Digest the peer claims for `range`. Untrusted text.
    pub checksum: String,
    /// Sync session identifier, also the peer's timestamp for this attempt.
    pub id: i64,
    /// Optional exclusive cutoff for pruning.
    pub tail: Option<String>,
}

impl ReconciliationRequest {
    /// Decode the JSON payload of a range check.
    ///
    /// `begin`, `end`, `checksum` (strings) and `id` (integer) are required;
    /// `tail` is optional. Unknown fields are ignored.
    pub fn decode(command: Command, payload: &str) -> Result<Self> {
        let RangePayload {
            begin,
            end,
            checksum,
            id,
            tail,
        } = decode_payload(payload)?;
        Ok(Self {
            command,
            range: KeyRange::new(begin, end),
            checksum,
            id,
            tail,
        })
    }
}

/// A decoded clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearRequest {
    /// Boundary of what the peer confirmed, also its timestamp.
    pub id: i64,
}

impl ClearRequest {
    /// Decode the JSON payload of a clear; only `id` is required.
    pub fn decode(payload: &str) -> Result<Self> {
        let ClearPayload { id } = decode_payload(payload)?;
        Ok(Self { id })
    }
}
