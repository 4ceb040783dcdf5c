//! Error types for rangesync core.

use thiserror::Error;

/// Errors raised while building core values from untrusted text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid digest: {0:?}")]
    InvalidDigest(String),

    #[error("unknown component: {0:?}")]
    UnknownComponent(String),
}
