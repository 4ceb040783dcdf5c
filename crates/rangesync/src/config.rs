//! Engine configuration.
//!
//! ```json
//! {
//!   "clear_scope": "component",
//!   "database": { "path": "/var/lib/rangesync/rows.db" }
//! }
//! ```
//!
//! Every field is optional. A missing `database.path` keeps the SQLite
//! database in memory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rangesync_sync::{ClearScope, DispatchConfig};

use crate::error::{EngineError, Result};

/// Configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Which rows a clear recomputes its digest over.
    pub clear_scope: ClearScope,
    /// Storage settings.
    pub database: DatabaseConfig,
}

/// SQLite settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file; `None` for an in-memory database.
    pub path: Option<PathBuf>,
}

impl EngineConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// The part of the configuration the dispatcher needs.
    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig {
            clear_scope: self.clear_scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::default().clear_scope, ClearScope::Component);
        assert_eq!(EngineConfig::default().database.path, None);
    }

    #[test]
    fn test_full_document() {
        let config = EngineConfig::from_json(
            r#"{"clear_scope":"up_to_id","database":{"path":"/tmp/rows.db"}}"#,
        )
        .unwrap();
        assert_eq!(config.clear_scope, ClearScope::UpToId);
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/rows.db")));
        assert_eq!(config.dispatch().clear_scope, ClearScope::UpToId);
    }

    #[test]
    fn test_rejects_bad_documents() {
        for json in [
            r#"{"clear_scope":"everything"}"#,
            r#"{"clear_scop":"component"}"#,
            "not json",
        ] {
            assert!(matches!(
                EngineConfig::from_json(json),
                Err(EngineError::Config(_))
            ));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/rangesync.json").unwrap_err();
        assert!(matches!(err, EngineError::Config(msg) if msg.contains("cannot read")));
    }
}
