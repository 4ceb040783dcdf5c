//! The Engine: one handle tying a store to its reconciliation dispatcher.

use std::sync::Arc;

use tracing::{debug, info};

use rangesync_core::{Classification, Component, Digest, SyncState};
use rangesync_store::{RowStore, SqliteStore};
use rangesync_sync::{Command, Dispatcher, Response};

use crate::config::EngineConfig;
use crate::error::Result;

/// The main Engine struct.
///
/// Serves reconciliation requests for every component held by one store.
/// Requests are handled synchronously, one per call.
pub struct Engine<S: RowStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: EngineConfig,
}

impl Engine<SqliteStore> {
    /// Open the SQLite database named by `config`, or an in-memory one.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let store = match &config.database.path {
            Some(path) => {
                info!(path = %path.display(), "opening row database");
                SqliteStore::open(path)?
            }
            None => {
                info!("opening in-memory row database");
                SqliteStore::open_memory()?
            }
        };
        Ok(Self::new(store, config))
    }
}

impl<S: RowStore> Engine<S> {
    /// Create an engine over an existing store.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// A shared handle to the store, for writers running beside the engine.
    pub fn store_handle(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A dispatcher borrowing this engine's store.
    pub fn dispatcher(&self) -> Dispatcher<'_, S> {
        Dispatcher::new(self.store.as_ref(), self.config.dispatch())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Serve one request given as raw command name and JSON payload.
    pub fn dispatch(&self, component: Component, command: &str, payload: &str) -> Result<Response> {
        Ok(self.dispatcher().dispatch(component, command, payload)?)
    }

    /// Serve one request whose component is still a wire name.
    pub fn dispatch_named(&self, component: &str, command: &str, payload: &str) -> Result<Response> {
        let component: Component = component.parse()?;
        debug!(%component, command, "dispatching request");
        self.dispatch(component, command, payload)
    }

    /// Classify a range check.
    pub fn checksum(&self, component: Component, command: &str, payload: &str) -> Result<Classification> {
        Ok(self
            .dispatcher()
            .query_checksum(component, Command::parse(command), payload)?)
    }

    /// Apply a clear.
    pub fn clear(&self, component: Component, payload: &str) -> Result<Digest> {
        Ok(self.dispatcher().query_clear(component, payload)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the sync state of `component`.
    pub fn sync_state(&self, component: Component) -> Result<Option<SyncState>> {
        Ok(self.store.sync_state(component)?)
    }

    /// Whether every component that has sync state last finished in sync.
    pub fn all_synced(&self) -> Result<bool> {
        for component in Component::ALL {
            if let Some(state) = self.store.sync_state(component)? {
                if !state.is_synced() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rangesync_store::MemoryStore;
    use rangesync_sync::SyncError;

    #[test]
    fn test_open_in_memory() {
        let engine = Engine::open(EngineConfig::default()).unwrap();
        let response = engine
            .dispatch(
                Component::Fim,
                "integrity_check_global",
                r#"{"begin":"","end":"","checksum":"x","id":1}"#,
            )
            .unwrap();
        assert_eq!(response, Response::Classified(Classification::Empty));
        assert_eq!(engine.sync_state(Component::Fim).unwrap().unwrap().last_attempt, 1);
    }

    #[test]
    fn test_dispatch_named_rejects_unknown_component() {
        let engine = Engine::new(MemoryStore::new(), EngineConfig::default());
        let err = engine
            .dispatch_named("registry", "integrity_clear", r#"{"id":1}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));

        let response = engine
            .dispatch_named("hwinfo", "integrity_clear", r#"{"id":1}"#)
            .unwrap();
        assert_eq!(response, Response::Cleared(Digest::EMPTY));
    }

    #[test]
    fn test_malformed_payload_surfaces_as_sync_error() {
        let engine = Engine::new(MemoryStore::new(), EngineConfig::default());
        let err = engine
            .checksum(Component::Fim, "integrity_check_global", "This is some test")
            .unwrap_err();
        assert!(matches!(err, EngineError::Sync(SyncError::RequestMalformed(_))));
    }

    #[test]
    fn test_all_synced() {
        let engine = Engine::new(MemoryStore::new(), EngineConfig::default());
        assert!(engine.all_synced().unwrap());

        engine
            .checksum(
                Component::Ports,
                "integrity_check_global",
                r#"{"begin":"","end":"","checksum":"x","id":10}"#,
            )
            .unwrap();
        assert!(!engine.all_synced().unwrap());

        engine.clear(Component::Ports, r#"{"id":11}"#).unwrap();
        assert!(engine.all_synced().unwrap());
    }
}
