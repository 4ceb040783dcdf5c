//! Reconciliation dispatch.
//!
//! One call per request: decode, aggregate, classify, then apply the side
//! effects the command calls for. Only [`Command::Global`] has side
//! effects; probes issued while bisecting a mismatch must leave the store
//! untouched, since a sibling probe may still need the rows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rangesync_core::{Classification, Component, Digest, KeyRange};
use rangesync_store::{AttemptMode, RowStore};

use crate::aggregate::{aggregate, RangeChecksum};
use crate::error::Result;
use crate::prune::prune;
use crate::request::{ClearRequest, Command, ReconciliationRequest};
use crate::tracker::{record_attempt, record_completion};

/// Which rows a clear recomputes its digest over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearScope {
    /// The whole component.
    #[default]
    Component,
    /// Keys up to and including the decimal rendering of the request id.
    UpToId,
}

impl ClearScope {
    pub fn range(self, id: i64) -> KeyRange {
        match self {
            ClearScope::Component => KeyRange::full(),
            ClearScope::UpToId => KeyRange::up_to(id.to_string()),
        }
    }
}

/// Configuration for dispatch behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub clear_scope: ClearScope,
}

/// Answer to one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// A range check was classified.
    Classified(Classification),
    /// A clear completed; carries the recomputed digest.
    Cleared(Digest),
}

/// Serves reconciliation requests against a borrowed store.
pub struct Dispatcher<'s, S: ?Sized> {
    store: &'s S,
    config: DispatchConfig,
}

impl<'s, S: RowStore + ?Sized> Dispatcher<'s, S> {
    pub fn new(store: &'s S, config: DispatchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Route a raw command name and payload.
    pub fn dispatch(&self, component: Component, command: &str, payload: &str) -> Result<Response> {
        match Command::parse(command) {
            Command::Clear => self.query_clear(component, payload).map(Response::Cleared),
            command => self
                .query_checksum(component, command, payload)
                .map(Response::Classified),
        }
    }

    /// Decode a range check and classify it.
    pub fn query_checksum(
        &self,
        component: Component,
        command: Command,
        payload: &str,
    ) -> Result<Classification> {
        let request = ReconciliationRequest::decode(command, payload)?;
        self.reconcile(component, &request)
    }

    /// Classify a decoded range check and apply its side effects.
    ///
    /// Side-effect failures are logged and never change the result; an
    /// aggregation failure is returned.
    pub fn reconcile(
        &self,
        component: Component,
        request: &ReconciliationRequest,
    ) -> Result<Classification> {
        let local = aggregate(self.store, component, &request.range)?;
        let classification = local.classify(&request.checksum);

        debug!(
            %component,
            command = %request.command,
            range = %request.range,
            local = %local.digest(),
            claimed = %request.checksum,
            %classification,
            "classified range"
        );

        if request.command.settles_state() {
            self.settle(component, request, &local, classification);
        }

        Ok(classification)
    }

    fn settle(
        &self,
        component: Component,
        request: &ReconciliationRequest,
        local: &RangeChecksum,
        classification: Classification,
    ) {
        match classification {
            Classification::Empty | Classification::Mismatch => {
                // Failure is logged by prune and must not block the attempt record.
                let _ = prune(self.store, component, &request.range, request.tail.as_deref());
                record_attempt(
                    self.store,
                    component,
                    request.id,
                    AttemptMode::Standard,
                    &request.checksum,
                );
            }
            Classification::Match => {
                record_completion(self.store, component, request.id, &local.digest().to_hex());
            }
        }
    }

    /// Decode a clear and apply it.
    pub fn query_clear(&self, component: Component, payload: &str) -> Result<Digest> {
        let request = ClearRequest::decode(payload)?;
        self.clear(component, &request)
    }

    /// Recompute the digest over the configured clear scope and record a
    /// completion for it, whatever it classifies as.
    pub fn clear(&self, component: Component, request: &ClearRequest) -> Result<Digest> {
        let range = self.config.clear_scope.range(request.id);
        let digest = aggregate(self.store, component, &range)?.digest();
        debug!(%component, id = request.id, %range, %digest, "clearing sync state");
        record_completion(self.store, component, request.id, &digest.to_hex());
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::test_support::BrokenStore;
    use rangesync_core::digest;
    use rangesync_store::{MemoryStore, RowStoreExt};

    fn payload(begin: &str, end: &str, checksum: &str, id: i64) -> String {
        format!(
            r#"{{"begin":"{}","end":"{}","checksum":"{}","id":{}}}"#,
            begin, end, checksum, id
        )
    }

    #[test]
    fn test_global_on_empty_records_attempt() {
        let store = MemoryStore::new();
        let dispatcher = Dispatcher::new(&store, DispatchConfig::default());

        let result = dispatcher
            .query_checksum(Component::Fim, Command::Global, &payload("", "", "x", 1))
            .unwrap();

        assert_eq!(result, Classification::Empty);
        let state = store.sync_state(Component::Fim).unwrap().unwrap();
        assert_eq!(state.last_attempt, 1);
        assert_eq!(state.last_agent_checksum, "x");
        assert_eq!(state.last_completion, 0);
    }

    #[test]
    fn test_global_mismatch_prunes_range() {
        let store = MemoryStore::new();
        store
            .put_rows(Component::Fim, [("a", Some("1")), ("b", None), ("c", Some("3"))])
            .unwrap();
        let dispatcher = Dispatcher::new(&store, DispatchConfig::default());

        let result = dispatcher
            .query_checksum(Component::Fim, Command::Global, &payload("a", "b", "x", 7))
            .unwrap();

        assert_eq!(result, Classification::Mismatch);
        assert_eq!(store.keys(Component::Fim, &KeyRange::full()).unwrap(), vec!["c"]);
        assert_eq!(store.sync_state(Component::Fim).unwrap().unwrap().last_attempt, 7);
    }

    #[test]
    fn test_global_match_records_completion() {
        let store = MemoryStore::new();
        store
            .put_rows(Component::Packages, [("bash", Some("aa")), ("zsh", Some("bb"))])
            .unwrap();
        let expected = digest(["aa", "bb"]).to_hex();
        let dispatcher = Dispatcher::new(&store, DispatchConfig::default());

        let result = dispatcher
            .query_checksum(Component::Packages, Command::Global, &payload("", "", &expected, 99))
            .unwrap();

        assert_eq!(result, Classification::Match);
        assert_eq!(store.row_count(Component::Packages).unwrap(), 2);
        let state = store.sync_state(Component::Packages).unwrap().unwrap();
        assert_eq!(state.last_completion, 99);
        assert_eq!(state.last_checksum, expected);
    }

    #[test]
    fn test_probes_and_unknown_have_no_side_effects() {
        let store = MemoryStore::new();
        store.put_row(Component::Fim, "a", Some("1")).unwrap();
        let dispatcher = Dispatcher::new(&store, DispatchConfig::default());

        for command in [
            Command::ProbeLeft,
            Command::ProbeRight,
            Command::Unknown("bad_command".into()),
        ] {
            let result = dispatcher
                .query_checksum(Component::Fim, command, &payload("", "", "x", 1))
                .unwrap();
            assert_eq!(result, Classification::Mismatch);
        }

        assert_eq!(store.row_count(Component::Fim).unwrap(), 1);
        assert_eq!(store.sync_state(Component::Fim).unwrap(), None);
    }

    #[test]
    fn test_malformed_request_touches_nothing() {
        let dispatcher = Dispatcher::new(&BrokenStore, DispatchConfig::default());
        let err = dispatcher
            .query_checksum(Component::Fim, Command::Global, r#"{"begin":"a"}"#)
            .unwrap_err();
        assert!(matches!(err, SyncError::RequestMalformed(_)));
    }

    #[test]
    fn test_aggregation_failure_propagates() {
        let dispatcher = Dispatcher::new(&BrokenStore, DispatchConfig::default());
        let err = dispatcher
            .query_checksum(Component::Fim, Command::Global, &payload("", "", "x", 1))
            .unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable(_)));

        let err = dispatcher
            .query_clear(Component::Fim, r#"{"id":5678}"#)
            .unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable(_)));
    }

    #[test]
    fn test_dispatch_routes_clear() {
        let store = MemoryStore::new();
        store
            .put_rows(Component::Fim, [("1000", Some("a")), ("9999", Some("b"))])
            .unwrap();

        let whole = Dispatcher::new(&store, DispatchConfig::default());
        assert_eq!(
            whole.dispatch(Component::Fim, "integrity_clear", r#"{"id":5678}"#).unwrap(),
            Response::Cleared(digest(["a", "b"]))
        );
        let state = store.sync_state(Component::Fim).unwrap().unwrap();
        assert_eq!(state.last_completion, 5678);
        assert_eq!(state.last_checksum, digest(["a", "b"]).to_hex());

        let bounded = Dispatcher::new(
            &store,
            DispatchConfig {
                clear_scope: ClearScope::UpToId,
            },
        );
        assert_eq!(
            bounded.dispatch(Component::Fim, "integrity_clear", r#"{"id":5678}"#).unwrap(),
            Response::Cleared(digest(["a"]))
        );

        assert_eq!(
            whole
                .dispatch(Component::Fim, "integrity_check_left", &payload("", "", "x", 1))
                .unwrap(),
            Response::Classified(Classification::Mismatch)
        );
        assert_eq!(store.row_count(Component::Fim).unwrap(), 2);
    }

    #[test]
    fn test_clear_scope_config_names() {
        let config: DispatchConfig = serde_json::from_str(r#"{"clear_scope":"up_to_id"}"#).unwrap();
        assert_eq!(config.clear_scope, ClearScope::UpToId);
        let config: DispatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.clear_scope, ClearScope::Component);
    }
}
