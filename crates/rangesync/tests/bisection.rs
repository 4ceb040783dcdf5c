//! Two peers converging through range checks alone.
//!
//! The agent holds the authoritative rows. It probes halves of the key
//! space until each disagreeing slice is small, settles that slice with a
//! global check (which prunes it on the manager), resends its rows, and
//! finishes with a global check over everything.

use rangesync::store::{MemoryStore, RowStore, RowStoreExt, SqliteStore};
use rangesync::sync::aggregate;
use rangesync::{Classification, Component, Engine, EngineConfig, KeyRange};
use rangesync_testkit::{copy_rows, row_checksum, row_key, TestFixture};

const COMPONENT: Component = Component::Packages;
const ROWS: usize = 256;
const LEAF: usize = 4;
const SETTLE_ID: i64 = 1_000;
const FINAL_ID: i64 = 2_000;

/// Smallest key strictly greater than `key`.
fn successor(key: &str) -> String {
    format!("{}\0", key)
}

fn payload(range: &KeyRange, checksum: &str, id: i64) -> String {
    serde_json::json!({
        "begin": range.begin,
        "end": range.end,
        "checksum": checksum,
        "id": id,
    })
    .to_string()
}

struct Session<'a, S: RowStore> {
    agent: &'a MemoryStore,
    manager: &'a Engine<S>,
    requests: usize,
    rows_sent: usize,
}

impl<'a, S: RowStore> Session<'a, S> {
    fn claim(&self, range: &KeyRange) -> String {
        aggregate(self.agent, COMPONENT, range).unwrap().digest().to_hex()
    }

    fn check(&mut self, command: &str, range: &KeyRange, id: i64) -> Classification {
        self.requests += 1;
        let claim = self.claim(range);
        self.manager
            .checksum(COMPONENT, command, &payload(range, &claim, id))
            .unwrap()
    }

    fn settle(&mut self, range: &KeyRange, keys: &[String]) {
        let result = self.check("integrity_check_global", range, SETTLE_ID);
        assert_ne!(result, Classification::Match);
        for key in keys {
            self.manager
                .store()
                .put_row(COMPONENT, key, Some(&row_checksum(key, 0)))
                .unwrap();
            self.rows_sent += 1;
        }
    }

    /// Split `range`, whose agent keys are `keys`, and probe both halves.
    fn bisect(&mut self, range: &KeyRange, keys: &[String]) {
        let mid = keys.len() / 2;
        let (left_keys, right_keys) = keys.split_at(mid);
        let split = &left_keys[left_keys.len() - 1];
        let left = KeyRange::new(range.begin.clone(), split.clone());
        let right = KeyRange::new(successor(split), range.end.clone());

        self.descend("integrity_check_left", &left, left_keys);
        self.descend("integrity_check_right", &right, right_keys);
    }

    fn descend(&mut self, command: &str, range: &KeyRange, keys: &[String]) {
        match self.check(command, range, SETTLE_ID) {
            Classification::Match => {}
            Classification::Empty if keys.is_empty() => {}
            _ if keys.len() <= LEAF => self.settle(range, keys),
            _ => self.bisect(range, keys),
        }
    }
}

/// Agent rows, plus a manager copy with three divergences: one stale row,
/// one missing row and one row the agent never had.
fn diverged<S: RowStore>(manager: &S) -> MemoryStore {
    let agent = TestFixture::with_rows(COMPONENT, ROWS).store;
    copy_rows(&agent, manager, COMPONENT);

    manager
        .put_row(COMPONENT, &row_key(10), Some(&row_checksum(&row_key(10), 1)))
        .unwrap();
    manager
        .delete_range(COMPONENT, &KeyRange::new(row_key(100), row_key(100)), None)
        .unwrap();
    manager
        .put_row(COMPONENT, &format!("{}x", row_key(200)), Some("stray"))
        .unwrap();
    agent
}

fn converge<S: RowStore>(manager_store: S) {
    let manager = Engine::new(manager_store, EngineConfig::default());
    let agent = diverged(manager.store());
    let keys = agent.keys(COMPONENT, &KeyRange::full()).unwrap();

    let mut session = Session {
        agent: &agent,
        manager: &manager,
        requests: 0,
        rows_sent: 0,
    };
    session.bisect(&KeyRange::full(), &keys);

    let result = session.check("integrity_check_global", &KeyRange::full(), FINAL_ID);
    assert_eq!(result, Classification::Match);

    assert!(session.rows_sent > 0);
    assert!(session.rows_sent <= 3 * LEAF, "sent {} rows", session.rows_sent);
    assert!(session.requests < ROWS / 2, "issued {} requests", session.requests);

    assert_eq!(
        manager.store().keys(COMPONENT, &KeyRange::full()).unwrap(),
        keys
    );
    let state = manager.sync_state(COMPONENT).unwrap().unwrap();
    assert_eq!(state.last_completion, FINAL_ID);
    assert_eq!(state.last_checksum, session.claim(&KeyRange::full()));
    assert!(state.is_synced());
}

#[test]
fn test_converge_memory_manager() {
    converge(MemoryStore::new());
}

#[test]
fn test_converge_sqlite_manager() {
    converge(SqliteStore::open_memory().unwrap());
}

#[test]
fn test_in_sync_peers_need_one_request() {
    let manager = Engine::new(MemoryStore::new(), EngineConfig::default());
    let agent = TestFixture::with_rows(COMPONENT, ROWS);
    copy_rows(&agent.store, manager.store(), COMPONENT);

    let claim = agent.claim(COMPONENT, &KeyRange::full());
    let result = manager
        .checksum(
            COMPONENT,
            "integrity_check_global",
            &payload(&KeyRange::full(), &claim, FINAL_ID),
        )
        .unwrap();

    assert_eq!(result, Classification::Match);
    assert!(manager.sync_state(COMPONENT).unwrap().unwrap().is_synced());
}
