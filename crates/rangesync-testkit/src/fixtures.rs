//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rangesync_core::{digest, Component, KeyRange, SyncState};
use rangesync_store::{AttemptMode, ChecksumRow, MemoryStore, RowStore, RowStoreExt, StoreError};

/// A memory store with helpers for seeding rows.
pub struct TestFixture {
    pub store: MemoryStore,
}

impl TestFixture {
    /// Create a fixture over an empty store.
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Create a fixture whose `component` holds `count` generated rows.
    pub fn with_rows(component: Component, count: usize) -> Self {
        let fixture = Self::new();
        seed_rows(&fixture.store, component, count);
        fixture
    }

    /// The aggregate a peer holding exactly the rows of `range` would claim.
    pub fn claim(&self, component: Component, range: &KeyRange) -> String {
        let mut checksums = Vec::new();
        let scanned = self.store.scan_range(component, range, &mut |row| {
            checksums.push(row.checksum.unwrap_or_default().to_string())
        });
        match scanned {
            Ok(_) => digest(&checksums).to_hex(),
            Err(e) => panic!("fixture store failed: {}", e),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Key of the `i`th generated row. Zero-padded so byte order follows `i`.
pub fn row_key(i: usize) -> String {
    format!("key-{:06}", i)
}

/// Checksum of a generated row: the hex digest of its key and version.
pub fn row_checksum(key: &str, version: u32) -> String {
    digest([key, version.to_string().as_str()]).to_hex()
}

/// Insert `count` generated rows at version 0 into any store.
pub fn seed_rows<S: RowStore + ?Sized>(store: &S, component: Component, count: usize) {
    for i in 0..count {
        let key = row_key(i);
        let checksum = row_checksum(&key, 0);
        if let Err(e) = store.put_row(component, &key, Some(&checksum)) {
            panic!("cannot seed row {}: {}", key, e);
        }
    }
}

/// Copy every row of `component` from `from` into `to`.
pub fn copy_rows<A, B>(from: &A, to: &B, component: Component)
where
    A: RowStore + ?Sized,
    B: RowStore + ?Sized,
{
    let mut rows = Vec::new();
    let scanned = from.scan_range(component, &KeyRange::full(), &mut |row| {
        rows.push((row.key.to_string(), row.checksum.map(str::to_string)))
    });
    if let Err(e) = scanned {
        panic!("cannot read source rows: {}", e);
    }
    let pairs = rows.iter().map(|(k, c)| (k.as_str(), c.as_deref()));
    if let Err(e) = to.put_rows(component, pairs) {
        panic!("cannot copy rows: {}", e);
    }
}

/// Call counter plus failure toggle for one store operation.
#[derive(Default)]
struct Probe {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl Probe {
    fn hit(&self, op: &str) -> rangesync_store::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("injected {} failure", op)));
        }
        Ok(())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

/// A store wrapper that counts calls and injects failures per operation.
///
/// A failing call is still counted and never reaches the inner store.
pub struct FaultyStore<S> {
    inner: S,
    scans: Probe,
    deletes: Probe,
    attempts: Probe,
    completions: Probe,
}

impl<S: RowStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            scans: Probe::default(),
            deletes: Probe::default(),
            attempts: Probe::default(),
            completions: Probe::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_scans(&self, fail: bool) {
        self.scans.set_fail(fail);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.deletes.set_fail(fail);
    }

    pub fn fail_attempts(&self, fail: bool) {
        self.attempts.set_fail(fail);
    }

    pub fn fail_completions(&self, fail: bool) {
        self.completions.set_fail(fail);
    }

    pub fn scans(&self) -> usize {
        self.scans.calls()
    }

    pub fn deletes(&self) -> usize {
        self.deletes.calls()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.calls()
    }

    pub fn completions(&self) -> usize {
        self.completions.calls()
    }

    /// Calls that could have written something.
    pub fn writes(&self) -> usize {
        self.deletes() + self.attempts() + self.completions()
    }
}

impl<S: RowStore> RowStore for FaultyStore<S> {
    fn scan_range(
        &self,
        component: Component,
        range: &KeyRange,
        visit: &mut dyn FnMut(ChecksumRow<'_>),
    ) -> rangesync_store::Result<usize> {
        self.scans.hit("scan")?;
        self.inner.scan_range(component, range, visit)
    }

    fn delete_range(
        &self,
        component: Component,
        range: &KeyRange,
        tail: Option<&str>,
    ) -> rangesync_store::Result<usize> {
        self.deletes.hit("delete")?;
        self.inner.delete_range(component, range, tail)
    }

    fn put_row(
        &self,
        component: Component,
        key: &str,
        checksum: Option<&str>,
    ) -> rangesync_store::Result<()> {
        self.inner.put_row(component, key, checksum)
    }

    fn row_count(&self, component: Component) -> rangesync_store::Result<usize> {
        self.inner.row_count(component)
    }

    fn upsert_attempt(
        &self,
        component: Component,
        timestamp: i64,
        mode: AttemptMode,
        claimed: &str,
    ) -> rangesync_store::Result<()> {
        self.attempts.hit("attempt")?;
        self.inner.upsert_attempt(component, timestamp, mode, claimed)
    }

    fn upsert_completion(
        &self,
        component: Component,
        timestamp: i64,
        checksum: &str,
    ) -> rangesync_store::Result<()> {
        self.completions.hit("completion")?;
        self.inner.upsert_completion(component, timestamp, checksum)
    }

    fn sync_state(&self, component: Component) -> rangesync_store::Result<Option<SyncState>> {
        self.inner.sync_state(component)
    }
}
