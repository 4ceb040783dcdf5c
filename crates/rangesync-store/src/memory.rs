//! In-memory implementation of the RowStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rangesync_core::{Component, KeyRange, SyncState};

use crate::error::{Result, StoreError};
use crate::traits::{AttemptMode, ChecksumRow, RowStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Rows per component, ordered by key.
    rows: HashMap<Component, BTreeMap<String, Option<String>>>,

    /// Sync state per component.
    states: HashMap<Component, SyncState>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {}", e)))
    }
}

/// Bounds of `range` for a `BTreeMap` lookup, or `None` when the range
/// cannot hold any key.
fn map_bounds(range: &KeyRange) -> Option<(Bound<&str>, Bound<&str>)> {
    if let (Some(begin), Some(end)) = (range.begin_bound(), range.end_bound()) {
        if begin > end {
            return None;
        }
    }
    let lower = range.begin_bound().map_or(Bound::Unbounded, Bound::Included);
    let upper = range.end_bound().map_or(Bound::Unbounded, Bound::Included);
    Some((lower, upper))
}

impl RowStore for MemoryStore {
    fn scan_range(
        &self,
        component: Component,
        range: &KeyRange,
        visit: &mut dyn FnMut(ChecksumRow<'_>),
    ) -> Result<usize> {
        let inner = self.read()?;
        let (Some(rows), Some(bounds)) = (inner.rows.get(&component), map_bounds(range)) else {
            return Ok(0);
        };

        let mut count = 0;
        for (key, checksum) in rows.range::<str, _>(bounds) {
            visit(ChecksumRow {
                key,
                checksum: checksum.as_deref(),
            });
            count += 1;
        }
        Ok(count)
    }

    fn delete_range(
        &self,
        component: Component,
        range: &KeyRange,
        tail: Option<&str>,
    ) -> Result<usize> {
        let mut inner = self.write()?;
        let (Some(rows), Some(bounds)) = (inner.rows.get_mut(&component), map_bounds(range)) else {
            return Ok(0);
        };

        let doomed: Vec<String> = rows
            .range::<str, _>(bounds)
            .map(|(key, _)| key)
            .filter(|key| tail.map_or(true, |tail| key.as_str() < tail))
            .cloned()
            .collect();
        for key in &doomed {
            rows.remove(key);
        }
        Ok(doomed.len())
    }

    fn put_row(&self, component: Component, key: &str, checksum: Option<&str>) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .rows
            .entry(component)
            .or_default()
            .insert(key.to_string(), checksum.map(str::to_string));
        Ok(())
    }

    fn row_count(&self, component: Component) -> Result<usize> {
        let inner = self.read()?;
        Ok(inner.rows.get(&component).map_or(0, BTreeMap::len))
    }

    fn upsert_attempt(
        &self,
        component: Component,
        timestamp: i64,
        mode: AttemptMode,
        claimed: &str,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let claimed = match mode {
            AttemptMode::Standard => Some(claimed),
            AttemptMode::Legacy => None,
        };
        inner
            .states
            .entry(component)
            .or_insert_with(|| SyncState::new(component))
            .record_attempt(timestamp, claimed);
        Ok(())
    }

    fn upsert_completion(
        &self,
        component: Component,
        timestamp: i64,
        checksum: &str,
    ) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .states
            .entry(component)
            .or_insert_with(|| SyncState::new(component))
            .record_completion(timestamp, checksum);
        Ok(())
    }

    fn sync_state(&self, component: Component) -> Result<Option<SyncState>> {
        let inner = self.read()?;
        Ok(inner.states.get(&component).cloned())
    }
}
