//! RowStore trait: the abstract interface the reconciliation engine reads
//! and writes through.
//!
//! Implementations include SQLite (primary) and in-memory (for tests).

use rangesync_core::{Component, KeyRange, SyncState};

use crate::error::Result;

/// One row yielded by a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumRow<'a> {
    /// Primary key of the row.
    pub key: &'a str,
    /// Precomputed row checksum. `None` when the stored field is NULL.
    pub checksum: Option<&'a str>,
}

/// How an attempt is written to the sync state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptMode {
    /// Store the attempt time and the peer's claimed checksum.
    #[default]
    Standard,
    /// Store the attempt time only, keeping the previous agent checksum.
    ///
    /// Reserved for peers speaking the older protocol revision; the
    /// dispatcher never selects it.
    Legacy,
}

/// The RowStore trait: synchronous interface for row storage.
///
/// Every call blocks until the backend answers. A store handle is used by
/// one worker at a time.
///
/// # Range semantics
///
/// Ranges are inclusive on both ends and an empty bound is unbounded on
/// that side. Keys compare by bytes.
pub trait RowStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Row Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Visit every row of `component` inside `range` in ascending key order.
    ///
    /// Returns the number of rows visited.
    fn scan_range(
        &self,
        component: Component,
        range: &KeyRange,
        visit: &mut dyn FnMut(ChecksumRow<'_>),
    ) -> Result<usize>;

    /// Delete every row of `component` inside `range`, restricted to keys
    /// strictly below `tail` when one is given.
    ///
    /// Returns the number of rows deleted; zero is not an error.
    fn delete_range(&self, component: Component, range: &KeyRange, tail: Option<&str>)
        -> Result<usize>;

    /// Insert or replace a row.
    fn put_row(&self, component: Component, key: &str, checksum: Option<&str>) -> Result<()>;

    /// Count the rows stored for `component`.
    fn row_count(&self, component: Component) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Sync State Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Upsert the attempt markers for `component`.
    fn upsert_attempt(
        &self,
        component: Component,
        timestamp: i64,
        mode: AttemptMode,
        claimed: &str,
    ) -> Result<()>;

    /// Upsert the completion markers for `component`.
    ///
    /// Sets both the attempt and completion times to `timestamp`.
    fn upsert_completion(&self, component: Component, timestamp: i64, checksum: &str)
        -> Result<()>;

    /// Read the sync state of `component`, if it was ever written.
    fn sync_state(&self, component: Component) -> Result<Option<SyncState>>;
}

/// Extension trait for common store patterns.
pub trait RowStoreExt: RowStore {
    /// Insert many rows.
    fn put_rows<'a, I>(&self, component: Component, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        for (key, checksum) in rows {
            self.put_row(component, key, checksum)?;
        }
        Ok(())
    }

    /// Collect the keys inside `range`, in scan order.
    fn keys(&self, component: Component, range: &KeyRange) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        self.scan_range(component, range, &mut |row| keys.push(row.key.to_string()))?;
        Ok(keys)
    }
}

impl<S: RowStore + ?Sized> RowStoreExt for S {}
