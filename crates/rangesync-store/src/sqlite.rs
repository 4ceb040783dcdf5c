//! SQLite implementation of the RowStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite. Every statement the engine needs is named by a [`StmtKind`] and
//! prepared through the connection's statement cache, so a handle prepares
//! each statement once and reuses it across calls.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, CachedStatement, Connection, OptionalExtension};
use tracing::debug;

use rangesync_core::{Component, KeyRange, SyncState};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{AttemptMode, ChecksumRow, RowStore};

/// Statements issued by the store, one per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StmtKind {
    ScanRange,
    DeleteRange,
    PutRow,
    CountRows,
    UpsertAttempt,
    UpsertAttemptLegacy,
    UpsertCompletion,
    SelectState,
}

impl StmtKind {
    pub const ALL: [StmtKind; 8] = [
        StmtKind::ScanRange,
        StmtKind::DeleteRange,
        StmtKind::PutRow,
        StmtKind::CountRows,
        StmtKind::UpsertAttempt,
        StmtKind::UpsertAttemptLegacy,
        StmtKind::UpsertCompletion,
        StmtKind::SelectState,
    ];

    /// SQL text of the statement.
    pub const fn sql(self) -> &'static str {
        match self {
            StmtKind::ScanRange => {
                "SELECT entry_key, checksum FROM entries
                 WHERE component = ?1
                   AND (?2 = '' OR entry_key >= ?2)
                   AND (?3 = '' OR entry_key <= ?3)
                 ORDER BY entry_key ASC"
            }
            StmtKind::DeleteRange => {
                "DELETE FROM entries
                 WHERE component = ?1
                   AND (?2 = '' OR entry_key >= ?2)
                   AND (?3 = '' OR entry_key <= ?3)
                   AND (?4 IS NULL OR entry_key < ?4)"
            }
            StmtKind::PutRow => {
                "INSERT INTO entries (component, entry_key, checksum) VALUES (?1, ?2, ?3)
                 ON CONFLICT(component, entry_key) DO UPDATE SET checksum = excluded.checksum"
            }
            StmtKind::CountRows => "SELECT COUNT(*) FROM entries WHERE component = ?1",
            StmtKind::UpsertAttempt => {
                "INSERT INTO sync_state (component, last_attempt, last_agent_checksum)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(component) DO UPDATE SET
                    last_attempt = excluded.last_attempt,
                    last_agent_checksum = excluded.last_agent_checksum"
            }
            StmtKind::UpsertAttemptLegacy => {
                "INSERT INTO sync_state (component, last_attempt) VALUES (?1, ?2)
                 ON CONFLICT(component) DO UPDATE SET last_attempt = excluded.last_attempt"
            }
            StmtKind::UpsertCompletion => {
                "INSERT INTO sync_state (component, last_attempt, last_completion, last_checksum)
                 VALUES (?1, ?2, ?2, ?3)
                 ON CONFLICT(component) DO UPDATE SET
                    last_attempt = excluded.last_attempt,
                    last_completion = excluded.last_completion,
                    last_checksum = excluded.last_checksum"
            }
            StmtKind::SelectState => {
                "SELECT last_attempt, last_completion, last_agent_checksum, last_checksum
                 FROM sync_state WHERE component = ?1"
            }
        }
    }
}

/// SQLite-based store implementation.
///
/// The connection sits behind a mutex so the handle can move between
/// threads, but it is meant to be driven by one worker at a time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and missing parent directories) and runs
    /// migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        conn.set_prepared_statement_cache_capacity(StmtKind::ALL.len());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("connection mutex poisoned: {}", e)))?;
        f(&conn)
    }

    /// Run one cached statement.
    ///
    /// A failing statement flushes the cache, so the next call prepares a
    /// fresh handle instead of reusing the broken one.
    fn run<F, T>(&self, kind: StmtKind, f: F) -> Result<T>
    where
        F: FnOnce(&mut CachedStatement<'_>) -> rusqlite::Result<T>,
    {
        self.with_conn(|conn| {
            let result = conn
                .prepare_cached(kind.sql())
                .and_then(|mut stmt| f(&mut stmt));
            if let Err(e) = &result {
                debug!(statement = ?kind, error = %e, "statement failed, flushing cache");
                conn.flush_prepared_statement_cache();
            }
            result.map_err(StoreError::from)
        })
    }
}

impl RowStore for SqliteStore {
    fn scan_range(
        &self,
        component: Component,
        range: &KeyRange,
        visit: &mut dyn FnMut(ChecksumRow<'_>),
    ) -> Result<usize> {
        self.run(StmtKind::ScanRange, |stmt| {
            let mut rows = stmt.query(params![component.as_str(), range.begin, range.end])?;
            let mut count = 0;
            while let Some(row) = rows.next()? {
                let key: String = row.get(0)?;
                let checksum: Option<String> = row.get(1)?;
                visit(ChecksumRow {
                    key: &key,
                    checksum: checksum.as_deref(),
                });
                count += 1;
            }
            Ok(count)
        })
    }

    fn delete_range(
        &self,
        component: Component,
        range: &KeyRange,
        tail: Option<&str>,
    ) -> Result<usize> {
        self.run(StmtKind::DeleteRange, |stmt| {
            stmt.execute(params![component.as_str(), range.begin, range.end, tail])
        })
    }

    fn put_row(&self, component: Component, key: &str, checksum: Option<&str>) -> Result<()> {
        self.run(StmtKind::PutRow, |stmt| {
            stmt.execute(params![component.as_str(), key, checksum])
        })?;
        Ok(())
    }

    fn row_count(&self, component: Component) -> Result<usize> {
        let count: i64 = self.run(StmtKind::CountRows, |stmt| {
            stmt.query_row(params![component.as_str()], |row| row.get(0))
        })?;
        usize::try_from(count).map_err(|_| StoreError::InvalidData(format!("row count {}", count)))
    }

    fn upsert_attempt(
        &self,
        component: Component,
        timestamp: i64,
        mode: AttemptMode,
        claimed: &str,
    ) -> Result<()> {
        match mode {
            AttemptMode::Standard => self.run(StmtKind::UpsertAttempt, |stmt| {
                stmt.execute(params![component.as_str(), timestamp, claimed])
            })?,
            AttemptMode::Legacy => self.run(StmtKind::UpsertAttemptLegacy, |stmt| {
                stmt.execute(params![component.as_str(), timestamp])
            })?,
        };
        Ok(())
    }

    fn upsert_completion(
        &self,
        component: Component,
        timestamp: i64,
        checksum: &str,
    ) -> Result<()> {
        self.run(StmtKind::UpsertCompletion, |stmt| {
            stmt.execute(params![component.as_str(), timestamp, checksum])
        })?;
        Ok(())
    }

    fn sync_state(&self, component: Component) -> Result<Option<SyncState>> {
        self.run(StmtKind::SelectState, |stmt| {
            stmt.query_row(params![component.as_str()], |row| {
                Ok(SyncState {
                    component,
                    last_attempt: row.get(0)?,
                    last_completion: row.get(1)?,
                    last_agent_checksum: row.get(2)?,
                    last_checksum: row.get(3)?,
                })
            })
            .optional()
        })
    }
}
