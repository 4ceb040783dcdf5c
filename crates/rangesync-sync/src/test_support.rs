use rangesync_core::{Component, KeyRange, SyncState};
use rangesync_store::{AttemptMode, ChecksumRow, RowStore, StoreError};

/// A store whose every operation fails.
pub(crate) struct BrokenStore;

fn unavailable<T>() -> rangesync_store::Result<T> {
    Err(StoreError::Unavailable("backend offline".into()))
}

impl RowStore for BrokenStore {
    fn scan_range(
        &self,
        _: Component,
        _: &KeyRange,
        _: &mut dyn FnMut(ChecksumRow<'_>),
    ) -> rangesync_store::Result<usize> {
        unavailable()
    }

    fn delete_range(&self, _: Component, _: &KeyRange, _: Option<&str>) -> rangesync_store::Result<usize> {
        unavailable()
    }

    fn put_row(&self, _: Component, _: &str, _: Option<&str>) -> rangesync_store::Result<()> {
        unavailable()
    }

    fn row_count(&self, _: Component) -> rangesync_store::Result<usize> {
        unavailable()
    }

    fn upsert_attempt(&self, _: Component, _: i64, _: AttemptMode, _: &str) -> rangesync_store::Result<()> {
        unavailable()
    }

    fn upsert_completion(&self, _: Component, _: i64, _: &str) -> rangesync_store::Result<()> {
        unavailable()
    }

    fn sync_state(&self, _: Component) -> rangesync_store::Result<Option<SyncState>> {
        unavailable()
    }
}
