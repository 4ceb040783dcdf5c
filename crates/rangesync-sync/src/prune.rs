//! Range pruning.

use tracing::{debug, warn};

use rangesync_core::{Component, KeyRange};
use rangesync_store::RowStore;

use crate::error::Result;

/// Delete the rows of `component` inside `range`.
///
/// When `tail` is given only keys strictly below it are deleted; `tail`
/// itself survives. Deleting nothing is success. A backend failure is
/// logged with the backend's error text and returned.
pub fn prune<S: RowStore + ?Sized>(
    store: &S,
    component: Component,
    range: &KeyRange,
    tail: Option<&str>,
) -> Result<usize> {
    match store.delete_range(component, range, tail) {
        Ok(deleted) => {
            debug!(%component, %range, ?tail, deleted, "pruned range");
            Ok(deleted)
        }
        Err(e) => {
            warn!(%component, %range, ?tail, error = %e, "cannot prune range");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::test_support::BrokenStore;
    use rangesync_store::{MemoryStore, RowStoreExt, SqliteStore};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_rows(
                Component::Hotfixes,
                [("KB1", Some("1")), ("KB2", Some("2")), ("KB3", Some("3")), ("KB4", Some("4"))],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_prune_whole_range() {
        let store = seeded();
        let deleted = prune(&store, Component::Hotfixes, &KeyRange::new("KB2", "KB3"), None).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            store.keys(Component::Hotfixes, &KeyRange::full()).unwrap(),
            vec!["KB1", "KB4"]
        );
    }

    #[test]
    fn test_tail_is_exclusive_cutoff() {
        let store = seeded();
        let deleted = prune(&store, Component::Hotfixes, &KeyRange::full(), Some("KB3")).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            store.keys(Component::Hotfixes, &KeyRange::full()).unwrap(),
            vec!["KB3", "KB4"]
        );
    }

    #[test]
    fn test_nothing_to_delete_is_success() {
        let store = seeded();
        assert_eq!(
            prune(&store, Component::Hotfixes, &KeyRange::new("X", "Z"), None).unwrap(),
            0
        );
        assert_eq!(prune(&store, Component::Fim, &KeyRange::full(), None).unwrap(), 0);
    }

    #[test]
    fn test_sqlite_prune() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .put_rows(Component::Fim, [("a", Some("1")), ("b", Some("2"))])
            .unwrap();
        assert_eq!(prune(&store, Component::Fim, &KeyRange::full(), Some("b")).unwrap(), 1);
        assert_eq!(store.keys(Component::Fim, &KeyRange::full()).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let err = prune(&BrokenStore, Component::Fim, &KeyRange::full(), None).unwrap_err();
        assert!(matches!(err, SyncError::StorageUnavailable(_)));
    }
}
