//! Range checksum aggregation.
//!
//! Two peers agree on a range when folding the per-row checksums of that
//! range, in ascending key order, through one SHA-1 context yields the same
//! digest on both sides.

use tracing::warn;

use rangesync_core::{Classification, Component, Digest, DigestContext, KeyRange};
use rangesync_store::{ChecksumRow, RowStore};

use crate::error::Result;

/// Outcome of aggregating one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChecksum {
    /// No rows matched the range.
    Empty,
    /// At least one row matched.
    Rows {
        /// Aggregate over every row checksum, in key order.
        digest: Digest,
        /// Rows visited.
        rows: usize,
        /// Rows whose checksum field was NULL and contributed nothing.
        missing: usize,
    },
}

impl RangeChecksum {
    /// The aggregate digest; [`Digest::EMPTY`] for an empty range.
    pub fn digest(&self) -> Digest {
        match self {
            RangeChecksum::Empty => Digest::EMPTY,
            RangeChecksum::Rows { digest, .. } => *digest,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RangeChecksum::Empty)
    }

    /// Classify against the digest a peer claims for the same range.
    pub fn classify(&self, claimed: &str) -> Classification {
        match self {
            RangeChecksum::Empty => Classification::Empty,
            RangeChecksum::Rows { digest, .. } if digest.matches(claimed) => Classification::Match,
            RangeChecksum::Rows { .. } => Classification::Mismatch,
        }
    }
}

/// Aggregate the checksums of every row of `component` inside `range`.
pub fn aggregate<S: RowStore + ?Sized>(
    store: &S,
    component: Component,
    range: &KeyRange,
) -> Result<RangeChecksum> {
    let mut ctx = DigestContext::new();
    let mut missing = 0;
    let rows = store.scan_range(component, range, &mut |row| {
        fold_row(&mut ctx, &mut missing, component, row)
    })?;

    if rows == 0 {
        return Ok(RangeChecksum::Empty);
    }

    Ok(RangeChecksum::Rows {
        digest: ctx.finalize(),
        rows,
        missing,
    })
}

fn fold_row(ctx: &mut DigestContext, missing: &mut usize, component: Component, row: ChecksumRow<'_>) {
    match row.checksum {
        Some(checksum) => ctx.update(checksum),
        None => {
            *missing += 1;
            warn!(%component, key = row.key, "component has a row with missing checksum");
        }
    }
}
