//! B-tree operation statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked by a [`BTree`](super::BTree).
///
/// Fields are atomic so read-only operations such as `search` can record
/// through `&self`. We use `Ordering::Relaxed` throughout: the counters are
/// independent of each other and only need atomicity, not synchronization.
///
/// Node-level deletion takes a `&TreeStats` so borrows and merges are
/// counted where they happen.
///
/// # Example
/// ```
/// use btree_index::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().splits, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Number of tree-level `search` calls.
    pub searches: AtomicU64,

    /// Number of keys actually inserted.
    pub inserts: AtomicU64,

    /// Number of inserts ignored because the key was already present.
    pub duplicate_inserts: AtomicU64,

    /// Number of keys actually removed.
    pub deletes: AtomicU64,

    /// Number of deletes ignored because the key was absent.
    pub absent_deletes: AtomicU64,

    /// Number of node splits, root splits included.
    pub splits: AtomicU64,

    /// Number of splits that grew the tree by one level.
    pub root_splits: AtomicU64,

    /// Number of rotations through a parent (borrow from either sibling).
    pub borrows: AtomicU64,

    /// Number of sibling merges.
    pub merges: AtomicU64,

    /// Number of times an empty internal root was replaced by its child.
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            searches: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            duplicate_inserts: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            absent_deletes: AtomicU64::new(0),
            splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            borrows: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging/comparison.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicate_inserts: self.duplicate_inserts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            absent_deletes: self.absent_deletes.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            borrows: self.borrows.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.searches.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.duplicate_inserts.store(0, Ordering::Relaxed);
        self.deletes.store(0, Ordering::Relaxed);
        self.absent_deletes.store(0, Ordering::Relaxed);
        self.splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.borrows.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.root_collapses.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of tree statistics.
///
/// Unlike `TreeStats`, this is plain data and can be compared and printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub searches: u64,
    pub inserts: u64,
    pub duplicate_inserts: u64,
    pub deletes: u64,
    pub absent_deletes: u64,
    pub splits: u64,
    pub root_splits: u64,
    pub borrows: u64,
    pub merges: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Structural rebalancing events during deletion (borrows + merges).
    pub fn rebalances(&self) -> u64 {
        self.borrows + self.merges
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, deletes: {}, splits: {}, borrows: {}, merges: {}, height changes: +{}/-{} }}",
            self.inserts,
            self.deletes,
            self.splits,
            self.borrows,
            self.merges,
            self.root_splits,
            self.root_collapses
        )
    }
}
