//! Scan statistics shared between the walker and the deletion workers.
//!
//! This module provides [`ScanStats`] for accumulating counts during a run
//! and [`StatsSnapshot`] for the point-in-time view handed to reporting.
//!
//! # Thread Safety
//!
//! All counters live behind a single [`parking_lot::Mutex`]. Every increment
//! takes the lock once, and [`ScanStats::snapshot`] reads all fields under one
//! acquisition, so a snapshot never mixes values from different moments.
//!
//! # Examples
//!
//! ```
//! use nc_scanner::ScanStats;
//!
//! let stats = ScanStats::new();
//!
//! stats.increment_scanned();
//! stats.increment_found();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.counts(), (1, 1, 0, 0));
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Lock-protected counters for one scan.
///
/// Created empty at the start of a run and never reset; use a fresh
/// instance per run.
#[derive(Debug, Default)]
pub struct ScanStats {
    counts: Mutex<StatsSnapshot>,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the directories-scanned counter.
    #[inline]
    pub fn increment_scanned(&self) {
        self.counts.lock().scanned += 1;
    }

    /// Increments the targets-found counter.
    #[inline]
    pub fn increment_found(&self) {
        self.counts.lock().found += 1;
    }

    /// Increments the targets-deleted counter.
    #[inline]
    pub fn increment_deleted(&self) {
        self.counts.lock().deleted += 1;
    }

    /// Increments the error counter.
    #[inline]
    pub fn increment_errors(&self) {
        self.counts.lock().errors += 1;
    }

    /// Records a target whose removal failed.
    ///
    /// Bumps `errors` and `failed` under the same lock, so walk errors stay
    /// distinguishable from deletion errors.
    #[inline]
    pub fn record_failed(&self) {
        let mut counts = self.counts.lock();
        counts.errors += 1;
        counts.failed += 1;
    }

    /// Records a successful deletion that freed `bytes`.
    ///
    /// Bumps `deleted` and `reclaimed_bytes` under the same lock.
    #[inline]
    pub fn record_deleted(&self, bytes: u64) {
        let mut counts = self.counts.lock();
        counts.deleted += 1;
        counts.reclaimed_bytes = counts.reclaimed_bytes.saturating_add(bytes);
    }

    /// Returns a consistent copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.counts.lock()
    }
}

/// A point-in-time copy of [`ScanStats`].
///
/// Safe to store, serialize, and send between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Directories visited by the walker, including the root and every target.
    pub scanned: u64,
    /// `node_modules` directories discovered.
    pub found: u64,
    /// Targets removed (or that would be removed, in a dry run).
    pub deleted: u64,
    /// Walk and deletion failures.
    pub errors: u64,
    /// Targets whose removal failed; a subset of `errors`.
    pub failed: u64,
    /// Bytes freed by real deletions.
    pub reclaimed_bytes: u64,
}

impl StatsSnapshot {
    /// Returns `(scanned, found, deleted, errors)`.
    #[inline]
    #[must_use]
    pub const fn counts(&self) -> (u64, u64, u64, u64) {
        (self.scanned, self.found, self.deleted, self.errors)
    }

    /// Returns `true` if any walk or deletion step failed.
    #[inline]
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Returns how many targets were processed, successfully or not.
    #[inline]
    #[must_use]
    pub const fn attempted(&self) -> u64 {
        self.deleted.saturating_add(self.failed)
    }

    /// Returns how many discovered targets were never processed.
    ///
    /// Only nonzero after a cancelled run.
    ///
    /// # Examples
    ///
    /// ```
    /// use nc_scanner::StatsSnapshot;
    ///
    /// let snap = StatsSnapshot { found: 5, deleted: 2, errors: 1, failed: 1, ..Default::default() };
    /// assert_eq!(snap.remaining(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.found.saturating_sub(self.attempted())
    }
}
