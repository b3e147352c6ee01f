//! Bounded parallel deletion of discovered targets.
//!
//! This module provides [`DeletionDispatcher`], which fans a list of targets
//! out to a fixed number of worker threads and returns once all of them have
//! finished.
//!
//! # Design
//!
//! 1. Every target is queued on a bounded `crossbeam-channel` sized to the
//!    list, then the sender is dropped so the queue drains to disconnection
//! 2. A dedicated rayon pool of [`effective_workers`] threads is built
//! 3. `ThreadPool::scope` spawns one loop per worker; the scope is the join
//!    point, so no target is touched after [`DeletionDispatcher::dispatch`]
//!    returns
//!
//! Each target is pulled by exactly one worker. Failures are counted and
//! logged and never stop the other workers.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use crossbeam_channel::Receiver;
use humansize::{BINARY, format_size};
use tracing::{debug, error, info, warn};

use crate::cancel::CancelToken;
use crate::error::ScanError;
use crate::size;
use crate::stats::ScanStats;

/// Returns how many workers to start for `targets` targets.
///
/// Never more workers than targets; zero only when there is nothing to do.
///
/// # Examples
///
/// ```
/// use nc_scanner::effective_workers;
///
/// assert_eq!(effective_workers(4, 2), 2);
/// assert_eq!(effective_workers(4, 10), 4);
/// assert_eq!(effective_workers(4, 0), 0);
/// ```
#[inline]
#[must_use]
pub fn effective_workers(workers: usize, targets: usize) -> usize {
    workers.min(targets)
}

/// Deletes (or, in a dry run, reports) targets with a bounded worker pool.
#[derive(Debug, Clone)]
pub struct DeletionDispatcher {
    /// Upper bound on concurrent deletions.
    workers: usize,
    /// Report instead of deleting.
    dry_run: bool,
    /// Checked before each target is pulled.
    cancel: CancelToken,
}

impl DeletionDispatcher {
    /// Creates a dispatcher with at most `workers` concurrent deletions.
    #[must_use]
    pub fn new(workers: usize, dry_run: bool, cancel: CancelToken) -> Self {
        Self {
            workers,
            dry_run,
            cancel,
        }
    }

    /// Processes every target and blocks until all workers have exited.
    ///
    /// Each target ends up counted as exactly one of deleted or error,
    /// unless the run is cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::WorkerPool`] if the worker threads cannot be
    /// started. Per-target failures are recorded in `stats` instead.
    pub fn dispatch(&self, targets: &[Utf8PathBuf], stats: &ScanStats) -> Result<(), ScanError> {
        let workers = effective_workers(self.workers, targets.len());
        if workers == 0 {
            debug!("No targets to delete");
            return Ok(());
        }

        let (tx, rx) = crossbeam_channel::bounded(targets.len());
        for target in targets {
            // Capacity equals the target count, so this never blocks.
            if tx.send(target.as_path()).is_err() {
                break;
            }
        }
        drop(tx);

        info!(
            workers,
            targets = targets.len(),
            dry_run = self.dry_run,
            "Starting deletion workers"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("nc-delete-{i}"))
            .build()?;

        pool.scope(|scope| {
            for id in 0..workers {
                let queue = rx.clone();
                scope.spawn(move |_| self.run_worker(id, &queue, stats));
            }
        });

        Ok(())
    }

    fn run_worker(&self, id: usize, queue: &Receiver<&Utf8Path>, stats: &ScanStats) {
        debug!(worker = id, "Worker started");

        while !self.cancel.is_cancelled() {
            let Ok(path) = queue.recv() else {
                break;
            };
            self.process(id, path, stats);
        }

        debug!(worker = id, "Worker finished");
    }

    fn process(&self, id: usize, path: &Utf8Path, stats: &ScanStats) {
        if self.dry_run {
            info!(worker = id, path = %path, "Would delete");
            stats.increment_deleted();
            return;
        }

        let bytes = match size::dir_size(path) {
            Ok(bytes) => {
                info!(
                    worker = id,
                    path = %path,
                    size = %format_size(bytes, BINARY),
                    "Deleting"
                );
                bytes
            }
            Err(e) => {
                warn!(worker = id, error = %e, "Deleting without size");
                0
            }
        };

        match fs::remove_dir_all(path) {
            Ok(()) => {
                info!(worker = id, path = %path, "Deleted");
                stats.record_deleted(bytes);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(worker = id, path = %path, "Already removed");
                stats.increment_deleted();
            }
            Err(e) => {
                let err = ScanError::remove(path, e);
                error!(worker = id, error = %err, "Delete failed");
                stats.record_failed();
            }
        }
    }

    /// Returns the configured worker bound.
    #[inline]
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Returns `true` if targets are only reported.
    #[inline]
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_targets(root: &Utf8Path, count: usize) -> Vec<Utf8PathBuf> {
        (0..count)
            .map(|i| {
                let target = root.join(format!("p{i}/node_modules"));
                fs::create_dir_all(target.join("pkg")).unwrap();
                fs::write(target.join("pkg/index.js"), vec![0u8; 10]).unwrap();
                target
            })
            .collect()
    }

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_effective_workers() {
        assert_eq!(effective_workers(1, 1), 1);
        assert_eq!(effective_workers(8, 3), 3);
        assert_eq!(effective_workers(3, 8), 3);
        assert_eq!(effective_workers(8, 0), 0);
    }

    #[test]
    fn test_dispatch_empty_is_noop() {
        let stats = ScanStats::new();
        let dispatcher = DeletionDispatcher::new(4, false, CancelToken::new());

        dispatcher.dispatch(&[], &stats).unwrap();

        assert_eq!(stats.snapshot().counts(), (0, 0, 0, 0));
    }

    #[test]
    fn test_dispatch_deletes_everything() {
        let (_guard, root) = temp_root();
        let targets = make_targets(&root, 6);
        let stats = ScanStats::new();

        DeletionDispatcher::new(3, false, CancelToken::new())
            .dispatch(&targets, &stats)
            .unwrap();

        for target in &targets {
            assert!(!target.exists(), "{target} should be gone");
            assert!(target.parent().unwrap().exists());
        }
        let snap = stats.snapshot();
        assert_eq!(snap.deleted, 6);
        assert_eq!(snap.errors, 0);
        assert_eq!(snap.reclaimed_bytes, 60);
    }

    #[test]
    fn test_dry_run_leaves_tree_untouched() {
        let (_guard, root) = temp_root();
        let targets = make_targets(&root, 3);
        let stats = ScanStats::new();

        let dispatcher = DeletionDispatcher::new(8, true, CancelToken::new());
        assert!(dispatcher.is_dry_run());
        dispatcher.dispatch(&targets, &stats).unwrap();

        for target in &targets {
            assert!(target.join("pkg/index.js").exists());
        }
        let snap = stats.snapshot();
        assert_eq!(snap.deleted, 3);
        assert_eq!(snap.reclaimed_bytes, 0);
    }

    #[test]
    fn test_failure_is_counted_and_others_continue() {
        let (_guard, root) = temp_root();
        let mut targets = make_targets(&root, 2);
        let bogus = root.join("not-a-dir");
        fs::write(&bogus, "file").unwrap();
        targets.insert(1, bogus.clone());
        let stats = ScanStats::new();

        DeletionDispatcher::new(2, false, CancelToken::new())
            .dispatch(&targets, &stats)
            .unwrap();

        assert!(bogus.exists());
        let snap = stats.snapshot();
        assert_eq!(snap.deleted, 2);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.remaining(), 0);
    }

    #[test]
    fn test_vanished_target_counts_as_deleted() {
        let (_guard, root) = temp_root();
        let targets = vec![root.join("gone/node_modules")];
        let stats = ScanStats::new();

        DeletionDispatcher::new(1, false, CancelToken::new())
            .dispatch(&targets, &stats)
            .unwrap();

        assert_eq!(stats.snapshot().deleted, 1);
        assert_eq!(stats.snapshot().errors, 0);
    }

    #[test]
    fn test_cancelled_dispatch_deletes_nothing() {
        let (_guard, root) = temp_root();
        let targets = make_targets(&root, 4);
        let cancel = CancelToken::new();
        cancel.cancel();
        let stats = ScanStats::new();

        DeletionDispatcher::new(2, false, cancel)
            .dispatch(&targets, &stats)
            .unwrap();

        assert!(targets.iter().all(|t| t.exists()));
        assert_eq!(stats.snapshot().deleted, 0);
    }
}
