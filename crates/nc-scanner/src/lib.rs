//! `node_modules` discovery and bounded parallel deletion.
//!
//! This crate walks a directory tree, collects every `node_modules`
//! directory it finds, and removes them with a fixed-size worker pool.
//!
//! # Overview
//!
//! The main entry point is [`Cleaner`], which combines:
//!
//! - [`SkipRules`]: Name-based target/prune decisions
//! - [`DirectoryWalker`]: Single-threaded traversal with the `ignore` crate
//! - [`DeletionDispatcher`]: Bounded rayon pool fed from a crossbeam queue
//! - [`ScanStats`]: Mutex-guarded counters shared by both phases
//!
//! # Example
//!
//! ```ignore
//! use nc_core::ScanConfiguration;
//! use nc_scanner::run_scan;
//! use camino::Utf8Path;
//!
//! let config = ScanConfiguration::new(Utf8Path::new("."), 4, true)?;
//! let result = run_scan(&config)?;
//!
//! println!("Found {} node_modules", result.stats.found);
//! for target in &result.targets {
//!     println!("Would delete: {target}");
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Cleaner (main entry point)
//!     │
//!     ├── DirectoryWalker (collect targets, one thread)
//!     │       │
//!     │       ├── WalkBuilder (ignore crate, no filters)
//!     │       └── SkipRules (target / prune / descend)
//!     │
//!     ├── DeletionDispatcher (N workers)
//!     │       │
//!     │       ├── crossbeam-channel queue
//!     │       └── rayon ThreadPool::scope (join barrier)
//!     │
//!     └── ScanStats (parking_lot mutex)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod cancel;
mod dispatcher;
mod error;
mod rules;
mod size;
mod stats;
mod walker;

pub use cancel::CancelToken;
pub use dispatcher::{DeletionDispatcher, effective_workers};
pub use error::ScanError;
pub use rules::{
    ALLOWED_HIDDEN_DIRECTORIES, DirVerdict, SYSTEM_DIRECTORIES, SkipRules, TARGET_DIR_NAME,
};
pub use size::dir_size;
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::DirectoryWalker;

use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use nc_core::ScanConfiguration;
use tracing::{info, warn};

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Final statistics snapshot.
    pub stats: StatsSnapshot,
    /// Targets in discovery order.
    pub targets: Vec<Utf8PathBuf>,
    /// Wall-clock time from start to the final snapshot.
    pub elapsed: Duration,
    /// Whether targets were only reported.
    pub dry_run: bool,
    /// Whether the run was cut short by a [`CancelToken`].
    pub cancelled: bool,
}

/// Finds and removes `node_modules` directories under a root.
///
/// # Cloning
///
/// Clones share the same [`CancelToken`], so a clone moved into a signal
/// handler can stop a run in progress.
///
/// # Examples
///
/// ```ignore
/// use nc_core::ScanConfiguration;
/// use nc_scanner::Cleaner;
/// use camino::Utf8Path;
///
/// let config = ScanConfiguration::new(Utf8Path::new("/projects"), 8, false)?;
/// let cleaner = Cleaner::new(config);
///
/// let token = cleaner.cancel_token();
/// ctrlc::set_handler(move || token.cancel())?;
///
/// let result = cleaner.run()?;
/// println!("Deleted {} of {}", result.stats.deleted, result.stats.found);
/// ```
#[derive(Debug, Clone)]
pub struct Cleaner {
    /// Validated run configuration.
    config: ScanConfiguration,
    /// Rules built from the configured skip names.
    rules: SkipRules,
    /// Shared cancellation flag.
    cancel: CancelToken,
}

impl Cleaner {
    /// Creates a cleaner for a validated configuration.
    #[must_use]
    pub fn new(config: ScanConfiguration) -> Self {
        let rules = SkipRules::new().with_extra_skips(config.skip_dirs());
        Self {
            config,
            rules,
            cancel: CancelToken::new(),
        }
    }

    /// Returns a handle that cancels this cleaner's runs.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the configuration this cleaner runs with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// Walks the configured root, then deletes (or reports) every target.
    ///
    /// Statistics start at zero on every call.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RootUnreadable`] if the root cannot be listed and
    /// [`ScanError::WorkerPool`] if the deletion threads cannot start. All
    /// per-directory and per-target failures are counted in the result.
    pub fn run(&self) -> Result<ScanResult, ScanError> {
        let started = Instant::now();
        let root = self.config.root_path();

        info!(
            root = %root,
            workers = self.config.worker_count(),
            dry_run = self.config.dry_run(),
            skip_dirs = ?self.config.skip_dirs(),
            "Starting scan"
        );

        let stats = ScanStats::new();

        let walker = DirectoryWalker::new(root, self.rules.clone(), self.cancel.clone());
        let targets = walker.collect_targets(&stats)?;

        info!(
            found = targets.len(),
            scanned = stats.snapshot().scanned,
            "Scan phase finished"
        );

        let dispatcher = DeletionDispatcher::new(
            self.config.worker_count(),
            self.config.dry_run(),
            self.cancel.clone(),
        );
        dispatcher.dispatch(&targets, &stats)?;

        let snapshot = stats.snapshot();
        let elapsed = started.elapsed();
        let cancelled = self.cancel.is_cancelled();

        if cancelled {
            warn!(
                remaining = snapshot.remaining(),
                "Run cancelled before all targets were processed"
            );
        }

        info!(
            scanned = snapshot.scanned,
            found = snapshot.found,
            deleted = snapshot.deleted,
            errors = snapshot.errors,
            failed = snapshot.failed,
            reclaimed_bytes = snapshot.reclaimed_bytes,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Run completed"
        );

        Ok(ScanResult {
            stats: snapshot,
            targets,
            elapsed,
            dry_run: self.config.dry_run(),
            cancelled,
        })
    }
}

/// Runs one scan-and-delete pass with a fresh [`Cleaner`].
///
/// # Errors
///
/// See [`Cleaner::run`].
pub fn run_scan(config: &ScanConfiguration) -> Result<ScanResult, ScanError> {
    Cleaner::new(config.clone()).run()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn project_tree() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::Builder::new().prefix("nc-lib").tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for path in ["web/node_modules/react", "api/node_modules", "vendor/node_modules"] {
            fs::create_dir_all(root.join(path)).unwrap();
        }
        (dir, root)
    }

    #[test]
    fn test_cleaner_dry_run_reports_targets() {
        let (_guard, root) = project_tree();
        let config = ScanConfiguration::new(&root, 2, true).unwrap();

        let result = Cleaner::new(config).run().unwrap();

        assert!(result.dry_run);
        assert!(!result.cancelled);
        assert_eq!(result.stats.found, 3);
        assert_eq!(result.stats.deleted, 3);
        assert_eq!(result.targets.len(), 3);
        assert!(root.join("web/node_modules/react").exists());
    }

    #[test]
    fn test_cleaner_applies_skip_dirs() {
        let (_guard, root) = project_tree();
        let config = ScanConfiguration::new(&root, 2, false)
            .unwrap()
            .with_skip_dirs(["vendor"]);

        let result = run_scan(&config).unwrap();

        assert_eq!(result.stats.found, 2);
        assert_eq!(result.stats.deleted, 2);
        assert!(!root.join("web/node_modules").exists());
        assert!(root.join("vendor/node_modules").exists());
    }

    #[test]
    fn test_cleaner_cancel_token_is_shared() {
        let (_guard, root) = project_tree();
        let cleaner = Cleaner::new(ScanConfiguration::new(&root, 1, false).unwrap());
        assert_eq!(cleaner.config().root_path(), root.as_path());

        cleaner.cancel_token().cancel();
        let result = cleaner.run().unwrap();

        assert!(result.cancelled);
        assert_eq!(result.stats.deleted, 0);
        assert!(root.join("api/node_modules").exists());
    }

    #[test]
    fn test_run_scan_root_removed_after_validation() {
        let (guard, root) = project_tree();
        let config = ScanConfiguration::new(&root, 1, true).unwrap();
        drop(guard);

        let err = run_scan(&config).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.path().map(Utf8PathBuf::as_path), Some(root.as_path()));
        assert!(!root.exists());
    }
}
