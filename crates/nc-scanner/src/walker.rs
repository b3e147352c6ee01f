//! Directory traversal for `node_modules` discovery.
//!
//! This module provides [`DirectoryWalker`], which uses the `ignore` crate to
//! walk a tree once, asking [`SkipRules`] about every directory it reaches.
//!
//! # Features
//!
//! - Single walker thread; deletion is parallelized later
//! - Stops descending at targets and at pruned directories
//! - No `.gitignore` or hidden-file filtering: [`SkipRules`] alone decides
//! - The root is followed if it is a symbolic link; links below it are not
//! - Per-entry errors are counted and logged, never fatal
//!
//! # Examples
//!
//! ```ignore
//! use nc_scanner::{CancelToken, DirectoryWalker, ScanStats, SkipRules};
//! use camino::Utf8Path;
//!
//! let stats = ScanStats::new();
//! let walker = DirectoryWalker::new(Utf8Path::new("/projects"), SkipRules::new(), CancelToken::new());
//! let targets = walker.collect_targets(&stats)?;
//!
//! for path in &targets {
//!     println!("Found: {path}");
//! }
//! ```

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::{DirEntry, WalkBuilder, WalkState};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::ScanError;
use crate::rules::{DirVerdict, SkipRules};
use crate::stats::ScanStats;

/// A walker that collects `node_modules` directories under a root.
///
/// # Counting
///
/// Every directory the walker reaches is counted as scanned exactly once:
/// the root, ordinary directories, pruned directories, and targets. Targets
/// are additionally counted as found. Nothing below a target or a pruned
/// directory is ever reached.
#[derive(Debug)]
pub struct DirectoryWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Name-based classification rules.
    rules: SkipRules,
    /// Stops the walk early when cancelled.
    cancel: CancelToken,
}

impl DirectoryWalker {
    /// Creates a walker for the given root directory.
    #[must_use]
    pub fn new(root: &Utf8Path, rules: SkipRules, cancel: CancelToken) -> Self {
        Self {
            root: root.to_owned(),
            rules,
            cancel,
        }
    }

    /// Walks the tree and returns every target in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RootUnreadable`] if the root cannot be listed.
    /// Every other failure is logged and added to `stats.errors`.
    pub fn collect_targets(&self, stats: &ScanStats) -> Result<Vec<Utf8PathBuf>, ScanError> {
        fs::read_dir(self.root.as_std_path()).map_err(|e| ScanError::root(&self.root, e))?;

        let found = Mutex::new(Vec::new());
        let targets = &found;

        self.build_walker()
            .run(move || Box::new(move |result| self.visit(result, stats, targets)));

        Ok(found.into_inner())
    }

    /// Builds the walker: one thread, no filters, no symlinks.
    fn build_walker(&self) -> ignore::WalkParallel {
        WalkBuilder::new(&self.root)
            // Disable .gitignore, .ignore and hidden filtering
            .standard_filters(false)
            .follow_links(false)
            // Use a single thread for walking (we parallelize deletion later)
            .threads(1)
            .build_parallel()
    }

    /// Handles one walk result and tells the walker whether to descend.
    fn visit(
        &self,
        result: Result<DirEntry, ignore::Error>,
        stats: &ScanStats,
        targets: &Mutex<Vec<Utf8PathBuf>>,
    ) -> WalkState {
        if self.cancel.is_cancelled() {
            return WalkState::Quit;
        }

        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let err = ScanError::from(err);
                warn!(error = %err, "Error accessing path");
                stats.increment_errors();
                return WalkState::Continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return WalkState::Continue;
        }

        stats.increment_scanned();

        let verdict = self.rules.classify(&entry.file_name().to_string_lossy());
        match verdict {
            DirVerdict::Descend => WalkState::Continue,
            DirVerdict::Prune => {
                debug!(path = %entry.path().display(), "Skipping directory");
                WalkState::Skip
            }
            DirVerdict::Target => {
                Self::record_target(entry, stats, targets);
                WalkState::Skip
            }
        }
    }

    fn record_target(entry: DirEntry, stats: &ScanStats, targets: &Mutex<Vec<Utf8PathBuf>>) {
        match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => {
                info!(path = %path, "Found node_modules");
                stats.increment_found();
                targets.lock().push(path);
            }
            Err(path) => {
                let err = ScanError::NonUtf8Path(path);
                warn!(error = %err, "Skipping target");
                stats.increment_errors();
            }
        }
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}
