//! Error types for the nc-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while walking the tree and deleting targets.

use camino::Utf8PathBuf;
use nc_core::ConfigError;

/// Errors that can occur during scanning and deletion.
///
/// # Error Recovery Strategy
///
/// - **Root errors** ([`ScanError::RootUnreadable`]): Fatal - the scan cannot start
/// - **Worker pool errors** ([`ScanError::WorkerPool`]): Fatal - nothing can be deleted
/// - **Walk errors** ([`ScanError::Walk`]): Log warning, count, continue walking
/// - **Size errors** ([`ScanError::Size`]): Log warning, delete anyway
/// - **Remove errors** ([`ScanError::Remove`]): Log error, count, move to next target
///
/// # Examples
///
/// ```
/// use nc_scanner::ScanError;
///
/// fn describe(err: &ScanError) -> &'static str {
///     if err.is_fatal() { "aborted" } else { "counted and skipped" }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The root directory could not be opened or listed.
    #[error("cannot read root directory {path}: {source}")]
    RootUnreadable {
        /// The root path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A single entry could not be accessed during the walk.
    #[error("failed to walk entry: {0}")]
    Walk(#[from] ignore::Error),

    /// The size of a target subtree could not be computed.
    #[error("failed to compute size of {path}: {source}")]
    Size {
        /// The target whose size was requested.
        path: Utf8PathBuf,
        /// The underlying walk error.
        #[source]
        source: ignore::Error,
    },

    /// A target subtree could not be removed.
    #[error("failed to delete {path}: {source}")]
    Remove {
        /// The target that could not be removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A discovered path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The deletion thread pool could not be created.
    #[error("failed to start deletion workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid scan configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ScanError {
    /// Creates a new [`ScanError::RootUnreadable`] error.
    #[inline]
    pub fn root(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::RootUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Size`] error.
    #[inline]
    pub fn size(path: impl Into<Utf8PathBuf>, source: ignore::Error) -> Self {
        Self::Size {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Remove`] error.
    #[inline]
    pub fn remove(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Remove {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error is recoverable (the scan can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Walk(_) | Self::Size { .. } | Self::Remove { .. } | Self::NonUtf8Path(_)
        )
    }

    /// Returns `true` if this error is fatal (the scan should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::RootUnreadable { path, .. } | Self::Size { path, .. } | Self::Remove { path, .. } => {
                Some(path)
            }
            Self::Walk(_) | Self::NonUtf8Path(_) | Self::WorkerPool(_) | Self::Config(_) => None,
        }
    }
}
