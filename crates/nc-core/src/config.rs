//! Configuration structures for node-cleaner.
//!
//! This module provides the two configuration layers of the application:
//!
//! - [`ScanConfiguration`] - The validated input of a single scan (root path,
//!   worker count, dry-run flag). Immutable once constructed.
//! - [`Settings`] - Optional defaults read from a JSON settings file. Every
//!   field is optional so a partial file is valid.
//!
//! Command-line flags are layered on top of [`Settings`] by the binary before
//! a [`ScanConfiguration`] is built.

use std::fs;
use std::io;
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Validated configuration for one scan.
///
/// The root path is always absolute and known to be an existing directory at
/// construction time, and the worker count is always at least one.
///
/// # Examples
///
/// ```no_run
/// use nc_core::ScanConfiguration;
/// use camino::Utf8Path;
///
/// let config = ScanConfiguration::new(Utf8Path::new("."), 4, true)?
///     .with_skip_dirs(["vendor"]);
/// assert!(config.root_path().is_absolute());
/// assert_eq!(config.worker_count(), 4);
/// # Ok::<(), nc_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfiguration {
    /// Absolute root directory to scan.
    root_path: Utf8PathBuf,
    /// Upper bound on concurrent deletion workers.
    worker_count: NonZeroUsize,
    /// Whether deletions are only simulated.
    dry_run: bool,
    /// Extra directory names pruned from traversal.
    skip_dirs: Vec<String>,
}

impl ScanConfiguration {
    /// Creates a validated scan configuration.
    ///
    /// Relative roots are made absolute against the current directory.
    /// Symbolic links in the root are not resolved.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidOption`] if `worker_count` is zero
    /// - [`ConfigError::MissingDirectory`] if the root does not exist
    /// - [`ConfigError::NotADirectory`] if the root is not a directory
    /// - [`ConfigError::InvalidPath`] if the absolute root is not valid UTF-8
    /// - [`ConfigError::Io`] if the root cannot be inspected
    pub fn new(root: &Utf8Path, worker_count: usize, dry_run: bool) -> Result<Self, ConfigError> {
        let worker_count = NonZeroUsize::new(worker_count)
            .ok_or_else(|| ConfigError::invalid_option("workers", "must be at least 1"))?;

        let root_path = absolute_root(root)?;

        match fs::metadata(root_path.as_std_path()) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ConfigError::NotADirectory(root_path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::MissingDirectory(root_path));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        }

        Ok(Self {
            root_path,
            worker_count,
            dry_run,
            skip_dirs: Vec::new(),
        })
    }

    /// Adds directory names to prune in addition to the built-in deny-list.
    #[must_use]
    pub fn with_skip_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Returns the absolute root directory.
    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Utf8Path {
        &self.root_path
    }

    /// Returns the configured number of deletion workers.
    #[inline]
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count.get()
    }

    /// Returns `true` if deletions are only simulated.
    #[inline]
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the extra directory names to prune.
    #[inline]
    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }
}

fn absolute_root(root: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    if root.as_str().is_empty() {
        return Err(ConfigError::InvalidPath {
            path: root.to_owned(),
            reason: "path is empty".to_owned(),
        });
    }

    let absolute = std::path::absolute(root.as_std_path())?;
    Utf8PathBuf::from_path_buf(absolute).map_err(|path| ConfigError::InvalidPath {
        path: Utf8PathBuf::from(path.to_string_lossy().into_owned()),
        reason: "absolute path is not valid UTF-8".to_owned(),
    })
}

/// Defaults loaded from a JSON settings file.
///
/// Missing fields fall back to their defaults, so `{}` is a valid file.
///
/// # Examples
///
/// ```
/// use nc_core::Settings;
///
/// let settings = Settings::from_json(r#"{"workers": 8, "skip_dirs": ["vendor"]}"#)?;
/// assert_eq!(settings.workers, Some(8));
/// assert!(!settings.dry_run);
/// assert!(settings.notify);
/// # Ok::<(), nc_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of deletion workers. `None` means one per CPU core.
    pub workers: Option<usize>,

    /// Only report what would be deleted.
    pub dry_run: bool,

    /// Extra directory names to prune during the walk.
    pub skip_dirs: Vec<String>,

    /// Show the completion notification.
    pub notify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: None,
            dry_run: false,
            skip_dirs: Vec::new(),
            notify: true,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON string and validates them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file and validates them.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_std_path())?;
        Self::from_json(&contents)
    }

    /// Checks option values that the type system cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::invalid_option("workers", "must be at least 1"));
        }
        if self.skip_dirs.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_option(
                "skip_dirs",
                "directory names must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_scan_configuration_valid() {
        let (_guard, root) = utf8_temp_dir();
        let config = ScanConfiguration::new(&root, 3, true).unwrap();

        assert_eq!(config.root_path(), root.as_path());
        assert_eq!(config.worker_count(), 3);
        assert!(config.dry_run());
        assert!(config.skip_dirs().is_empty());
    }

    #[test]
    fn test_scan_configuration_relative_root_made_absolute() {
        let config = ScanConfiguration::new(Utf8Path::new("."), 1, false).unwrap();
        assert!(config.root_path().is_absolute());
    }

    #[test]
    fn test_scan_configuration_zero_workers() {
        let (_guard, root) = utf8_temp_dir();
        let err = ScanConfiguration::new(&root, 0, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref option, .. } if option == "workers"));
    }

    #[test]
    fn test_scan_configuration_missing_root() {
        let err = ScanConfiguration::new(Utf8Path::new("/nonexistent/path/for/sure"), 2, false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory(_)));
    }

    #[test]
    fn test_scan_configuration_root_is_file() {
        let (_guard, root) = utf8_temp_dir();
        let file = root.join("package.json");
        fs::write(&file, "{}").unwrap();

        let err = ScanConfiguration::new(&file, 2, false).unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_configuration_empty_root() {
        let err = ScanConfiguration::new(Utf8Path::new(""), 2, false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
    }

    #[test]
    fn test_scan_configuration_with_skip_dirs() {
        let (_guard, root) = utf8_temp_dir();
        let config = ScanConfiguration::new(&root, 1, false)
            .unwrap()
            .with_skip_dirs(["vendor", "third_party"]);
        assert_eq!(config.skip_dirs(), ["vendor", "third_party"]);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.workers, None);
        assert!(!settings.dry_run);
        assert!(settings.skip_dirs.is_empty());
        assert!(settings.notify);
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"dry_run": true}"#).unwrap();
        assert!(settings.dry_run);
        assert_eq!(settings.workers, None);
        assert!(settings.notify);
    }

    #[test]
    fn test_settings_snapshot() {
        let settings = Settings::from_json(
            r#"{"workers": 8, "dry_run": true, "skip_dirs": ["vendor"], "notify": false}"#,
        )
        .unwrap();

        insta::assert_json_snapshot!(settings, @r###"
        {
          "workers": 8,
          "dry_run": true,
          "skip_dirs": [
            "vendor"
          ],
          "notify": false
        }
        "###);
    }

    #[test]
    fn test_settings_rejects_zero_workers() {
        let err = Settings::from_json(r#"{"workers": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn test_settings_rejects_empty_skip_dir() {
        let err = Settings::from_json(r#"{"skip_dirs": [""]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn test_settings_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_settings_from_file() {
        let (_guard, root) = utf8_temp_dir();
        let path = root.join("node-cleaner.json");
        fs::write(&path, r#"{"workers": 2}"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.workers, Some(2));

        let missing = Settings::from_file(&root.join("absent.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
