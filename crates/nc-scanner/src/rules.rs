//! Directory classification rules.
//!
//! [`SkipRules`] decides, from a directory's base name alone, whether the
//! walker should record it as a deletion target, prune it, or descend into it.

/// Name of the directories this tool removes.
pub const TARGET_DIR_NAME: &str = "node_modules";

/// Directory names that are never descended into.
///
/// Version control internals and operating system directories.
pub const SYSTEM_DIRECTORIES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "System Volume Information",
    "$RECYCLE.BIN",
    ".DS_Store",
    ".Trash",
    "proc",
    "sys",
    "dev",
    "Windows",
    "Program Files",
    "Program Files (x86)",
];

/// Hidden directories that are still descended into (package manager caches).
pub const ALLOWED_HIDDEN_DIRECTORIES: &[&str] = &[".npm", ".yarn", ".pnpm"];

/// What the walker should do with a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirVerdict {
    /// Record as a deletion target and do not descend.
    Target,
    /// Do not descend.
    Prune,
    /// Descend normally.
    Descend,
}

/// Pure name-based rules for the directory walk.
///
/// # Examples
///
/// ```
/// use nc_scanner::{DirVerdict, SkipRules};
///
/// let rules = SkipRules::new().with_extra_skips(&["vendor"]);
/// assert_eq!(rules.classify("node_modules"), DirVerdict::Target);
/// assert_eq!(rules.classify(".git"), DirVerdict::Prune);
/// assert_eq!(rules.classify("vendor"), DirVerdict::Prune);
/// assert_eq!(rules.classify(".pnpm"), DirVerdict::Descend);
/// assert_eq!(rules.classify("src"), DirVerdict::Descend);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    /// Directory names pruned in addition to [`SYSTEM_DIRECTORIES`].
    extra_skips: Vec<String>,
}

impl SkipRules {
    /// Creates rules with only the built-in deny and allow lists.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds directory names to prune.
    #[must_use]
    pub fn with_extra_skips<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.extra_skips
            .extend(names.iter().map(|name| name.as_ref().to_owned()));
        self
    }

    /// Returns `true` if `name` is exactly [`TARGET_DIR_NAME`].
    #[inline]
    #[must_use]
    pub fn is_target(name: &str) -> bool {
        name == TARGET_DIR_NAME
    }

    /// Returns `true` if the walker must not descend into `name`.
    ///
    /// Denied names and hidden names (leading `.`) are pruned, except the
    /// package manager caches in [`ALLOWED_HIDDEN_DIRECTORIES`].
    #[must_use]
    pub fn should_prune(&self, name: &str) -> bool {
        if SYSTEM_DIRECTORIES.contains(&name) || self.extra_skips.iter().any(|s| s == name) {
            return true;
        }

        name.starts_with('.') && !ALLOWED_HIDDEN_DIRECTORIES.contains(&name)
    }

    /// Classifies a directory by name. Targets win over pruning.
    #[must_use]
    pub fn classify(&self, name: &str) -> DirVerdict {
        if Self::is_target(name) {
            DirVerdict::Target
        } else if self.should_prune(name) {
            DirVerdict::Prune
        } else {
            DirVerdict::Descend
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_target_exact_match() {
        assert!(SkipRules::is_target("node_modules"));
        assert!(!SkipRules::is_target("Node_Modules"));
        assert!(!SkipRules::is_target("NODE_MODULES"));
        assert!(!SkipRules::is_target("node_modules_old"));
        assert!(!SkipRules::is_target(".node_modules"));
        assert!(!SkipRules::is_target(""));
    }

    #[test]
    fn test_should_prune_system_directories() {
        let rules = SkipRules::new();
        for name in SYSTEM_DIRECTORIES {
            assert!(rules.should_prune(name), "{name} should be pruned");
        }
    }

    #[test]
    fn test_should_prune_hidden() {
        let rules = SkipRules::new();
        assert!(rules.should_prune(".cache"));
        assert!(rules.should_prune(".vscode"));
        assert!(rules.should_prune(".next"));
        assert!(rules.should_prune("."));
    }

    #[test]
    fn test_allowed_hidden_are_descended() {
        let rules = SkipRules::new();
        for name in ALLOWED_HIDDEN_DIRECTORIES {
            assert!(!rules.should_prune(name), "{name} should be descended");
        }
    }

    #[test]
    fn test_regular_names_not_pruned() {
        let rules = SkipRules::new();
        assert!(!rules.should_prune("src"));
        assert!(!rules.should_prune("projects"));
        assert!(!rules.should_prune("windows"));
        assert!(!rules.should_prune("Program"));
        assert!(!rules.should_prune(""));
    }

    #[test]
    fn test_extra_skips() {
        let rules = SkipRules::new().with_extra_skips(&["vendor", "third_party"]);
        assert!(rules.should_prune("vendor"));
        assert!(rules.should_prune("third_party"));
        assert!(!rules.should_prune("vendors"));
    }

    #[test]
    fn test_classify_target_before_prune() {
        let rules = SkipRules::new().with_extra_skips(&["node_modules"]);
        assert_eq!(rules.classify("node_modules"), DirVerdict::Target);
        assert_eq!(rules.classify(".git"), DirVerdict::Prune);
        assert_eq!(rules.classify(".yarn"), DirVerdict::Descend);
        assert_eq!(rules.classify("packages"), DirVerdict::Descend);
    }
}
