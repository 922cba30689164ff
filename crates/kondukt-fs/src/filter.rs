//! File filters applied during directory scans.

use kondukt_core::{Error, RemotePath, Result};

/// Decides whether a scanned path is kept.
///
/// Filters see directories too, so a filter can prune whole subtrees
/// (walks skip directories that no filter accepts).
pub trait FileFilter: Send + Sync {
    /// Returns `true` if the path passes the filter.
    fn matches(&self, path: &RemotePath, is_dir: bool) -> bool;

    /// Human-readable description used in logs.
    fn describe(&self) -> String;
}

/// Keeps files whose name matches a glob pattern.
///
/// Directories always pass: the pattern constrains files, not the tree
/// structure above them.
pub struct GlobFilter {
    pattern: glob::Pattern,
}

impl GlobFilter {
    /// Compiles a glob pattern, e.g. `*.csv`.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| Error::validation_field("glob", format!("invalid pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl FileFilter for GlobFilter {
    fn matches(&self, path: &RemotePath, is_dir: bool) -> bool {
        if is_dir {
            return true;
        }
        path.file_name()
            .map(|name| self.pattern.matches(name))
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("glob = '{}'", self.pattern)
    }
}

/// Drops everything under the given directories.
pub struct ExcludeDirFilter {
    dirs: Vec<RemotePath>,
}

impl ExcludeDirFilter {
    /// Creates a filter excluding the given directories and their content.
    pub fn new<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = RemotePath>,
    {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }
}

impl FileFilter for ExcludeDirFilter {
    fn matches(&self, path: &RemotePath, _is_dir: bool) -> bool {
        !self.dirs.iter().any(|dir| path.starts_with(dir))
    }

    fn describe(&self) -> String {
        let dirs = self
            .dirs
            .iter()
            .map(|dir| format!("'{dir}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("exclude_dirs = [{dirs}]")
    }
}

/// Returns `true` if the path passes every filter.
pub fn match_all_filters(filters: &[Box<dyn FileFilter>], path: &RemotePath, is_dir: bool) -> bool {
    filters.iter().all(|filter| filter.matches(path, is_dir))
}
