//! File-list high-water marks for incremental directory transfers.

use std::collections::BTreeSet;

use kondukt_core::RemotePath;
use serde::{Deserialize, Serialize};

/// Identifies the directory a file-list mark is tracked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    /// Instance URL of the file connection (e.g. `localfs://`)
    pub instance: String,

    /// Source directory the mark covers
    pub directory: RemotePath,
}

impl FileSource {
    /// Creates a file source.
    pub fn new<I: Into<String>>(instance: I, directory: RemotePath) -> Self {
        Self {
            instance: instance.into(),
            directory,
        }
    }

    /// Returns the store key for this source.
    pub fn qualified_name(&self) -> String {
        format!("file_list#{}@{}", self.directory, self.instance)
    }
}

/// The set of remote files already handled for a source directory.
///
/// Unlike a column mark there is no ordering to lean on: file listings
/// are unordered and files can appear with arbitrary names, so the mark
/// is the full set of seen paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListHwm {
    /// Directory this mark belongs to
    pub source: FileSource,

    /// Paths already handled
    pub entries: BTreeSet<RemotePath>,
}

impl FileListHwm {
    /// Creates an empty mark for a directory.
    pub fn new(source: FileSource) -> Self {
        Self {
            source,
            entries: BTreeSet::new(),
        }
    }

    /// Returns the store key for this mark.
    pub fn qualified_name(&self) -> String {
        self.source.qualified_name()
    }

    /// Returns `true` if the path was already handled.
    pub fn covers(&self, path: &RemotePath) -> bool {
        self.entries.contains(path)
    }

    /// Records a handled path. Returns `true` if it was new.
    pub fn update(&mut self, path: RemotePath) -> bool {
        self.entries.insert(path)
    }

    /// Number of paths covered by the mark.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no paths are covered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
