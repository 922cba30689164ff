//! File metadata and log-friendly path rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::RemotePath;

/// Metadata for a remote file or directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStat {
    /// Size in bytes (0 for directories on servers that do not report it)
    pub size: u64,

    /// Last modification time, if the server reports one
    pub modified: Option<DateTime<Utc>>,
}

impl PathStat {
    /// Creates a stat with a known size and no modification time.
    pub fn with_size(size: u64) -> Self {
        Self {
            size,
            modified: None,
        }
    }

    /// Creates a stat with a known size and modification time.
    pub fn new(size: u64, modified: DateTime<Utc>) -> Self {
        Self {
            size,
            modified: Some(modified),
        }
    }
}

/// A remote file together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Path of the file
    pub path: RemotePath,

    /// File metadata
    pub stat: PathStat,
}

impl RemoteFile {
    /// Creates a remote file from a path and its metadata.
    pub fn new(path: RemotePath, stat: PathStat) -> Self {
        Self { path, stat }
    }
}

/// A remote directory together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDirectory {
    /// Path of the directory
    pub path: RemotePath,

    /// Directory metadata
    pub stat: PathStat,
}

impl RemoteDirectory {
    /// Creates a remote directory from a path and its metadata.
    pub fn new(path: RemotePath, stat: PathStat) -> Self {
        Self { path, stat }
    }
}

/// Renders a byte count with a binary unit suffix.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Renders a path with its metadata for log output.
///
/// ```
/// use kondukt_core::path::{PathStat, RemoteFile, path_repr};
/// use kondukt_core::RemotePath;
///
/// let file = RemoteFile::new(RemotePath::new("/data/file.csv"), PathStat::with_size(2048));
/// assert_eq!(path_repr(&file.path, &file.stat), "'/data/file.csv' (2.0 KiB)");
/// ```
pub fn path_repr(path: &RemotePath, stat: &PathStat) -> String {
    match stat.modified {
        Some(modified) => format!(
            "'{path}' ({}, modified {})",
            format_size(stat.size),
            modified.format("%Y-%m-%d %H:%M:%S")
        ),
        None => format!("'{path}' ({})", format_size(stat.size)),
    }
}
