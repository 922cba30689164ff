//! The file-connection trait.
//!
//! Implementations provide the primitive operations (`*_raw` methods and
//! `scan_entries`); the provided methods build the shared semantics on
//! top: typed existence errors, availability checks, filtered listings,
//! iterative walks, and size-verified transfers. Remote protocol
//! implementations plug in at this seam without touching the transfer
//! engine.

use std::path::Path;

use async_trait::async_trait;
use kondukt_core::path::path_repr;
use kondukt_core::{Error, PathStat, RemoteDirectory, RemoteFile, RemotePath, Result};

use crate::filter::{FileFilter, match_all_filters};
use crate::limit::{FileLimit, limits_reached, reset_limits};

/// One entry of a directory scan, as reported by a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (no directory component)
    pub name: String,

    /// Entry metadata
    pub stat: PathStat,

    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// A filtered listing entry with its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FsEntry {
    /// A file
    File(RemoteFile),

    /// A directory
    Dir(RemoteDirectory),
}

impl FsEntry {
    /// The entry's full path.
    pub fn path(&self) -> &RemotePath {
        match self {
            FsEntry::File(file) => &file.path,
            FsEntry::Dir(dir) => &dir.path,
        }
    }

    /// Returns `true` for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self, FsEntry::Dir(_))
    }
}

/// One level of a recursive walk. Paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLevel {
    /// The directory this level describes
    pub dir: RemoteDirectory,

    /// Subdirectories that passed the filters
    pub dirs: Vec<RemoteDirectory>,

    /// Files that passed the filters
    pub files: Vec<RemoteFile>,
}

/// A connection to a file system.
#[async_trait]
pub trait FileConnection: Send + Sync {
    /// Connection name used in logs (e.g. `LocalFs`).
    fn kind(&self) -> &'static str;

    /// Stable URL identifying the instance (no credentials).
    fn instance_url(&self) -> String;

    /// Lists the entries of a directory. The directory must exist.
    async fn scan_entries(&self, dir: &RemotePath) -> Result<Vec<DirEntry>>;

    /// Returns metadata for a path. The path must exist.
    async fn stat(&self, path: &RemotePath) -> Result<PathStat>;

    /// Returns `true` if the path exists.
    async fn path_exists(&self, path: &RemotePath) -> Result<bool>;

    /// Returns `true` if the existing path is a directory.
    async fn is_dir_raw(&self, path: &RemotePath) -> Result<bool>;

    /// Reads a whole file.
    async fn read_bytes_raw(&self, file: &RemotePath) -> Result<Vec<u8>>;

    /// Writes a whole file, creating or truncating it.
    async fn write_bytes_raw(&self, file: &RemotePath, content: &[u8]) -> Result<()>;

    /// Removes a file.
    async fn remove_file_raw(&self, file: &RemotePath) -> Result<()>;

    /// Creates a directory and its missing parents.
    async fn mkdir_raw(&self, dir: &RemotePath) -> Result<()>;

    /// Removes an empty directory.
    async fn rmdir_raw(&self, dir: &RemotePath) -> Result<()>;

    /// Renames a file within the connection.
    async fn rename_raw(&self, source: &RemotePath, target: &RemotePath) -> Result<()>;

    /// Copies a remote file to a local path.
    async fn download_raw(&self, remote: &RemotePath, local: &Path) -> Result<()>;

    /// Copies a local file to a remote path.
    async fn upload_raw(&self, local: &Path, remote: &RemotePath) -> Result<()>;

    // ------------------------------------------------------------------
    // Provided semantics
    // ------------------------------------------------------------------

    /// Probes the connection by listing its root.
    async fn check(&self) -> Result<()> {
        tracing::info!(connection = self.kind(), url = self.instance_url(), "checking connection");
        match self.scan_entries(&RemotePath::root()).await {
            Ok(_) => {
                tracing::info!(connection = self.kind(), "connection is available");
                Ok(())
            }
            Err(e) => Err(Error::unavailable(self.instance_url(), e.to_string())),
        }
    }

    /// Returns `true` if the path exists and is a file.
    async fn is_file(&self, path: &RemotePath) -> Result<bool> {
        if !self.path_exists(path).await? {
            return Err(Error::FileNotFound {
                path: path.to_string(),
            });
        }
        Ok(!self.is_dir_raw(path).await?)
    }

    /// Returns `true` if the path exists and is a directory.
    async fn is_dir(&self, path: &RemotePath) -> Result<bool> {
        if !self.path_exists(path).await? {
            return Err(Error::DirectoryNotFound {
                path: path.to_string(),
            });
        }
        self.is_dir_raw(path).await
    }

    /// Resolves a path that must be an existing file.
    async fn get_file(&self, path: &RemotePath) -> Result<RemoteFile> {
        if !self.is_file(path).await? {
            return Err(Error::NotAFile {
                path: path.to_string(),
            });
        }
        let stat = self.stat(path).await?;
        Ok(RemoteFile::new(path.clone(), stat))
    }

    /// Resolves a path that must be an existing directory.
    async fn get_directory(&self, path: &RemotePath) -> Result<RemoteDirectory> {
        if !self.is_dir(path).await? {
            return Err(Error::NotADirectory {
                path: path.to_string(),
            });
        }
        let stat = self.stat(path).await?;
        Ok(RemoteDirectory::new(path.clone(), stat))
    }

    /// Reads an existing file.
    async fn read_bytes(&self, path: &RemotePath) -> Result<Vec<u8>> {
        let file = self.get_file(path).await?;
        self.read_bytes_raw(&file.path).await
    }

    /// Writes a file, creating parent directories and replacing an
    /// existing file with a warning.
    async fn write_bytes(&self, path: &RemotePath, content: &[u8]) -> Result<RemoteFile> {
        if let Some(parent) = path.parent() {
            self.mkdir(&parent).await?;
        }

        if self.path_exists(path).await? {
            let existing = self.get_file(path).await?;
            tracing::warn!(
                connection = self.kind(),
                path = %path_repr(&existing.path, &existing.stat),
                "file already exists and will be overwritten"
            );
        }

        self.write_bytes_raw(path, content).await?;
        self.get_file(path).await
    }

    /// Removes a file; a missing path is a no-op.
    async fn remove_file(&self, path: &RemotePath) -> Result<()> {
        if !self.path_exists(path).await? {
            tracing::debug!(connection = self.kind(), %path, "file does not exist, nothing to remove");
            return Ok(());
        }
        let file = self.get_file(path).await?;
        self.remove_file_raw(&file.path).await?;
        tracing::info!(connection = self.kind(), %path, "removed file");
        Ok(())
    }

    /// Creates a directory (and parents); an existing directory is
    /// returned as-is.
    async fn mkdir(&self, path: &RemotePath) -> Result<RemoteDirectory> {
        if self.path_exists(path).await? {
            return self.get_directory(path).await;
        }
        self.mkdir_raw(path).await?;
        self.get_directory(path).await
    }

    /// Removes a directory.
    ///
    /// Non-recursive removal refuses a non-empty directory. A missing
    /// path is a no-op.
    async fn remove_dir(&self, path: &RemotePath, recursive: bool) -> Result<()> {
        if !self.path_exists(path).await? {
            tracing::debug!(connection = self.kind(), %path, "directory does not exist, nothing to remove");
            return Ok(());
        }

        let dir = self.get_directory(path).await?;

        if !recursive {
            if !self.scan_entries(&dir.path).await?.is_empty() {
                return Err(Error::DirectoryNotEmpty {
                    path: path.to_string(),
                });
            }
            self.rmdir_raw(&dir.path).await?;
            tracing::info!(connection = self.kind(), %path, "removed directory");
            return Ok(());
        }

        // Iterative removal: collect the directory tree breadth-first,
        // deleting files on the way, then remove directories bottom-up.
        let mut dirs = vec![dir.path.clone()];
        let mut index = 0;
        while index < dirs.len() {
            let current = dirs[index].clone();
            for entry in self.scan_entries(&current).await? {
                let child = current.join(&entry.name);
                if entry.is_dir {
                    dirs.push(child);
                } else {
                    self.remove_file_raw(&child).await?;
                }
            }
            index += 1;
        }
        for dir in dirs.iter().rev() {
            self.rmdir_raw(dir).await?;
        }

        tracing::info!(connection = self.kind(), %path, "removed directory recursively");
        Ok(())
    }

    /// Lists a directory, applying filters and limits.
    async fn list_dir(
        &self,
        dir: &RemotePath,
        filters: &[Box<dyn FileFilter>],
        limits: &mut [Box<dyn FileLimit>],
    ) -> Result<Vec<FsEntry>> {
        reset_limits(limits);
        let directory = self.get_directory(dir).await?;

        let mut result = Vec::new();
        for entry in self.scan_entries(&directory.path).await? {
            let path = directory.path.join(&entry.name);

            if match_all_filters(filters, &path, entry.is_dir) {
                result.push(if entry.is_dir {
                    FsEntry::Dir(RemoteDirectory::new(path.clone(), entry.stat))
                } else {
                    FsEntry::File(RemoteFile::new(path.clone(), entry.stat))
                });
            }

            if limits_reached(limits, &path, entry.is_dir) {
                break;
            }
        }
        Ok(result)
    }

    /// Walks a directory tree top-down, applying filters and limits.
    ///
    /// Directories rejected by a filter are pruned along with their
    /// subtrees. When a limit is reached the walk stops descending.
    async fn walk(
        &self,
        top: &RemotePath,
        filters: &[Box<dyn FileFilter>],
        limits: &mut [Box<dyn FileLimit>],
    ) -> Result<Vec<WalkLevel>> {
        reset_limits(limits);

        let mut levels = Vec::new();
        let mut pending = std::collections::VecDeque::new();
        pending.push_back(self.get_directory(top).await?);

        'outer: while let Some(dir) = pending.pop_front() {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in self.scan_entries(&dir.path).await? {
                let path = dir.path.join(&entry.name);

                if entry.is_dir {
                    if match_all_filters(filters, &path, true) {
                        dirs.push(RemoteDirectory::new(path.clone(), entry.stat));
                    }
                } else if match_all_filters(filters, &path, false) {
                    files.push(RemoteFile::new(path.clone(), entry.stat));
                }

                if limits_reached(limits, &path, entry.is_dir) {
                    pending.clear();
                    levels.push(WalkLevel { dir, dirs, files });
                    break 'outer;
                }
            }

            pending.extend(dirs.iter().cloned());
            levels.push(WalkLevel { dir, dirs, files });
        }

        Ok(levels)
    }

    /// Downloads a remote file to a local path, verifying the size.
    ///
    /// Returns the number of bytes transferred.
    async fn download_file(
        &self,
        remote: &RemotePath,
        local: &Path,
        replace: bool,
    ) -> Result<u64> {
        let remote_file = self.get_file(remote).await?;

        if tokio::fs::try_exists(local).await? {
            let metadata = tokio::fs::metadata(local).await?;
            if !metadata.is_file() {
                return Err(Error::NotAFile {
                    path: local.display().to_string(),
                });
            }
            if !replace {
                return Err(Error::AlreadyExists {
                    path: local.display().to_string(),
                });
            }
            tracing::warn!(path = %local.display(), "local file already exists, overwriting");
            tokio::fs::remove_file(local).await?;
        }

        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.download_raw(&remote_file.path, local).await?;

        let actual = tokio::fs::metadata(local).await?.len();
        if actual != remote_file.stat.size {
            return Err(Error::SizeMismatch {
                path: local.display().to_string(),
                expected: remote_file.stat.size,
                actual,
            });
        }

        tracing::info!(
            connection = self.kind(),
            from = %remote_file.path,
            to = %local.display(),
            "downloaded file"
        );
        Ok(actual)
    }

    /// Uploads a local file to a remote path, verifying the size.
    async fn upload_file(
        &self,
        local: &Path,
        remote: &RemotePath,
        replace: bool,
    ) -> Result<RemoteFile> {
        if !tokio::fs::try_exists(local).await? {
            return Err(Error::FileNotFound {
                path: local.display().to_string(),
            });
        }
        let metadata = tokio::fs::metadata(local).await?;
        if !metadata.is_file() {
            return Err(Error::NotAFile {
                path: local.display().to_string(),
            });
        }

        if self.path_exists(remote).await? {
            let existing = self.get_file(remote).await?;
            if !replace {
                return Err(Error::AlreadyExists {
                    path: existing.path.to_string(),
                });
            }
            tracing::warn!(path = %existing.path, "remote file already exists, overwriting");
            self.remove_file_raw(&existing.path).await?;
        }

        if let Some(parent) = remote.parent() {
            self.mkdir(&parent).await?;
        }

        self.upload_raw(local, remote).await?;

        let uploaded = self.get_file(remote).await?;
        if uploaded.stat.size != metadata.len() {
            return Err(Error::SizeMismatch {
                path: uploaded.path.to_string(),
                expected: metadata.len(),
                actual: uploaded.stat.size,
            });
        }

        tracing::info!(
            connection = self.kind(),
            from = %local.display(),
            to = %uploaded.path,
            "uploaded file"
        );
        Ok(uploaded)
    }

    /// Renames a remote file, optionally replacing the target.
    async fn rename_file(
        &self,
        source: &RemotePath,
        target: &RemotePath,
        replace: bool,
    ) -> Result<RemoteFile> {
        let source_file = self.get_file(source).await?;

        if self.path_exists(target).await? {
            let existing = self.get_file(target).await?;
            if !replace {
                return Err(Error::AlreadyExists {
                    path: existing.path.to_string(),
                });
            }
            tracing::warn!(path = %existing.path, "target file already exists, overwriting");
            self.remove_file_raw(&existing.path).await?;
        }

        if let Some(parent) = target.parent() {
            self.mkdir(&parent).await?;
        }

        self.rename_raw(&source_file.path, target).await?;
        tracing::info!(connection = self.kind(), from = %source, to = %target, "renamed file");
        self.get_file(target).await
    }
}
