//! Local filesystem connection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kondukt_core::{PathStat, RemotePath, Result};

use crate::connection::{DirEntry, FileConnection};

/// A file connection rooted at a local directory.
///
/// Remote paths resolve inside the root, so `/incoming/a.csv` on a
/// connection rooted at `/srv/data` is `/srv/data/incoming/a.csv`. This
/// is the reference implementation of [`FileConnection`] and the one the
/// transfer engine is tested against.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Creates a connection rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &RemotePath) -> PathBuf {
        let raw = path.as_str();
        let relative = raw.strip_prefix('/').unwrap_or(raw);
        if relative.is_empty() || relative == "." {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    async fn stat_of(&self, resolved: &Path) -> Result<PathStat> {
        let metadata = tokio::fs::metadata(resolved).await?;
        let size = if metadata.is_file() { metadata.len() } else { 0 };
        let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(PathStat { size, modified })
    }
}

#[async_trait]
impl FileConnection for LocalFs {
    fn kind(&self) -> &'static str {
        "LocalFs"
    }

    fn instance_url(&self) -> String {
        format!("localfs://{}", self.root.display())
    }

    async fn scan_entries(&self, dir: &RemotePath) -> Result<Vec<DirEntry>> {
        let resolved = self.resolve(dir);
        let mut entries = Vec::new();

        let mut read_dir = tokio::fs::read_dir(&resolved).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata().await?;
            let size = if metadata.is_file() { metadata.len() } else { 0 };
            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            entries.push(DirEntry {
                name,
                stat: PathStat { size, modified },
                is_dir: metadata.is_dir(),
            });
        }

        // Directory iteration order is platform-specific; sort for
        // reproducible listings and logs.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn stat(&self, path: &RemotePath) -> Result<PathStat> {
        self.stat_of(&self.resolve(path)).await
    }

    async fn path_exists(&self, path: &RemotePath) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.resolve(path)).await?)
    }

    async fn is_dir_raw(&self, path: &RemotePath) -> Result<bool> {
        Ok(tokio::fs::metadata(self.resolve(path)).await?.is_dir())
    }

    async fn read_bytes_raw(&self, file: &RemotePath) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.resolve(file)).await?)
    }

    async fn write_bytes_raw(&self, file: &RemotePath, content: &[u8]) -> Result<()> {
        tokio::fs::write(self.resolve(file), content).await?;
        Ok(())
    }

    async fn remove_file_raw(&self, file: &RemotePath) -> Result<()> {
        tokio::fs::remove_file(self.resolve(file)).await?;
        Ok(())
    }

    async fn mkdir_raw(&self, dir: &RemotePath) -> Result<()> {
        tokio::fs::create_dir_all(self.resolve(dir)).await?;
        Ok(())
    }

    async fn rmdir_raw(&self, dir: &RemotePath) -> Result<()> {
        tokio::fs::remove_dir(self.resolve(dir)).await?;
        Ok(())
    }

    async fn rename_raw(&self, source: &RemotePath, target: &RemotePath) -> Result<()> {
        tokio::fs::rename(self.resolve(source), self.resolve(target)).await?;
        Ok(())
    }

    async fn download_raw(&self, remote: &RemotePath, local: &Path) -> Result<()> {
        tokio::fs::copy(self.resolve(remote), local).await?;
        Ok(())
    }

    async fn upload_raw(&self, local: &Path, remote: &RemotePath) -> Result<()> {
        tokio::fs::copy(local, self.resolve(remote)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::{ExcludeDirFilter, FileFilter, GlobFilter};
    use crate::limit::{FileLimit, MaxFilesLimit};
    use kondukt_core::Error;

    fn connection() -> (tempfile::TempDir, LocalFs) {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFs::new(dir.path());
        (dir, fs)
    }

    #[tokio::test]
    async fn test_write_read_roundtrip_creates_parents() {
        let (_dir, fs) = connection();
        let path = RemotePath::new("/nested/deep/file.txt");

        let written = fs.write_bytes(&path, b"hello").await.unwrap();
        assert_eq!(written.stat.size, 5);
        assert_eq!(fs.read_bytes(&path).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_get_file_errors() {
        let (_dir, fs) = connection();

        let err = fs.get_file(&RemotePath::new("/missing.txt")).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));

        fs.mkdir(&RemotePath::new("/somedir")).await.unwrap();
        let err = fs.get_file(&RemotePath::new("/somedir")).await.unwrap_err();
        assert!(matches!(err, Error::NotAFile { .. }));
    }

    #[tokio::test]
    async fn test_check_available() {
        let (_dir, fs) = connection();
        fs.check().await.unwrap();
    }

    #[tokio::test]
    async fn test_check_unavailable_on_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFs::new(dir.path().join("gone"));
        let err = fs.check().await.unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_list_dir_with_filter_and_limit() {
        let (_dir, fs) = connection();
        for name in ["a.csv", "b.csv", "c.json"] {
            fs.write_bytes(&RemotePath::new(format!("/data/{name}")), b"x")
                .await
                .unwrap();
        }

        let filters: Vec<Box<dyn FileFilter>> = vec![Box::new(GlobFilter::new("*.csv").unwrap())];
        let mut limits: Vec<Box<dyn FileLimit>> = vec![];
        let entries = fs
            .list_dir(&RemotePath::new("/data"), &filters, &mut limits)
            .await
            .unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(names, ["/data/a.csv", "/data/b.csv"]);

        let mut limits: Vec<Box<dyn FileLimit>> = vec![Box::new(MaxFilesLimit::new(1))];
        let entries = fs
            .list_dir(&RemotePath::new("/data"), &[], &mut limits)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_walk_collects_nested_levels() {
        let (_dir, fs) = connection();
        fs.write_bytes(&RemotePath::new("/top/a.csv"), b"a").await.unwrap();
        fs.write_bytes(&RemotePath::new("/top/sub/b.csv"), b"b").await.unwrap();

        let mut limits: Vec<Box<dyn FileLimit>> = vec![];
        let levels = fs
            .walk(&RemotePath::new("/top"), &[], &mut limits)
            .await
            .unwrap();

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].dir.path.as_str(), "/top");
        assert_eq!(levels[0].files.len(), 1);
        assert_eq!(levels[0].dirs.len(), 1);
        assert_eq!(levels[1].dir.path.as_str(), "/top/sub");
        assert_eq!(levels[1].files[0].path.as_str(), "/top/sub/b.csv");
    }

    #[tokio::test]
    async fn test_walk_prunes_excluded_subtree() {
        let (_dir, fs) = connection();
        fs.write_bytes(&RemotePath::new("/top/keep/a.csv"), b"a").await.unwrap();
        fs.write_bytes(&RemotePath::new("/top/skip/b.csv"), b"b").await.unwrap();

        let filters: Vec<Box<dyn FileFilter>> =
            vec![Box::new(ExcludeDirFilter::new([RemotePath::new("/top/skip")]))];
        let mut limits: Vec<Box<dyn FileLimit>> = vec![];
        let levels = fs
            .walk(&RemotePath::new("/top"), &filters, &mut limits)
            .await
            .unwrap();

        let visited: Vec<_> = levels.iter().map(|l| l.dir.path.to_string()).collect();
        assert_eq!(visited, ["/top", "/top/keep"]);
    }

    #[tokio::test]
    async fn test_remove_dir_refuses_non_empty_without_recursive() {
        let (_dir, fs) = connection();
        fs.write_bytes(&RemotePath::new("/data/a.txt"), b"x").await.unwrap();

        let err = fs.remove_dir(&RemotePath::new("/data"), false).await.unwrap_err();
        assert!(matches!(err, Error::DirectoryNotEmpty { .. }));

        fs.remove_dir(&RemotePath::new("/data"), true).await.unwrap();
        assert!(!fs.path_exists(&RemotePath::new("/data")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_dir_missing_is_noop() {
        let (_dir, fs) = connection();
        fs.remove_dir(&RemotePath::new("/nothing"), true).await.unwrap();
    }

    #[tokio::test]
    async fn test_download_file_replace_matrix() {
        let (_dir, fs) = connection();
        let target_dir = tempfile::tempdir().unwrap();
        let local = target_dir.path().join("out/a.txt");

        fs.write_bytes(&RemotePath::new("/a.txt"), b"payload").await.unwrap();

        let bytes = fs
            .download_file(&RemotePath::new("/a.txt"), &local, false)
            .await
            .unwrap();
        assert_eq!(bytes, 7);

        let err = fs
            .download_file(&RemotePath::new("/a.txt"), &local, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));

        fs.download_file(&RemotePath::new("/a.txt"), &local, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_file_verifies_and_replaces() {
        let (_dir, fs) = connection();
        let source_dir = tempfile::tempdir().unwrap();
        let local = source_dir.path().join("in.txt");
        tokio::fs::write(&local, b"payload").await.unwrap();

        let uploaded = fs
            .upload_file(&local, &RemotePath::new("/in/target.txt"), false)
            .await
            .unwrap();
        assert_eq!(uploaded.stat.size, 7);

        let err = fs
            .upload_file(&local, &RemotePath::new("/in/target.txt"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));

        fs.upload_file(&local, &RemotePath::new("/in/target.txt"), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let (_dir, fs) = connection();
        let err = fs
            .upload_file(Path::new("/definitely/missing"), &RemotePath::new("/x"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_rename_file() {
        let (_dir, fs) = connection();
        fs.write_bytes(&RemotePath::new("/a.txt"), b"x").await.unwrap();

        let renamed = fs
            .rename_file(&RemotePath::new("/a.txt"), &RemotePath::new("/b/c.txt"), false)
            .await
            .unwrap();
        assert_eq!(renamed.path.as_str(), "/b/c.txt");
        assert!(!fs.path_exists(&RemotePath::new("/a.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_file_missing_is_noop() {
        let (_dir, fs) = connection();
        fs.remove_file(&RemotePath::new("/missing.txt")).await.unwrap();
    }
}
