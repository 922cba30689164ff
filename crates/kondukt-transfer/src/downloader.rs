//! Download files from a file connection to a local directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use kondukt_core::{Error, FileIfExists, RemoteFile, RemotePath, Result};
use kondukt_fs::{FileConnection, FileFilter, FileLimit};
use kondukt_hwm::strategy::load_file_list_hwm;
use kondukt_hwm::{FileListHwm, FileSource, HwmStore};

use crate::options::FileWriteOptions;
use crate::result::{FailedTransfer, TransferResult};

enum Outcome {
    Written(PathBuf),
    Skipped,
}

/// Downloads files from a remote directory into a local directory.
///
/// The source directory structure is preserved under the local
/// directory. A per-file failure never aborts the run: it is recorded in
/// the [`TransferResult`] and the run continues.
///
/// With a temp directory configured, files are downloaded next to the
/// target and moved into place with a rename, so an interrupted run
/// never leaves a partial file at the final path. The temp directory
/// must live on the same filesystem as the target, otherwise the move
/// degrades to a copy.
pub struct Downloader {
    connection: Arc<dyn FileConnection>,
    source_dir: RemotePath,
    local_dir: PathBuf,
    temp_dir: Option<PathBuf>,
    filters: Vec<Box<dyn FileFilter>>,
    limits: Vec<Box<dyn FileLimit>>,
    options: FileWriteOptions,
}

impl Downloader {
    /// Creates a downloader from `source_dir` on the connection into
    /// `local_dir`.
    pub fn new<P: Into<PathBuf>>(
        connection: Arc<dyn FileConnection>,
        source_dir: RemotePath,
        local_dir: P,
    ) -> Self {
        Self {
            connection,
            source_dir,
            local_dir: local_dir.into(),
            temp_dir: None,
            filters: Vec::new(),
            limits: Vec::new(),
            options: FileWriteOptions::default(),
        }
    }

    /// Downloads through a temp directory with an atomic final rename.
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, temp_dir: P) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Adds a file filter applied while listing the source.
    pub fn with_filter(mut self, filter: Box<dyn FileFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a scan limit applied while listing the source.
    pub fn with_limit(mut self, limit: Box<dyn FileLimit>) -> Self {
        self.limits.push(limit);
        self
    }

    /// Sets transfer options.
    pub fn with_options(mut self, options: FileWriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the HWM source identifying this download for incremental
    /// runs.
    pub fn hwm_source(&self) -> FileSource {
        FileSource::new(self.connection.instance_url(), self.source_dir.clone())
    }

    /// Lists the files a run would download, after filters and limits.
    pub async fn view_files(&mut self) -> Result<Vec<RemoteFile>> {
        let levels = self
            .connection
            .walk(&self.source_dir, &self.filters, &mut self.limits)
            .await?;
        Ok(levels.into_iter().flat_map(|level| level.files).collect())
    }

    /// Downloads everything under the source directory.
    pub async fn run(&mut self) -> Result<TransferResult> {
        self.log_options();
        self.prepare().await?;
        let files = self.view_files().await?;
        self.execute(files, None).await
    }

    /// Downloads only files not covered by the stored file-list mark,
    /// advancing the mark as files succeed.
    pub async fn run_incremental(&mut self, store: &dyn HwmStore) -> Result<TransferResult> {
        self.log_options();
        self.prepare().await?;

        let hwm = load_file_list_hwm(store, self.hwm_source()).await?;
        let files: Vec<RemoteFile> = self
            .view_files()
            .await?
            .into_iter()
            .filter(|file| !hwm.covers(&file.path))
            .collect();

        self.execute(files, Some((hwm, store))).await
    }

    /// Downloads an explicit file collection, without filters, limits,
    /// or marks.
    ///
    /// Paths may be absolute (then they must live under the source
    /// directory) or relative to it. Files that no longer exist are
    /// recorded as missing.
    pub async fn run_files(&mut self, files: &[RemotePath]) -> Result<TransferResult> {
        self.log_options();
        self.prepare().await?;

        let mut resolved = Vec::new();
        let mut result = TransferResult::new();

        for path in files {
            let absolute = if path.is_absolute() {
                if !path.starts_with(&self.source_dir) {
                    return Err(Error::validation(format!(
                        "file path '{path}' does not match source directory '{}'",
                        self.source_dir
                    )));
                }
                path.clone()
            } else {
                self.source_dir.join(path.as_str())
            };

            if !self.connection.path_exists(&absolute).await? {
                tracing::warn!(path = %absolute, "missing file, skipping");
                result.missing.push(absolute);
                continue;
            }
            resolved.push(self.connection.get_file(&absolute).await?);
        }

        let mut executed = self.execute(resolved, None).await?;
        executed.missing.extend(result.missing);
        Ok(executed)
    }

    async fn prepare(&self) -> Result<()> {
        self.connection.check().await?;

        if tokio::fs::try_exists(&self.local_dir).await?
            && !tokio::fs::metadata(&self.local_dir).await?.is_dir()
        {
            return Err(Error::NotADirectory {
                path: self.local_dir.display().to_string(),
            });
        }
        tokio::fs::create_dir_all(&self.local_dir).await?;

        self.connection.get_directory(&self.source_dir).await?;
        Ok(())
    }

    async fn execute(
        &self,
        files: Vec<RemoteFile>,
        hwm: Option<(FileListHwm, &dyn HwmStore)>,
    ) -> Result<TransferResult> {
        let mut result = TransferResult::new();
        if files.is_empty() {
            tracing::info!("no files to download");
            return Ok(result);
        }

        // The target directory is wiped only after the source listing
        // succeeded, so a bad source cannot empty the target.
        if self.options.if_exists == FileIfExists::ReplaceEntireDirectory {
            tokio::fs::remove_dir_all(&self.local_dir).await?;
            tokio::fs::create_dir_all(&self.local_dir).await?;
        }

        let session_temp = match &self.temp_dir {
            Some(temp_root) => {
                let session = temp_root.join(format!("kondukt-{}", uuid::Uuid::new_v4()));
                tokio::fs::create_dir_all(&session).await?;
                Some(session)
            }
            None => None,
        };

        let mut hwm = hwm;
        let total = files.len();
        for (index, file) in files.iter().enumerate() {
            let relative = file
                .path
                .relative_to(&self.source_dir)
                .unwrap_or_else(|| RemotePath::new(file.path.file_name().unwrap_or("file")));
            let target = self.local_dir.join(relative.as_str());

            tracing::info!(
                n = index + 1,
                total,
                from = %file.path,
                to = %target.display(),
                "downloading file"
            );

            match self
                .download_with_retry(file, &target, session_temp.as_deref(), &relative)
                .await
            {
                Ok(Outcome::Written(path)) => {
                    if let Some((mark, store)) = hwm.as_mut() {
                        mark.update(file.path.clone());
                        store
                            .save(&kondukt_hwm::StoredHwm::FileList(mark.clone()))
                            .await?;
                    }
                    if self.options.delete_source {
                        self.connection.remove_file(&file.path).await?;
                    }
                    result.successful.push(path);
                }
                Ok(Outcome::Skipped) => result.skipped.push(file.path.clone()),
                Err(e) => {
                    tracing::warn!(path = %file.path, error = %e, "download failed");
                    result.failed.push(FailedTransfer {
                        source: file.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(session) = session_temp {
            if let Err(e) = tokio::fs::remove_dir_all(&session).await {
                tracing::warn!(path = %session.display(), error = %e, "could not remove temp directory");
            }
        }

        tracing::info!(connection = self.connection.kind(), "download result:\n{result}");
        Ok(result)
    }

    async fn download_with_retry(
        &self,
        file: &RemoteFile,
        target: &Path,
        temp: Option<&Path>,
        relative: &RemotePath,
    ) -> Result<Outcome> {
        let attempt = || self.download_one(file, target, temp, relative);

        if self.options.retries == 0 {
            return attempt().await;
        }

        attempt
            .retry(
                ExponentialBuilder::default().with_max_times(self.options.retries as usize),
            )
            .when(Error::is_retryable)
            .await
    }

    async fn download_one(
        &self,
        file: &RemoteFile,
        target: &Path,
        temp: Option<&Path>,
        relative: &RemotePath,
    ) -> Result<Outcome> {
        let target_exists = tokio::fs::try_exists(target).await?;

        let replace = match self.options.if_exists {
            FileIfExists::Error if target_exists => {
                return Err(Error::AlreadyExists {
                    path: target.display().to_string(),
                });
            }
            FileIfExists::Ignore if target_exists => {
                tracing::warn!(path = %target.display(), "target exists, skipping");
                return Ok(Outcome::Skipped);
            }
            _ => target_exists,
        };

        match temp {
            Some(temp_root) => {
                let temp_path = temp_root.join(relative.as_str());
                self.connection
                    .download_file(&file.path, &temp_path, true)
                    .await?;

                // The existing target is removed only after the new file
                // fully arrived in the temp location.
                if replace && tokio::fs::try_exists(target).await? {
                    tokio::fs::remove_file(target).await?;
                }
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::rename(&temp_path, target).await?;
            }
            None => {
                self.connection
                    .download_file(&file.path, target, replace)
                    .await?;
            }
        }

        if self.options.verify_digest {
            self.verify_digest(&file.path, target).await?;
        }

        Ok(Outcome::Written(target.to_path_buf()))
    }

    async fn verify_digest(&self, remote: &RemotePath, local: &Path) -> Result<()> {
        let remote_bytes = self.connection.read_bytes(remote).await?;
        let local_bytes = tokio::fs::read(local).await?;
        if blake3::hash(&remote_bytes) != blake3::hash(&local_bytes) {
            return Err(Error::DigestMismatch {
                path: local.display().to_string(),
            });
        }
        Ok(())
    }

    fn log_options(&self) {
        tracing::info!(
            connection = self.connection.kind(),
            source = %self.source_dir,
            target = %self.local_dir.display(),
            if_exists = %self.options.if_exists,
            "starting download"
        );
        if self.options.delete_source {
            tracing::warn!("source files will be permanently deleted after download");
        }
        if self.options.if_exists == FileIfExists::ReplaceEntireDirectory {
            tracing::warn!("local directory will be cleaned up before downloading files");
        }
    }
}
