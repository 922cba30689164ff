//! Upload files from a local directory to a file connection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use futures::StreamExt;
use kondukt_core::{Error, FileIfExists, RemotePath, Result};
use kondukt_fs::FileConnection;

use crate::options::FileWriteOptions;
use crate::result::{FailedTransfer, TransferResult};

enum Outcome {
    Written(PathBuf),
    Skipped,
}

/// Uploads files from a local directory into a remote directory.
///
/// The local directory structure is preserved under the target
/// directory. Like [`crate::Downloader`], a per-file failure is recorded
/// and the run continues.
///
/// With a remote temp directory configured, files are uploaded there
/// first and renamed into place, so readers of the target directory
/// never observe partial files.
pub struct Uploader {
    connection: Arc<dyn FileConnection>,
    local_dir: PathBuf,
    target_dir: RemotePath,
    temp_dir: Option<RemotePath>,
    options: FileWriteOptions,
}

impl Uploader {
    /// Creates an uploader from `local_dir` into `target_dir` on the
    /// connection.
    pub fn new<P: Into<PathBuf>>(
        connection: Arc<dyn FileConnection>,
        local_dir: P,
        target_dir: RemotePath,
    ) -> Self {
        Self {
            connection,
            local_dir: local_dir.into(),
            target_dir,
            temp_dir: None,
            options: FileWriteOptions::default(),
        }
    }

    /// Uploads through a remote temp directory with a final rename.
    pub fn with_temp_dir(mut self, temp_dir: RemotePath) -> Self {
        self.temp_dir = Some(temp_dir);
        self
    }

    /// Sets transfer options.
    pub fn with_options(mut self, options: FileWriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Lists the local files a run would upload, relative to the local
    /// directory.
    pub async fn view_files(&self) -> Result<Vec<PathBuf>> {
        if !tokio::fs::try_exists(&self.local_dir).await? {
            return Err(Error::DirectoryNotFound {
                path: self.local_dir.display().to_string(),
            });
        }
        if !tokio::fs::metadata(&self.local_dir).await?.is_dir() {
            return Err(Error::NotADirectory {
                path: self.local_dir.display().to_string(),
            });
        }

        let mut files = Vec::new();
        let mut entries = async_walkdir::WalkDir::new(&self.local_dir);
        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Uploads everything under the local directory.
    pub async fn run(&self) -> Result<TransferResult> {
        self.log_options();
        self.connection.check().await?;

        let files = self.view_files().await?;
        let mut result = TransferResult::new();
        if files.is_empty() {
            tracing::info!("no files to upload");
            return Ok(result);
        }

        // Wipe the remote target only after the local listing succeeded.
        if self.options.if_exists == FileIfExists::ReplaceEntireDirectory {
            self.connection.remove_dir(&self.target_dir, true).await?;
        }
        self.connection.mkdir(&self.target_dir).await?;

        let session_temp = match &self.temp_dir {
            Some(temp_root) => {
                let session = temp_root.join(format!("kondukt-{}", uuid::Uuid::new_v4()));
                self.connection.mkdir(&session).await?;
                Some(session)
            }
            None => None,
        };

        let total = files.len();
        for (index, local) in files.iter().enumerate() {
            let relative = local
                .strip_prefix(&self.local_dir)
                .map_err(|_| Error::validation(format!(
                    "file '{}' is not under '{}'",
                    local.display(),
                    self.local_dir.display()
                )))?
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            let target = self.target_dir.join(&relative);

            tracing::info!(
                n = index + 1,
                total,
                from = %local.display(),
                to = %target,
                "uploading file"
            );

            match self
                .upload_with_retry(local, &target, session_temp.as_ref(), &relative)
                .await
            {
                Ok(Outcome::Written(path)) => {
                    if self.options.delete_source {
                        tokio::fs::remove_file(local).await?;
                    }
                    result.successful.push(path);
                }
                Ok(Outcome::Skipped) => {
                    result.skipped.push(RemotePath::new(local.display().to_string()));
                }
                Err(e) => {
                    tracing::warn!(path = %local.display(), error = %e, "upload failed");
                    result.failed.push(FailedTransfer {
                        source: RemotePath::new(local.display().to_string()),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(session) = session_temp {
            if let Err(e) = self.connection.remove_dir(&session, true).await {
                tracing::warn!(path = %session, error = %e, "could not remove temp directory");
            }
        }

        tracing::info!(connection = self.connection.kind(), "upload result:\n{result}");
        Ok(result)
    }

    async fn upload_with_retry(
        &self,
        local: &Path,
        target: &RemotePath,
        temp: Option<&RemotePath>,
        relative: &str,
    ) -> Result<Outcome> {
        let attempt = || self.upload_one(local, target, temp, relative);

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

    async fn upload_one(
        &self,
        local: &Path,
        target: &RemotePath,
        temp: Option<&RemotePath>,
        relative: &str,
    ) -> Result<Outcome> {
        let target_exists = self.connection.path_exists(target).await?;

        let replace = match self.options.if_exists {
            FileIfExists::Error if target_exists => {
                return Err(Error::AlreadyExists {
                    path: target.to_string(),
                });
            }
            FileIfExists::Ignore if target_exists => {
                tracing::warn!(path = %target, "target exists, skipping");
                return Ok(Outcome::Skipped);
            }
            _ => target_exists,
        };

        match temp {
            Some(temp_root) => {
                let temp_path = temp_root.join(relative);
                self.connection.upload_file(local, &temp_path, true).await?;
                self.connection.rename_file(&temp_path, target, replace).await?;
            }
            None => {
                self.connection.upload_file(local, target, replace).await?;
            }
        }

        if self.options.verify_digest {
            self.verify_digest(local, target).await?;
        }

        Ok(Outcome::Written(local.to_path_buf()))
    }

    async fn verify_digest(&self, local: &Path, remote: &RemotePath) -> Result<()> {
        let local_bytes = tokio::fs::read(local).await?;
        let remote_bytes = self.connection.read_bytes(remote).await?;
        if blake3::hash(&local_bytes) != blake3::hash(&remote_bytes) {
            return Err(Error::DigestMismatch {
                path: remote.to_string(),
            });
        }
        Ok(())
    }

    fn log_options(&self) {
        tracing::info!(
            connection = self.connection.kind(),
            source = %self.local_dir.display(),
            target = %self.target_dir,
            if_exists = %self.options.if_exists,
            "starting upload"
        );
        if self.options.delete_source {
            tracing::warn!("local files will be permanently deleted after upload");
        }
        if self.options.if_exists == FileIfExists::ReplaceEntireDirectory {
            tracing::warn!("target directory will be cleaned up before uploading files");
        }
    }
}
