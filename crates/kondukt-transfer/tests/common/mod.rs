//! Common test utilities and harness for transfer integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kondukt_fs::LocalFs;

/// Test harness with a "remote" side (a LocalFs rooted in a temp
/// directory) and a local side.
pub struct TestHarness {
    /// Root of the remote side
    pub remote_root: tempfile::TempDir,

    /// Root of the local side
    pub local_root: tempfile::TempDir,

    /// Connection over the remote side
    pub connection: Arc<LocalFs>,
}

impl TestHarness {
    /// Creates a harness with empty remote and local sides.
    pub fn new() -> Self {
        let remote_root = tempfile::tempdir().expect("create remote temp dir");
        let local_root = tempfile::tempdir().expect("create local temp dir");
        let connection = Arc::new(LocalFs::new(remote_root.path()));
        Self {
            remote_root,
            local_root,
            connection,
        }
    }

    /// Writes a file on the remote side, creating parents.
    pub async fn seed_remote(&self, relative: &str, content: &[u8]) {
        let path = self.remote_root.path().join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.expect("create remote parents");
        }
        tokio::fs::write(path, content).await.expect("seed remote file");
    }

    /// Writes a file on the local side, creating parents.
    pub async fn seed_local(&self, relative: &str, content: &[u8]) {
        let path = self.local_root.path().join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.expect("create local parents");
        }
        tokio::fs::write(path, content).await.expect("seed local file");
    }

    /// Path on the local side.
    pub fn local_path(&self, relative: &str) -> PathBuf {
        self.local_root.path().join(relative)
    }

    /// Path on the remote side.
    pub fn remote_path(&self, relative: &str) -> PathBuf {
        self.remote_root.path().join(relative)
    }

    /// Reads a file on the local side.
    pub async fn read_local(&self, relative: &str) -> Vec<u8> {
        tokio::fs::read(self.local_path(relative)).await.expect("read local file")
    }

    /// Reads a file on the remote side.
    pub async fn read_remote(&self, relative: &str) -> Vec<u8> {
        tokio::fs::read(self.remote_path(relative)).await.expect("read remote file")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if the path exists.
pub fn exists(path: &Path) -> bool {
    path.exists()
}
