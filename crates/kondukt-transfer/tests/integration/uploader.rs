//! Integration tests for the uploader.

use kondukt_core::{FileIfExists, RemotePath};
use kondukt_transfer::{FileWriteOptions, Uploader};

use crate::common::{TestHarness, exists};

fn uploader(harness: &TestHarness) -> Uploader {
    Uploader::new(
        harness.connection.clone(),
        harness.local_root.path().join("staging"),
        RemotePath::new("/published"),
    )
}

#[tokio::test]
async fn test_upload_preserves_directory_structure() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"alpha").await;
    harness.seed_local("staging/2024/b.csv", b"beta").await;

    let result = uploader(&harness).run().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.successful.len(), 2);
    assert_eq!(harness.read_remote("published/a.csv").await, b"alpha");
    assert_eq!(harness.read_remote("published/2024/b.csv").await, b"beta");
}

#[tokio::test]
async fn test_error_mode_records_conflict_and_continues() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"new a").await;
    harness.seed_local("staging/b.csv", b"new b").await;
    harness.seed_remote("published/a.csv", b"old a").await;

    let result = uploader(&harness).run().await.unwrap();

    assert_eq!(result.failed.len(), 1);
    assert!(result.failed[0].error.contains("already exists"));
    assert_eq!(result.successful.len(), 1);
    assert_eq!(harness.read_remote("published/a.csv").await, b"old a");
    assert_eq!(harness.read_remote("published/b.csv").await, b"new b");
}

#[tokio::test]
async fn test_ignore_mode_skips_existing_target() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"new a").await;
    harness.seed_remote("published/a.csv", b"old a").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::Ignore);
    let result = uploader(&harness).with_options(options).run().await.unwrap();

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(harness.read_remote("published/a.csv").await, b"old a");
}

#[tokio::test]
async fn test_replace_file_overwrites_existing_target() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"new a").await;
    harness.seed_remote("published/a.csv", b"old a").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::ReplaceFile);
    let result = uploader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert_eq!(harness.read_remote("published/a.csv").await, b"new a");
}

#[tokio::test]
async fn test_replace_entire_directory_wipes_stale_files() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"fresh").await;
    harness.seed_remote("published/stale.csv", b"stale").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::ReplaceEntireDirectory);
    let result = uploader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert!(!exists(&harness.remote_path("published/stale.csv")));
    assert_eq!(harness.read_remote("published/a.csv").await, b"fresh");
}

#[tokio::test]
async fn test_temp_path_uploads_through_rename() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"alpha").await;

    let result = uploader(&harness)
        .with_temp_dir(RemotePath::new("/tmp-upload"))
        .run()
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(harness.read_remote("published/a.csv").await, b"alpha");

    let mut leftovers = std::fs::read_dir(harness.remote_path("tmp-upload")).unwrap();
    assert!(leftovers.next().is_none(), "session temp directory must be removed");
}

#[tokio::test]
async fn test_delete_source_removes_local_files() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"alpha").await;

    let options = FileWriteOptions::new().with_delete_source(true);
    let result = uploader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert!(!exists(&harness.local_path("staging/a.csv")));
}

#[tokio::test]
async fn test_missing_local_directory_is_an_error() {
    let harness = TestHarness::new();
    let err = uploader(&harness).run().await.unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_verify_digest_passes_on_clean_transfer() {
    let harness = TestHarness::new();
    harness.seed_local("staging/a.csv", b"alpha").await;

    let options = FileWriteOptions::new().with_verify_digest(true);
    let result = uploader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
}
