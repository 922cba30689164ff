//! Integration tests for the downloader.

use kondukt_core::{FileIfExists, RemotePath};
use kondukt_fs::{GlobFilter, MaxFilesLimit};
use kondukt_hwm::MemoryHwmStore;
use kondukt_transfer::{Downloader, FileWriteOptions};

use crate::common::{TestHarness, exists};

fn downloader(harness: &TestHarness) -> Downloader {
    Downloader::new(
        harness.connection.clone(),
        RemotePath::new("/incoming"),
        harness.local_root.path().join("out"),
    )
}

#[tokio::test]
async fn test_download_preserves_directory_structure() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;
    harness.seed_remote("incoming/2024/b.csv", b"beta").await;

    let result = downloader(&harness).run().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.successful.len(), 2);
    assert_eq!(harness.read_local("out/a.csv").await, b"alpha");
    assert_eq!(harness.read_local("out/2024/b.csv").await, b"beta");
}

#[tokio::test]
async fn test_error_mode_records_conflict_and_continues() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"new a").await;
    harness.seed_remote("incoming/b.csv", b"new b").await;
    harness.seed_local("out/a.csv", b"old a").await;

    let result = downloader(&harness).run().await.unwrap();

    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].source.as_str(), "/incoming/a.csv");
    assert!(result.failed[0].error.contains("already exists"));
    assert_eq!(result.successful.len(), 1);
    assert_eq!(harness.read_local("out/a.csv").await, b"old a");
    assert_eq!(harness.read_local("out/b.csv").await, b"new b");
}

#[tokio::test]
async fn test_ignore_mode_skips_existing_target() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"new a").await;
    harness.seed_local("out/a.csv", b"old a").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::Ignore);
    let result = downloader(&harness).with_options(options).run().await.unwrap();

    assert_eq!(result.skipped.len(), 1);
    assert!(result.successful.is_empty());
    assert_eq!(harness.read_local("out/a.csv").await, b"old a");
}

#[tokio::test]
async fn test_replace_file_overwrites_existing_target() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"new a").await;
    harness.seed_local("out/a.csv", b"old a").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::ReplaceFile);
    let result = downloader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert_eq!(harness.read_local("out/a.csv").await, b"new a");
}

#[tokio::test]
async fn test_replace_entire_directory_wipes_stale_files() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"fresh").await;
    harness.seed_local("out/stale.csv", b"stale").await;

    let options = FileWriteOptions::new().with_if_exists(FileIfExists::ReplaceEntireDirectory);
    let result = downloader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert!(!exists(&harness.local_path("out/stale.csv")));
    assert_eq!(harness.read_local("out/a.csv").await, b"fresh");
}

#[tokio::test]
async fn test_temp_path_leaves_no_session_directory_behind() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;
    let temp_root = harness.local_root.path().join("tmp");

    let result = downloader(&harness)
        .with_temp_dir(&temp_root)
        .run()
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(harness.read_local("out/a.csv").await, b"alpha");

    let mut leftovers = std::fs::read_dir(&temp_root).unwrap();
    assert!(leftovers.next().is_none(), "session temp directory must be removed");
}

#[tokio::test]
async fn test_delete_source_removes_remote_files() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;

    let options = FileWriteOptions::new().with_delete_source(true);
    let result = downloader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
    assert!(!exists(&harness.remote_path("incoming/a.csv")));
}

#[tokio::test]
async fn test_incremental_run_downloads_only_new_files() {
    let harness = TestHarness::new();
    let store = MemoryHwmStore::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;

    let first = downloader(&harness).run_incremental(&store).await.unwrap();
    assert_eq!(first.successful.len(), 1);

    harness.seed_remote("incoming/b.csv", b"beta").await;

    let second = downloader(&harness).run_incremental(&store).await.unwrap();
    assert_eq!(second.successful.len(), 1, "only the new file is downloaded");
    assert_eq!(
        second.successful[0],
        harness.local_path("out/b.csv"),
        "the covered file must not be transferred again"
    );

    let third = downloader(&harness).run_incremental(&store).await.unwrap();
    assert_eq!(third.total(), 0);
}

#[tokio::test]
async fn test_run_files_reports_missing() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;

    let result = downloader(&harness)
        .run_files(&[
            RemotePath::new("/incoming/a.csv"),
            RemotePath::new("gone.csv"),
        ])
        .await
        .unwrap();

    assert_eq!(result.successful.len(), 1);
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].as_str(), "/incoming/gone.csv");
}

#[tokio::test]
async fn test_run_files_rejects_paths_outside_source() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;

    let err = downloader(&harness)
        .run_files(&[RemotePath::new("/elsewhere/a.csv")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not match source directory"));
}

#[tokio::test]
async fn test_glob_filter_and_limit_restrict_the_run() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"a").await;
    harness.seed_remote("incoming/b.csv", b"b").await;
    harness.seed_remote("incoming/c.json", b"c").await;

    let result = downloader(&harness)
        .with_filter(Box::new(GlobFilter::new("*.csv").unwrap()))
        .with_limit(Box::new(MaxFilesLimit::new(1)))
        .run()
        .await
        .unwrap();

    assert_eq!(result.successful.len(), 1);
}

#[tokio::test]
async fn test_verify_digest_passes_on_clean_transfer() {
    let harness = TestHarness::new();
    harness.seed_remote("incoming/a.csv", b"alpha").await;

    let options = FileWriteOptions::new().with_verify_digest(true);
    let result = downloader(&harness).with_options(options).run().await.unwrap();

    assert!(result.is_success());
}

#[tokio::test]
async fn test_empty_source_returns_empty_result() {
    let harness = TestHarness::new();
    tokio::fs::create_dir_all(harness.remote_path("incoming"))
        .await
        .unwrap();

    let result = downloader(&harness).run().await.unwrap();
    assert_eq!(result.total(), 0);
    assert!(result.is_success());
}
