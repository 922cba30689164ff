#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt FS Library
//!
//! File connections, filters, and limits.

pub mod connection;
pub mod filter;
pub mod limit;
pub mod local;

// Re-exports for convenience
pub use connection::{DirEntry, FileConnection, FsEntry, WalkLevel};
pub use filter::{ExcludeDirFilter, FileFilter, GlobFilter, match_all_filters};
pub use limit::{FileLimit, MaxFilesLimit, limits_reached, reset_limits};
pub use local::LocalFs;
