#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt Transfer Library
//!
//! File download/upload with conflict handling and verification.

pub mod downloader;
pub mod options;
pub mod result;
pub mod uploader;

// Re-exports for convenience
pub use downloader::Downloader;
pub use options::FileWriteOptions;
pub use result::{FailedTransfer, TransferResult};
pub use uploader::Uploader;
