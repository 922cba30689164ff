#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt Core Library
//!
//! Core types shared by the Kondukt connector crates.

pub mod error;
pub mod options;
pub mod packages;
pub mod path;
pub mod secret;

// Re-exports for convenience
pub use error::{Error, Result};
pub use options::{CollectionIfExists, FileIfExists, TableIfExists, TopicIfExists};
pub use packages::{JavaVersion, MavenCoordinate, ScalaVersion, SparkVersion};
pub use path::{PathStat, RemoteDirectory, RemoteFile, RemotePath};
pub use secret::SecretString;
