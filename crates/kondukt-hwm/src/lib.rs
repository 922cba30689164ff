#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt HWM Library
//!
//! High-water-mark values, stores, and incremental strategies.

pub mod column;
pub mod file_list;
pub mod store;
pub mod strategy;
pub mod value;

// Re-exports for convenience
pub use column::{ColumnHwm, ColumnSource};
pub use file_list::{FileListHwm, FileSource};
pub use store::{HwmStore, MemoryHwmStore, RedbHwmStore, StoredHwm};
pub use strategy::ReadStrategy;
pub use value::{HwmOffset, HwmValue};
