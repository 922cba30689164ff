#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt Kafka Library
//!
//! Kafka connector descriptor and options.

pub mod connection;
pub mod options;
pub mod topic;

// Re-exports for convenience
pub use connection::{Kafka, SecurityProtocol};
pub use options::{KafkaReadOptions, KafkaWriteOptions, StartingOffsets};
pub use topic::validate_topic;
