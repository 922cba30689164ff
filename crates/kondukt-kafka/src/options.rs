//! Read and write options for the Kafka connector.

use kondukt_core::options::decode_document;
use kondukt_core::{Result, TopicIfExists};
use serde::{Deserialize, Serialize};

/// Where a read starts when no committed position exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StartingOffsets {
    /// Start from the earliest available offset (default).
    #[default]
    Earliest,

    /// Start from the latest offset.
    Latest,
}

impl std::fmt::Display for StartingOffsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StartingOffsets::Earliest => "earliest",
            StartingOffsets::Latest => "latest",
        };
        f.write_str(name)
    }
}

/// Options for reading a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaReadOptions {
    /// Where to start when no committed position exists
    pub starting_offsets: StartingOffsets,

    /// Expose record headers alongside payloads
    pub include_headers: bool,
}

impl KafkaReadOptions {
    /// Keys understood by this options struct.
    pub const KNOWN_KEYS: [&'static str; 2] = ["starting_offsets", "include_headers"];

    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting position.
    pub fn with_starting_offsets(mut self, offsets: StartingOffsets) -> Self {
        self.starting_offsets = offsets;
        self
    }

    /// Decodes options from a JSON document, applying the shared key rules.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        decode_document(document, &Self::KNOWN_KEYS, "KafkaReadOptions")
    }
}

/// Options for writing to a topic.
///
/// Topics only support appending; `if_exists = error` refuses to write
/// into a topic that already exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaWriteOptions {
    /// Conflict resolution when the target topic already exists
    #[serde(alias = "mode")]
    pub if_exists: TopicIfExists,

    /// Write record headers alongside payloads
    pub include_headers: bool,
}

impl KafkaWriteOptions {
    /// Keys understood by this options struct.
    pub const KNOWN_KEYS: [&'static str; 2] = ["if_exists", "include_headers"];

    /// Creates default write options (`if_exists = append`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conflict resolution behavior.
    pub fn with_if_exists(mut self, if_exists: TopicIfExists) -> Self {
        self.if_exists = if_exists;
        self
    }

    /// Sets the conflict resolution behavior through the old option name.
    #[deprecated(since = "0.5.0", note = "use `with_if_exists` instead")]
    pub fn with_mode(self, mode: TopicIfExists) -> Self {
        self.with_if_exists(mode)
    }

    /// Decodes options from a JSON document, applying the shared key rules.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        decode_document(document, &Self::KNOWN_KEYS, "KafkaWriteOptions")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_defaults() {
        let options = KafkaReadOptions::new();
        assert_eq!(options.starting_offsets, StartingOffsets::Earliest);
        assert!(!options.include_headers);
    }

    #[test]
    fn test_read_options_from_document() {
        let options = KafkaReadOptions::from_document(json!({
            "starting_offsets": "latest",
            "include_headers": true,
        }))
        .unwrap();
        assert_eq!(options.starting_offsets, StartingOffsets::Latest);
        assert!(options.include_headers);
    }

    #[test]
    fn test_write_options_deprecated_mode_key() {
        let options = KafkaWriteOptions::from_document(json!({"mode": "error"})).unwrap();
        assert_eq!(options.if_exists, TopicIfExists::Error);
    }

    #[test]
    fn test_write_options_reject_connection_keys() {
        let err = KafkaWriteOptions::from_document(json!({"host": "broker"})).unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn test_write_default_appends() {
        assert_eq!(KafkaWriteOptions::new().if_exists, TopicIfExists::Append);
    }
}
