//! Transfer options.

use kondukt_core::options::decode_document;
use kondukt_core::{FileIfExists, Result};
use serde::{Deserialize, Serialize};

/// Options shared by downloads and uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWriteOptions {
    /// Conflict resolution when a target file already exists
    #[serde(alias = "mode")]
    pub if_exists: FileIfExists,

    /// Remove each source file after its successful transfer
    pub delete_source: bool,

    /// Verify a blake3 digest of the transferred content, not just its size
    pub verify_digest: bool,

    /// Retries per file for retryable failures (0 disables retrying)
    pub retries: u32,
}

impl FileWriteOptions {
    /// Keys understood by this options struct.
    pub const KNOWN_KEYS: [&'static str; 4] =
        ["if_exists", "delete_source", "verify_digest", "retries"];

    /// Creates default options (`if_exists = error`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conflict resolution behavior.
    pub fn with_if_exists(mut self, if_exists: FileIfExists) -> Self {
        self.if_exists = if_exists;
        self
    }

    /// Sets the conflict resolution behavior through the old option name.
    #[deprecated(since = "0.5.0", note = "use `with_if_exists` instead")]
    pub fn with_mode(self, mode: FileIfExists) -> Self {
        self.with_if_exists(mode)
    }

    /// Removes source files after successful transfer.
    pub fn with_delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    /// Enables digest verification of transferred content.
    pub fn with_verify_digest(mut self, verify_digest: bool) -> Self {
        self.verify_digest = verify_digest;
        self
    }

    /// Sets the per-file retry budget for retryable failures.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Decodes options from a JSON document, applying the shared key rules.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        decode_document(document, &Self::KNOWN_KEYS, "FileWriteOptions")
    }
}
