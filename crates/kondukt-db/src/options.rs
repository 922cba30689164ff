//! Read and write options for database connectors.

use kondukt_core::options::decode_document;
use kondukt_core::{Error, Result, TableIfExists};
use serde::{Deserialize, Serialize};

/// Options for reading a table.
///
/// These map to engine-side read tuning; none of them change which rows
/// are read (that is the reader's and strategy's job).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Column used to split the read into parallel partitions
    pub partition_column: Option<String>,

    /// Number of parallel partitions
    pub num_partitions: Option<u32>,

    /// Lower bound of the partition column range
    pub lower_bound: Option<i64>,

    /// Upper bound of the partition column range
    pub upper_bound: Option<i64>,

    /// Rows fetched per round trip
    pub fetchsize: Option<u32>,

    /// Engine-side statement timeout, in seconds
    pub query_timeout: Option<u64>,

    /// Statement executed once per session before reading
    pub session_init_statement: Option<String>,
}

impl ReadOptions {
    /// Keys understood by this options struct.
    pub const KNOWN_KEYS: [&'static str; 7] = [
        "partition_column",
        "num_partitions",
        "lower_bound",
        "upper_bound",
        "fetchsize",
        "query_timeout",
        "session_init_statement",
    ];

    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the partition column.
    pub fn with_partition_column<S: Into<String>>(mut self, column: S) -> Self {
        self.partition_column = Some(column.into());
        self
    }

    /// Sets the number of partitions.
    pub fn with_num_partitions(mut self, partitions: u32) -> Self {
        self.num_partitions = Some(partitions);
        self
    }

    /// Sets the per-round-trip fetch size.
    pub fn with_fetchsize(mut self, fetchsize: u32) -> Self {
        self.fetchsize = Some(fetchsize);
        self
    }

    /// Decodes options from a JSON document, applying the shared key rules.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        let options: Self = decode_document(document, &Self::KNOWN_KEYS, "ReadOptions")?;
        options.validate()?;
        Ok(options)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.num_partitions == Some(0) {
            return Err(Error::validation_field(
                "num_partitions",
                "must be greater than zero",
            ));
        }

        let has_bounds = self.lower_bound.is_some() || self.upper_bound.is_some();
        if has_bounds && self.partition_column.is_none() {
            return Err(Error::validation(
                "'lower_bound'/'upper_bound' require 'partition_column'",
            ));
        }

        if self.partition_column.is_some() && self.num_partitions.is_none() {
            return Err(Error::validation(
                "'partition_column' requires 'num_partitions'",
            ));
        }

        Ok(())
    }
}

/// Options for writing to a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableWriteOptions {
    /// Conflict resolution when the target table already exists
    #[serde(alias = "mode")]
    pub if_exists: TableIfExists,

    /// Rows written per batch
    pub batchsize: Option<u32>,

    /// Engine-side statement timeout, in seconds
    pub query_timeout: Option<u64>,
}

impl TableWriteOptions {
    /// Keys understood by this options struct.
    pub const KNOWN_KEYS: [&'static str; 3] = ["if_exists", "batchsize", "query_timeout"];

    /// Creates default write options (`if_exists = append`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conflict resolution behavior.
    pub fn with_if_exists(mut self, if_exists: TableIfExists) -> Self {
        self.if_exists = if_exists;
        self
    }

    /// Sets the conflict resolution behavior through the old option name.
    #[deprecated(since = "0.5.0", note = "use `with_if_exists` instead")]
    pub fn with_mode(self, mode: TableIfExists) -> Self {
        self.with_if_exists(mode)
    }

    /// Sets the write batch size.
    pub fn with_batchsize(mut self, batchsize: u32) -> Self {
        self.batchsize = Some(batchsize);
        self
    }

    /// Decodes options from a JSON document, applying the shared key rules.
    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        decode_document(document, &Self::KNOWN_KEYS, "TableWriteOptions")
    }
}
