//! `if_exists` conflict-resolution values, one enum per target family.
//!
//! Legacy spellings from the deprecated `mode` option (`overwrite`,
//! `overwrite_partitions`, `delete_all`) keep parsing until 1.0.0. Serde
//! accepts them silently through aliases; `FromStr` (the path taken by CLI
//! arguments and options documents) warns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

fn warn_legacy_value(legacy: &str, replacement: &str) {
    tracing::warn!(
        "value '{legacy}' is deprecated and will be removed in 1.0.0, use '{replacement}' instead"
    );
}

/// Conflict resolution for table write targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TableIfExists {
    /// Insert new rows, keep existing data (default).
    #[default]
    Append,

    /// Drop existing data and write the table from scratch.
    #[serde(alias = "overwrite")]
    ReplaceEntireTable,

    /// Replace only the partitions present in the incoming data.
    ///
    /// Valid for partitioned targets only.
    #[serde(alias = "overwrite_partitions")]
    ReplaceOverlappingPartitions,

    /// Fail when the target table already exists.
    Error,

    /// Skip the write when the target table already exists.
    Ignore,
}

impl TableIfExists {
    /// All accepted canonical spellings.
    pub const VALUES: [&'static str; 5] = [
        "append",
        "replace_entire_table",
        "replace_overlapping_partitions",
        "error",
        "ignore",
    ];
}

impl fmt::Display for TableIfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableIfExists::Append => "append",
            TableIfExists::ReplaceEntireTable => "replace_entire_table",
            TableIfExists::ReplaceOverlappingPartitions => "replace_overlapping_partitions",
            TableIfExists::Error => "error",
            TableIfExists::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

impl FromStr for TableIfExists {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(TableIfExists::Append),
            "replace_entire_table" => Ok(TableIfExists::ReplaceEntireTable),
            "replace_overlapping_partitions" => Ok(TableIfExists::ReplaceOverlappingPartitions),
            "error" => Ok(TableIfExists::Error),
            "ignore" => Ok(TableIfExists::Ignore),
            "overwrite" => {
                warn_legacy_value("overwrite", "replace_entire_table");
                Ok(TableIfExists::ReplaceEntireTable)
            }
            "overwrite_partitions" => {
                warn_legacy_value("overwrite_partitions", "replace_overlapping_partitions");
                Ok(TableIfExists::ReplaceOverlappingPartitions)
            }
            other => Err(Error::validation_field(
                "if_exists",
                format!("unknown value '{other}', expected one of {:?}", Self::VALUES),
            )),
        }
    }
}

/// Conflict resolution for document-collection write targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CollectionIfExists {
    /// Insert new documents, keep existing ones (default).
    #[default]
    Append,

    /// Drop the collection and write it from scratch.
    #[serde(alias = "overwrite")]
    ReplaceEntireCollection,

    /// Fail when the target collection already exists.
    Error,

    /// Skip the write when the target collection already exists.
    Ignore,
}

impl CollectionIfExists {
    /// All accepted canonical spellings.
    pub const VALUES: [&'static str; 4] =
        ["append", "replace_entire_collection", "error", "ignore"];
}

impl fmt::Display for CollectionIfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionIfExists::Append => "append",
            CollectionIfExists::ReplaceEntireCollection => "replace_entire_collection",
            CollectionIfExists::Error => "error",
            CollectionIfExists::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

impl FromStr for CollectionIfExists {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(CollectionIfExists::Append),
            "replace_entire_collection" => Ok(CollectionIfExists::ReplaceEntireCollection),
            "error" => Ok(CollectionIfExists::Error),
            "ignore" => Ok(CollectionIfExists::Ignore),
            "overwrite" => {
                warn_legacy_value("overwrite", "replace_entire_collection");
                Ok(CollectionIfExists::ReplaceEntireCollection)
            }
            other => Err(Error::validation_field(
                "if_exists",
                format!("unknown value '{other}', expected one of {:?}", Self::VALUES),
            )),
        }
    }
}

/// Conflict resolution for file write targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FileIfExists {
    /// Fail on an existing target file (default).
    #[default]
    Error,

    /// Skip files whose target already exists.
    Ignore,

    /// Replace the existing target file.
    #[serde(alias = "overwrite")]
    ReplaceFile,

    /// Wipe the target directory before transferring anything.
    #[serde(alias = "delete_all")]
    ReplaceEntireDirectory,
}

impl FileIfExists {
    /// All accepted canonical spellings.
    pub const VALUES: [&'static str; 4] =
        ["error", "ignore", "replace_file", "replace_entire_directory"];
}

impl fmt::Display for FileIfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileIfExists::Error => "error",
            FileIfExists::Ignore => "ignore",
            FileIfExists::ReplaceFile => "replace_file",
            FileIfExists::ReplaceEntireDirectory => "replace_entire_directory",
        };
        f.write_str(name)
    }
}

impl FromStr for FileIfExists {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(FileIfExists::Error),
            "ignore" => Ok(FileIfExists::Ignore),
            "replace_file" => Ok(FileIfExists::ReplaceFile),
            "replace_entire_directory" => Ok(FileIfExists::ReplaceEntireDirectory),
            "overwrite" => {
                warn_legacy_value("overwrite", "replace_file");
                Ok(FileIfExists::ReplaceFile)
            }
            "delete_all" => {
                warn_legacy_value("delete_all", "replace_entire_directory");
                Ok(FileIfExists::ReplaceEntireDirectory)
            }
            other => Err(Error::validation_field(
                "if_exists",
                format!("unknown value '{other}', expected one of {:?}", Self::VALUES),
            )),
        }
    }
}

/// Conflict resolution for topic write targets.
///
/// Topics only support appending records; the alternative is refusing to
/// write at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TopicIfExists {
    /// Publish records to the existing topic (default).
    #[default]
    Append,

    /// Fail when the target topic already exists.
    Error,
}

impl TopicIfExists {
    /// All accepted canonical spellings.
    pub const VALUES: [&'static str; 2] = ["append", "error"];
}

impl fmt::Display for TopicIfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TopicIfExists::Append => "append",
            TopicIfExists::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for TopicIfExists {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(TopicIfExists::Append),
            "error" => Ok(TopicIfExists::Error),
            other => Err(Error::validation_field(
                "if_exists",
                format!("unknown value '{other}', expected one of {:?}", Self::VALUES),
            )),
        }
    }
}
