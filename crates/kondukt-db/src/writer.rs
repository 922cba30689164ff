//! Write planning: target state + `if_exists` → write action.

use std::sync::Arc;

use kondukt_core::{Error, Result, TableIfExists};

use crate::connection::SqlConnection;
use crate::options::TableWriteOptions;
use crate::table::TableName;

/// Observed state of a write target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    /// Whether the table exists
    pub exists: bool,

    /// Whether the existing table is partitioned
    pub partitioned: bool,
}

impl TableState {
    /// State of a target that does not exist yet.
    pub fn missing() -> Self {
        Self {
            exists: false,
            partitioned: false,
        }
    }

    /// State of an existing target.
    pub fn existing(partitioned: bool) -> Self {
        Self {
            exists: true,
            partitioned,
        }
    }
}

/// Resolved action for a table write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum WriteAction {
    /// Create the table, then insert.
    CreateAndInsert,

    /// Insert into the existing table.
    InsertInto,

    /// Drop and recreate the table, then insert.
    RecreateAndInsert,

    /// Replace only the partitions present in the incoming data.
    OverwritePartitions,

    /// Leave the table untouched.
    SkipWrite,
}

/// A resolved write: the target and what to do to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    /// Target table
    pub table: TableName,

    /// Resolved action
    pub action: WriteAction,
}

/// Plans writes to a table through a connector.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kondukt_core::TableIfExists;
/// use kondukt_db::{DbWriter, Postgres, TableState, TableWriteOptions, WriteAction};
///
/// let postgres = Postgres::new("db.local", "app", "writer", "*****").unwrap();
/// let writer = DbWriter::new(Arc::new(postgres), "public.events".parse().unwrap())
///     .with_options(TableWriteOptions::new().with_if_exists(TableIfExists::ReplaceEntireTable));
///
/// let plan = writer.plan(&TableState::existing(false)).unwrap();
/// assert_eq!(plan.action, WriteAction::RecreateAndInsert);
/// ```
pub struct DbWriter {
    connection: Arc<dyn SqlConnection>,
    table: TableName,
    options: TableWriteOptions,
}

impl DbWriter {
    /// Creates a writer for a table with default options.
    pub fn new(connection: Arc<dyn SqlConnection>, table: TableName) -> Self {
        Self {
            connection,
            table,
            options: TableWriteOptions::default(),
        }
    }

    /// Sets write options.
    pub fn with_options(mut self, options: TableWriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves the write action for the observed target state.
    ///
    /// Invariants:
    /// * `error` fails only when the target exists;
    /// * `ignore` skips only when the target exists;
    /// * `replace_overlapping_partitions` needs a partitioned target and
    ///   degrades to full replacement (with a warning) otherwise.
    pub fn plan(&self, state: &TableState) -> Result<WritePlan> {
        let action = self.resolve_action(state)?;

        tracing::info!(
            connection = self.connection.kind(),
            table = %self.table,
            if_exists = %self.options.if_exists,
            ?action,
            "planned write"
        );

        Ok(WritePlan {
            table: self.table.clone(),
            action,
        })
    }

    fn resolve_action(&self, state: &TableState) -> Result<WriteAction> {
        if !state.exists {
            return Ok(WriteAction::CreateAndInsert);
        }

        let action = match self.options.if_exists {
            TableIfExists::Append => WriteAction::InsertInto,
            TableIfExists::ReplaceEntireTable => WriteAction::RecreateAndInsert,
            TableIfExists::ReplaceOverlappingPartitions => {
                if state.partitioned {
                    WriteAction::OverwritePartitions
                } else {
                    tracing::warn!(
                        table = %self.table,
                        "target is not partitioned, 'replace_overlapping_partitions' \
                         falls back to replacing the entire table"
                    );
                    WriteAction::RecreateAndInsert
                }
            }
            TableIfExists::Error => {
                return Err(Error::AlreadyExists {
                    path: format!("{}/{}", self.connection.instance_url(), self.table),
                });
            }
            TableIfExists::Ignore => {
                tracing::warn!(
                    table = %self.table,
                    "target table exists and if_exists = ignore, skipping write"
                );
                WriteAction::SkipWrite
            }
            _ => unreachable!("unhandled TableIfExists variant"),
        };

        Ok(action)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connection::hive::Hive;
    use crate::connection::postgres::Postgres;

    fn writer(if_exists: TableIfExists) -> DbWriter {
        let postgres = Postgres::new("db.local", "app", "writer", "secret").unwrap();
        DbWriter::new(Arc::new(postgres), "public.events".parse().unwrap())
            .with_options(TableWriteOptions::new().with_if_exists(if_exists))
    }

    #[test]
    fn test_missing_target_always_creates() {
        for if_exists in [
            TableIfExists::Append,
            TableIfExists::ReplaceEntireTable,
            TableIfExists::ReplaceOverlappingPartitions,
            TableIfExists::Error,
            TableIfExists::Ignore,
        ] {
            let plan = writer(if_exists).plan(&TableState::missing()).unwrap();
            assert_eq!(plan.action, WriteAction::CreateAndInsert, "{if_exists}");
        }
    }

    #[test]
    fn test_append_inserts_into_existing() {
        let plan = writer(TableIfExists::Append)
            .plan(&TableState::existing(false))
            .unwrap();
        assert_eq!(plan.action, WriteAction::InsertInto);
    }

    #[test]
    fn test_replace_entire_table_recreates() {
        let plan = writer(TableIfExists::ReplaceEntireTable)
            .plan(&TableState::existing(true))
            .unwrap();
        assert_eq!(plan.action, WriteAction::RecreateAndInsert);
    }

    #[test]
    fn test_replace_partitions_on_partitioned_target() {
        let hive = Hive::new("rnd-dwh").unwrap();
        let writer = DbWriter::new(Arc::new(hive), "warehouse.events".parse().unwrap())
            .with_options(
                TableWriteOptions::new()
                    .with_if_exists(TableIfExists::ReplaceOverlappingPartitions),
            );
        let plan = writer.plan(&TableState::existing(true)).unwrap();
        assert_eq!(plan.action, WriteAction::OverwritePartitions);
    }

    #[test]
    fn test_replace_partitions_degrades_on_unpartitioned_target() {
        let plan = writer(TableIfExists::ReplaceOverlappingPartitions)
            .plan(&TableState::existing(false))
            .unwrap();
        assert_eq!(plan.action, WriteAction::RecreateAndInsert);
    }

    #[test]
    fn test_error_mode_fails_only_when_target_exists() {
        let err = writer(TableIfExists::Error)
            .plan(&TableState::existing(false))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[test]
    fn test_ignore_skips_existing_target() {
        let plan = writer(TableIfExists::Ignore)
            .plan(&TableState::existing(false))
            .unwrap();
        assert_eq!(plan.action, WriteAction::SkipWrite);
    }
}
