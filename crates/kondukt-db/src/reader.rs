//! Read planning: table + columns + strategy → SELECT statement.

use std::sync::Arc;

use kondukt_core::{Error, Result};
use kondukt_hwm::{ColumnSource, ReadStrategy};

use crate::connection::SqlConnection;
use crate::options::ReadOptions;
use crate::table::TableName;

/// Plans reads from a table through a connector.
///
/// The reader owns everything that shapes the statement: the column
/// list, a user `WHERE` clause, an optional hint, the HWM column for
/// incremental runs, and engine read options. [`DbReader::plan`] renders
/// the statement for a given strategy.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kondukt_db::{DbReader, Postgres};
/// use kondukt_hwm::ReadStrategy;
///
/// let postgres = Postgres::new("db.local", "app", "reader", "*****").unwrap();
/// let reader = DbReader::new(Arc::new(postgres), "public.events".parse().unwrap())
///     .with_columns(["event_id", "payload"])
///     .with_where("payload IS NOT NULL");
///
/// let plan = reader.plan(&ReadStrategy::Snapshot).unwrap();
/// assert_eq!(
///     plan.statement(),
///     "SELECT event_id, payload FROM public.events WHERE payload IS NOT NULL"
/// );
/// ```
pub struct DbReader {
    connection: Arc<dyn SqlConnection>,
    table: TableName,
    columns: Vec<String>,
    where_clause: Option<String>,
    hint: Option<String>,
    hwm_column: Option<String>,
    options: ReadOptions,
}

impl DbReader {
    /// Creates a reader for a table with all columns selected.
    pub fn new(connection: Arc<dyn SqlConnection>, table: TableName) -> Self {
        Self {
            connection,
            table,
            columns: vec!["*".to_string()],
            where_clause: None,
            hint: None,
            hwm_column: None,
            options: ReadOptions::default(),
        }
    }

    /// Sets the columns to read.
    ///
    /// Items are trimmed; an empty list or any `*` item collapses the
    /// selection to `*`.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = columns
            .into_iter()
            .map(|column| column.into().trim().to_string())
            .filter(|column| !column.is_empty())
            .collect();

        self.columns = if items.is_empty() || items.iter().any(|column| column == "*") {
            vec!["*".to_string()]
        } else {
            items
        };
        self
    }

    /// Sets a user `WHERE` clause combined with the strategy clause.
    pub fn with_where<S: Into<String>>(mut self, clause: S) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    /// Sets an optimizer hint placed right after `SELECT`.
    pub fn with_hint<S: Into<String>>(mut self, hint: S) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Sets the column tracked by incremental strategies.
    pub fn with_hwm_column<S: Into<String>>(mut self, column: S) -> Self {
        self.hwm_column = Some(column.into());
        self
    }

    /// Sets engine read options.
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the HWM source for loading an incremental strategy.
    ///
    /// Fails when the reader has no `hwm_column` configured.
    pub fn hwm_source(&self) -> Result<ColumnSource> {
        let column = self.hwm_column.as_ref().ok_or_else(|| {
            Error::validation("'hwm_column' must be set to use an incremental strategy")
        })?;
        Ok(ColumnSource::new(
            self.connection.instance_url(),
            self.table.to_string(),
            column.clone(),
        ))
    }

    /// Renders the SELECT statement for the given strategy.
    pub fn plan(&self, strategy: &ReadStrategy) -> Result<ReadPlan> {
        self.options.validate()?;

        let strategy_clause = self.strategy_clause(strategy)?;

        let mut statement = String::from("SELECT ");
        if let Some(hint) = &self.hint {
            statement.push_str(&format!("/*+ {hint} */ "));
        }
        statement.push_str(&self.columns.join(", "));
        statement.push_str(&format!(" FROM {}", self.table));

        match (&self.where_clause, &strategy_clause) {
            (Some(user), Some(strategy)) => {
                statement.push_str(&format!(" WHERE ({user}) AND ({strategy})"));
            }
            (Some(user), None) => statement.push_str(&format!(" WHERE {user}")),
            (None, Some(strategy)) => statement.push_str(&format!(" WHERE {strategy}")),
            (None, None) => {}
        }

        tracing::info!(
            connection = self.connection.kind(),
            table = %self.table,
            columns = self.columns.join(", "),
            "planned read"
        );

        Ok(ReadPlan {
            statement,
            strategy_clause,
        })
    }

    fn strategy_clause(&self, strategy: &ReadStrategy) -> Result<Option<String>> {
        let ReadStrategy::Incremental { hwm, .. } = strategy else {
            return Ok(None);
        };

        let source = self.hwm_source()?;
        if hwm.source != source {
            return Err(Error::validation(format!(
                "strategy mark '{}' does not belong to this reader (expected '{}')",
                hwm.qualified_name(),
                source.qualified_name()
            )));
        }

        let Some(bound) = strategy.lower_bound()? else {
            tracing::info!("incremental strategy has no stored mark yet, reading everything");
            return Ok(None);
        };

        let literal = self.connection.dialect().literal(&bound);
        Ok(Some(format!("{} > {literal}", source.column)))
    }
}

/// A rendered read: the statement plus the clause the strategy added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPlan {
    statement: String,
    strategy_clause: Option<String>,
}

impl ReadPlan {
    /// The full SELECT statement.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The clause contributed by the strategy, if any.
    pub fn strategy_clause(&self) -> Option<&str> {
        self.strategy_clause.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connection::postgres::Postgres;
    use kondukt_hwm::{ColumnHwm, HwmOffset, HwmValue};

    fn reader() -> DbReader {
        let postgres = Postgres::new("db.local", "app", "reader", "secret").unwrap();
        DbReader::new(Arc::new(postgres), "public.events".parse().unwrap())
    }

    fn incremental(value: Option<i64>, offset: Option<HwmOffset>) -> ReadStrategy {
        let source = ColumnSource::new("postgres://db.local:5432/app", "public.events", "event_id");
        let mut hwm = ColumnHwm::new(source);
        if let Some(value) = value {
            hwm.update(HwmValue::Int(value)).unwrap();
        }
        ReadStrategy::Incremental { hwm, offset }
    }

    #[test]
    fn test_default_selects_star() {
        let plan = reader().plan(&ReadStrategy::Snapshot).unwrap();
        assert_eq!(plan.statement(), "SELECT * FROM public.events");
    }

    #[test]
    fn test_columns_trimmed_and_star_collapses() {
        let plan = reader()
            .with_columns([" event_id ", "payload"])
            .plan(&ReadStrategy::Snapshot)
            .unwrap();
        assert_eq!(plan.statement(), "SELECT event_id, payload FROM public.events");

        let plan = reader()
            .with_columns(["event_id", "*"])
            .plan(&ReadStrategy::Snapshot)
            .unwrap();
        assert_eq!(plan.statement(), "SELECT * FROM public.events");
    }

    #[test]
    fn test_hint_placed_after_select() {
        let plan = reader()
            .with_hint("NOWAIT")
            .plan(&ReadStrategy::Snapshot)
            .unwrap();
        assert_eq!(plan.statement(), "SELECT /*+ NOWAIT */ * FROM public.events");
    }

    #[test]
    fn test_incremental_appends_strategy_clause() {
        let plan = reader()
            .with_hwm_column("event_id")
            .with_where("payload IS NOT NULL")
            .plan(&incremental(Some(500), None))
            .unwrap();
        assert_eq!(
            plan.statement(),
            "SELECT * FROM public.events WHERE (payload IS NOT NULL) AND (event_id > 500)"
        );
        assert_eq!(plan.strategy_clause(), Some("event_id > 500"));
    }

    #[test]
    fn test_incremental_with_offset() {
        let plan = reader()
            .with_hwm_column("event_id")
            .plan(&incremental(Some(500), Some(HwmOffset::Int(100))))
            .unwrap();
        assert_eq!(
            plan.statement(),
            "SELECT * FROM public.events WHERE event_id > 400"
        );
    }

    #[test]
    fn test_incremental_first_run_reads_everything() {
        let plan = reader()
            .with_hwm_column("event_id")
            .plan(&incremental(None, None))
            .unwrap();
        assert_eq!(plan.statement(), "SELECT * FROM public.events");
        assert_eq!(plan.strategy_clause(), None);
    }

    #[test]
    fn test_incremental_requires_hwm_column() {
        let err = reader().plan(&incremental(Some(1), None)).unwrap_err();
        assert!(err.to_string().contains("hwm_column"));
    }

    #[test]
    fn test_foreign_mark_rejected() {
        let foreign_source = ColumnSource::new("postgres://other:5432/app", "public.events", "event_id");
        let strategy = ReadStrategy::Incremental {
            hwm: ColumnHwm::new(foreign_source),
            offset: None,
        };
        let err = reader()
            .with_hwm_column("event_id")
            .plan(&strategy)
            .unwrap_err();
        assert!(err.to_string().contains("does not belong"));
    }

    #[test]
    fn test_timestamp_bound_uses_dialect() {
        use chrono::TimeZone;
        let source = ColumnSource::new("postgres://db.local:5432/app", "public.events", "updated_at");
        let mut hwm = ColumnHwm::new(source);
        hwm.update(HwmValue::Timestamp(
            chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        ))
        .unwrap();

        let plan = reader()
            .with_hwm_column("updated_at")
            .plan(&ReadStrategy::Incremental { hwm, offset: None })
            .unwrap();
        assert_eq!(
            plan.statement(),
            "SELECT * FROM public.events WHERE updated_at > '2024-03-01T00:00:00.000000'::timestamp"
        );
    }

    #[test]
    fn test_invalid_options_fail_planning() {
        let options = ReadOptions::new().with_partition_column("id");
        let err = reader()
            .with_options(options)
            .plan(&ReadStrategy::Snapshot)
            .unwrap_err();
        assert!(err.to_string().contains("num_partitions"));
    }
}
