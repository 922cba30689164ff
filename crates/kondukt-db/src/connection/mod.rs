//! Database connector descriptors.
//!
//! Connectors carry validated configuration and answer three questions:
//! how to reach the instance (URL rendering), which artifacts a runtime
//! needs to talk to it (`get_packages`), and how to spell SQL literals
//! for it (dialect). They hold no client and speak no wire protocol.

pub mod clickhouse;
pub mod greenplum;
pub mod hive;
pub mod mongodb;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;

use std::collections::BTreeMap;

use crate::dialect::Dialect;

/// Common surface of SQL-speaking connectors.
pub trait SqlConnection: Send + Sync + std::fmt::Debug {
    /// Connector name used in logs (e.g. `Postgres`).
    fn kind(&self) -> &'static str;

    /// Stable URL identifying the instance (no credentials).
    fn instance_url(&self) -> String;

    /// Literal-rendering dialect for this engine.
    fn dialect(&self) -> &dyn Dialect;

    /// Statement used by availability checks.
    fn check_query(&self) -> &'static str {
        "SELECT 1"
    }
}

/// Renders extra parameters as a `k=v&k=v` query string, sorted by key.
///
/// Sorting keeps rendered URLs stable across runs, which matters because
/// instance URLs are used as HWM qualifiers.
pub(crate) fn render_query_params(extra: &BTreeMap<String, String>) -> String {
    extra
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
