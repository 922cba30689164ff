//! Hive connector.

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, MavenCoordinate, Result};

use crate::connection::SqlConnection;
use crate::dialect::Dialect;

/// Hive connector descriptor.
///
/// Hive is addressed by cluster name rather than host and port: the
/// runtime resolves the metastore from its own configuration. Hive
/// support ships inside the runtime, so [`Hive::get_packages`] is empty.
///
/// Hive tables are the one partitioned target in the SQL family, which
/// is why `replace_overlapping_partitions` writes are planned against
/// it (see [`crate::DbWriter`]).
#[derive(Debug, Clone)]
pub struct Hive {
    cluster: String,
}

impl Hive {
    /// Creates a connector for the given cluster.
    pub fn new<C: Into<String>>(cluster: C) -> Result<Self> {
        let cluster = cluster.into();
        if cluster.is_empty() {
            return Err(Error::validation_field("cluster", "must not be empty"));
        }
        Ok(Self { cluster })
    }

    /// Returns the cluster name.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Maven coordinates required to use this connector: none, Hive
    /// support is bundled with the runtime.
    pub fn get_packages() -> Result<Vec<MavenCoordinate>> {
        Ok(Vec::new())
    }
}

impl SqlConnection for Hive {
    fn kind(&self) -> &'static str {
        "Hive"
    }

    fn instance_url(&self) -> String {
        format!("hive://{}", self.cluster)
    }

    fn dialect(&self) -> &dyn Dialect {
        &HiveDialect
    }
}

/// Hive literal rendering.
#[derive(Debug, Clone, Copy)]
pub struct HiveDialect;

impl Dialect for HiveDialect {
    fn name(&self) -> &'static str {
        "hive"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!(
            "CAST('{}' AS TIMESTAMP)",
            value.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("CAST('{}' AS DATE)", value.format("%Y-%m-%d"))
    }
}
