//! Greenplum connector.

use std::collections::BTreeMap;

use kondukt_core::{Error, MavenCoordinate, Result, ScalaVersion, SecretString, SparkVersion};

use crate::connection::postgres::PostgresDialect;
use crate::connection::{SqlConnection, render_query_params};
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "org.postgresql.Driver";

const CONNECTOR_VERSION: &str = "2.2.0";

/// Maven coordinate of the Greenplum Spark connector for Spark 2.3.
#[deprecated(since = "0.5.0", note = "use `Greenplum::get_packages(..)` instead")]
pub const PACKAGE_SPARK_2_3: &str = "io.pivotal:greenplum-spark_2.11:2.2.0";

/// Maven coordinate of the Greenplum Spark connector for Spark 2.4.
#[deprecated(since = "0.5.0", note = "use `Greenplum::get_packages(..)` instead")]
pub const PACKAGE_SPARK_2_4: &str = "io.pivotal:greenplum-spark_2.11:2.2.0";

/// Maven coordinate of the Greenplum Spark connector for Spark 3.2.
#[deprecated(since = "0.5.0", note = "use `Greenplum::get_packages(..)` instead")]
pub const PACKAGE_SPARK_3_2: &str = "io.pivotal:greenplum-spark_2.12:2.2.0";

/// Greenplum connector descriptor.
///
/// Greenplum speaks the PostgreSQL wire dialect, so URL rendering and
/// literals follow [`crate::Postgres`]; the packages differ because the
/// runtime connector is published per Spark/Scala pair.
#[derive(Debug, Clone)]
pub struct Greenplum {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl Greenplum {
    /// Default Greenplum coordinator port.
    pub const DEFAULT_PORT: u16 = 5432;

    /// Creates a connector for the given instance.
    pub fn new<H, D, U, P>(host: H, database: D, user: U, password: P) -> Result<Self>
    where
        H: Into<String>,
        D: Into<String>,
        U: Into<String>,
        P: Into<SecretString>,
    {
        let host = host.into();
        let database = database.into();

        if host.is_empty() {
            return Err(Error::validation_field("host", "must not be empty"));
        }
        if database.is_empty() {
            return Err(Error::validation_field(
                "database",
                "you should provide a database name for a Greenplum connection",
            ));
        }

        Ok(Self {
            host,
            port: Self::DEFAULT_PORT,
            database,
            user: user.into(),
            password: password.into(),
            extra: BTreeMap::new(),
        })
    }

    /// Overrides the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Adds a driver parameter appended to the JDBC URL.
    pub fn with_extra<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the configured password.
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Renders the JDBC URL for this instance.
    pub fn jdbc_url(&self) -> String {
        let params = render_query_params(&self.extra);
        if params.is_empty() {
            format!(
                "jdbc:postgresql://{}:{}/{}",
                self.host, self.port, self.database
            )
        } else {
            format!(
                "jdbc:postgresql://{}:{}/{}?{params}",
                self.host, self.port, self.database
            )
        }
    }

    /// Maven coordinates required to use this connector.
    ///
    /// The connector is published per Spark/Scala pair. Supported Spark
    /// lines are 2.3, 2.4, and 3.2; when `scala_version` is omitted it is
    /// derived from the Spark major. Defaults to Spark 3.2.4.
    pub fn get_packages(
        spark_version: Option<SparkVersion>,
        scala_version: Option<ScalaVersion>,
    ) -> Result<Vec<MavenCoordinate>> {
        let spark = spark_version.unwrap_or(SparkVersion::new(3, 2, 4));

        let supported = matches!(
            (spark.major(), spark.minor()),
            (2, 3) | (2, 4) | (3, 2)
        );
        if !supported {
            return Err(Error::validation_field(
                "spark_version",
                format!("Greenplum connector does not support Spark {spark}"),
            ));
        }

        let scala = scala_version.unwrap_or_else(|| ScalaVersion::default_for_spark(&spark));
        Ok(vec![MavenCoordinate::new(
            "io.pivotal",
            format!("greenplum-spark_{scala}"),
            CONNECTOR_VERSION,
        )?])
    }
}

impl SqlConnection for Greenplum {
    fn kind(&self) -> &'static str {
        "Greenplum"
    }

    fn instance_url(&self) -> String {
        format!("greenplum://{}:{}/{}", self.host, self.port, self.database)
    }

    fn dialect(&self) -> &dyn Dialect {
        &PostgresDialect
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_packages_default() {
        let packages = Greenplum::get_packages(None, None).unwrap();
        assert_eq!(
            packages[0].to_string(),
            "io.pivotal:greenplum-spark_2.12:2.2.0"
        );
    }

    #[test]
    fn test_get_packages_spark_2_derives_scala_2_11() {
        let spark: SparkVersion = "2.4.8".parse().unwrap();
        let packages = Greenplum::get_packages(Some(spark), None).unwrap();
        assert_eq!(
            packages[0].to_string(),
            "io.pivotal:greenplum-spark_2.11:2.2.0"
        );
    }

    #[test]
    fn test_get_packages_explicit_scala_wins() {
        let spark: SparkVersion = "2.4.8".parse().unwrap();
        let scala: ScalaVersion = "2.12".parse().unwrap();
        let packages = Greenplum::get_packages(Some(spark), Some(scala)).unwrap();
        assert_eq!(
            packages[0].to_string(),
            "io.pivotal:greenplum-spark_2.12:2.2.0"
        );
    }

    #[test]
    fn test_unsupported_spark_rejected() {
        for raw in ["3.4.1", "2.2.0", "3.3.0"] {
            let spark: SparkVersion = raw.parse().unwrap();
            let err = Greenplum::get_packages(Some(spark), None).unwrap_err();
            assert!(err.to_string().contains("does not support Spark"));
        }
    }

    #[test]
    fn test_deprecated_consts_match_resolution() {
        #[allow(deprecated)]
        let legacy = PACKAGE_SPARK_3_2;
        let spark: SparkVersion = "3.2.0".parse().unwrap();
        let current = Greenplum::get_packages(Some(spark), None).unwrap()[0].to_string();
        assert_eq!(legacy, current);
    }

    #[test]
    fn test_jdbc_url_is_postgres_wire() {
        let greenplum = Greenplum::new("gp.local", "adb", "tech_etl", "secret").unwrap();
        assert_eq!(greenplum.jdbc_url(), "jdbc:postgresql://gp.local:5432/adb");
        assert_eq!(greenplum.instance_url(), "greenplum://gp.local:5432/adb");
    }
}
