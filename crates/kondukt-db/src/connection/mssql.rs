//! Microsoft SQL Server connector.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, JavaVersion, MavenCoordinate, Result, SecretString};

use crate::connection::SqlConnection;
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "com.microsoft.sqlserver.jdbc.SQLServerDriver";

/// Maven coordinate of the MSSQL JDBC driver (Java 8 build).
#[deprecated(since = "0.5.0", note = "use `Mssql::get_packages(..)` instead")]
pub const PACKAGE: &str = "com.microsoft.sqlserver:mssql-jdbc:12.2.0.jre8";

const DRIVER_VERSION: &str = "12.2.0";

/// Microsoft SQL Server connector descriptor.
///
/// Supported server versions: 2012 and above. Upstream publishes the
/// driver per Java generation, so [`Mssql::get_packages`] takes the
/// target Java version.
#[derive(Debug, Clone)]
pub struct Mssql {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl Mssql {
    /// Default SQL Server port.
    pub const DEFAULT_PORT: u16 = 1433;

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
                "you should provide a database name for a MSSQL connection",
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

    /// Adds a driver property appended to the JDBC URL.
    ///
    /// Domain auth, for example, is configured entirely through extras
    /// (`Domain`, `IntegratedSecurity`, `authenticationScheme`).
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
    ///
    /// SQL Server separates properties with `;`, not query-string `&`.
    pub fn jdbc_url(&self) -> String {
        let mut url = format!(
            "jdbc:sqlserver://{}:{};databaseName={}",
            self.host, self.port, self.database
        );
        for (key, value) in &self.extra {
            url.push_str(&format!(";{key}={value}"));
        }
        url
    }

    /// Maven coordinates required to use this connector.
    ///
    /// The artifact classifier follows the Java generation: `jre8` below
    /// Java 11, `jre11` from Java 11 on. Defaults to Java 8.
    pub fn get_packages(java_version: Option<JavaVersion>) -> Result<Vec<MavenCoordinate>> {
        let java = java_version.unwrap_or_default();
        let classifier = if java.major() >= 11 { "jre11" } else { "jre8" };
        Ok(vec![MavenCoordinate::new(
            "com.microsoft.sqlserver",
            "mssql-jdbc",
            format!("{DRIVER_VERSION}.{classifier}"),
        )?])
    }
}

impl SqlConnection for Mssql {
    fn kind(&self) -> &'static str {
        "MSSQL"
    }

    fn instance_url(&self) -> String {
        format!("mssql://{}:{}/{}", self.host, self.port, self.database)
    }

    fn dialect(&self) -> &dyn Dialect {
        &MssqlDialect
    }
}

/// SQL Server literal rendering.
#[derive(Debug, Clone, Copy)]
pub struct MssqlDialect;

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!(
            "CAST('{}' AS datetime2)",
            value.format("%Y-%m-%dT%H:%M:%S%.6f")
        )
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("CAST('{}' AS date)", value.format("%Y-%m-%d"))
    }
}
