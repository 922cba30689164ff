//! ClickHouse connector.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, MavenCoordinate, Result, SecretString};

use crate::connection::{SqlConnection, render_query_params};
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "com.clickhouse.jdbc.ClickHouseDriver";

/// Maven coordinate of the ClickHouse JDBC driver.
#[deprecated(since = "0.5.0", note = "use `Clickhouse::get_packages()` instead")]
pub const PACKAGE: &str = "com.clickhouse:clickhouse-jdbc:0.4.5";

/// ClickHouse connector descriptor.
///
/// Talks to the HTTP interface (default port 8123).
#[derive(Debug, Clone)]
pub struct Clickhouse {
    host: String,
    port: u16,
    database: Option<String>,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl Clickhouse {
    /// Default ClickHouse HTTP port.
    pub const DEFAULT_PORT: u16 = 8123;

    /// Creates a connector for the given instance.
    pub fn new<H, U, P>(host: H, user: U, password: P) -> Result<Self>
    where
        H: Into<String>,
        U: Into<String>,
        P: Into<SecretString>,
    {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::validation_field("host", "must not be empty"));
        }

        Ok(Self {
            host,
            port: Self::DEFAULT_PORT,
            database: None,
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

    /// Sets the database the URL points at.
    pub fn with_database<D: Into<String>>(mut self, database: D) -> Self {
        self.database = Some(database.into());
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
        let mut url = format!("jdbc:clickhouse://{}:{}", self.host, self.port);
        if let Some(database) = &self.database {
            url.push('/');
            url.push_str(database);
        }
        let params = render_query_params(&self.extra);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params);
        }
        url
    }

    /// Maven coordinates required to use this connector.
    pub fn get_packages() -> Result<Vec<MavenCoordinate>> {
        Ok(vec![MavenCoordinate::new(
            "com.clickhouse",
            "clickhouse-jdbc",
            "0.4.5",
        )?])
    }
}

impl SqlConnection for Clickhouse {
    fn kind(&self) -> &'static str {
        "Clickhouse"
    }

    fn instance_url(&self) -> String {
        match &self.database {
            Some(database) => format!("clickhouse://{}:{}/{database}", self.host, self.port),
            None => format!("clickhouse://{}:{}", self.host, self.port),
        }
    }

    fn dialect(&self) -> &dyn Dialect {
        &ClickhouseDialect
    }
}

/// ClickHouse literal rendering.
///
/// `DateTime` carries second precision; fractional seconds are dropped
/// rather than rendered into a literal the engine would reject.
#[derive(Debug, Clone, Copy)]
pub struct ClickhouseDialect;

impl Dialect for ClickhouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!(
            "CAST('{}' AS DateTime)",
            value.format("%Y-%m-%d %H:%M:%S")
        )
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("CAST('{}' AS Date)", value.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_jdbc_url_variants() {
        let base = Clickhouse::new("ch.local", "default", "").unwrap();
        assert_eq!(base.jdbc_url(), "jdbc:clickhouse://ch.local:8123");

        let with_db = Clickhouse::new("ch.local", "default", "")
            .unwrap()
            .with_database("events")
            .with_extra("socket_timeout", "300000");
        assert_eq!(
            with_db.jdbc_url(),
            "jdbc:clickhouse://ch.local:8123/events?socket_timeout=300000"
        );
    }

    #[test]
    fn test_get_packages() {
        assert_eq!(
            Clickhouse::get_packages().unwrap()[0].to_string(),
            "com.clickhouse:clickhouse-jdbc:0.4.5"
        );
    }

    #[test]
    fn test_timestamp_literal_drops_micros() {
        use chrono::TimeZone;
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123))
            .unwrap();
        assert_eq!(
            ClickhouseDialect.timestamp_literal(&ts),
            "CAST('2024-03-01 12:00:00' AS DateTime)"
        );
    }
}
