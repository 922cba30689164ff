//! PostgreSQL connector.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, MavenCoordinate, Result, SecretString};

use crate::connection::{SqlConnection, render_query_params};
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "org.postgresql.Driver";

/// Maven coordinate of the PostgreSQL JDBC driver.
#[deprecated(since = "0.5.0", note = "use `Postgres::get_packages()` instead")]
pub const PACKAGE: &str = "org.postgresql:postgresql:42.6.0";

/// PostgreSQL connector descriptor.
///
/// Supported server versions: 8.2 and above. The database name is
/// required — schemas are selected per table through
/// [`crate::TableName`], not through the connection.
///
/// # Examples
///
/// ```
/// use kondukt_db::Postgres;
///
/// let postgres = Postgres::new("test-db-vip.local", "target_db", "app_user", "*****")
///     .unwrap()
///     .with_extra("connectTimeout", "10");
///
/// assert_eq!(
///     postgres.jdbc_url(),
///     "jdbc:postgresql://test-db-vip.local:5432/target_db?connectTimeout=10"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Postgres {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl Postgres {
    /// Default PostgreSQL port.
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
                "you should provide a database name for a Postgres connection",
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

    /// Returns the configured user.
    pub fn user(&self) -> &str {
        &self.user
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

    /// Driver properties for fetch-only statements.
    ///
    /// Driver 42.2.9 added `readOnlyMode=transaction`, which would make
    /// fetches open writable transactions; pin `always` unless the caller
    /// overrides it.
    pub fn fetch_properties(&self) -> BTreeMap<String, String> {
        let mut properties = self.extra.clone();
        properties
            .entry("readOnlyMode".to_string())
            .or_insert_with(|| "always".to_string());
        properties
    }

    /// Maven coordinates required to use this connector.
    pub fn get_packages() -> Result<Vec<MavenCoordinate>> {
        Ok(vec![MavenCoordinate::new(
            "org.postgresql",
            "postgresql",
            "42.6.0",
        )?])
    }
}

impl SqlConnection for Postgres {
    fn kind(&self) -> &'static str {
        "Postgres"
    }

    fn instance_url(&self) -> String {
        format!("postgres://{}:{}/{}", self.host, self.port, self.database)
    }

    fn dialect(&self) -> &dyn Dialect {
        &PostgresDialect
    }
}

/// PostgreSQL literal rendering.
#[derive(Debug, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!("'{}'::timestamp", value.format("%Y-%m-%dT%H:%M:%S%.6f"))
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("'{}'::date", value.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn connector() -> Postgres {
        Postgres::new("test-db-vip.local", "target_db", "app_user", "secret").unwrap()
    }

    #[test]
    fn test_requires_database() {
        let err = Postgres::new("host", "", "user", "pass").unwrap_err();
        assert!(err.to_string().contains("database name"));
    }

    #[test]
    fn test_jdbc_url_without_extra() {
        assert_eq!(
            connector().jdbc_url(),
            "jdbc:postgresql://test-db-vip.local:5432/target_db"
        );
    }

    #[test]
    fn test_jdbc_url_with_extra_sorted() {
        let postgres = connector()
            .with_extra("ssl", "true")
            .with_extra("connectTimeout", "10");
        assert_eq!(
            postgres.jdbc_url(),
            "jdbc:postgresql://test-db-vip.local:5432/target_db?connectTimeout=10&ssl=true"
        );
    }

    #[test]
    fn test_instance_url_has_no_credentials() {
        let url = connector().instance_url();
        assert_eq!(url, "postgres://test-db-vip.local:5432/target_db");
        assert!(!url.contains("app_user"));
    }

    #[test]
    fn test_fetch_properties_pin_read_only() {
        let properties = connector().fetch_properties();
        assert_eq!(properties.get("readOnlyMode").map(String::as_str), Some("always"));

        let overridden = connector().with_extra("readOnlyMode", "transaction");
        assert_eq!(
            overridden.fetch_properties().get("readOnlyMode").map(String::as_str),
            Some("transaction")
        );
    }

    #[test]
    fn test_get_packages() {
        let packages = Postgres::get_packages().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].to_string(), "org.postgresql:postgresql:42.6.0");
    }

    #[test]
    fn test_debug_masks_password() {
        let rendered = format!("{:?}", connector());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("*****"));
    }

    #[test]
    fn test_dialect_literals() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            PostgresDialect.timestamp_literal(&ts),
            "'2024-03-01T12:00:00.000000'::timestamp"
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(PostgresDialect.date_literal(&date), "'2024-03-01'::date");
    }
}
