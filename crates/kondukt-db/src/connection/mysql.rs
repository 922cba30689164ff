//! MySQL connector.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, MavenCoordinate, Result, SecretString};

use crate::connection::{SqlConnection, render_query_params};
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "com.mysql.cj.jdbc.Driver";

/// Maven coordinate of the MySQL JDBC driver.
#[deprecated(since = "0.5.0", note = "use `MySql::get_packages()` instead")]
pub const PACKAGE: &str = "com.mysql:mysql-connector-j:8.0.33";

/// MySQL connector descriptor.
///
/// Supported server versions: 5.7 and 8.0. The database is optional;
/// without one the URL points at the instance and tables must be fully
/// qualified.
#[derive(Debug, Clone)]
pub struct MySql {
    host: String,
    port: u16,
    database: Option<String>,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl MySql {
    /// Default MySQL port.
    pub const DEFAULT_PORT: u16 = 3306;

    /// Creates a connector for the given instance.
    ///
    /// `extra` starts with the charset defaults every deployment wants
    /// (`useUnicode=yes`, `characterEncoding=UTF-8`); both can be
    /// overridden through [`MySql::with_extra`].
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

        let mut extra = BTreeMap::new();
        extra.insert("useUnicode".to_string(), "yes".to_string());
        extra.insert("characterEncoding".to_string(), "UTF-8".to_string());

        Ok(Self {
            host,
            port: Self::DEFAULT_PORT,
            database: None,
            user: user.into(),
            password: password.into(),
            extra,
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
        let params = render_query_params(&self.extra);
        match &self.database {
            Some(database) => format!(
                "jdbc:mysql://{}:{}/{database}?{params}",
                self.host, self.port
            ),
            None => format!("jdbc:mysql://{}:{}?{params}", self.host, self.port),
        }
    }

    /// Maven coordinates required to use this connector.
    pub fn get_packages() -> Result<Vec<MavenCoordinate>> {
        Ok(vec![MavenCoordinate::new(
            "com.mysql",
            "mysql-connector-j",
            "8.0.33",
        )?])
    }
}

impl SqlConnection for MySql {
    fn kind(&self) -> &'static str {
        "MySQL"
    }

    fn instance_url(&self) -> String {
        match &self.database {
            Some(database) => format!("mysql://{}:{}/{database}", self.host, self.port),
            None => format!("mysql://{}:{}", self.host, self.port),
        }
    }

    fn dialect(&self) -> &dyn Dialect {
        &MySqlDialect
    }
}

/// MySQL literal rendering.
#[derive(Debug, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!(
            "STR_TO_DATE('{}', '%Y-%m-%d %H:%i:%s.%f')",
            value.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("STR_TO_DATE('{}', '%Y-%m-%d')", value.format("%Y-%m-%d"))
    }
}
