//! Oracle connector.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, JavaVersion, MavenCoordinate, Result, SecretString};

use crate::connection::SqlConnection;
use crate::dialect::Dialect;

/// JDBC driver class loaded by the runtime.
pub const DRIVER: &str = "oracle.jdbc.driver.OracleDriver";

/// Maven coordinate of the Oracle JDBC driver (Java 8 build).
#[deprecated(since = "0.5.0", note = "use `Oracle::get_packages(..)` instead")]
pub const PACKAGE: &str = "com.oracle.database.jdbc:ojdbc8:23.2.0.0";

const DRIVER_VERSION: &str = "23.2.0.0";

/// How an Oracle instance is addressed.
///
/// Exactly one of SID or service name identifies an instance; the enum
/// makes passing both (or neither) unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleInstance {
    /// Address by SID, e.g. `XE`.
    Sid(String),

    /// Address by service name, e.g. `MYDATA`.
    ServiceName(String),
}

impl OracleInstance {
    fn validate(&self) -> Result<()> {
        let (field, value) = match self {
            OracleInstance::Sid(value) => ("sid", value),
            OracleInstance::ServiceName(value) => ("service_name", value),
        };
        if value.is_empty() {
            return Err(Error::validation_field(field, "must not be empty"));
        }
        Ok(())
    }
}

/// Oracle connector descriptor.
///
/// Supported server versions: 23c, 21c, 19c, and 12.2.
///
/// # Examples
///
/// ```
/// use kondukt_db::{Oracle, OracleInstance};
///
/// let oracle = Oracle::new(
///     "oracle.local",
///     OracleInstance::Sid("XE".into()),
///     "SOME_USER",
///     "*****",
/// )
/// .unwrap();
/// assert_eq!(oracle.jdbc_url(), "jdbc:oracle:thin:@oracle.local:1521:XE");
/// ```
#[derive(Debug, Clone)]
pub struct Oracle {
    host: String,
    port: u16,
    instance: OracleInstance,
    user: String,
    password: SecretString,
    extra: BTreeMap<String, String>,
}

impl Oracle {
    /// Default Oracle listener port.
    pub const DEFAULT_PORT: u16 = 1521;

    /// Creates a connector for the given instance.
    pub fn new<H, U, P>(host: H, instance: OracleInstance, user: U, password: P) -> Result<Self>
    where
        H: Into<String>,
        U: Into<String>,
        P: Into<SecretString>,
    {
        let host = host.into();
        if host.is_empty() {
            return Err(Error::validation_field("host", "must not be empty"));
        }
        instance.validate()?;

        Ok(Self {
            host,
            port: Self::DEFAULT_PORT,
            instance,
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

    /// Adds a driver property.
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

    /// Returns the instance addressing.
    pub fn instance(&self) -> &OracleInstance {
        &self.instance
    }

    /// Renders the JDBC URL for this instance.
    ///
    /// SIDs use the legacy `host:port:sid` form, service names the
    /// `//host:port/service` form.
    pub fn jdbc_url(&self) -> String {
        match &self.instance {
            OracleInstance::Sid(sid) => {
                format!("jdbc:oracle:thin:@{}:{}:{sid}", self.host, self.port)
            }
            OracleInstance::ServiceName(service) => {
                format!("jdbc:oracle:thin:@//{}:{}/{service}", self.host, self.port)
            }
        }
    }

    /// Maven coordinates required to use this connector.
    ///
    /// Oracle publishes the driver per Java generation: `ojdbc8` below
    /// Java 11, `ojdbc11` from Java 11 on. Defaults to Java 8.
    pub fn get_packages(java_version: Option<JavaVersion>) -> Result<Vec<MavenCoordinate>> {
        let java = java_version.unwrap_or_default();
        let artifact = if java.major() >= 11 { "ojdbc11" } else { "ojdbc8" };
        Ok(vec![MavenCoordinate::new(
            "com.oracle.database.jdbc",
            artifact,
            DRIVER_VERSION,
        )?])
    }
}

impl SqlConnection for Oracle {
    fn kind(&self) -> &'static str {
        "Oracle"
    }

    fn instance_url(&self) -> String {
        let suffix = match &self.instance {
            OracleInstance::Sid(sid) => sid,
            OracleInstance::ServiceName(service) => service,
        };
        format!("oracle://{}:{}/{suffix}", self.host, self.port)
    }

    fn dialect(&self) -> &dyn Dialect {
        &OracleDialect
    }

    fn check_query(&self) -> &'static str {
        "SELECT 1 FROM dual"
    }
}

/// Oracle literal rendering.
#[derive(Debug, Clone, Copy)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String {
        format!(
            "TO_TIMESTAMP('{}', 'YYYY-MM-DD HH24:MI:SS.FF6')",
            value.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", value.format("%Y-%m-%d"))
    }
}
