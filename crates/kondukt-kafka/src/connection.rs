//! Kafka connector descriptor.

use kondukt_core::{Error, MavenCoordinate, Result, ScalaVersion, SparkVersion};
use serde::{Deserialize, Serialize};

/// Maven coordinate of the Spark Kafka integration (Scala 2.12 build,
/// default Spark line).
#[deprecated(since = "0.5.0", note = "use `Kafka::get_packages(..)` instead")]
pub const PACKAGE: &str = "org.apache.spark:spark-sql-kafka-0-10_2.12:3.4.1";

/// Transport security selection.
///
/// Only the protocol name travels with the descriptor; credential flows
/// are owned by the runtime that opens the connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SecurityProtocol {
    /// Unauthenticated plaintext transport (default).
    #[default]
    Plaintext,

    /// TLS transport.
    Ssl,

    /// SASL over plaintext.
    SaslPlaintext,

    /// SASL over TLS.
    SaslSsl,
}

impl std::fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SecurityProtocol::Plaintext => "PLAINTEXT",
            SecurityProtocol::Ssl => "SSL",
            SecurityProtocol::SaslPlaintext => "SASL_PLAINTEXT",
            SecurityProtocol::SaslSsl => "SASL_SSL",
        };
        f.write_str(name)
    }
}

/// Kafka connector descriptor.
///
/// # Examples
///
/// ```
/// use kondukt_kafka::Kafka;
///
/// let kafka = Kafka::new("dwh", ["broker-1:9092", "broker-2:9092"]).unwrap();
/// assert_eq!(kafka.instance_url(), "kafka://dwh");
/// assert_eq!(kafka.bootstrap_servers(), "broker-1:9092,broker-2:9092");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kafka {
    cluster: String,
    addresses: Vec<String>,
    security_protocol: SecurityProtocol,
}

impl Kafka {
    /// Creates a connector for a cluster with the given broker addresses.
    pub fn new<C, I, A>(cluster: C, addresses: I) -> Result<Self>
    where
        C: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let cluster = cluster.into();
        if cluster.is_empty() {
            return Err(Error::validation_field("cluster", "must not be empty"));
        }

        let addresses: Vec<String> = addresses.into_iter().map(Into::into).collect();
        if addresses.is_empty() {
            return Err(Error::validation_field(
                "addresses",
                "at least one broker address is required",
            ));
        }
        for address in &addresses {
            validate_address(address)?;
        }

        Ok(Self {
            cluster,
            addresses,
            security_protocol: SecurityProtocol::default(),
        })
    }

    /// Sets the transport security protocol.
    pub fn with_security_protocol(mut self, protocol: SecurityProtocol) -> Self {
        self.security_protocol = protocol;
        self
    }

    /// Returns the cluster name.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Returns the broker addresses.
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Returns the configured security protocol.
    pub fn security_protocol(&self) -> SecurityProtocol {
        self.security_protocol
    }

    /// Stable URL identifying the cluster.
    pub fn instance_url(&self) -> String {
        format!("kafka://{}", self.cluster)
    }

    /// Renders the `bootstrap.servers` list.
    pub fn bootstrap_servers(&self) -> String {
        self.addresses.join(",")
    }

    /// Maven coordinates required to use this connector.
    ///
    /// The Spark Kafka integration is published per Spark/Scala pair;
    /// when `scala_version` is omitted it is derived from the Spark
    /// major. Defaults to Spark 3.4.1.
    pub fn get_packages(
        spark_version: Option<SparkVersion>,
        scala_version: Option<ScalaVersion>,
    ) -> Result<Vec<MavenCoordinate>> {
        let spark = spark_version.unwrap_or_default();
        if spark < SparkVersion::new(2, 3, 0) {
            return Err(Error::validation_field(
                "spark_version",
                format!("Kafka connector requires Spark 2.3 or later, got {spark}"),
            ));
        }

        let scala = scala_version.unwrap_or_else(|| ScalaVersion::default_for_spark(&spark));
        Ok(vec![MavenCoordinate::new(
            "org.apache.spark",
            format!("spark-sql-kafka-0-10_{scala}"),
            spark.to_string(),
        )?])
    }
}

fn validate_address(address: &str) -> Result<()> {
    let invalid = || {
        Error::validation_field(
            "addresses",
            format!("invalid broker address '{address}', expected 'host:port'"),
        )
    };

    let (host, port) = address.split_once(':').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    port.parse::<u16>().map_err(|_| invalid())?;
    Ok(())
}
