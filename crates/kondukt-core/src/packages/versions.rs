//! Runtime version types accepted by `get_packages(...)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A Java major version (8, 11, 17, ...).
///
/// The legacy `1.x` spelling is accepted for versions below 9, so
/// `"1.8"` parses to Java 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JavaVersion(u8);

impl JavaVersion {
    /// Default Java version assumed when a caller passes none.
    pub const DEFAULT: JavaVersion = JavaVersion(8);

    /// Creates a Java version from its major number.
    pub fn new(major: u8) -> Result<Self, Error> {
        if !(6..=99).contains(&major) {
            return Err(Error::validation_field(
                "java_version",
                format!("unsupported Java major version {major}"),
            ));
        }
        Ok(Self(major))
    }

    /// Returns the major number.
    pub fn major(&self) -> u8 {
        self.0
    }
}

impl Default for JavaVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JavaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("1.").unwrap_or(s);
        let major: u8 = digits.parse().map_err(|_| {
            Error::validation_field("java_version", format!("invalid Java version '{s}'"))
        })?;
        Self::new(major)
    }
}

/// A Scala binary version (`major.minor`, e.g. `2.12`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScalaVersion {
    major: u8,
    minor: u8,
}

impl ScalaVersion {
    /// Scala 2.11, the binary version paired with Spark 2.x.
    pub const V2_11: ScalaVersion = ScalaVersion {
        major: 2,
        minor: 11,
    };

    /// Scala 2.12, the binary version paired with Spark 3.x.
    pub const V2_12: ScalaVersion = ScalaVersion {
        major: 2,
        minor: 12,
    };

    /// Creates a Scala version from major and minor numbers.
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Returns the binary version paired with the given Spark release.
    ///
    /// Spark 2.x artifacts are published for Scala 2.11, Spark 3.x for
    /// Scala 2.12.
    pub fn default_for_spark(spark: &SparkVersion) -> Self {
        if spark.major() >= 3 {
            Self::V2_12
        } else {
            Self::V2_11
        }
    }
}

impl fmt::Display for ScalaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ScalaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || Error::validation_field("scala_version", format!("invalid Scala version '{s}'"));

        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        let major: u8 = major.parse().map_err(|_| invalid())?;
        let minor: u8 = minor.parse().map_err(|_| invalid())?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for ScalaVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScalaVersion> for String {
    fn from(version: ScalaVersion) -> Self {
        version.to_string()
    }
}

/// A Spark release version (`major.minor.patch`).
///
/// A missing patch component parses as `.0`, so `"3.4"` equals `"3.4.0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SparkVersion {
    major: u8,
    minor: u8,
    patch: u8,
}

impl SparkVersion {
    /// Default Spark version assumed when a caller passes none.
    pub const DEFAULT: SparkVersion = SparkVersion {
        major: 3,
        minor: 4,
        patch: 1,
    };

    /// Creates a Spark version from its components.
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns the major number.
    pub fn major(&self) -> u8 {
        self.major
    }

    /// Returns the minor number.
    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Returns the patch number.
    pub fn patch(&self) -> u8 {
        self.patch
    }
}

impl Default for SparkVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SparkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SparkVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || Error::validation_field("spark_version", format!("invalid Spark version '{s}'"));

        let mut parts = s.split('.');
        let major: u8 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let minor: u8 = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let patch: u8 = match parts.next() {
            Some(patch) => patch.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl TryFrom<String> for SparkVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SparkVersion> for String {
    fn from(version: SparkVersion) -> Self {
        version.to_string()
    }
}
