//! Maven package coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// A Maven coordinate in `group:artifact:version` form.
///
/// # Examples
///
/// ```
/// use kondukt_core::MavenCoordinate;
///
/// let coord: MavenCoordinate = "org.postgresql:postgresql:42.6.0".parse().unwrap();
/// assert_eq!(coord.group(), "org.postgresql");
/// assert_eq!(coord.to_string(), "org.postgresql:postgresql:42.6.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenCoordinate {
    group: String,
    artifact: String,
    version: String,
}

impl MavenCoordinate {
    /// Creates a coordinate from its three segments.
    ///
    /// Segments must be non-empty and restricted to ASCII alphanumerics,
    /// dots, underscores, and dashes.
    pub fn new<G, A, V>(group: G, artifact: A, version: V) -> Result<Self, Error>
    where
        G: Into<String>,
        A: Into<String>,
        V: Into<String>,
    {
        let group = group.into();
        let artifact = artifact.into();
        let version = version.into();

        for (name, segment) in [
            ("group", &group),
            ("artifact", &artifact),
            ("version", &version),
        ] {
            if !valid_segment(segment) {
                return Err(Error::validation_field(
                    name.to_string(),
                    format!("invalid Maven coordinate segment '{segment}'"),
                ));
            }
        }

        Ok(Self {
            group,
            artifact,
            version,
        })
    }

    /// Returns the group id.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the artifact id.
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Returns the artifact version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for MavenCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(':').collect();
        let [group, artifact, version] = segments.as_slice() else {
            return Err(Error::validation(format!(
                "invalid Maven coordinate '{s}', expected 'group:artifact:version'"
            )));
        };
        Self::new(*group, *artifact, *version)
    }
}

impl Serialize for MavenCoordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MavenCoordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
