//! Masked secret values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string that never leaks through `Display`, `Debug`, or serialization.
///
/// Connection parameters are logged when a connector is checked, so
/// passwords are stored behind this type. The raw value is only reachable
/// through [`SecretString::expose`].
///
/// # Examples
///
/// ```
/// use kondukt_core::SecretString;
///
/// let secret = SecretString::new("hunter2");
/// assert_eq!(format!("{secret}"), "*****");
/// assert_eq!(format!("{secret:?}"), "SecretString(*****)");
/// assert_eq!(secret.expose(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a secret value.
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*****")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(*****)")
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for SecretString {
    /// Serializes as the masked placeholder, not the raw value.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("*****")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(raw))
    }
}
