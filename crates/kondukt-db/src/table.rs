//! Fully qualified table names.

use std::fmt;
use std::str::FromStr;

use kondukt_core::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn valid_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$'))
}

/// A table name qualified with its schema, `schema.name`.
///
/// Bare table names are rejected: resolution rules for unqualified names
/// differ per engine and session, so every reader and writer works with
/// the full path.
///
/// # Examples
///
/// ```
/// use kondukt_db::TableName;
///
/// let table: TableName = "public.events".parse().unwrap();
/// assert_eq!(table.schema(), "public");
/// assert_eq!(table.name(), "events");
/// assert!("events".parse::<TableName>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    schema: String,
    name: String,
}

impl TableName {
    /// Creates a table name from schema and name identifiers.
    pub fn new<S, N>(schema: S, name: N) -> Result<Self, Error>
    where
        S: Into<String>,
        N: Into<String>,
    {
        let schema = schema.into();
        let name = name.into();

        for (field, identifier) in [("schema", &schema), ("table", &name)] {
            if !valid_identifier(identifier) {
                return Err(Error::validation_field(
                    field.to_string(),
                    format!("invalid identifier '{identifier}'"),
                ));
            }
        }

        Ok(Self { schema, name })
    }

    /// Returns the schema identifier.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the table identifier.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

impl FromStr for TableName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((schema, name)) = s.split_once('.') else {
            return Err(Error::validation(format!(
                "table name '{s}' must be qualified as 'schema.name'"
            )));
        };
        if name.contains('.') {
            return Err(Error::validation(format!(
                "table name '{s}' has too many segments, expected 'schema.name'"
            )));
        }
        Self::new(schema, name)
    }
}

impl Serialize for TableName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TableName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified_name() {
        let table: TableName = "fiddle.dummy".parse().unwrap();
        assert_eq!(table.schema(), "fiddle");
        assert_eq!(table.name(), "dummy");
        assert_eq!(table.to_string(), "fiddle.dummy");
    }

    #[test]
    fn test_unqualified_name_rejected() {
        let err = "dummy".parse::<TableName>().unwrap_err();
        assert!(err.to_string().contains("must be qualified"));
    }

    #[test]
    fn test_too_many_segments_rejected() {
        assert!("db.schema.table".parse::<TableName>().is_err());
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        assert!("public.1table".parse::<TableName>().is_err());
        assert!("pub lic.table".parse::<TableName>().is_err());
        assert!("public.".parse::<TableName>().is_err());
        assert!("public.ta;ble".parse::<TableName>().is_err());
    }

    #[test]
    fn test_underscore_and_dollar_allowed() {
        assert!("_staging.events$old".parse::<TableName>().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let table: TableName = "public.events".parse().unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#""public.events""#);
        let back: TableName = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
