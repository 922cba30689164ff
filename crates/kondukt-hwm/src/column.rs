//! Column high-water marks for incremental table reads.

use kondukt_core::Result;
use serde::{Deserialize, Serialize};

use crate::value::HwmValue;

/// Identifies the column a mark is tracked for.
///
/// The instance URL makes names collision-free across databases that
/// share table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSource {
    /// Instance URL of the connection (e.g. `postgres://host:5432/db`)
    pub instance: String,

    /// Fully qualified table name (`schema.name`)
    pub table: String,

    /// Column tracked by the mark
    pub column: String,
}

impl ColumnSource {
    /// Creates a column source.
    pub fn new<I, T, C>(instance: I, table: T, column: C) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            instance: instance.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    /// Returns the store key for this source.
    pub fn qualified_name(&self) -> String {
        format!("{}#{}@{}", self.column, self.table, self.instance)
    }
}

/// A column high-water mark: the largest value seen so far, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHwm {
    /// Column this mark belongs to
    pub source: ColumnSource,

    /// Largest value observed so far; `None` before the first run
    pub value: Option<HwmValue>,
}

impl ColumnHwm {
    /// Creates an empty mark for a column.
    pub fn new(source: ColumnSource) -> Self {
        Self {
            source,
            value: None,
        }
    }

    /// Returns the store key for this mark.
    pub fn qualified_name(&self) -> String {
        self.source.qualified_name()
    }

    /// Advances the mark to `candidate` if it is larger.
    ///
    /// Returns `true` when the mark moved. A mark never moves backwards,
    /// so re-running over old data cannot lose progress.
    pub fn update(&mut self, candidate: HwmValue) -> Result<bool> {
        match &self.value {
            None => {
                self.value = Some(candidate);
                Ok(true)
            }
            Some(current) => {
                let moved = current.try_cmp(&candidate)? == std::cmp::Ordering::Less;
                if moved {
                    self.value = Some(candidate);
                }
                Ok(moved)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn source() -> ColumnSource {
        ColumnSource::new("postgres://db:5432/app", "public.events", "event_id")
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            source().qualified_name(),
            "event_id#public.events@postgres://db:5432/app"
        );
    }

    #[test]
    fn test_update_moves_forward_only() {
        let mut hwm = ColumnHwm::new(source());
        assert!(hwm.update(HwmValue::Int(10)).unwrap());
        assert!(!hwm.update(HwmValue::Int(5)).unwrap());
        assert_eq!(hwm.value, Some(HwmValue::Int(10)));
        assert!(hwm.update(HwmValue::Int(11)).unwrap());
        assert_eq!(hwm.value, Some(HwmValue::Int(11)));
    }

    #[test]
    fn test_update_rejects_type_change() {
        let mut hwm = ColumnHwm::new(source());
        hwm.update(HwmValue::Int(10)).unwrap();
        assert!(hwm.update(HwmValue::String("abc".into())).is_err());
        assert_eq!(hwm.value, Some(HwmValue::Int(10)), "mark must survive a failed update");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut hwm = ColumnHwm::new(source());
        hwm.update(HwmValue::Int(42)).unwrap();
        let json = serde_json::to_string(&hwm).unwrap();
        let back: ColumnHwm = serde_json::from_str(&json).unwrap();
        assert_eq!(hwm, back);
    }
}
