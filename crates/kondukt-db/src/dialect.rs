//! SQL literal rendering, one dialect per engine.
//!
//! Dialects exist for exactly one reason: engines disagree on how
//! timestamp and date literals are spelled. Everything else in the read
//! planner is engine-neutral.

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_hwm::HwmValue;

/// Renders typed values as SQL literals for one engine.
pub trait Dialect: Send + Sync {
    /// Engine name used in logs.
    fn name(&self) -> &'static str;

    /// Renders a timestamp literal.
    fn timestamp_literal(&self, value: &DateTime<Utc>) -> String;

    /// Renders a date literal.
    fn date_literal(&self, value: &NaiveDate) -> String;

    /// Renders a string literal with single quotes doubled.
    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Renders any high-water-mark value as a literal.
    fn literal(&self, value: &HwmValue) -> String {
        match value {
            HwmValue::Int(v) => v.to_string(),
            HwmValue::Float(v) => v.to_string(),
            HwmValue::Timestamp(v) => self.timestamp_literal(v),
            HwmValue::Date(v) => self.date_literal(v),
            HwmValue::String(v) => self.string_literal(v),
            _ => unreachable!("unhandled HwmValue variant"),
        }
    }
}
