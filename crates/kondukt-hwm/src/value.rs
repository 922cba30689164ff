//! Ordered high-water-mark values.

use chrono::{DateTime, NaiveDate, Utc};
use kondukt_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A scalar value tracked as a high-water mark.
///
/// Values of the same variant form a total order; comparing across
/// variants is a type error, since a mark written as a timestamp must
/// never silently compare against one written as an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum HwmValue {
    /// Integer column mark (sequence ids, epoch numbers).
    Int(i64),

    /// Floating-point column mark.
    Float(f64),

    /// Timestamp column mark.
    Timestamp(DateTime<Utc>),

    /// Date column mark.
    Date(NaiveDate),

    /// Opaque string column mark (lexicographic order).
    String(String),
}

impl HwmValue {
    /// Returns the variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            HwmValue::Int(_) => "int",
            HwmValue::Float(_) => "float",
            HwmValue::Timestamp(_) => "timestamp",
            HwmValue::Date(_) => "date",
            HwmValue::String(_) => "string",
        }
    }

    /// Compares two marks of the same variant.
    pub fn try_cmp(&self, other: &HwmValue) -> Result<std::cmp::Ordering> {
        use std::cmp::Ordering;

        let ordering = match (self, other) {
            (HwmValue::Int(a), HwmValue::Int(b)) => a.cmp(b),
            (HwmValue::Float(a), HwmValue::Float(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (HwmValue::Timestamp(a), HwmValue::Timestamp(b)) => a.cmp(b),
            (HwmValue::Date(a), HwmValue::Date(b)) => a.cmp(b),
            (HwmValue::String(a), HwmValue::String(b)) => a.cmp(b),
            (a, b) => {
                return Err(Error::validation(format!(
                    "cannot compare {} HWM against {} HWM",
                    a.kind(),
                    b.kind()
                )));
            }
        };

        Ok(ordering)
    }

    /// Returns the larger of two marks of the same variant.
    pub fn try_max(self, other: HwmValue) -> Result<HwmValue> {
        let ordering = self.try_cmp(&other)?;
        if ordering == std::cmp::Ordering::Less {
            Ok(other)
        } else {
            Ok(self)
        }
    }

    /// Shifts the mark down by an offset.
    ///
    /// Used by incremental reads with an overlap window: re-reading rows
    /// slightly below the stored mark tolerates late-arriving data.
    pub fn minus(&self, offset: &HwmOffset) -> Result<HwmValue> {
        match (self, offset) {
            (HwmValue::Int(value), HwmOffset::Int(offset)) => {
                Ok(HwmValue::Int(value.saturating_sub(*offset)))
            }
            (HwmValue::Float(value), HwmOffset::Float(offset)) => {
                Ok(HwmValue::Float(value - offset))
            }
            (HwmValue::Timestamp(value), HwmOffset::Seconds(seconds)) => {
                Ok(HwmValue::Timestamp(
                    *value - chrono::Duration::seconds(*seconds),
                ))
            }
            (HwmValue::Date(value), HwmOffset::Days(days)) => Ok(HwmValue::Date(
                *value - chrono::Duration::days(*days),
            )),
            (value, offset) => Err(Error::validation(format!(
                "offset {offset:?} cannot be applied to {} HWM",
                value.kind()
            ))),
        }
    }
}

/// An offset subtracted from a stored mark before an incremental read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum HwmOffset {
    /// Subtract from an integer mark.
    Int(i64),

    /// Subtract from a floating-point mark.
    Float(f64),

    /// Subtract whole seconds from a timestamp mark.
    Seconds(i64),

    /// Subtract whole days from a date mark.
    Days(i64),
}
