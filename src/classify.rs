//! Single-value classification.
//!
//! A value is tested against the catalog in a fixed precedence order and the
//! first storage type whose probe accepts it wins. Numeric probes use strict
//! bounds, so a value sitting exactly on a type's documented limit lands in
//! the next wider type.

use std::fmt;

use chrono::NaiveDate;
use log::trace;
use serde::{Serialize, Serializer};

use crate::{
    catalog::{
        NativeKind, StorageType, VALID_DAYS, VALID_HOURS, VALID_MINUTES, VALID_MONTHS,
        VALID_SECONDS, VALID_YEARS,
    },
    data::{SqlTime, Value},
    error::InferError,
};

/// Order in which candidates are probed. VARCHAR answers every string shorter
/// than 65535 characters, so TINYTEXT is never picked here.
pub const PRECEDENCE: [StorageType; 12] = [
    StorageType::Time,
    StorageType::Date,
    StorageType::DateTime,
    StorageType::Decimal,
    StorageType::Year,
    StorageType::TinyInt,
    StorageType::MediumInt,
    StorageType::Int,
    StorageType::BigInt,
    StorageType::Varchar,
    StorageType::MediumText,
    StorageType::LongText,
];

/// Parenthesised size qualifier of a storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Character count of a text value.
    Chars(usize),
    /// Integer-digit count and fractional-digit count of a decimal value.
    Precision { digits: usize, scale: usize },
}

impl Length {
    pub fn chars(&self) -> Option<usize> {
        match self {
            Length::Chars(count) => Some(*count),
            Length::Precision { .. } => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Chars(count) => write!(f, "{count}"),
            Length::Precision { digits, scale } => write!(f, "{digits}, {scale}"),
        }
    }
}

impl Serialize for Length {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Length::Chars(count) => serializer.serialize_u64(*count as u64),
            Length::Precision { .. } => serializer.collect_str(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub storage_type: StorageType,
    pub length: Option<Length>,
}

impl Classification {
    pub fn type_name(&self) -> &'static str {
        self.storage_type.name()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(length) => write!(f, "{} ({length})", self.storage_type),
            None => write!(f, "{}", self.storage_type),
        }
    }
}

pub fn classify(value: &Value) -> Result<Classification, InferError> {
    PRECEDENCE
        .iter()
        .find_map(|candidate| probe(*candidate, value))
        .ok_or_else(|| {
            trace!(
                "No storage type accepts {} value '{}'",
                value.kind_label(),
                value
            );
            InferError::undetermined(value.as_display())
        })
}

fn probe(candidate: StorageType, value: &Value) -> Option<Classification> {
    let descriptor = candidate.descriptor();
    let length = match (descriptor.native_kind, value) {
        (NativeKind::Time, Value::Time(time)) if is_valid_time(time) => None,
        (NativeKind::Date, Value::Date(date)) if is_valid_date(date) => None,
        (NativeKind::DateTime, Value::DateTime(_)) => None,
        (NativeKind::FloatingPoint, Value::Float(float)) if float.is_finite() => {
            Some(decimal_precision(&render_float(*float))?)
        }
        (NativeKind::FloatingPoint, Value::Decimal(decimal)) => {
            Some(decimal_precision(&decimal.to_string())?)
        }
        (NativeKind::FloatingPoint, Value::DecimalLiteral(literal)) => {
            Some(decimal_precision(literal)?)
        }
        (NativeKind::Integer, Value::Integer(int)) if descriptor.strictly_contains(*int) => None,
        (NativeKind::Text, Value::Text(text)) => {
            let count = text.chars().count();
            if !descriptor.fits_length(count) {
                return None;
            }
            Some(Length::Chars(count))
        }
        _ => return None,
    };
    Some(Classification {
        storage_type: candidate,
        length,
    })
}

fn is_valid_time(time: &SqlTime) -> bool {
    let rendered = time.to_string();
    if rendered.matches(':').count() != 2 {
        return false;
    }
    let mut parts = rendered.split(':');
    let (Some(hours), Some(minutes), Some(seconds)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let whole_seconds = seconds.split_once('.').map_or(seconds, |(whole, _)| whole);
    matches!(
        (
            hours.parse::<i64>(),
            minutes.parse::<i64>(),
            whole_seconds.parse::<i64>(),
        ),
        (Ok(h), Ok(m), Ok(s))
            if VALID_HOURS.contains(&h) && VALID_MINUTES.contains(&m) && VALID_SECONDS.contains(&s)
    )
}

fn is_valid_date(date: &NaiveDate) -> bool {
    let rendered = date.format("%Y-%m-%d").to_string();
    if rendered.matches('-').count() != 2 {
        return false;
    }
    let mut parts = rendered.split('-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    matches!(
        (year.parse::<i64>(), month.parse::<i64>(), day.parse::<i64>()),
        (Ok(y), Ok(m), Ok(d))
            if VALID_YEARS.contains(&y) && VALID_MONTHS.contains(&m) && VALID_DAYS.contains(&d)
    )
}

/// Positional rendering that keeps a fractional part: `42.0` stays `42.0`.
fn render_float(float: f64) -> String {
    let mut rendered = float.to_string();
    if !rendered.contains('.') {
        rendered.push_str(".0");
    }
    rendered
}

/// Splits a positional decimal string on `.`; the sign is not a digit.
fn decimal_precision(rendered: &str) -> Option<Length> {
    let unsigned = rendered.strip_prefix('-').unwrap_or(rendered);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Length::Precision {
        digits: integer.len(),
        scale: fraction.len(),
    })
}
