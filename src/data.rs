use std::{fmt, str::FromStr};

use anyhow::{Context, Result, anyhow, bail, ensure};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::NativeKind;

/// A scalar drawn from one column, tagged with its native kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    /// Plain decimal literal with more digits than [`Decimal`] carries, kept as written.
    DecimalLiteral(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(SqlTime),
}

impl Value {
    /// Native kind used to pick classification candidates. Nulls and booleans have none.
    pub fn native_kind(&self) -> Option<NativeKind> {
        match self {
            Value::Null | Value::Boolean(_) => None,
            Value::Text(_) => Some(NativeKind::Text),
            Value::Integer(_) => Some(NativeKind::Integer),
            Value::Float(_) | Value::Decimal(_) | Value::DecimalLiteral(_) => {
                Some(NativeKind::FloatingPoint)
            }
            Value::Date(_) => Some(NativeKind::Date),
            Value::DateTime(_) => Some(NativeKind::DateTime),
            Value::Time(_) => Some(NativeKind::Time),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            other => other
                .native_kind()
                .map(|kind| kind.as_str())
                .unwrap_or("unknown"),
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Null => String::from("NULL"),
            Value::Boolean(b) => b.to_string(),
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::DecimalLiteral(literal) => literal.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Time(t) => t.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<SqlTime> for Value {
    fn from(value: SqlTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(SqlTime::from(value))
    }
}

/// Signed elapsed-time value in the MySQL `TIME` sense: hours may exceed 23
/// and the whole value may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlTime {
    pub negative: bool,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub micros: u32,
}

impl SqlTime {
    pub fn new(hours: i64, minutes: u32, seconds: u32) -> Result<Self> {
        ensure!(minutes < 60, "Minutes must be below 60 (got {minutes})");
        ensure!(seconds < 60, "Seconds must be below 60 (got {seconds})");
        let magnitude = u32::try_from(hours.unsigned_abs())
            .map_err(|_| anyhow!("Hour component {hours} is out of range"))?;
        Ok(Self {
            negative: hours < 0,
            hours: magnitude,
            minutes,
            seconds,
            micros: 0,
        })
    }

    pub fn with_micros(mut self, micros: u32) -> Result<Self> {
        ensure!(micros < 1_000_000, "Microseconds must be below 1000000");
        self.micros = micros;
        Ok(self)
    }
}

impl From<NaiveTime> for SqlTime {
    fn from(value: NaiveTime) -> Self {
        Self {
            negative: false,
            hours: value.hour(),
            minutes: value.minute(),
            seconds: value.second(),
            // leap-second nanos run past one second
            micros: (value.nanosecond() / 1_000).min(999_999),
        }
    }
}

impl fmt::Display for SqlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.micros > 0 {
            write!(f, ".{:06}", self.micros)?;
        }
        Ok(())
    }
}

impl FromStr for SqlTime {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let mut parts = body.split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            bail!("Failed to parse '{value}' as time: expected HH:MM:SS");
        };
        let hours = parse_digits(hours)
            .with_context(|| format!("Failed to parse hours of '{value}'"))?;
        ensure!(
            minutes.len() == 2,
            "Failed to parse '{value}' as time: minutes must have two digits"
        );
        let minutes = parse_digits(minutes)
            .with_context(|| format!("Failed to parse minutes of '{value}'"))?;
        let (whole, fraction) = match seconds.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (seconds, None),
        };
        ensure!(
            whole.len() == 2,
            "Failed to parse '{value}' as time: seconds must have two digits"
        );
        let seconds = parse_digits(whole)
            .with_context(|| format!("Failed to parse seconds of '{value}'"))?;
        let micros = match fraction {
            Some(digits) => {
                ensure!(
                    (1..=6).contains(&digits.len()),
                    "Failed to parse '{value}' as time: fractional seconds take 1-6 digits"
                );
                let parsed = parse_digits(digits)?;
                parsed * 10u32.pow(6 - digits.len() as u32)
            }
            None => 0,
        };
        let signed_hours = if negative {
            -i64::from(hours)
        } else {
            i64::from(hours)
        };
        let mut time = SqlTime::new(signed_hours, minutes, seconds)?.with_micros(micros)?;
        // "-00:30:00" keeps its sign even though the hour is zero
        time.negative = negative;
        Ok(time)
    }
}

fn parse_digits(value: &str) -> Result<u32> {
    ensure!(
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
        "'{value}' is not a digit sequence"
    );
    value
        .parse::<u32>()
        .with_context(|| format!("'{value}' is out of range"))
}

/// How a raw textual cell should be turned into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// Detect the native kind from the literal
    #[default]
    Auto,
    Text,
    Integer,
    Float,
    Date,
    Datetime,
    Time,
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Parses a fractional literal, keeping its written scale. Plain literals that
/// a [`Decimal`] cannot hold digit for digit stay as [`Value::DecimalLiteral`];
/// exponent forms fall back to `f64`.
pub fn parse_fractional(value: &str) -> Result<Value> {
    if looks_like_plain_decimal(value) {
        let written_scale = value.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        return Ok(match Decimal::from_str(value) {
            Ok(parsed) if parsed.scale() as usize == written_scale => Value::Decimal(parsed),
            _ => Value::DecimalLiteral(normalize_decimal_literal(value)),
        });
    }
    let parsed: f64 = value
        .parse()
        .with_context(|| format!("Failed to parse '{value}' as float"))?;
    ensure!(parsed.is_finite(), "Failed to parse '{value}' as a finite float");
    Ok(Value::Float(parsed))
}

/// Drops a leading `+` and redundant leading zeros: `+007.50` → `7.50`, `-.5` → `-0.5`.
fn normalize_decimal_literal(value: &str) -> String {
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value)),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    match fraction {
        Some(fraction) => format!("{sign}{integer}.{fraction}"),
        None => format!("{sign}{integer}"),
    }
}

fn looks_like_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Detects the native kind of a raw literal. Empty input is [`Value::Null`];
/// anything that is not numeric or temporal stays text.
pub fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Value::Integer(parsed);
    }
    if trimmed.bytes().any(|b| b.is_ascii_digit())
        && let Ok(parsed) = parse_fractional(trimmed)
    {
        return parsed;
    }
    if let Ok(parsed) = parse_naive_datetime(trimmed) {
        return Value::DateTime(parsed);
    }
    if let Ok(parsed) = parse_naive_date(trimmed) {
        return Value::Date(parsed);
    }
    if let Ok(parsed) = trimmed.parse::<SqlTime>() {
        return Value::Time(parsed);
    }
    Value::Text(raw.to_string())
}

pub fn parse_typed_value(raw: &str, kind: ValueKind) -> Result<Value> {
    if kind == ValueKind::Text {
        return Ok(Value::Text(raw.to_string()));
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    let parsed = match kind {
        ValueKind::Auto => parse_value(raw),
        ValueKind::Text => Value::Text(raw.to_string()),
        ValueKind::Integer => {
            let parsed: i64 = trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{trimmed}' as integer"))?;
            Value::Integer(parsed)
        }
        ValueKind::Float => parse_fractional(trimmed)?,
        ValueKind::Date => Value::Date(parse_naive_date(trimmed)?),
        ValueKind::Datetime => Value::DateTime(parse_naive_datetime(trimmed)?),
        ValueKind::Time => Value::Time(trimmed.parse()?),
    };
    Ok(parsed)
}
