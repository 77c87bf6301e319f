//! Static catalog of the MySQL storage types the classifier can pick.
//!
//! Every entry pairs a storage type with the native value kind it accepts and
//! the bounds that kind is checked against. The catalog and the date/time
//! component ranges are process-wide constants; nothing here is mutated.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Accepted year component of a DATE value.
pub const VALID_YEARS: RangeInclusive<i64> = 1000..=9998;
pub const VALID_MONTHS: RangeInclusive<i64> = 1..=12;
/// Not calendar aware: day 31 is accepted for every month.
pub const VALID_DAYS: RangeInclusive<i64> = 1..=31;
pub const VALID_HOURS: RangeInclusive<i64> = -837..=837;
/// Minute zero is rejected.
pub const VALID_MINUTES: RangeInclusive<i64> = 1..=59;
pub const VALID_SECONDS: RangeInclusive<i64> = 0..=59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeKind {
    Text,
    Integer,
    FloatingPoint,
    Date,
    DateTime,
    Time,
}

impl NativeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeKind::Text => "text",
            NativeKind::Integer => "integer",
            NativeKind::FloatingPoint => "floating_point",
            NativeKind::Date => "date",
            NativeKind::DateTime => "datetime",
            NativeKind::Time => "time",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageType {
    TinyText,
    Varchar,
    MediumText,
    LongText,
    TinyInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Date,
    DateTime,
    Time,
    Year,
}

impl StorageType {
    /// Identifier as it appears in DDL.
    pub fn name(&self) -> &'static str {
        match self {
            StorageType::TinyText => "TINYTEXT",
            StorageType::Varchar => "VARCHAR",
            StorageType::MediumText => "MEDIUMTEXT",
            StorageType::LongText => "LONGTEXT",
            StorageType::TinyInt => "TINYINT",
            StorageType::MediumInt => "MEDIUMINT",
            StorageType::Int => "INT",
            StorageType::BigInt => "BIGINT",
            StorageType::Decimal => "DECIMAL",
            StorageType::Date => "DATE",
            StorageType::DateTime => "DATETIME",
            StorageType::Time => "TIME",
            StorageType::Year => "YEAR",
        }
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        // CATALOG is declared in enum order.
        &CATALOG[*self as usize]
    }

    pub fn native_kind(&self) -> NativeKind {
        self.descriptor().native_kind
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        lookup(value)
            .map(|descriptor| descriptor.storage_type)
            .ok_or_else(|| anyhow!("Unknown storage type '{value}'"))
    }
}

/// One catalog row. Numeric entries carry both bounds or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub storage_type: StorageType,
    pub name: &'static str,
    pub native_kind: NativeKind,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub max_length: Option<u64>,
}

impl TypeDescriptor {
    const fn text(storage_type: StorageType, name: &'static str, max_length: u64) -> Self {
        Self {
            storage_type,
            name,
            native_kind: NativeKind::Text,
            min_value: None,
            max_value: None,
            max_length: Some(max_length),
        }
    }

    const fn integer(storage_type: StorageType, name: &'static str, min: i64, max: i64) -> Self {
        Self {
            storage_type,
            name,
            native_kind: NativeKind::Integer,
            min_value: Some(min),
            max_value: Some(max),
            max_length: None,
        }
    }

    const fn unbounded(storage_type: StorageType, name: &'static str, kind: NativeKind) -> Self {
        Self {
            storage_type,
            name,
            native_kind: kind,
            min_value: None,
            max_value: None,
            max_length: None,
        }
    }

    /// Strict containment: the bounds themselves do not fit.
    pub fn strictly_contains(&self, value: i64) -> bool {
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => min < value && value < max,
            _ => false,
        }
    }

    /// Strict length check: a value of exactly `max_length` characters does not fit.
    pub fn fits_length(&self, length: usize) -> bool {
        self.max_length.is_some_and(|max| (length as u64) < max)
    }

    pub fn bounds_label(&self) -> String {
        match (self.min_value, self.max_value, self.max_length) {
            (Some(min), Some(max), _) => format!("[{min}, {max}]"),
            (_, _, Some(len)) => format!("max length {len}"),
            _ => String::from("none"),
        }
    }
}

pub static CATALOG: [TypeDescriptor; 13] = [
    TypeDescriptor::text(StorageType::TinyText, "tinytext", 255),
    TypeDescriptor::text(StorageType::Varchar, "varchar", 65_535),
    TypeDescriptor::text(StorageType::MediumText, "mediumtext", 16_777_215),
    TypeDescriptor::text(StorageType::LongText, "longtext", 4_294_967_295),
    TypeDescriptor::integer(StorageType::TinyInt, "tinyint", -128, 127),
    TypeDescriptor::integer(StorageType::MediumInt, "mediumint", -8_388_608, 8_388_607),
    TypeDescriptor::integer(StorageType::Int, "int", -2_147_483_648, 2_147_483_647),
    TypeDescriptor::integer(StorageType::BigInt, "bigint", i64::MIN, i64::MAX),
    TypeDescriptor::unbounded(StorageType::Decimal, "decimal", NativeKind::FloatingPoint),
    TypeDescriptor::unbounded(StorageType::Date, "date", NativeKind::Date),
    TypeDescriptor::unbounded(StorageType::DateTime, "datetime", NativeKind::DateTime),
    TypeDescriptor::unbounded(StorageType::Time, "time", NativeKind::Time),
    TypeDescriptor::integer(StorageType::Year, "year", 1901, 2155),
];

/// Case-insensitive lookup by type name.
pub fn lookup(name: &str) -> Option<&'static TypeDescriptor> {
    let trimmed = name.trim();
    CATALOG
        .iter()
        .find(|descriptor| descriptor.name.eq_ignore_ascii_case(trimmed))
}
