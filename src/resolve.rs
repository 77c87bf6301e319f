//! Column-level type resolution.
//!
//! Every value of a column is classified on its own; the most frequent storage
//! type wins and its widest length becomes the column's size qualifier. Ties
//! go to the type that appeared first in the column.

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::StorageType,
    classify::{Length, classify},
    data::Value,
    error::InferError,
};

/// Caller preferences applied after the most frequent type is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Rewrite any `*TEXT` winner to VARCHAR, keeping its length.
    pub prefer_varchar: bool,
    /// Rewrite any `*INT` winner to INT.
    pub prefer_int: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub storage_type: StorageType,
    pub count: usize,
    /// Widest length seen among values of this type.
    pub length: Option<Length>,
}

/// Occurrence counts per storage type, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeTally {
    entries: Vec<TallyEntry>,
}

impl TypeTally {
    pub fn record(&mut self, storage_type: StorageType, length: Option<Length>) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.storage_type == storage_type)
        {
            entry.count += 1;
            entry.length = widest(entry.length, length);
            return;
        }
        self.entries.push(TallyEntry {
            storage_type,
            count: 1,
            length,
        });
    }

    pub fn count(&self, storage_type: StorageType) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.storage_type == storage_type)
            .map_or(0, |entry| entry.count)
    }

    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Highest count wins; on a tie the earlier entry is kept.
    pub fn most_frequent(&self) -> Option<&TallyEntry> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(current) if current.count >= entry.count => Some(current),
            _ => Some(entry),
        })
    }
}

fn widest(current: Option<Length>, candidate: Option<Length>) -> Option<Length> {
    match (current, candidate) {
        (Some(Length::Chars(a)), Some(Length::Chars(b))) => Some(Length::Chars(a.max(b))),
        (
            Some(Length::Precision { digits, scale }),
            Some(Length::Precision {
                digits: other_digits,
                scale: other_scale,
            }),
        ) => Some(Length::Precision {
            digits: digits.max(other_digits),
            scale: scale.max(other_scale),
        }),
        (Some(existing), _) => Some(existing),
        (None, other) => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnResolution {
    /// Final type after preference overrides.
    pub storage_type: StorageType,
    /// Most frequent type before preference overrides.
    pub inferred_type: StorageType,
    pub length: Option<Length>,
    pub values: usize,
    pub undetermined: usize,
    pub tally: TypeTally,
}

impl ColumnResolution {
    /// Type clause ready to embed in `CREATE TABLE`, e.g. `VARCHAR (42)`.
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(length) => write!(f, "{} ({length})", self.storage_type),
            None => write!(f, "{}", self.storage_type),
        }
    }
}

/// Incremental resolver for callers that stream a column rather than hold it.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    options: ResolveOptions,
    tally: TypeTally,
    values: usize,
    undetermined: usize,
}

impl ColumnResolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn push(&mut self, value: &Value) {
        self.values += 1;
        match classify(value) {
            Ok(classified) => self.tally.record(classified.storage_type, classified.length),
            Err(err) => {
                trace!("Skipping value {}: {err}", self.values);
                self.undetermined += 1;
            }
        }
    }

    pub fn values(&self) -> usize {
        self.values
    }

    pub fn finish(self) -> Result<ColumnResolution, InferError> {
        if self.values == 0 {
            return Err(InferError::EmptyInput);
        }
        let Some(winner) = self.tally.most_frequent().copied() else {
            return Err(InferError::ColumnIndeterminate {
                values: self.values,
            });
        };
        let storage_type = apply_preferences(winner.storage_type, &self.options);
        debug!(
            "Resolved {} value(s) to {} ({} undetermined)",
            self.values, storage_type, self.undetermined
        );
        Ok(ColumnResolution {
            storage_type,
            inferred_type: winner.storage_type,
            length: winner.length,
            values: self.values,
            undetermined: self.undetermined,
            tally: self.tally,
        })
    }
}

fn apply_preferences(selected: StorageType, options: &ResolveOptions) -> StorageType {
    let mut chosen = selected;
    if options.prefer_varchar
        && chosen != StorageType::Varchar
        && chosen.name().to_ascii_lowercase().contains("text")
    {
        debug!("Preferring VARCHAR over {chosen}");
        chosen = StorageType::Varchar;
    }
    if options.prefer_int
        && chosen != StorageType::Int
        && chosen.name().to_ascii_lowercase().contains("int")
    {
        debug!("Preferring INT over {chosen}");
        chosen = StorageType::Int;
    }
    chosen
}

pub fn resolve_column<'a, I>(
    values: I,
    options: &ResolveOptions,
) -> Result<ColumnResolution, InferError>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut resolver = ColumnResolver::new(*options);
    for value in values {
        resolver.push(value);
    }
    resolver.finish()
}

/// Picks one storage type for a whole column and renders it as a DDL type clause.
///
/// Any computed length is emitted, zero included: a column of empty strings
/// renders as `VARCHAR (0)`, not a bare `VARCHAR`.
pub fn resolve_column_type(
    values: &[Value],
    prefer_varchar: bool,
    prefer_int: bool,
) -> Result<String, InferError> {
    let options = ResolveOptions {
        prefer_varchar,
        prefer_int,
    };
    resolve_column(values, &options).map(|resolution| resolution.descriptor())
}
