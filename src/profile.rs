//! Whole-table profiling: resolve a storage type for every column of a CSV
//! file (or of rows already in memory) and persist the result as a report.
//!
//! A column that cannot be resolved does not abort the profile; its error is
//! recorded next to the other columns so the report stays complete.

use std::{fs::File, path::Path};

use anyhow::{Context, Result, ensure};
use encoding_rs::Encoding;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    config::InferConfig,
    data::{Value, parse_value},
    error::InferError,
    io_utils::CellReader,
    resolve::{ColumnResolution, ColumnResolver, ResolveOptions, TallyEntry},
};

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Type clause for DDL; absent when the column could not be resolved.
    pub descriptor: Option<String>,
    pub values: usize,
    pub undetermined: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tally: Vec<TallyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    outcome: Result<ColumnResolution, InferError>,
}

impl ColumnProfile {
    fn from_outcome(
        name: String,
        values: usize,
        outcome: Result<ColumnResolution, InferError>,
    ) -> Self {
        let (descriptor, undetermined, tally, error) = match &outcome {
            Ok(resolution) => (
                Some(resolution.descriptor()),
                resolution.undetermined,
                resolution.tally.entries().to_vec(),
                None,
            ),
            Err(err) => (None, values, Vec::new(), Some(err.to_string())),
        };
        Self {
            name,
            descriptor,
            values,
            undetermined,
            tally,
            error,
            outcome,
        }
    }

    pub fn resolution(&self) -> Result<&ColumnResolution, &InferError> {
        self.outcome.as_ref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableProfile {
    pub source: String,
    pub rows: usize,
    pub options: ResolveOptions,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|column| column.descriptor.is_none())
    }

    /// Writes JSON when the path ends in `.json`, YAML otherwise.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::to_writer_pretty(file, self).context("Writing report JSON")
        } else {
            serde_yaml::to_writer(file, self).context("Writing report YAML")
        }
    }
}

/// Profiles rows already held in memory, e.g. the result of a query.
pub fn profile_rows(
    source: &str,
    headers: &[String],
    rows: &[Vec<Value>],
    options: &ResolveOptions,
) -> Result<TableProfile> {
    let mut resolvers = vec![ColumnResolver::new(*options); headers.len()];
    for (row_idx, row) in rows.iter().enumerate() {
        ensure!(
            row.len() == headers.len(),
            "Row {} has {} value(s) but {} column(s) were named",
            row_idx + 1,
            row.len(),
            headers.len()
        );
        for (resolver, value) in resolvers.iter_mut().zip(row) {
            resolver.push(value);
        }
    }
    Ok(finish_profile(source, headers, rows.len(), resolvers, options))
}

pub fn profile_csv(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    config: &InferConfig,
) -> Result<TableProfile> {
    let mut reader = CellReader::open(path, delimiter, encoding)?
        .with_null_tokens(&config.null_tokens);
    let headers = reader.headers().to_vec();
    let options = config.resolve_options();
    let text_columns: Vec<bool> = headers
        .iter()
        .map(|header| config.is_text_column(header))
        .collect();
    let mut resolvers = vec![ColumnResolver::new(options); headers.len()];

    while let Some(row) = reader.next_row()? {
        let cells = resolvers.iter_mut().zip(&text_columns).zip(row);
        for ((resolver, is_text), cell) in cells {
            let value = match cell {
                None => Value::Null,
                Some(raw) if *is_text => Value::Text(raw),
                Some(raw) => parse_value(&raw),
            };
            resolver.push(&value);
        }
    }
    let rows = reader.rows_read();
    debug!("Read {rows} row(s) across {} column(s)", headers.len());

    Ok(finish_profile(
        &path.display().to_string(),
        &headers,
        rows,
        resolvers,
        &options,
    ))
}

fn finish_profile(
    source: &str,
    headers: &[String],
    rows: usize,
    resolvers: Vec<ColumnResolver>,
    options: &ResolveOptions,
) -> TableProfile {
    let columns = headers
        .iter()
        .zip(resolvers)
        .map(|(header, resolver)| {
            let values = resolver.values();
            let outcome = resolver.finish();
            if let Err(err) = &outcome {
                warn!("Column '{header}': {err}");
            }
            ColumnProfile::from_outcome(header.clone(), values, outcome)
        })
        .collect();
    TableProfile {
        source: source.to_string(),
        rows,
        options: *options,
        columns,
    }
}
