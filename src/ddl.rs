//! `CREATE TABLE` rendering from a resolved table profile.

use anyhow::{Result, anyhow, ensure};
use itertools::Itertools;

use crate::profile::TableProfile;

/// Backtick-quotes a MySQL identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Fails if any column is unresolved or the primary key names an unknown column.
pub fn create_table_statement(
    table: &str,
    profile: &TableProfile,
    primary_key: Option<&str>,
) -> Result<String> {
    ensure!(!table.trim().is_empty(), "Table name cannot be empty");
    ensure!(
        !profile.columns.is_empty(),
        "Cannot create table '{table}' without columns"
    );

    let mut clauses = profile
        .columns
        .iter()
        .map(|column| {
            let descriptor = column.descriptor.as_deref().ok_or_else(|| {
                anyhow!(
                    "Column '{}' has no storage type: {}",
                    column.name,
                    column.error.as_deref().unwrap_or("unresolved")
                )
            })?;
            Ok(format!("{} {descriptor}", quote_identifier(&column.name)))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(key) = primary_key {
        ensure!(
            profile.column(key).is_some(),
            "Primary key column '{key}' is not part of table '{table}'"
        );
        clauses.push(format!("PRIMARY KEY ({})", quote_identifier(key)));
    }

    Ok(format!(
        "CREATE TABLE {} (\n  {}\n)",
        quote_identifier(table),
        clauses.iter().format(",\n  ")
    ))
}
