pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod ddl;
pub mod error;
pub mod io_utils;
pub mod profile;
pub mod resolve;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::cli::{Cli, Commands};

pub use crate::{
    classify::{Classification, Length, classify},
    data::Value,
    error::InferError,
    resolve::{ColumnResolution, ResolveOptions, resolve_column, resolve_column_type},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("column_typer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Classify(args) => handle_classify(&args),
        Commands::Infer(args) => handle_infer(&args),
        Commands::Catalog => handle_catalog(),
    }
}

fn handle_classify(args: &cli::ClassifyArgs) -> Result<()> {
    let mut rows = Vec::with_capacity(args.values.len());
    for raw in &args.values {
        let value = data::parse_typed_value(raw, args.kind)
            .with_context(|| format!("Reading '{raw}' as {:?}", args.kind))?;
        let (storage_type, length) = match classify(&value) {
            Ok(classified) => (
                classified.type_name().to_string(),
                classified
                    .length
                    .map(|length| length.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Err(err) => {
                debug!("{err}");
                ("-".to_string(), "-".to_string())
            }
        };
        rows.push(vec![
            raw.clone(),
            value.kind_label().to_string(),
            storage_type,
            length,
        ]);
    }
    table::print_table(&["value", "kind", "type", "length"], &rows);
    Ok(())
}

fn handle_infer(args: &cli::InferArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut config = config::InferConfig::load_or_default(args.config.as_deref())?;
    config.apply_overrides(args.prefer_varchar, args.prefer_int, &args.text_columns);
    info!(
        "Inferring column types for '{}' with delimiter '{}' and encoding {}",
        args.input.display(),
        printable_delimiter(delimiter),
        encoding.name()
    );

    let profile = profile::profile_csv(&args.input, delimiter, encoding, &config)
        .with_context(|| format!("Profiling {:?}", args.input))?;

    let rows = profile
        .columns
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column
                    .descriptor
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                column.values.to_string(),
                column.undetermined.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["column", "type", "values", "undetermined"], &rows);

    if let Some(path) = &args.output {
        profile
            .save(path)
            .with_context(|| format!("Writing report to {path:?}"))?;
        info!(
            "Report for {} column(s) written to {:?}",
            profile.columns.len(),
            path
        );
    }

    if let Some(table_name) = &args.ddl {
        let statement =
            ddl::create_table_statement(table_name, &profile, args.primary_key.as_deref())?;
        println!("{statement};");
    }

    let unresolved = profile.unresolved().count();
    if unresolved > 0 {
        warn!("{unresolved} column(s) could not be resolved");
    }
    Ok(())
}

fn handle_catalog() -> Result<()> {
    let rows = catalog::CATALOG
        .iter()
        .map(|descriptor| {
            vec![
                descriptor.storage_type.to_string(),
                descriptor.native_kind.to_string(),
                descriptor.bounds_label(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["type", "kind", "bounds"], &rows);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
