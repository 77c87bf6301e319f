use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::ValueKind;

#[derive(Debug, Parser)]
#[command(author, version, about = "Infer MySQL column types from sampled values", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify individual values against the storage type catalog
    Classify(ClassifyArgs),
    /// Resolve one storage type per column of a CSV file
    Infer(InferArgs),
    /// List the storage types known to the classifier
    Catalog,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Values to classify
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
    /// How to read each value before classifying it
    #[arg(long, value_enum, default_value = "auto")]
    pub kind: ValueKind,
}

#[derive(Debug, Args)]
pub struct InferArgs {
    /// Input CSV file with a header row ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file with inference settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Rewrite TINYTEXT/MEDIUMTEXT/LONGTEXT winners to VARCHAR
    #[arg(long = "prefer-varchar")]
    pub prefer_varchar: bool,
    /// Rewrite TINYINT/MEDIUMINT/BIGINT winners to INT
    #[arg(long = "prefer-int")]
    pub prefer_int: bool,
    /// Columns to keep as text regardless of their contents
    #[arg(short = 'T', long = "text-column", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub text_columns: Vec<String>,
    /// Write the per-column report here (.json for JSON, YAML otherwise)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Print a CREATE TABLE statement for this table name
    #[arg(long = "ddl", value_name = "TABLE")]
    pub ddl: Option<String>,
    /// Primary key column for the generated CREATE TABLE statement
    #[arg(long = "primary-key", requires = "ddl")]
    pub primary_key: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
