//! Inference settings loaded from an optional YAML file.
//!
//! ```yaml
//! prefer_varchar: true
//! prefer_int: false
//! null_tokens: ["", "NULL", "\\N", "n/a"]
//! text_columns: [zip_code]
//! ```
//!
//! Command-line switches can only turn preferences on; they never clear a
//! preference set in the file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{io_utils, resolve::ResolveOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferConfig {
    pub prefer_varchar: bool,
    pub prefer_int: bool,
    /// Cell contents read as SQL NULL, compared case-insensitively after trimming.
    pub null_tokens: Vec<String>,
    /// Columns kept as text even when their cells look numeric or temporal.
    pub text_columns: Vec<String>,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            prefer_varchar: false,
            prefer_int: false,
            null_tokens: vec![String::new(), "NULL".to_string(), "\\N".to_string()],
            text_columns: Vec::new(),
        }
    }
}

impl InferConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(
        &mut self,
        prefer_varchar: bool,
        prefer_int: bool,
        text_columns: &[String],
    ) {
        self.prefer_varchar |= prefer_varchar;
        self.prefer_int |= prefer_int;
        for column in text_columns {
            let trimmed = column.trim();
            if !trimmed.is_empty() && !self.is_text_column(trimmed) {
                self.text_columns.push(trimmed.to_string());
            }
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            prefer_varchar: self.prefer_varchar,
            prefer_int: self.prefer_int,
        }
    }

    pub fn is_null_token(&self, raw: &str) -> bool {
        io_utils::matches_null_token(&self.null_tokens, raw)
    }

    pub fn is_text_column(&self, name: &str) -> bool {
        self.text_columns.iter().any(|column| column == name)
    }
}
