//! Error kinds produced by the inference engine.

use thiserror::Error;

/// Failures reported by [`crate::classify`] and [`crate::resolve`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferError {
    /// A single value matched no catalog entry. Column resolution skips it.
    #[error("No storage type matches value '{value}'")]
    ClassificationUndetermined { value: String },

    /// Every value of a column failed classification.
    #[error("Column type is indeterminate: none of {values} value(s) matched a storage type")]
    ColumnIndeterminate { values: usize },

    /// Resolution was asked to pick a type for zero values.
    #[error("Cannot resolve a column type from empty input")]
    EmptyInput,
}

impl InferError {
    pub fn undetermined(value: impl Into<String>) -> Self {
        InferError::ClassificationUndetermined {
            value: value.into(),
        }
    }
}
