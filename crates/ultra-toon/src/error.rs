//! Error types for dataset extraction and TOON / Ultra-TOON encoding.

use thiserror::Error;

/// Errors that can occur while extracting a dataset or encoding it.
#[derive(Error, Debug)]
pub enum ToonError {
    /// The input string was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The input was not a mapping, or the mapping had no top-level key.
    #[error("input has no top-level key naming a dataset")]
    MissingKey,

    /// More than one top-level key under the strict key policy.
    #[error("input has {} top-level keys ({}), expected exactly one", keys.len(), keys.join(", "))]
    MultipleKeys { keys: Vec<String> },

    /// The value under the dataset key is not an array of rows.
    #[error("dataset '{key}' is not an array of rows")]
    NotARowSet { key: String },

    /// The row sequence is empty, so no schema can be derived.
    #[error("dataset '{key}' has no rows")]
    EmptyDataset { key: String },

    /// A row is not a mapping. `row` is 0-based.
    #[error("row {row} is not an object")]
    InvalidRow { row: usize },

    /// A row's key set differs from the first row's. `row` is 0-based.
    #[error("row {row} has columns {{{}}}, expected {{{}}}", found.join(","), expected.join(","))]
    HeterogeneousRow {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A cell holds an array or object.
    #[error("row {row}, column '{column}' holds a nested value")]
    NonScalarCell { row: usize, column: String },

    /// More distinct values than single-letter codes in one field.
    #[error("field '{field}' has {count} distinct values, at most 26 can be coded")]
    TooManyCategories { field: String, count: usize },

    /// An explicit override names a column the dataset does not have.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// A caller-supplied value mapping assigns the same code twice.
    #[error("field '{field}' maps more than one value to code '{code}'")]
    DuplicateCode { field: String, code: String },

    /// A caller-supplied code is also a value of the field that the mapping
    /// leaves unencoded, so the legend could not tell the two apart.
    #[error("field '{field}' uses code '{code}', which is also an unmapped value of the field")]
    AmbiguousCode { field: String, code: String },

    /// Writing a rendered document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout ultra-toon.
pub type Result<T> = std::result::Result<T, ToonError>;

/// Errors from a benchmark run.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The dataset could not be encoded.
    #[error(transparent)]
    Encode(#[from] ToonError),

    /// The JSON context could not be serialized.
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    /// The model client failed to produce a completion.
    #[error("model error: {0}")]
    Model(String),
}
