//! Error types for the data-view engine.
//!
//! Each concern has its own enum so callers can match on what went wrong
//! without string inspection. None of these are fatal: a failed export or
//! print leaves the view fully interactive.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::RecordId;

/// A single record failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The input was not a JSON object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// The record has no `id` field.
    #[error("missing `id` field")]
    MissingId,

    /// The `id` field is neither an integer nor a string.
    #[error("`id` must be an integer or a string, found {0}")]
    InvalidId(String),

    /// A field holds an array or object instead of a scalar.
    #[error("field `{0}` is not a scalar value")]
    NonScalarField(String),
}

/// The record collection could not be loaded or validated.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A record at the given position is invalid.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: RecordError,
    },

    /// Two records share the same `id`.
    #[error("duplicate id `{0}`")]
    DuplicateId(RecordId),

    /// The input was not a JSON array of objects.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// The view configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// A print surface could not be acquired or written.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The target is missing or refused the document.
    #[error("print surface unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write print document: {0}")]
    Io(#[from] std::io::Error),
}

/// An export or print request failed.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no rows to export.
    #[error("no data")]
    NoData,

    #[error("spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("print template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A row action failed.
///
/// The menu has already been closed when this is returned.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No action with this label is registered.
    #[error("unknown row action `{0}`")]
    UnknownAction(String),

    /// No record with this id is in the dataset.
    #[error("no record with id `{0}`")]
    UnknownRecord(RecordId),

    /// The handler returned an error.
    #[error("action `{label}` failed: {source}")]
    Handler {
        label: String,
        #[source]
        source: anyhow::Error,
    },
}
