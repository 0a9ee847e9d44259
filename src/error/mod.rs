//! Error handling for the report pipeline.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;

/// Specialized error type for the report pipeline
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Error opening, reading or writing a file
    #[error("IO error at {path}: {context}: {source}")]
    Io {
        path: PathBuf,
        context: String,
        #[source]
        source: io::Error,
    },

    /// Error decoding tabular data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// An input file could not be loaded; fatal for the run
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<ReportError>,
    },

    /// A column required by a stage is absent from the table
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// A column holds a type the stage cannot work with
    #[error("Column '{column}' has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    /// Error from the relational store
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Loaded header does not match the static patients column map
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Error rendering a chart image
    #[error("Failed to render chart {}: {source}", path.display())]
    Chart {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Error writing the spreadsheet report
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Wrap an IO error with the path and operation that produced it
    pub fn io(path: &Path, context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            context: context.into(),
            source,
        }
    }

    /// Mark an error as a fatal load failure for `path`
    #[must_use]
    pub fn load(path: &Path, source: Self) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn column_not_found(table: &str, column: &str) -> Self {
        Self::ColumnNotFound {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// Whether this error should terminate the run immediately
    #[must_use]
    pub fn is_fatal_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

/// Result type for report pipeline operations
pub type Result<T> = std::result::Result<T, ReportError>;
