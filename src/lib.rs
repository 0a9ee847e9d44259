//! Batch reporting pipeline for hospital diabetes encounter data.
//!
//! Loads the encounter and ID-mapping CSV files, stores encounters in SQLite,
//! prints summary statistics, renders charts and exports an Excel report with
//! KPI and pivot sheets.

pub mod charts;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod store;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{PipelineConfig, StoreConfig, WriteMode};
pub use error::{ReportError, Result};
pub use loader::{LoadedInputs, load_inputs, read_csv_table};
pub use models::{Readmission, Table};
pub use pipeline::{Pipeline, PipelineReport};
pub use report::{ExportSummary, SheetInfo, export_report};
pub use stats::{DatasetSummary, KpiTable, PivotSet};
pub use store::{PatientStore, PersistOutcome, PersistReport, persist_table};

// Arrow types
pub use arrow::record_batch::RecordBatch;
