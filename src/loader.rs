//! CSV file loading
//!
//! Reads the delimited input files into in-memory tables. The schema is
//! inferred from the header and every record. Empty fields and the usual
//! missing-value markers (`NA`, `NULL`, `None`, `nan`, ...) become nulls.

use std::io::{BufReader, Seek};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::error::util::safe_open_file;
use crate::error::{ReportError, Result};
use crate::models::Table;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// The two tables every run starts from
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    /// One row per hospital encounter
    pub patients: Table,
    /// Coded identifier to label lookup
    pub mapping: Table,
}

/// Field values read as missing, in addition to the empty field
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whole-field pattern matching an empty field or any of [`NA_TOKENS`]
pub fn null_regex() -> Result<Regex> {
    let alternatives = NA_TOKENS.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!("^(?:|{alternatives})$"))
        .map_err(|e| ArrowError::InvalidArgumentError(format!("invalid null pattern: {e}")).into())
}

/// Load both input files named in the configuration
///
/// Any failure is wrapped as [`ReportError::Load`], which callers treat as
/// fatal for the run.
pub fn load_inputs(config: &PipelineConfig) -> Result<LoadedInputs> {
    let patients = read_csv_table(&config.patients_path, "diabetic_data", config.batch_size)
        .map_err(|e| ReportError::load(&config.patients_path, e))?;
    let mapping = read_csv_table(&config.mapping_path, "IDS_mapping", config.batch_size)
        .map_err(|e| ReportError::load(&config.mapping_path, e))?;

    Ok(LoadedInputs { patients, mapping })
}

/// Read a CSV file with a header row into a single table
pub fn read_csv_table(path: &Path, name: &str, batch_size: usize) -> Result<Table> {
    log_operation_start("Reading", path);
    let start = Instant::now();

    let file = safe_open_file(path, "reading CSV input")?;
    let mut reader = BufReader::new(file);

    let format = Format::default().with_header(true).with_null_regex(null_regex()?);
    let (schema, records) = format.infer_schema(&mut reader, None)?;
    log::debug!(
        "Inferred {} columns from {} records in {}",
        schema.fields().len(),
        records,
        path.display()
    );

    reader
        .rewind()
        .map_err(|e| ReportError::io(path, "Failed to rewind CSV input", e))?;

    let schema = Arc::new(schema);
    let csv = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(batch_size.max(1))
        .build(reader)?;

    let batches = csv.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;
    let table = Table::from_batches(name, schema, &batches)?;

    log_operation_complete("read", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}
