//! In-memory table backed by a single Arrow record batch.

use arrow::array::{Array, ArrayRef};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::{ReportError, Result};

/// A named, immutable table loaded from one input file
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    batch: RecordBatch,
}

impl Table {
    /// Wrap an existing record batch
    #[must_use]
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }

    /// Concatenate decoded batches into one table
    pub fn from_batches(
        name: impl Into<String>,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Ok(Self::new(name, batch))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// (rows, columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Column names in header order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Look up a column by header name
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .schema()
            .index_of(name)
            .map(|idx| self.batch.column(idx))
            .map_err(|_| ReportError::column_not_found(&self.name, name))
    }

    /// Number of null cells per column, in header order
    #[must_use]
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.column_names()
            .into_iter()
            .zip(self.batch.columns())
            .map(|(name, column)| (name, column.logical_null_count()))
            .collect()
    }
}
