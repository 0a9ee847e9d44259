//! Dataset summary statistics
//!
//! Shape, missing values, outcome distribution and mean stay of the loaded
//! encounter table.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::Table;
use crate::models::patients::{READMITTED, TIME_IN_HOSPITAL};
use crate::utils::arrow::{cell_label, numeric_values};

/// Structure containing the console summary of a run
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    /// (rows, columns) of the encounter table
    pub patients_shape: (usize, usize),
    /// (rows, columns) of the mapping table
    pub mapping_shape: (usize, usize),
    /// Null cells per encounter column, in header order
    pub null_counts: Vec<(String, usize)>,
    /// Encounters per readmission category, most frequent first
    pub readmission_counts: Vec<(String, usize)>,
    /// Mean length of stay in days
    pub mean_stay: Option<f64>,
}

impl DatasetSummary {
    /// Total number of encounters
    #[must_use]
    pub fn total_patients(&self) -> usize {
        self.patients_shape.0
    }

    /// Total null cells across all columns
    #[must_use]
    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }
}

/// Compute the summary for the encounter and mapping tables
pub fn summarize(patients: &Table, mapping: &Table) -> Result<DatasetSummary> {
    Ok(DatasetSummary {
        patients_shape: patients.shape(),
        mapping_shape: mapping.shape(),
        null_counts: patients.null_counts(),
        readmission_counts: value_counts(patients, READMITTED)?,
        mean_stay: column_mean(patients, TIME_IN_HOSPITAL)?,
    })
}

/// Count occurrences of each non-null value in a column
///
/// Ordered by descending count; equal counts keep first-appearance order.
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let array = table.column(column)?;
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for row in 0..array.len() {
        let Some(label) = cell_label(array, row) else {
            continue;
        };
        match positions.get(&label) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

/// Mean of the non-null values of a numeric column
pub fn column_mean(table: &Table, column: &str) -> Result<Option<f64>> {
    let values = numeric_values(table.column(column)?, column)?;
    Ok(mean(&values))
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
