//! Grouped aggregates over the encounter table
//!
//! Count cross-tabulations of two categorical columns and per-group means of
//! a numeric column.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::Table;
use crate::models::patients::{AGE, GENDER, NUM_MEDICATIONS, READMITTED};
use crate::utils::arrow::{cell_label, to_float64};

/// Order of group keys in an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Lexical order of the labels
    Sorted,
    /// Order in which labels first occur in the table
    Appearance,
}

/// Count of rows for every (row key, column key) pair
#[derive(Debug, Clone, PartialEq)]
pub struct CountPivot {
    /// Name of the column providing the row keys
    pub index_name: String,
    /// Column keys
    pub columns: Vec<String>,
    /// Row key with one count per column key
    pub rows: Vec<(String, Vec<usize>)>,
}

impl CountPivot {
    /// (row keys, column keys)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Count for a single pair, zero when the pair never occurs
    #[must_use]
    pub fn count(&self, row: &str, column: &str) -> usize {
        let Some(col_idx) = self.columns.iter().position(|c| c == column) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|(key, _)| key == row)
            .map_or(0, |(_, counts)| counts[col_idx])
    }

    /// Sum of all cells
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|(_, counts)| counts).sum()
    }
}

/// Mean of a numeric column per group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group_name: String,
    pub value_name: String,
    pub rows: Vec<(String, f64)>,
}

/// The three pivots exported with the report
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSet {
    pub gender_by_readmission: CountPivot,
    pub age_by_readmission: CountPivot,
    pub medications_by_readmission: GroupMean,
}

/// Compute the exported pivots
pub fn compute_pivots(table: &Table) -> Result<PivotSet> {
    Ok(PivotSet {
        gender_by_readmission: crosstab(table, GENDER, READMITTED, KeyOrder::Sorted)?,
        age_by_readmission: crosstab(table, AGE, READMITTED, KeyOrder::Sorted)?,
        medications_by_readmission: group_mean(table, READMITTED, NUM_MEDICATIONS)?,
    })
}

/// First-appearance order of labels, then optionally sorted
fn ordered_keys(keys: Vec<String>, order: KeyOrder) -> Vec<String> {
    match order {
        KeyOrder::Sorted => keys.into_iter().sorted().collect(),
        KeyOrder::Appearance => keys,
    }
}

/// Cross-tabulate two columns; rows with a null in either column are skipped
pub fn crosstab(table: &Table, index: &str, column: &str, order: KeyOrder) -> Result<CountPivot> {
    let index_array = table.column(index)?;
    let column_array = table.column(column)?;

    let mut row_keys: Vec<String> = Vec::new();
    let mut col_keys: Vec<String> = Vec::new();
    let mut cells: FxHashMap<(String, String), usize> = FxHashMap::default();

    for row in 0..table.num_rows() {
        let (Some(r), Some(c)) = (cell_label(index_array, row), cell_label(column_array, row))
        else {
            continue;
        };
        if !row_keys.contains(&r) {
            row_keys.push(r.clone());
        }
        if !col_keys.contains(&c) {
            col_keys.push(c.clone());
        }
        *cells.entry((r, c)).or_insert(0) += 1;
    }

    let row_keys = ordered_keys(row_keys, order);
    let columns = ordered_keys(col_keys, order);

    let rows = row_keys
        .into_iter()
        .map(|r| {
            let counts = columns
                .iter()
                .map(|c| cells.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                .collect();
            (r, counts)
        })
        .collect();

    Ok(CountPivot {
        index_name: index.to_string(),
        columns,
        rows,
    })
}

/// Mean of `value` for every label of `group`, groups sorted lexically
pub fn group_mean(table: &Table, group: &str, value: &str) -> Result<GroupMean> {
    let group_array = table.column(group)?;
    let values = to_float64(table.column(value)?, value)?;

    let mut sums: FxHashMap<String, (f64, usize)> = FxHashMap::default();
    for (row, v) in values.iter().enumerate() {
        let (Some(label), Some(v)) = (cell_label(group_array, row), v) else {
            continue;
        };
        let entry = sums.entry(label).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    let rows = sums
        .into_iter()
        .map(|(label, (sum, n))| (label, sum / n as f64))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect();

    Ok(GroupMean {
        group_name: group.to_string(),
        value_name: value.to_string(),
        rows,
    })
}
