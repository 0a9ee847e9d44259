//! Descriptive statistics for every column of a table
//!
//! Numeric columns get count, mean, sample standard deviation, min, the
//! quartiles and max. Other columns get count, number of distinct values, the
//! most frequent value and its frequency. Statistics that do not apply to a
//! column are left empty.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::models::Table;
use crate::utils::arrow::{cell_label, is_numeric, numeric_values};

use super::summary::mean;

/// Row labels of the describe table, in output order
pub const STAT_NAMES: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// One cell of the describe table
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Empty,
    Count(usize),
    Number(f64),
    Label(String),
}

/// Statistics for a single column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDescription {
    pub name: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnDescription {
    /// Value for the statistic at `STAT_NAMES[stat]`
    #[must_use]
    pub fn value(&self, stat: usize) -> StatValue {
        let number = |v: Option<f64>| v.map_or(StatValue::Empty, StatValue::Number);
        let count = |v: Option<usize>| v.map_or(StatValue::Empty, StatValue::Count);
        match stat {
            0 => StatValue::Count(self.count),
            1 => count(self.unique),
            2 => self.top.clone().map_or(StatValue::Empty, StatValue::Label),
            3 => count(self.freq),
            4 => number(self.mean),
            5 => number(self.std),
            6 => number(self.min),
            7 => number(self.q25),
            8 => number(self.q50),
            9 => number(self.q75),
            10 => number(self.max),
            _ => StatValue::Empty,
        }
    }
}

/// Describe table: one `ColumnDescription` per source column
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeTable {
    pub columns: Vec<ColumnDescription>,
}

impl DescribeTable {
    /// (statistic rows, source columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (STAT_NAMES.len(), self.columns.len())
    }
}

/// Describe every column of `table`
pub fn describe(table: &Table) -> Result<DescribeTable> {
    let schema = table.schema();
    let columns = schema
        .fields()
        .iter()
        .zip(table.batch().columns())
        .map(|(field, array)| {
            if is_numeric(field.data_type()) {
                describe_numeric(field.name(), array)
            } else {
                Ok(describe_categorical(field.name(), array))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DescribeTable { columns })
}

fn describe_numeric(name: &str, array: &arrow::array::ArrayRef) -> Result<ColumnDescription> {
    let values = numeric_values(array, name)?;
    let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();

    Ok(ColumnDescription {
        name: name.to_string(),
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
        ..Default::default()
    })
}

fn describe_categorical(name: &str, array: &arrow::array::ArrayRef) -> ColumnDescription {
    let mut counts: FxHashMap<String, (usize, usize)> = FxHashMap::default();
    let mut count = 0;

    for row in 0..array.len() {
        if let Some(label) = cell_label(array, row) {
            let next = counts.len();
            counts.entry(label).or_insert((0, next)).0 += 1;
            count += 1;
        }
    }

    // Most frequent value; ties go to the first one seen
    let top = counts
        .iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(label, (freq, _))| (label.clone(), *freq));

    ColumnDescription {
        name: name.to_string(),
        count,
        unique: Some(counts.len()),
        top: top.as_ref().map(|(label, _)| label.clone()),
        freq: top.map(|(_, freq)| freq),
        ..Default::default()
    }
}

/// Sample standard deviation (n - 1 denominator)
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile of sorted data with linear interpolation between closest ranks
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
