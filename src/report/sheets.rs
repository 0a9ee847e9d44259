//! Sheet plan for the spreadsheet report
//!
//! Every sheet is either a loaded table written as-is or a small grid built
//! from derived statistics. Shapes count the header row.

use crate::models::Table;
use crate::stats::{CountPivot, DescribeTable, GroupMean, KpiTable, STAT_NAMES, StatValue};

pub const PATIENTS_SHEET: &str = "Diabetic Data";
pub const MAPPING_SHEET: &str = "IDS Mapping";
pub const SUMMARY_SHEET: &str = "Summary Stats";
pub const KPI_SHEET: &str = "KPIs";
pub const GENDER_PIVOT_SHEET: &str = "Gender vs Readmission";
pub const AGE_PIVOT_SHEET: &str = "Age vs Readmission";
pub const MEDICATION_PIVOT_SHEET: &str = "Medications by Readmission";

/// Sheet names in workbook order
pub const SHEET_NAMES: [&str; 7] = [
    PATIENTS_SHEET,
    MAPPING_SHEET,
    SUMMARY_SHEET,
    KPI_SHEET,
    GENDER_PIVOT_SHEET,
    AGE_PIVOT_SHEET,
    MEDICATION_PIVOT_SHEET,
];

/// A single grid cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

/// Header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// (rows including header, columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len() + 1, self.header.len())
    }
}

/// What a sheet holds
#[derive(Debug, Clone)]
pub enum SheetContent<'a> {
    /// A loaded table, written column by column
    Table(&'a Table),
    /// A derived grid
    Grid(Grid),
}

/// One named sheet of the report
#[derive(Debug, Clone)]
pub struct ReportSheet<'a> {
    pub name: &'static str,
    pub content: SheetContent<'a>,
}

impl ReportSheet<'_> {
    /// (rows including header, columns)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match &self.content {
            SheetContent::Table(table) => (table.num_rows() + 1, table.num_columns()),
            SheetContent::Grid(grid) => grid.shape(),
        }
    }
}

/// Statistic names down the first column, one column per source column
#[must_use]
pub fn describe_grid(described: &DescribeTable) -> Grid {
    let header = std::iter::once(String::new())
        .chain(described.columns.iter().map(|c| c.name.clone()))
        .collect();

    let rows = STAT_NAMES
        .iter()
        .enumerate()
        .map(|(stat, name)| {
            std::iter::once(Cell::from(*name))
                .chain(described.columns.iter().map(|c| match c.value(stat) {
                    StatValue::Empty => Cell::Empty,
                    StatValue::Count(n) => Cell::from(n),
                    StatValue::Number(v) => Cell::Number(v),
                    StatValue::Label(s) => Cell::Text(s),
                }))
                .collect()
        })
        .collect();

    Grid { header, rows }
}

#[must_use]
pub fn kpi_grid(kpis: &KpiTable) -> Grid {
    Grid {
        header: vec!["KPI".to_string(), "Value".to_string()],
        rows: kpis
            .kpis
            .iter()
            .map(|kpi| vec![Cell::from(kpi.name), Cell::from(kpi.value.as_f64())])
            .collect(),
    }
}

#[must_use]
pub fn count_pivot_grid(pivot: &CountPivot) -> Grid {
    Grid {
        header: std::iter::once(pivot.index_name.clone())
            .chain(pivot.columns.iter().cloned())
            .collect(),
        rows: pivot
            .rows
            .iter()
            .map(|(key, counts)| {
                std::iter::once(Cell::from(key.as_str()))
                    .chain(counts.iter().map(|n| Cell::from(*n)))
                    .collect()
            })
            .collect(),
    }
}

#[must_use]
pub fn group_mean_grid(means: &GroupMean) -> Grid {
    Grid {
        header: vec![means.group_name.clone(), means.value_name.clone()],
        rows: means
            .rows
            .iter()
            .map(|(key, mean)| vec![Cell::from(key.as_str()), Cell::Number(*mean)])
            .collect(),
    }
}
