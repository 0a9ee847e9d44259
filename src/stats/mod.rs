//! Statistics derived from the encounter table
//!
//! Every value here is a pure function of the loaded table.

pub mod describe;
pub mod kpi;
pub mod pivot;
pub mod summary;

pub use describe::{ColumnDescription, DescribeTable, STAT_NAMES, StatValue, describe};
pub use kpi::{Kpi, KpiTable, KpiValue, compute_kpis};
pub use pivot::{CountPivot, GroupMean, KeyOrder, PivotSet, compute_pivots, crosstab, group_mean};
pub use summary::{DatasetSummary, column_mean, summarize, value_counts};
