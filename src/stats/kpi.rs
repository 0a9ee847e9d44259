//! Headline KPIs for dashboard consumption.

use crate::error::Result;
use crate::models::patients::{READMITTED, TIME_IN_HOSPITAL};
use crate::models::{Readmission, Table};
use crate::utils::arrow::cell_label;

use super::summary::column_mean;

/// Value of a single KPI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KpiValue {
    Count(usize),
    Average(Option<f64>),
}

impl KpiValue {
    /// Numeric value for spreadsheet output; `None` for an undefined average
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Count(n) => Some(n as f64),
            Self::Average(v) => v,
        }
    }
}

/// A named KPI
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub name: &'static str,
    pub value: KpiValue,
}

/// The fixed set of five KPIs
#[derive(Debug, Clone, PartialEq)]
pub struct KpiTable {
    pub kpis: Vec<Kpi>,
}

impl KpiTable {
    /// Look up a KPI by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<KpiValue> {
        self.kpis.iter().find(|k| k.name == name).map(|k| k.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kpis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty()
    }
}

pub const TOTAL_PATIENTS: &str = "Total Patients";
pub const AVERAGE_STAY: &str = "Average Hospital Stay (days)";
pub const READMITTED_WITHIN_30: &str = "Readmitted <30 Days";
pub const READMITTED_AFTER_30: &str = "Readmitted >30 Days";
pub const NOT_READMITTED: &str = "Not Readmitted";

/// Compute the KPI table from the encounter table
pub fn compute_kpis(table: &Table) -> Result<KpiTable> {
    let outcomes = table.column(READMITTED)?;
    let mut within_30 = 0;
    let mut after_30 = 0;
    let mut not_readmitted = 0;

    for row in 0..outcomes.len() {
        match cell_label(outcomes, row).as_deref().and_then(Readmission::parse) {
            Some(Readmission::Within30) => within_30 += 1,
            Some(Readmission::After30) => after_30 += 1,
            Some(Readmission::No) => not_readmitted += 1,
            None => {}
        }
    }

    let categorised = within_30 + after_30 + not_readmitted;
    if categorised != table.num_rows() {
        log::warn!(
            "{} of {} encounters have no recognised readmission category",
            table.num_rows() - categorised,
            table.num_rows()
        );
    }

    Ok(KpiTable {
        kpis: vec![
            Kpi {
                name: TOTAL_PATIENTS,
                value: KpiValue::Count(table.num_rows()),
            },
            Kpi {
                name: AVERAGE_STAY,
                value: KpiValue::Average(column_mean(table, TIME_IN_HOSPITAL)?),
            },
            Kpi {
                name: READMITTED_WITHIN_30,
                value: KpiValue::Count(within_30),
            },
            Kpi {
                name: READMITTED_AFTER_30,
                value: KpiValue::Count(after_30),
            },
            Kpi {
                name: NOT_READMITTED,
                value: KpiValue::Count(not_readmitted),
            },
        ],
    })
}
