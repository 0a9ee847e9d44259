//! Data models for the report pipeline
//!
//! The loaded tables and the static layout of the encounter data.

pub mod patients;
pub mod table;

pub use patients::{ColumnSpec, PATIENT_COLUMNS, PATIENTS_TABLE, Readmission, SqlType};
pub use table::Table;
