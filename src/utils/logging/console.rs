//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use crate::models::Table;
use crate::stats::DatasetSummary;

/// Print the shape and column types of a loaded table
pub fn print_table_summary(table: &Table) {
    let (rows, columns) = table.shape();
    println!("{}: {rows} rows x {columns} columns", table.name());
    for field in table.schema().fields() {
        log::debug!("  - {} ({})", field.name(), field.data_type());
    }
}

/// Print the dataset summary the way the run reports it
pub fn print_dataset_summary(summary: &DatasetSummary) {
    println!();
    println!("Dataset Information");
    println!("Main Data Shape: {:?}", summary.patients_shape);
    println!("Mapping Shape: {:?}", summary.mapping_shape);
    println!();
    println!("Total Patients: {}", summary.total_patients());

    println!();
    println!("Missing values per column:");
    let width = summary
        .null_counts
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    for (name, nulls) in &summary.null_counts {
        println!("{name:<width$}  {nulls}");
    }

    println!();
    println!("Readmission distribution:");
    for (category, count) in &summary.readmission_counts {
        println!("{category:<6}  {count}");
    }

    println!();
    println!("Average hospital stay length:");
    match summary.mean_stay {
        Some(mean) => println!("{mean:.6}"),
        None => println!("n/a"),
    }
}
