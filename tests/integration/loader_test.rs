use arrow::datatypes::DataType;
use diabetes_report::models::PATIENT_COLUMNS;
use diabetes_report::{ReportError, load_inputs, read_csv_table};

use crate::utils::{Fixture, MAPPING_COLUMNS, MAPPING_ROWS, expected_null_counts};

#[test]
fn test_load_inputs_shapes() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(40);
    let inputs = load_inputs(&fixture.config())?;

    assert_eq!(inputs.patients.shape(), (40, PATIENT_COLUMNS.len()));
    assert_eq!(inputs.mapping.shape(), (MAPPING_ROWS, MAPPING_COLUMNS));
    assert_eq!(inputs.patients.name(), "diabetic_data");
    assert_eq!(inputs.mapping.name(), "IDS_mapping");

    let expected: Vec<&str> = PATIENT_COLUMNS.iter().map(|c| c.name).collect();
    assert_eq!(inputs.patients.column_names(), expected);
    Ok(())
}

#[test]
fn test_inferred_column_types() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(30);
    let table = read_csv_table(&fixture.path("diabetic_data.csv"), "diabetic_data", 8)?;

    assert_eq!(table.column("time_in_hospital")?.data_type(), &DataType::Int64);
    assert_eq!(table.column("encounter_id")?.data_type(), &DataType::Int64);
    assert_eq!(table.column("gender")?.data_type(), &DataType::Utf8);
    assert_eq!(table.column("diag_1")?.data_type(), &DataType::Utf8);
    assert_eq!(table.column("max_glu_serum")?.data_type(), &DataType::Utf8);
    Ok(())
}

#[test]
fn test_missing_markers_become_nulls() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(30);
    let table = read_csv_table(&fixture.path("diabetic_data.csv"), "diabetic_data", 1024)?;

    let nulls: Vec<(String, usize)> = table
        .null_counts()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    assert_eq!(nulls, expected_null_counts(30));
    // `None`, `NA` and `n/a` are missing; `?` is an ordinary value
    assert_eq!(nulls[1], ("max_glu_serum".to_string(), 22));
    assert_eq!(nulls[2], ("A1Cresult".to_string(), 24));

    // Blank separator lines are all-null rows; `NULL` labels are missing too
    let mapping = read_csv_table(&fixture.path("IDS_mapping.csv"), "IDS_mapping", 1024)?;
    assert_eq!(
        mapping.null_counts(),
        vec![("admission_type_id".to_string(), 2), ("description".to_string(), 3)]
    );
    Ok(())
}

#[test]
fn test_header_only_file_loads_empty_table() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(0);
    let table = read_csv_table(&fixture.path("diabetic_data.csv"), "diabetic_data", 16)?;

    assert_eq!(table.shape(), (0, PATIENT_COLUMNS.len()));
    // No values to infer from
    assert_eq!(table.column("time_in_hospital")?.data_type(), &DataType::Null);
    Ok(())
}

#[test]
fn test_batch_size_does_not_change_table() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(50);
    let path = fixture.path("diabetic_data.csv");
    let small = read_csv_table(&path, "diabetic_data", 3)?;
    let large = read_csv_table(&path, "diabetic_data", 4096)?;

    assert_eq!(small.shape(), large.shape());
    assert_eq!(small.batch(), large.batch());
    Ok(())
}

#[test]
fn test_missing_primary_file_is_load_error() {
    let fixture = Fixture::new(5);
    let mut config = fixture.config();
    config.patients_path = fixture.path("does_not_exist.csv");

    let err = load_inputs(&config).unwrap_err();
    assert!(err.is_fatal_load());
    match err {
        ReportError::Load { path, source } => {
            assert_eq!(path, config.patients_path);
            assert!(matches!(*source, ReportError::Io { .. }));
        }
        other => panic!("expected load error, got {other}"),
    }
}

#[test]
fn test_missing_mapping_file_is_load_error() {
    let fixture = Fixture::new(5);
    std::fs::remove_file(fixture.path("IDS_mapping.csv")).unwrap();

    let err = load_inputs(&fixture.config()).unwrap_err();
    assert!(err.is_fatal_load());
    assert!(err.to_string().contains("IDS_mapping.csv"));
}
