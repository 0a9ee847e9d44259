use diabetes_report::{PatientStore, ReportError, WriteMode, persist_table, read_csv_table};

use crate::utils::Fixture;

#[test]
fn test_upsert_rerun_is_idempotent() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(25);
    let config = fixture.config();
    let table = read_csv_table(&config.patients_path, "diabetic_data", config.batch_size)?;

    let first = persist_table(&table, &config.store, false)?;
    assert_eq!(first.rows_seen, 25);
    assert_eq!(first.rows_inserted, 25);
    assert_eq!(first.rows_skipped, 0);

    let second = persist_table(&table, &config.store, false)?;
    assert_eq!(second.rows_inserted, 0);
    assert_eq!(second.rows_skipped, 25);

    let store = PatientStore::open(&config.store.path)?;
    assert_eq!(store.row_count()?, 25);
    Ok(())
}

#[test]
fn test_upsert_adds_only_new_encounters() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(30);
    let config = fixture.config();

    // Persist the first 10 encounters, then the full file
    crate::utils::write_patients_csv(&fixture.path("first.csv"), 10).expect("write fixture");
    let first = read_csv_table(&fixture.path("first.csv"), "diabetic_data", 64)?;
    let full = read_csv_table(&config.patients_path, "diabetic_data", 64)?;

    persist_table(&first, &config.store, false)?;
    let report = persist_table(&full, &config.store, false)?;
    assert_eq!(report.rows_inserted, 20);
    assert_eq!(report.rows_skipped, 10);
    assert_eq!(PatientStore::open(&config.store.path)?.row_count()?, 30);
    Ok(())
}

#[test]
fn test_insert_mode_rejects_duplicates_atomically() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(12);
    let mut config = fixture.config();
    config.store.mode = WriteMode::Insert;
    let table = read_csv_table(&config.patients_path, "diabetic_data", 64)?;

    persist_table(&table, &config.store, false)?;
    let err = persist_table(&table, &config.store, false).unwrap_err();
    assert!(matches!(err, ReportError::Sqlite(_)));

    // The failed rerun rolled back; nothing was duplicated or lost
    assert_eq!(PatientStore::open(&config.store.path)?.row_count()?, 12);
    Ok(())
}

#[test]
fn test_missing_table_without_create_flag() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(5);
    let mut config = fixture.config();
    config.store.create_table = false;
    let table = read_csv_table(&config.patients_path, "diabetic_data", 64)?;

    let err = persist_table(&table, &config.store, false).unwrap_err();
    assert!(matches!(err, ReportError::SchemaMismatch(_)));
    assert!(!PatientStore::open(&config.store.path)?.table_exists()?);
    Ok(())
}

#[test]
fn test_unreachable_database_is_an_error() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(5);
    let mut config = fixture.config();
    config.store.path = fixture.path("no_such_dir").join("diabetes_db.sqlite");
    let table = read_csv_table(&config.patients_path, "diabetic_data", 64)?;

    let err = persist_table(&table, &config.store, false).unwrap_err();
    assert!(matches!(err, ReportError::Sqlite(_)));
    assert!(!err.is_fatal_load());
    Ok(())
}
