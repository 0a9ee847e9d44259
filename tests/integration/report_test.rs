use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx, open_workbook};
use diabetes_report::models::{PATIENT_COLUMNS, Table};
use diabetes_report::report::{
    Cell, KPI_SHEET, MAPPING_SHEET, PATIENTS_SHEET, SHEET_NAMES, SUMMARY_SHEET, SheetContent,
    build_sheets, write_workbook,
};
use diabetes_report::{export_report, read_csv_table};

use crate::utils::{Fixture, MAPPING_ROWS, ZIP_MAGIC, stay_days, starts_with};

fn load(fixture: &Fixture) -> diabetes_report::Result<(Table, Table)> {
    let patients = read_csv_table(&fixture.path("diabetic_data.csv"), "diabetic_data", 64)?;
    let mapping = read_csv_table(&fixture.path("IDS_mapping.csv"), "IDS_mapping", 64)?;
    Ok((patients, mapping))
}

#[test]
fn test_export_writes_workbook() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(20);
    let (patients, mapping) = load(&fixture)?;
    let path = fixture.path("report.xlsx");

    let summary = export_report(&patients, &mapping, &path)?;
    assert!(starts_with(&path, ZIP_MAGIC));
    assert_eq!(summary.sheets.len(), 7);
    assert_eq!(summary.sheets[0].rows, 21);
    Ok(())
}

fn open_report(path: &Path) -> Xlsx<BufReader<File>> {
    open_workbook(path).expect("saved report should open as xlsx")
}

fn sheet(workbook: &mut Xlsx<BufReader<File>>, name: &str) -> Range<Data> {
    workbook
        .worksheet_range(name)
        .unwrap_or_else(|e| panic!("sheet '{name}' unreadable: {e}"))
}

fn column_index(name: &str) -> u32 {
    PATIENT_COLUMNS.iter().position(|c| c.name == name).unwrap() as u32
}

#[test]
fn test_saved_workbook_reads_back() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(20);
    let (patients, mapping) = load(&fixture)?;
    let path = fixture.path("diabetes_hospital_report.xlsx");
    export_report(&patients, &mapping, &path)?;

    let mut workbook = open_report(&path);
    assert_eq!(workbook.sheet_names(), SHEET_NAMES.map(String::from).to_vec());

    let expected_sizes = [
        (21, 50),
        (MAPPING_ROWS + 1, 2),
        (12, 51),
        (6, 2),
        (3, 4),
        (11, 4),
        (4, 2),
    ];
    for (name, size) in SHEET_NAMES.iter().zip(expected_sizes) {
        assert_eq!(sheet(&mut workbook, name).get_size(), size, "{name}");
    }
    Ok(())
}

#[test]
fn test_saved_workbook_cell_values() -> diabetes_report::Result<()> {
    let rows = 20;
    let fixture = Fixture::new(rows);
    let (patients, mapping) = load(&fixture)?;
    let path = fixture.path("diabetes_hospital_report.xlsx");
    export_report(&patients, &mapping, &path)?;
    let mut workbook = open_report(&path);

    let encounters = sheet(&mut workbook, PATIENTS_SHEET);
    assert_eq!(encounters.get_value((0, 0)), Some(&Data::String("encounter_id".into())));
    assert_eq!(encounters.get_value((1, 0)).and_then(DataType::as_f64), Some(1000.0));
    // Missing values are written as empty cells
    let glucose = column_index("max_glu_serum");
    assert_eq!(encounters.get_value((1, glucose)), Some(&Data::String(">200".into())));
    assert_eq!(encounters.get_value((2, glucose)), Some(&Data::Empty));
    assert_eq!(
        encounters.get_value((1, column_index("medical_specialty"))),
        Some(&Data::Empty)
    );

    let ids = sheet(&mut workbook, MAPPING_SHEET);
    assert_eq!(ids.get_value((4, 1)), Some(&Data::Empty));

    let kpis = sheet(&mut workbook, KPI_SHEET);
    assert_eq!(kpis.get_value((1, 0)), Some(&Data::String("Total Patients".into())));
    assert_eq!(kpis.get_value((1, 1)).and_then(DataType::as_f64), Some(rows as f64));
    let mean_stay = (0..rows).map(stay_days).sum::<usize>() as f64 / rows as f64;
    let average = kpis.get_value((2, 1)).and_then(DataType::as_f64).unwrap();
    assert!((average - mean_stay).abs() < 1e-9);
    let outcomes: f64 = (3..6)
        .filter_map(|r| kpis.get_value((r, 1)).and_then(DataType::as_f64))
        .sum();
    assert!((outcomes - rows as f64).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn test_export_overwrites_previous_report() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(20);
    let (patients, mapping) = load(&fixture)?;
    let path = fixture.path("report.xlsx");
    std::fs::write(&path, b"stale").unwrap();

    export_report(&patients, &mapping, &path)?;
    assert!(starts_with(&path, ZIP_MAGIC));
    Ok(())
}

#[test]
fn test_kpi_sheet_contents() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(30);
    let (patients, mapping) = load(&fixture)?;
    let sheets = build_sheets(&patients, &mapping)?;

    let kpis = sheets.iter().find(|s| s.name == KPI_SHEET).unwrap();
    let SheetContent::Grid(grid) = &kpis.content else {
        panic!("KPI sheet should be a grid");
    };
    assert_eq!(grid.header, vec!["KPI", "Value"]);
    assert_eq!(grid.rows[0], vec![Cell::from("Total Patients"), Cell::Number(30.0)]);

    // The three outcome KPIs add up to the total
    let outcomes: f64 = grid.rows[2..]
        .iter()
        .map(|row| match row[1] {
            Cell::Number(v) => v,
            _ => 0.0,
        })
        .sum();
    assert!((outcomes - 30.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn test_summary_sheet_labels() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(10);
    let (patients, mapping) = load(&fixture)?;
    let sheets = build_sheets(&patients, &mapping)?;

    let summary = sheets.iter().find(|s| s.name == SUMMARY_SHEET).unwrap();
    let SheetContent::Grid(grid) = &summary.content else {
        panic!("summary sheet should be a grid");
    };
    let labels: Vec<&Cell> = grid.rows.iter().map(|row| &row[0]).collect();
    assert_eq!(labels.first(), Some(&&Cell::from("count")));
    assert_eq!(labels.last(), Some(&&Cell::from("max")));
    assert_eq!(grid.header[1], "encounter_id");
    Ok(())
}

#[test]
fn test_write_workbook_rejects_duplicate_sheet_names() -> diabetes_report::Result<()> {
    let fixture = Fixture::new(5);
    let (patients, mapping) = load(&fixture)?;
    let mut sheets = build_sheets(&patients, &mapping)?;
    sheets[1].name = sheets[0].name;

    let path = fixture.path("dup.xlsx");
    assert!(write_workbook(&sheets, &path).is_err());
    Ok(())
}
