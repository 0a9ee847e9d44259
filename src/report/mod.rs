//! Spreadsheet report export
//!
//! Builds the full sheet plan, then writes every sheet into one workbook that
//! is saved once at the end.

pub mod sheets;

use std::path::{Path, PathBuf};
use std::time::Instant;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::util::ensure_parent_directory;
use crate::error::{ReportError, Result};
use crate::models::Table;
use crate::stats::{compute_kpis, compute_pivots, describe};
use crate::utils::arrow::{CellValue, cell_value};
use crate::utils::logging::log_operation_complete;

pub use sheets::{
    AGE_PIVOT_SHEET, Cell, GENDER_PIVOT_SHEET, Grid, KPI_SHEET, MAPPING_SHEET,
    MEDICATION_PIVOT_SHEET, PATIENTS_SHEET, ReportSheet, SHEET_NAMES, SUMMARY_SHEET, SheetContent,
};

/// Name and shape of a written sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    /// Rows including the header row
    pub rows: usize,
    pub columns: usize,
}

/// What the export stage produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub sheets: Vec<SheetInfo>,
}

/// Plan every sheet of the report from the two loaded tables
pub fn build_sheets<'a>(patients: &'a Table, mapping: &'a Table) -> Result<Vec<ReportSheet<'a>>> {
    let described = describe(patients)?;
    let kpis = compute_kpis(patients)?;
    let pivots = compute_pivots(patients)?;

    Ok(vec![
        ReportSheet {
            name: PATIENTS_SHEET,
            content: SheetContent::Table(patients),
        },
        ReportSheet {
            name: MAPPING_SHEET,
            content: SheetContent::Table(mapping),
        },
        ReportSheet {
            name: SUMMARY_SHEET,
            content: SheetContent::Grid(sheets::describe_grid(&described)),
        },
        ReportSheet {
            name: KPI_SHEET,
            content: SheetContent::Grid(sheets::kpi_grid(&kpis)),
        },
        ReportSheet {
            name: GENDER_PIVOT_SHEET,
            content: SheetContent::Grid(sheets::count_pivot_grid(&pivots.gender_by_readmission)),
        },
        ReportSheet {
            name: AGE_PIVOT_SHEET,
            content: SheetContent::Grid(sheets::count_pivot_grid(&pivots.age_by_readmission)),
        },
        ReportSheet {
            name: MEDICATION_PIVOT_SHEET,
            content: SheetContent::Grid(sheets::group_mean_grid(
                &pivots.medications_by_readmission,
            )),
        },
    ])
}

/// Build and write the report for the two loaded tables
pub fn export_report(patients: &Table, mapping: &Table, path: &Path) -> Result<ExportSummary> {
    let sheets = build_sheets(patients, mapping)?;
    write_workbook(&sheets, path)?;

    Ok(ExportSummary {
        path: path.to_path_buf(),
        sheets: sheets
            .iter()
            .map(|sheet| {
                let (rows, columns) = sheet.shape();
                SheetInfo {
                    name: sheet.name.to_string(),
                    rows,
                    columns,
                }
            })
            .collect(),
    })
}

/// Write all sheets into one workbook and save it to `path`
pub fn write_workbook(sheets: &[ReportSheet<'_>], path: &Path) -> Result<()> {
    let start = Instant::now();
    ensure_parent_directory(path, "saving the spreadsheet report")?;

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;
        match &sheet.content {
            SheetContent::Table(table) => write_table(worksheet, table, &header)?,
            SheetContent::Grid(grid) => write_grid(worksheet, grid, &header)?,
        }
        log::debug!("Wrote sheet '{}' {:?}", sheet.name, sheet.shape());
    }

    workbook.save(path)?;
    log_operation_complete("wrote", path, sheets.len(), Some(start.elapsed()));
    Ok(())
}

fn row_num(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| ReportError::Xlsx(XlsxError::RowColumnLimitError))
}

fn col_num(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| ReportError::Xlsx(XlsxError::RowColumnLimitError))
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        // NaN and infinities have no spreadsheet representation
        Cell::Number(v) if v.is_finite() => {
            worksheet.write_number(row, col, *v)?;
        }
        Cell::Number(_) => {}
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header: &Format) -> Result<()> {
    for (c, name) in table.column_names().iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(c)?, name.as_str(), header)?;
    }

    for (c, array) in table.batch().columns().iter().enumerate() {
        let col = col_num(c)?;
        for r in 0..table.num_rows() {
            let cell = match cell_value(array, r) {
                CellValue::Null => Cell::Empty,
                CellValue::Integer(v) => Cell::Number(v as f64),
                CellValue::Real(v) => Cell::Number(v),
                CellValue::Boolean(v) => Cell::Bool(v),
                CellValue::Text(v) => Cell::Text(v),
            };
            write_cell(worksheet, row_num(r + 1)?, col, &cell)?;
        }
    }
    Ok(())
}

fn write_grid(worksheet: &mut Worksheet, grid: &Grid, header: &Format) -> Result<()> {
    for (c, name) in grid.header.iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string_with_format(0, col_num(c)?, name.as_str(), header)?;
        }
    }

    for (r, cells) in grid.rows.iter().enumerate() {
        let row = row_num(r + 1)?;
        for (c, cell) in cells.iter().enumerate() {
            // Index column of a grid is bold like the header
            match cell {
                Cell::Text(s) if c == 0 => {
                    worksheet.write_string_with_format(row, 0, s.as_str(), header)?;
                }
                _ => write_cell(worksheet, row, col_num(c)?, cell)?,
            }
        }
    }
    Ok(())
}
