//! Relational store for encounter rows
//!
//! Writes the loaded encounter table into the SQLite `patients` table. The
//! column list comes from the static map in [`crate::models::patients`], so
//! no loaded header text is ever spliced into SQL. All rows are written in
//! one transaction through a single prepared statement.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::ProgressBar;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use crate::config::{StoreConfig, WriteMode};
use crate::error::{ReportError, Result};
use crate::models::patients::{ENCOUNTER_ID, column_spec, create_table_sql};
use crate::models::{ColumnSpec, PATIENTS_TABLE, Table};
use crate::utils::arrow::{CellValue, cell_value};
use crate::utils::logging::{
    create_main_progress_bar, finish_and_clear, log_operation_complete,
};

/// Result of one persistence run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistReport {
    /// Rows offered to the store
    pub rows_seen: usize,
    /// Rows actually inserted
    pub rows_inserted: usize,
    /// Rows ignored because their key already existed
    pub rows_skipped: usize,
}

/// Outcome of the persistence stage as seen by the pipeline
#[derive(Debug)]
pub enum PersistOutcome {
    /// Rows were written
    Stored(PersistReport),
    /// Persistence disabled by configuration
    Skipped,
    /// Persistence failed; the run carries on without it
    Failed(ReportError),
}

impl PersistOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Connection to the SQLite database holding the `patients` table
#[derive(Debug)]
pub struct PatientStore {
    conn: Connection,
    path: PathBuf,
}

impl PatientStore {
    /// Open (or create) the database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `patients` table from the static column map if absent
    pub fn ensure_table(&self) -> Result<()> {
        self.conn.execute(&create_table_sql(), [])?;
        Ok(())
    }

    /// Whether the `patients` table exists
    pub fn table_exists(&self) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [PATIENTS_TABLE],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of rows currently stored
    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {PATIENTS_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Write every row of `table`, committing once at the end
    ///
    /// In [`WriteMode::Upsert`] rows whose `encounter_id` already exists are
    /// left untouched, so rerunning is a no-op. In [`WriteMode::Insert`] a
    /// duplicate key fails the statement and the whole transaction rolls back.
    pub fn persist(
        &mut self,
        table: &Table,
        mode: WriteMode,
        show_progress: bool,
    ) -> Result<PersistReport> {
        let start = Instant::now();
        let bindings = bind_columns(table)?;
        let sql = insert_sql(&bindings, mode);
        log::debug!("Persisting with statement: {sql}");

        let pb = create_main_progress_bar(
            table.num_rows() as u64,
            Some("Inserting encounters"),
            show_progress,
        );

        let written = insert_rows(&mut self.conn, table, &bindings, &sql, &pb);
        finish_and_clear(&pb);
        let inserted = written?;

        let report = PersistReport {
            rows_seen: table.num_rows(),
            rows_inserted: inserted,
            rows_skipped: table.num_rows() - inserted,
        };
        log_operation_complete("inserted", &self.path, inserted, Some(start.elapsed()));
        if report.rows_skipped > 0 {
            log::info!("Skipped {} rows already present", report.rows_skipped);
        }
        Ok(report)
    }
}

/// Insert every row inside one transaction, returning the number written
///
/// The transaction rolls back on drop if any statement fails.
fn insert_rows(
    conn: &mut Connection,
    table: &Table,
    bindings: &[(usize, &'static ColumnSpec)],
    sql: &str,
    pb: &ProgressBar,
) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(sql)?;
        let columns: Vec<_> = bindings
            .iter()
            .map(|(idx, _)| table.batch().column(*idx))
            .collect();

        for row in 0..table.num_rows() {
            let values = columns.iter().map(|array| sql_value(cell_value(array, row)));
            inserted += stmt.execute(params_from_iter(values))?;
            pb.inc(1);
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Run the persistence stage for the pipeline
///
/// Connection, schema and SQL failures are returned as errors so the caller
/// can report and swallow them.
pub fn persist_table(
    table: &Table,
    config: &StoreConfig,
    show_progress: bool,
) -> Result<PersistReport> {
    let mut store = PatientStore::open(&config.path)?;

    if config.create_table {
        store.ensure_table()?;
    } else if !store.table_exists()? {
        return Err(ReportError::SchemaMismatch(format!(
            "table '{PATIENTS_TABLE}' does not exist in {}",
            config.path.display()
        )));
    }

    store.persist(table, config.mode, show_progress)
}

/// Match every loaded header against the static column map
///
/// Returns (column index in the table, static column entry) pairs in header order.
fn bind_columns(table: &Table) -> Result<Vec<(usize, &'static ColumnSpec)>> {
    let mut bindings = Vec::with_capacity(table.num_columns());
    for (idx, name) in table.column_names().iter().enumerate() {
        let spec = column_spec(name).ok_or_else(|| {
            ReportError::SchemaMismatch(format!(
                "column '{name}' is not part of the '{PATIENTS_TABLE}' table"
            ))
        })?;
        bindings.push((idx, spec));
    }

    if !bindings.iter().any(|(_, spec)| spec.name == ENCOUNTER_ID) {
        return Err(ReportError::SchemaMismatch(format!(
            "key column '{ENCOUNTER_ID}' is missing"
        )));
    }

    Ok(bindings)
}

fn insert_sql(bindings: &[(usize, &'static ColumnSpec)], mode: WriteMode) -> String {
    let columns = bindings
        .iter()
        .map(|(_, spec)| format!("\"{}\"", spec.name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=bindings.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let conflict = match mode {
        WriteMode::Insert => String::new(),
        WriteMode::Upsert => format!(" ON CONFLICT(\"{ENCOUNTER_ID}\") DO NOTHING"),
    };
    format!("INSERT INTO {PATIENTS_TABLE} ({columns}) VALUES ({placeholders}){conflict}")
}

fn sql_value(cell: CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Integer(v) => Value::Integer(v),
        CellValue::Real(v) => Value::Real(v),
        CellValue::Boolean(v) => Value::Integer(i64::from(v)),
        CellValue::Text(v) => Value::Text(v),
    }
}
