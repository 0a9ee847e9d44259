//! Configuration for the report pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ReportError, Result};
use crate::error::util::safe_open_file;

/// Default batch size for CSV decoding
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Environment variable pointing at an optional JSON configuration file
pub const CONFIG_FILE_ENV: &str = "DIABETES_REPORT_CONFIG";

/// How rows are written into the `patients` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Plain insert; a rerun fails on the primary key
    Insert,
    /// Insert that ignores rows whose key already exists
    #[default]
    Upsert,
}

impl FromStr for WriteMode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(Self::Insert),
            "upsert" => Ok(Self::Upsert),
            other => Err(ReportError::Config(format!(
                "unknown write mode '{other}', expected 'insert' or 'upsert'"
            ))),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Upsert => write!(f, "upsert"),
        }
    }
}

/// Relational store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Whether the persistence stage runs at all
    pub enabled: bool,
    /// SQLite database file
    pub path: PathBuf,
    /// Insert or upsert
    pub mode: WriteMode,
    /// Create the `patients` table when it does not exist yet
    pub create_table: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("diabetes_db.sqlite"),
            mode: WriteMode::Upsert,
            create_table: false,
        }
    }
}

/// Configuration for the whole pipeline run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Encounter-level input table
    pub patients_path: PathBuf,
    /// Code-to-label mapping table
    pub mapping_path: PathBuf,
    /// Relational store settings
    pub store: StoreConfig,
    /// Directory receiving the chart images
    pub charts_dir: PathBuf,
    /// Spreadsheet report output
    pub report_path: PathBuf,
    /// Rows per decoded CSV batch
    pub batch_size: usize,
    /// Show progress bars on the terminal
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            patients_path: PathBuf::from("diabetic_data.csv"),
            mapping_path: PathBuf::from("IDS_mapping.csv"),
            store: StoreConfig::default(),
            charts_dir: PathBuf::from("charts"),
            report_path: PathBuf::from("diabetes_hospital_report.xlsx"),
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: true,
        }
    }
}

impl PipelineConfig {
    /// Build the effective configuration for the binary.
    ///
    /// Starts from the JSON file named by `DIABETES_REPORT_CONFIG` (if set)
    /// or the defaults, then applies `DIABETES_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_json_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Read a configuration from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "reading pipeline configuration")?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DIABETES_DATA_PATH") {
            self.patients_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIABETES_MAPPING_PATH") {
            self.mapping_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIABETES_DB_PATH") {
            self.store.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIABETES_DB_MODE") {
            self.store.mode = v.parse()?;
        }
        if let Some(v) = lookup("DIABETES_DB_CREATE_TABLE") {
            self.store.create_table = parse_flag("DIABETES_DB_CREATE_TABLE", &v)?;
        }
        if let Some(v) = lookup("DIABETES_SKIP_DB") {
            self.store.enabled = !parse_flag("DIABETES_SKIP_DB", &v)?;
        }
        if let Some(v) = lookup("DIABETES_CHARTS_DIR") {
            self.charts_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIABETES_REPORT_PATH") {
            self.report_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("DIABETES_BATCH_SIZE") {
            self.batch_size = v
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ReportError::Config(format!(
                        "DIABETES_BATCH_SIZE must be a positive integer, got '{v}'"
                    ))
                })?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ReportError::Config(format!(
            "{key} must be a boolean flag, got '{other}'"
        ))),
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Patients Data: {}", self.patients_path.display())?;
        writeln!(f, "  Mapping Data: {}", self.mapping_path.display())?;
        if self.store.enabled {
            writeln!(
                f,
                "  Database: {} (mode: {}, create table: {})",
                self.store.path.display(),
                self.store.mode,
                self.store.create_table
            )?;
        } else {
            writeln!(f, "  Database: disabled")?;
        }
        writeln!(f, "  Charts Directory: {}", self.charts_dir.display())?;
        writeln!(f, "  Report: {}", self.report_path.display())?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        Ok(())
    }
}
