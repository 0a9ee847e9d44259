use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use diabetes_report::models::PATIENT_COLUMNS;
use diabetes_report::{PipelineConfig, StoreConfig, WriteMode};
use tempfile::TempDir;

/// Rows in the generated mapping file, excluding the header
pub const MAPPING_ROWS: usize = 12;
pub const MAPPING_COLUMNS: usize = 2;

const MAPPING_CSV: &str = "\
admission_type_id,description
1,Emergency
2,Urgent
3,Elective
6,NULL
,
discharge_disposition_id,description
1,Discharged to home
2,Discharged/transferred to another short term hospital
,
admission_source_id,description
1, Physician Referral
7, Emergency Room
";

const RACES: [&str; 4] = ["Caucasian", "AfricanAmerican", "?", "Hispanic"];
const INSULIN: [&str; 4] = ["No", "Up", "Down", "Steady"];
const OUTCOMES: [&str; 3] = ["NO", ">30", "<30"];

/// Value of column `name` for generated row `i`
fn cell(name: &str, i: usize) -> String {
    match name {
        "encounter_id" => (1000 + i).to_string(),
        "patient_nbr" => (500 + i / 2).to_string(),
        "race" => RACES[i % RACES.len()].to_string(),
        "gender" => if i % 2 == 0 { "Female" } else { "Male" }.to_string(),
        "age" => format!("[{}-{})", (i % 10) * 10, (i % 10) * 10 + 10),
        "weight" => "?".to_string(),
        "admission_type_id" => (i % 8 + 1).to_string(),
        "discharge_disposition_id" => (i % 25 + 1).to_string(),
        "admission_source_id" => (i % 20 + 1).to_string(),
        "time_in_hospital" => stay_days(i).to_string(),
        "payer_code" => if i % 4 == 0 { "MC" } else { "?" }.to_string(),
        // Every third encounter has no recorded specialty
        "medical_specialty" if i % 3 == 0 => String::new(),
        "medical_specialty" => "InternalMedicine".to_string(),
        "num_lab_procedures" => (40 + i % 30).to_string(),
        "num_procedures" => (i % 6).to_string(),
        "num_medications" => medications(i).to_string(),
        "number_outpatient" => "0".to_string(),
        "number_emergency" => (i % 2).to_string(),
        "number_inpatient" => (i % 3).to_string(),
        "diag_1" => if i % 2 == 0 { "250.83" } else { "V57" }.to_string(),
        "diag_2" | "diag_3" => "401".to_string(),
        "number_diagnoses" => (i % 9 + 1).to_string(),
        // Missing-value markers, read back as nulls
        "max_glu_serum" => if i % 4 == 0 { ">200" } else { "None" }.to_string(),
        "A1Cresult" => match i % 5 {
            0 => ">7",
            1 => "n/a",
            2 => "NA",
            _ => "None",
        }
        .to_string(),
        "insulin" => INSULIN[i % INSULIN.len()].to_string(),
        "change" => if i % 2 == 0 { "Ch" } else { "No" }.to_string(),
        "diabetesMed" => if i % 3 == 0 { "No" } else { "Yes" }.to_string(),
        "readmitted" => outcome(i).to_string(),
        _ => "No".to_string(),
    }
}

#[must_use]
pub fn stay_days(i: usize) -> usize {
    i % 14 + 1
}

#[must_use]
pub fn medications(i: usize) -> usize {
    5 + (i * 7) % 30
}

#[must_use]
pub fn outcome(i: usize) -> &'static str {
    OUTCOMES[i % OUTCOMES.len()]
}

/// Columns with missing values in the generated encounters and their null counts
#[must_use]
pub fn expected_null_counts(rows: usize) -> Vec<(String, usize)> {
    let count = |pred: fn(usize) -> bool| (0..rows).filter(|i| pred(*i)).count();
    vec![
        ("medical_specialty".to_string(), count(|i| i % 3 == 0)),
        ("max_glu_serum".to_string(), count(|i| i % 4 != 0)),
        ("A1Cresult".to_string(), count(|i| i % 5 != 0)),
    ]
}

/// Count generated rows with the given readmission label
#[must_use]
pub fn expected_outcome_count(rows: usize, label: &str) -> usize {
    (0..rows).filter(|i| outcome(*i) == label).count()
}

/// Write an encounter CSV with the full 50-column header
pub fn write_patients_csv(path: &Path, rows: usize) -> std::io::Result<()> {
    let mut csv = PATIENT_COLUMNS.iter().map(|c| c.name).collect::<Vec<_>>().join(",");
    csv.push('\n');
    for i in 0..rows {
        let line = PATIENT_COLUMNS
            .iter()
            .map(|c| cell(c.name, i))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(csv, "{line}");
    }
    fs::write(path, csv)
}

pub fn write_mapping_csv(path: &Path) -> std::io::Result<()> {
    fs::write(path, MAPPING_CSV)
}

/// A temporary working directory holding both input files
pub struct Fixture {
    pub dir: TempDir,
    pub rows: usize,
}

impl Fixture {
    /// Create a fixture with `rows` generated encounters
    #[must_use]
    pub fn new(rows: usize) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        write_patients_csv(&dir.path().join("diabetic_data.csv"), rows).expect("write encounters");
        write_mapping_csv(&dir.path().join("IDS_mapping.csv")).expect("write mapping");
        Self { dir, rows }
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Pipeline configuration writing every output inside the fixture
    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            patients_path: self.path("diabetic_data.csv"),
            mapping_path: self.path("IDS_mapping.csv"),
            store: StoreConfig {
                enabled: true,
                path: self.path("diabetes_db.sqlite"),
                mode: WriteMode::Upsert,
                create_table: true,
            },
            charts_dir: self.path("charts"),
            report_path: self.path("diabetes_hospital_report.xlsx"),
            // Small batches so loading exercises concatenation
            batch_size: 16,
            show_progress: false,
        }
    }
}

/// Whether the file at `path` starts with `magic`
#[must_use]
pub fn starts_with(path: &Path, magic: &[u8]) -> bool {
    fs::read(path).is_ok_and(|bytes| bytes.starts_with(magic))
}

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
/// xlsx files are zip archives
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
