//! Encounter table layout
//!
//! Static column map of the `patients` table. Only names listed here ever
//! reach generated SQL; loaded headers are matched against this map.

use std::fmt;

/// Name of the relational table holding encounters
pub const PATIENTS_TABLE: &str = "patients";

pub const ENCOUNTER_ID: &str = "encounter_id";
pub const GENDER: &str = "gender";
pub const AGE: &str = "age";
pub const TIME_IN_HOSPITAL: &str = "time_in_hospital";
pub const NUM_MEDICATIONS: &str = "num_medications";
pub const READMITTED: &str = "readmitted";

/// Storage class of a column in the relational store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// One entry of the static column map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: SqlType,
}

const fn int(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type: SqlType::Integer,
    }
}

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type: SqlType::Text,
    }
}

/// Every column of the encounter export, in file order
pub const PATIENT_COLUMNS: &[ColumnSpec] = &[
    int(ENCOUNTER_ID),
    int("patient_nbr"),
    text("race"),
    text(GENDER),
    text(AGE),
    text("weight"),
    int("admission_type_id"),
    int("discharge_disposition_id"),
    int("admission_source_id"),
    int(TIME_IN_HOSPITAL),
    text("payer_code"),
    text("medical_specialty"),
    int("num_lab_procedures"),
    int("num_procedures"),
    int(NUM_MEDICATIONS),
    int("number_outpatient"),
    int("number_emergency"),
    int("number_inpatient"),
    text("diag_1"),
    text("diag_2"),
    text("diag_3"),
    int("number_diagnoses"),
    text("max_glu_serum"),
    text("A1Cresult"),
    text("metformin"),
    text("repaglinide"),
    text("nateglinide"),
    text("chlorpropamide"),
    text("glimepiride"),
    text("acetohexamide"),
    text("glipizide"),
    text("glyburide"),
    text("tolbutamide"),
    text("pioglitazone"),
    text("rosiglitazone"),
    text("acarbose"),
    text("miglitol"),
    text("troglitazone"),
    text("tolazamide"),
    text("examide"),
    text("citoglipton"),
    text("insulin"),
    text("glyburide-metformin"),
    text("glipizide-metformin"),
    text("glimepiride-pioglitazone"),
    text("metformin-rosiglitazone"),
    text("metformin-pioglitazone"),
    text("change"),
    text("diabetesMed"),
    text(READMITTED),
];

/// Find the static column entry for a loaded header
#[must_use]
pub fn column_spec(name: &str) -> Option<&'static ColumnSpec> {
    PATIENT_COLUMNS.iter().find(|spec| spec.name == name)
}

/// `CREATE TABLE` statement for the static column map
#[must_use]
pub fn create_table_sql() -> String {
    let columns = PATIENT_COLUMNS
        .iter()
        .map(|spec| {
            let key = if spec.name == ENCOUNTER_ID {
                " PRIMARY KEY"
            } else {
                ""
            };
            format!("\"{}\" {}{key}", spec.name, spec.sql_type.as_sql())
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {PATIENTS_TABLE} ({columns})")
}

/// Readmission outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readmission {
    /// Readmitted within 30 days
    Within30,
    /// Readmitted after more than 30 days
    After30,
    /// No record of readmission
    No,
}

impl Readmission {
    pub const ALL: [Self; 3] = [Self::Within30, Self::After30, Self::No];

    /// Label as it appears in the `readmitted` column
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Within30 => "<30",
            Self::After30 => ">30",
            Self::No => "NO",
        }
    }

    /// Match a label exactly, as value counts and pivots group it
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Readmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
