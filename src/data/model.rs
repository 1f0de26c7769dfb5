use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors raised when a caller names something the schema does not have
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown dimension: {0:?}")]
    UnknownDimension(String),
    #[error("unknown metric predicate: {0:?}")]
    UnknownPredicate(String),
}

// ---------------------------------------------------------------------------
// Dimension – a categorical column usable for filtering or grouping
// ---------------------------------------------------------------------------

/// The categorical attributes of a member record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Continent,
    Region,
    Country,
    AdmissionYear,
    AcademicDegree,
    Gender,
    Status,
    MembershipStatus,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Continent,
        Dimension::Region,
        Dimension::Country,
        Dimension::AdmissionYear,
        Dimension::AcademicDegree,
        Dimension::Gender,
        Dimension::Status,
        Dimension::MembershipStatus,
    ];

    /// Column header used in the dataset files.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Continent => "Continent",
            Dimension::Region => "Region",
            Dimension::Country => "Country",
            Dimension::AdmissionYear => "Admission Year",
            Dimension::AcademicDegree => "Academic Degree",
            Dimension::Gender => "Gender",
            Dimension::Status => "Status",
            Dimension::MembershipStatus => "Membership Status",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Dimension {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.column_name() == s.trim())
            .ok_or_else(|| SchemaError::UnknownDimension(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FieldValue – one non-missing cell of a dimension
// ---------------------------------------------------------------------------

/// A present value of a dimension. Missing cells are `None` at the record
/// level and never become a `FieldValue`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    Text(String),
    Year(i32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Year(y) => write!(f, "{y}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(y: i32) -> Self {
        FieldValue::Year(y)
    }
}

// ---------------------------------------------------------------------------
// MemberRecord – one row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberRecord {
    pub continent: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub admission_date: Option<NaiveDate>,
    /// Derived from `admission_date`.
    pub admission_year: Option<i32>,
    pub academic_degree: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub membership_status: Option<String>,
}

impl MemberRecord {
    /// Set the admission date and keep the derived year in sync.
    pub fn with_admission_date(mut self, date: Option<NaiveDate>) -> Self {
        self.admission_date = date;
        self.admission_year = date.map(|d| d.year());
        self
    }

    /// Borrow the text of a string dimension; `None` for missing cells and
    /// for `AdmissionYear`.
    pub fn text(&self, dimension: Dimension) -> Option<&str> {
        let field = match dimension {
            Dimension::Continent => &self.continent,
            Dimension::Region => &self.region,
            Dimension::Country => &self.country,
            Dimension::AcademicDegree => &self.academic_degree,
            Dimension::Gender => &self.gender,
            Dimension::Status => &self.status,
            Dimension::MembershipStatus => &self.membership_status,
            Dimension::AdmissionYear => return None,
        };
        field.as_deref()
    }

    pub fn value(&self, dimension: Dimension) -> Option<FieldValue> {
        match dimension {
            Dimension::AdmissionYear => self.admission_year.map(FieldValue::Year),
            other => self.text(other).map(|s| FieldValue::Text(s.to_string())),
        }
    }

    /// Membership test without allocating for string dimensions.
    pub fn matches_value(&self, dimension: Dimension, value: &FieldValue) -> bool {
        match (dimension, value) {
            (Dimension::AdmissionYear, FieldValue::Year(y)) => self.admission_year == Some(*y),
            (Dimension::AdmissionYear, FieldValue::Text(_)) => false,
            (other, FieldValue::Text(s)) => self.text(other) == Some(s.as_str()),
            (_, FieldValue::Year(_)) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// MemberTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Immutable once built; share it between sessions behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    records: Vec<MemberRecord>,
}

impl MemberTable {
    pub fn new(records: Vec<MemberRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    /// Iterate the rows at `indices`, skipping out-of-range ones.
    pub fn rows_at<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a MemberRecord> + 'a {
        indices.iter().filter_map(|&i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<MemberRecord> for MemberTable {
    fn from_iter<I: IntoIterator<Item = MemberRecord>>(iter: I) -> Self {
        MemberTable::new(iter.into_iter().collect())
    }
}
