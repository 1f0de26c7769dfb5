use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Date64Type};
use arrow::util::display::array_value_to_string;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{MemberRecord, MemberTable};

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Continent",
    "Region",
    "Country",
    ADMISSION_DATE_COLUMN,
    "Academic Degree",
    "Gender",
    "Status",
    "Membership Status",
];

pub const ADMISSION_DATE_COLUMN: &str = "Admission Date";

/// Day first, as exported by the membership registry.
pub const ADMISSION_DATE_FORMAT: &str = "%d/%m/%Y";

/// Cell contents treated as missing, in addition to blank cells.
const MISSING_MARKERS: [&str; 8] = ["NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a member table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "Continent": "Europe", "Admission Date": "01/02/2020", ... }, ...]`
/// * `.parquet` – string columns; `Admission Date` may also be a Date32/Date64 column
pub fn load_file(path: &Path) -> Result<MemberTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} members from {}", table.len(), path.display());
    Ok(table)
}

/// Parse an admission date; `None` when it does not match [`ADMISSION_DATE_FORMAT`].
pub fn parse_admission_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ADMISSION_DATE_FORMAT).ok()
}

fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row assembly shared by all formats
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Ingest {
    records: Vec<MemberRecord>,
    unparsed_dates: usize,
}

impl Ingest {
    /// Parse a textual date, counting present-but-unparseable ones.
    fn text_date(&mut self, raw: Option<&str>) -> Option<NaiveDate> {
        let raw = raw?;
        let date = parse_admission_date(raw);
        if date.is_none() {
            self.unparsed_dates += 1;
        }
        date
    }

    /// `cell` returns the cleaned value of a required column by name.
    fn push<F>(&mut self, mut cell: F, admission_date: Option<NaiveDate>)
    where
        F: FnMut(&str) -> Option<String>,
    {
        let record = MemberRecord {
            continent: cell("Continent"),
            region: cell("Region"),
            country: cell("Country"),
            academic_degree: cell("Academic Degree"),
            gender: cell("Gender"),
            status: cell("Status"),
            membership_status: cell("Membership Status"),
            ..Default::default()
        }
        .with_admission_date(admission_date);
        self.records.push(record);
    }

    fn finish(self, source: &str) -> MemberTable {
        if self.unparsed_dates > 0 {
            log::warn!(
                "{source}: {} admission dates not in {ADMISSION_DATE_FORMAT} format; their year is left empty",
                self.unparsed_dates
            );
        }
        MemberTable::new(self.records)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<MemberTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Read a member CSV from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<MemberTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut positions = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))?;
        positions.push((name, idx));
    }
    let column = |name: &str| {
        positions
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, idx)| *idx)
    };
    let date_idx = column(ADMISSION_DATE_COLUMN);

    let mut ingest = Ingest::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let raw_date = date_idx
            .and_then(|i| record.get(i))
            .and_then(clean_cell);
        let date = ingest.text_date(raw_date.as_deref());
        ingest.push(
            |name| column(name).and_then(|i| record.get(i)).and_then(clean_cell),
            date,
        );
    }

    Ok(ingest.finish("CSV"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Continent": "Europe", "Region": "Southern Europe", "Country": "Portugal",
///     "Admission Date": "14/03/2021", "Academic Degree": "Doctoral",
///     "Gender": "Female", "Status": "Researcher", "Membership Status": "Paid" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<MemberTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<MemberTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;
    let objects = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    // The first record stands in for the header; no records means no columns.
    for name in REQUIRED_COLUMNS {
        if !objects.first().is_some_and(|obj| obj.contains_key(name)) {
            bail!("JSON records missing '{name}' field");
        }
    }

    let mut ingest = Ingest::default();
    for obj in objects {
        let cell = |name: &str| obj.get(name).and_then(json_to_cell);
        let date = ingest.text_date(cell(ADMISSION_DATE_COLUMN).as_deref());
        ingest.push(cell, date);
    }

    Ok(ingest.finish("JSON"))
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => clean_cell(s),
        other => clean_cell(&other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Non-string columns are rendered with
/// Arrow's display formatting.
fn load_parquet(path: &Path) -> Result<MemberTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    for name in REQUIRED_COLUMNS {
        if builder.schema().index_of(name).is_err() {
            bail!("Parquet file missing '{name}' column");
        }
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut ingest = Ingest::default();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: Vec<(&str, ArrayRef)> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .with_context(|| format!("Parquet batch missing '{name}' column"))?;
            columns.push((name, batch.column(idx).clone()));
        }
        let column = |name: &str| {
            columns
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, col)| col)
        };

        for row in 0..batch.num_rows() {
            let date = match column(ADMISSION_DATE_COLUMN) {
                Some(col) => date_cell(col, row, &mut ingest)
                    .with_context(|| format!("Row {row}: failed to read '{ADMISSION_DATE_COLUMN}'"))?,
                None => None,
            };

            let mut cells = Vec::with_capacity(columns.len());
            for (name, col) in &columns {
                let value = string_cell(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?;
                cells.push((*name, value));
            }
            ingest.push(
                |name| {
                    cells
                        .iter()
                        .find(|(n, _)| *n == name)
                        .and_then(|(_, v)| v.clone())
                },
                date,
            );
        }
    }

    Ok(ingest.finish("Parquet"))
}

// -- Arrow helpers --

fn string_cell(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => array_value_to_string(col.as_ref(), row).context("formatting arrow value")?,
    };
    Ok(clean_cell(&text))
}

fn date_cell(col: &ArrayRef, row: usize, ingest: &mut Ingest) -> Result<Option<NaiveDate>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Date32 => Ok(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Date64 => Ok(col.as_primitive::<Date64Type>().value_as_date(row)),
        _ => {
            let raw = string_cell(col, row)?;
            Ok(ingest.text_date(raw.as_deref()))
        }
    }
}
