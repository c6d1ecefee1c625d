//! Tabular source reading
//!
//! Loads the inventory into ordered row maps. Workbooks go through calamine
//! and CSV exports through the csv crate; both produce the same record shape:
//! header row as field names, empty cells as `""`, fully blank rows dropped.

use super::record::CultivarRecord;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Failure while reading the tabular source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),
}

/// Supported source formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read every data row of `path`. `sheet` is ignored for CSV sources.
pub fn read_records(path: &Path, sheet: &str) -> Result<Vec<CultivarRecord>, SourceError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Workbook => read_workbook(path, sheet),
        SourceFormat::Csv => read_csv(path),
    }
}

fn read_workbook(path: &Path, sheet: &str) -> Result<Vec<CultivarRecord>, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_names(header_row.iter().map(|cell| cell.to_string())),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .filter_map(|row| build_record(&headers, row.iter().map(cell_to_value)))
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<CultivarRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = header_names(reader.headers()?.iter().map(str::to_string));

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let values = row.iter().map(|cell| Value::String(cell.to_string()));
        if let Some(record) = build_record(&headers, values) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Field names from the header row. Blank headers get a positional name and
/// repeats get a `.N` suffix (`NAME`, `NAME.1`, `NAME.2`) so no column is lost.
fn header_names(cells: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    cells
        .enumerate()
        .map(|(idx, raw)| {
            let trimmed = raw.trim();
            let mut name = if trimmed.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                trimmed.to_string()
            };

            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            if name != trimmed && !trimmed.is_empty() {
                debug!(column = idx, header = trimmed, renamed = %name, "Duplicate header renamed");
            }

            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}

/// Zip one row against the headers. Short rows are padded with `""`; returns
/// `None` for a row with no content at all.
fn build_record(
    headers: &[String],
    mut values: impl Iterator<Item = Value>,
) -> Option<CultivarRecord> {
    let mut fields = Map::with_capacity(headers.len());
    let mut has_content = false;

    for header in headers {
        let value = values.next().unwrap_or_else(empty);
        if !is_blank(&value) {
            has_content = true;
        }
        fields.insert(header.clone(), value);
    }

    has_content.then(|| CultivarRecord::new(fields))
}

/// Convert a workbook cell. Missing cells become `""`; integral floats become
/// integers so accession `123` never renders as `123.0`. Dates become ISO-8601
/// text, date-only when the cell has no time part.
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => empty(),
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_to_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => datetime_to_value(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => empty(),
    }
}

fn datetime_to_value(dt: &ExcelDateTime) -> Value {
    if dt.is_duration() {
        return float_to_value(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(at) if at.time() == NaiveTime::MIN => {
            Value::String(at.date().format("%Y-%m-%d").to_string())
        }
        Some(at) => Value::String(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => float_to_value(dt.as_f64()),
    }
}

fn float_to_value(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Value::Number((f as i64).into());
    }
    Number::from_f64(f).map(Value::Number).unwrap_or_else(empty)
}

fn empty() -> Value {
    Value::String(String::new())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Null => true,
        _ => false,
    }
}
