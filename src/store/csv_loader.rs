//! CSV Import
//!
//! Loads the student performance CSV into documents. Every column becomes a
//! document field; cell text is typed the way a document import would type it.

use serde_json::Value;
use std::path::Path;

use super::error::StoreResult;
use super::types::StudentRecord;

/// Result of a CSV import
#[derive(Debug)]
pub struct CsvImportResult {
    pub records: Vec<StudentRecord>,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Load student records from a CSV file with a header row
pub fn load_students_csv(path: &Path) -> StoreResult<CsvImportResult> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_records(reader)
}

/// Parse student records from CSV text (useful for testing)
pub fn parse_students_csv(data: &str) -> StoreResult<CsvImportResult> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    read_records(reader)
}

fn read_records<R: std::io::Read>(mut reader: csv::Reader<R>) -> StoreResult<CsvImportResult> {
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    let mut rows_failed = 0;
    let mut errors = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Line {}: {}", line_num + 2, e));
                rows_failed += 1;
                continue;
            }
        };

        let mut record = StudentRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = typed_cell(cell) {
                record.insert(header, value);
            }
        }

        if !record.is_empty() {
            records.push(record);
        }
    }

    // Truncate errors if too many
    if errors.len() > 100 {
        let total = errors.len();
        errors.truncate(100);
        errors.push(format!("... and {} more errors", total - 100));
    }

    Ok(CsvImportResult {
        records,
        rows_failed,
        errors,
    })
}

/// Type a cell: integers, then floats, then booleans, else text. Empty cells are absent.
fn typed_cell(cell: &str) -> Option<Value> {
    if cell.is_empty() {
        return None;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(f) = cell.parse::<f64>() {
        // NaN and infinities have no JSON form
        return serde_json::Number::from_f64(f).map(Value::Number);
    }
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => Some(Value::String(cell.to_string())),
    }
}
