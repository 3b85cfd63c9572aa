//! Parsing record sets into rows.
//!
//! Accepts a JSON array of objects (or an object wrapping one under `data`)
//! and CSV with a header line.

use std::path::Path;

use clap::ValueEnum;
use serde_json::Value;

use crate::error::LoadError;
use crate::row::{Column, Row};
use crate::table::{DataTable, TableConfig};

/// Input format of a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

impl Format {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Json,
        }
    }
}

/// Parse `input` into rows.
pub fn parse_rows(input: &str, format: Format) -> Result<Vec<Row>, LoadError> {
    match format {
        Format::Json => parse_json(input),
        Format::Csv => parse_csv(input),
    }
}

fn parse_json(input: &str) -> Result<Vec<Row>, LoadError> {
    let value: Value = serde_json::from_str(input)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(LoadError::Shape("expected an array or an object with a `data` array")),
        },
        _ => return Err(LoadError::Shape("expected an array of objects")),
    };

    records
        .into_iter()
        .map(|record| match record {
            Value::Object(map) => Ok(map
                .into_iter()
                .fold(Row::new(), |row, (key, value)| row.field(key, display_value(&value)))),
            _ => Err(LoadError::Shape("array entries must be objects")),
        })
        .collect()
}

/// Display string of a JSON value.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn parse_csv(input: &str) -> Result<Vec<Row>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .zip(record.iter())
            .fold(Row::new(), |row, (key, value)| row.field(key, value));
        rows.push(row);
    }
    Ok(rows)
}

/// One column per distinct key, in first-seen order.
pub fn infer_columns(rows: &[Row]) -> Vec<Column> {
    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys.into_iter().map(|k| Column::new(k, k)).collect()
}

/// Install a freshly loaded row set. Columns and filter options that
/// `template` leaves open are rebuilt from `rows` on every load, so a
/// reload picks up new values and drops vanished ones.
pub fn apply_rows(table: &mut DataTable<'_>, template: &TableConfig, rows: Vec<Row>) {
    if template.headers.is_empty() {
        table.set_headers(infer_columns(&rows));
    }
    if template.filters.iter().any(|f| f.options.is_empty()) {
        let filters = template
            .filters
            .iter()
            .cloned()
            .map(|mut filter| {
                filter.derive_options(&rows);
                filter
            })
            .collect();
        table.set_filters(filters);
    }
    table.set_rows(rows);
}
