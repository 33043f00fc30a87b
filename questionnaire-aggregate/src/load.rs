use std::fs;
use std::path::{Path, PathBuf};

use questionnaire_types::{FlatRecord, PersistenceSink};
use serde_json::Value;
use tracing::{debug, info};

use crate::{AggregateError, RawResponseTable};

/// Load a table from a `.csv`, `.json` or `.jsonl` file, named after the
/// file stem.
pub fn load_file(path: &Path) -> Result<RawResponseTable, AggregateError> {
    match extension(path).as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        Some("jsonl") => load_jsonl(path),
        _ => Err(AggregateError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load every supported file in a directory, in file name order.
pub fn load_directory(directory: &Path) -> Result<Vec<RawResponseTable>, AggregateError> {
    let io_err = |source| AggregateError::Io {
        path: directory.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(directory).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if matches!(extension(&path).as_deref(), Some("csv" | "json" | "jsonl")) {
            paths.push(path);
        }
    }
    paths.sort();

    let tables = paths
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    info!(directory = %directory.display(), tables = tables.len(), "directory loaded");
    Ok(tables)
}

/// Load every table a sink holds.
pub fn load_sink<S: PersistenceSink + ?Sized>(
    sink: &S,
) -> Result<Vec<RawResponseTable>, AggregateError> {
    let tables = sink
        .tables()?
        .iter()
        .map(|table| RawResponseTable::from_sink(sink, table))
        .collect::<Result<Vec<_>, _>>()?;
    info!(tables = tables.len(), "sink loaded");
    Ok(tables)
}

/// Load a CSV file with a header row.
///
/// Every cell is kept as text; empty cells are absent.
pub fn load_csv(path: &Path) -> Result<RawResponseTable, AggregateError> {
    let csv_err = |source| AggregateError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let header: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let mut row = FlatRecord::new();
        for (column, cell) in header.iter().zip(record.iter()) {
            if !cell.is_empty() {
                row.insert(column.clone(), Value::String(cell.to_string()));
            }
        }
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(RawResponseTable::new(table_name(path), rows))
}

/// Load a JSON file holding an array of objects.
pub fn load_json(path: &Path) -> Result<RawResponseTable, AggregateError> {
    let text = read(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|source| AggregateError::Json {
        path: path.to_path_buf(),
        line: source.line(),
        source,
    })?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(AggregateError::NotAnObject {
                path: path.to_path_buf(),
                line: 1,
            });
        }
    };

    let rows = items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            _ => Err(AggregateError::NotAnObject {
                path: path.to_path_buf(),
                line: 1,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path.display(), rows = rows.len(), "json loaded");
    Ok(RawResponseTable::new(table_name(path), rows))
}

/// Load a JSON lines file, one object per line. Blank lines are skipped.
pub fn load_jsonl(path: &Path) -> Result<RawResponseTable, AggregateError> {
    let text = read(path)?;
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| AggregateError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        match value {
            Value::Object(row) => rows.push(row),
            _ => {
                return Err(AggregateError::NotAnObject {
                    path: path.to_path_buf(),
                    line: i + 1,
                });
            }
        }
    }

    debug!(path = %path.display(), rows = rows.len(), "jsonl loaded");
    Ok(RawResponseTable::new(table_name(path), rows))
}

fn read(path: &Path) -> Result<String, AggregateError> {
    fs::read_to_string(path).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}
