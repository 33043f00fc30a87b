use std::path::{Path, PathBuf};
use std::sync::Mutex;

use questionnaire_types::{FlatRecord, PersistenceSink, Record, StorageError};
use serde_json::Value;
use tracing::{debug, info};

use crate::file::{list_tables, read_or_empty, table_path, write_atomic};

const EXTENSION: &str = "csv";

/// Stores each table as a CSV file with a header row.
///
/// The header is the union of every saved record's columns in first-seen
/// order. A record that brings new columns rewrites the file with the wider
/// header; cells a record does not have are written empty.
#[derive(Debug)]
pub struct CsvStore {
    directory: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    /// Create a store rooted at `directory`. The directory is created on the
    /// first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, table: &str) -> PathBuf {
        table_path(&self.directory, table, EXTENSION)
    }
}

impl PersistenceSink for CsvStore {
    fn save(&self, record: &Record) -> Result<(), StorageError> {
        let table = record.partition_key();
        let flat = record.to_flat();

        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::backend(anyhow::anyhow!("csv store lock poisoned")))?;

        let path = self.path(&table);
        let contents = read_or_empty(&path)?;
        let (mut header, mut rows) = if contents.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            read_rows(&contents)?
        };

        let added: Vec<String> = flat
            .keys()
            .filter(|column| !header.contains(column))
            .cloned()
            .collect();
        if !added.is_empty() && !header.is_empty() {
            info!(%table, ?added, "table header extended");
        }
        header.extend(added);

        rows.push(
            header
                .iter()
                .map(|column| flat.get(column).map(to_cell).unwrap_or_default())
                .collect(),
        );
        write_atomic(&path, &write_table(&header, rows)?)?;

        info!(%table, path = %path.display(), "record saved");
        Ok(())
    }

    fn fetch_all(&self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        let path = self.path(table);
        let contents = read_or_empty(&path)?;
        if contents.is_empty() {
            return Ok(Vec::new());
        }

        let records = read_records(&contents)?;
        debug!(table, count = records.len(), "records fetched");
        Ok(records)
    }

    fn tables(&self) -> Result<Vec<String>, StorageError> {
        Ok(list_tables(&self.directory, EXTENSION)?)
    }
}

/// Read CSV bytes with a header row into flat records.
///
/// Cells are typed back where that is lossless: canonical whole numbers
/// become numbers and compact JSON objects (factor ratings) become objects.
/// Everything else is text.
pub fn read_records(contents: &[u8]) -> Result<Vec<FlatRecord>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents);
    let header: Vec<String> = reader
        .headers()
        .map_err(StorageError::serialization)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(StorageError::serialization)?;
        let mut flat = FlatRecord::new();
        for (column, cell) in header.iter().zip(row.iter()) {
            flat.insert(column.clone(), from_cell(cell));
        }
        records.push(flat);
    }
    Ok(records)
}

/// The header and the raw cells of every row, untyped.
fn read_rows(contents: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents);
    let header = reader
        .headers()
        .map_err(StorageError::serialization)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(StorageError::serialization)?;
        rows.push(row.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

/// Write a header and rows, padding short rows with empty cells.
fn write_table(header: &[String], rows: Vec<Vec<String>>) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(StorageError::serialization)?;
    for mut row in rows {
        if row.len() < header.len() {
            row.resize(header.len(), String::new());
        }
        writer
            .write_record(&row)
            .map_err(StorageError::serialization)?;
    }
    writer.into_inner().map_err(StorageError::serialization)
}

fn to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Type a cell back only when writing the typed value reproduces the cell
/// exactly, so text such as `007` stays text.
fn from_cell(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        if n.to_string() == cell {
            return Value::from(n);
        }
    }
    if cell.starts_with('{') {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(cell) {
            if to_cell(&value) == cell {
                return value;
            }
        }
    }
    Value::String(cell.to_string())
}
