use std::path::{Path, PathBuf};
use std::sync::Mutex;

use questionnaire_types::{FlatRecord, PersistenceSink, Record, StorageError};
use tracing::{debug, info};

use crate::file::{list_tables, read_or_empty, table_path, write_atomic};

const EXTENSION: &str = "jsonl";

/// Stores each table as a JSON lines file, one record per line.
///
/// Records keep their own columns, so tables may mix questionnaire
/// versions.
#[derive(Debug)]
pub struct JsonStore {
    directory: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
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

impl PersistenceSink for JsonStore {
    fn save(&self, record: &Record) -> Result<(), StorageError> {
        let table = record.partition_key();
        let mut line =
            serde_json::to_vec(&record.to_flat()).map_err(StorageError::serialization)?;
        line.push(b'\n');

        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::backend(anyhow::anyhow!("json store lock poisoned")))?;

        let path = self.path(&table);
        let mut contents = read_or_empty(&path)?;
        if !contents.is_empty() && !contents.ends_with(b"\n") {
            contents.push(b'\n');
        }
        contents.extend_from_slice(&line);
        write_atomic(&path, &contents)?;

        info!(%table, path = %path.display(), "record saved");
        Ok(())
    }

    fn fetch_all(&self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        let path = self.path(table);
        let contents = read_or_empty(&path)?;
        let text = String::from_utf8(contents).map_err(StorageError::serialization)?;

        let records = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<FlatRecord>(line).map_err(StorageError::serialization)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(table, count = records.len(), "records fetched");
        Ok(records)
    }

    fn tables(&self) -> Result<Vec<String>, StorageError> {
        Ok(list_tables(&self.directory, EXTENSION)?)
    }
}
