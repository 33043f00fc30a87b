//! In-memory sink for running questionnaires without touching disk.
//!
//! `MemorySink` keeps every saved record in memory, partitioned the same way
//! the file stores are. It can also be told to fail a number of saves, which
//! is how submission retry and failure handling are tested.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{MemorySink, Session, SessionConfig};
//!
//! let sink = MemorySink::new();
//! let mut session = Session::start(&questionnaire, SessionConfig::default()).unwrap();
//! // ... answer and navigate to the last page ...
//! let record = session.submit(&sink).unwrap();
//!
//! assert_eq!(sink.records(&record.partition_key()).len(), 1);
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use tracing::debug;

use crate::{FlatRecord, PersistenceSink, Record, StorageError};

/// A sink that stores flattened records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: Mutex<IndexMap<String, Vec<FlatRecord>>>,
    failures_left: AtomicUsize,
    attempts: AtomicUsize,
}

impl MemorySink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose next `failures` saves return an error.
    pub fn failing(failures: usize) -> Self {
        let sink = Self::default();
        sink.failures_left.store(failures, Ordering::SeqCst);
        sink
    }

    /// Make the next `failures` saves return an error.
    pub fn fail_next(&self, failures: usize) {
        self.failures_left.store(failures, Ordering::SeqCst);
    }

    /// How many times `save` was called, successful or not.
    pub fn save_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// All records saved under a partition key.
    pub fn records(&self, table: &str) -> Vec<FlatRecord> {
        self.tables
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Total number of stored records across all tables.
    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

impl PersistenceSink for MemorySink {
    fn save(&self, record: &Record) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(StorageError::backend(anyhow::anyhow!(
                "simulated storage failure"
            )));
        }

        let table = record.partition_key();
        let mut tables = self.tables.lock().map_err(poisoned)?;
        tables.entry(table.clone()).or_default().push(record.to_flat());
        debug!(%table, "record stored in memory");
        Ok(())
    }

    fn fetch_all(&self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        let tables = self.tables.lock().map_err(poisoned)?;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    fn tables(&self) -> Result<Vec<String>, StorageError> {
        let tables = self.tables.lock().map_err(poisoned)?;
        Ok(tables.keys().cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::backend(anyhow::anyhow!("memory sink lock poisoned"))
}
