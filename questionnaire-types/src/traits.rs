use crate::{FlatRecord, Record, StorageError};

/// Trait for stores that persist submitted records.
///
/// Sinks are shared by every session, so they take `&self` and must be safe
/// to call concurrently. Each `save` is all-or-nothing: after a failure no
/// part of the record may be visible to `fetch_all`.
pub trait PersistenceSink {
    /// Append a record to the table named by its partition key.
    fn save(&self, record: &Record) -> Result<(), StorageError>;

    /// Read every record of a table. A table that does not exist is empty.
    fn fetch_all(&self, table: &str) -> Result<Vec<FlatRecord>, StorageError>;

    /// List the tables that hold at least one record.
    fn tables(&self) -> Result<Vec<String>, StorageError>;
}

impl<S: PersistenceSink + ?Sized> PersistenceSink for &S {
    fn save(&self, record: &Record) -> Result<(), StorageError> {
        (**self).save(record)
    }

    fn fetch_all(&self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        (**self).fetch_all(table)
    }

    fn tables(&self) -> Result<Vec<String>, StorageError> {
        (**self).tables()
    }
}
