//! File-backed persistence sinks for questionnaire submissions.
//!
//! Both stores keep one file per table (partition key) in a directory:
//! - `JsonStore` - `<table>.jsonl`, one JSON object per record
//! - `CsvStore` - `<table>.csv`, header widened as records bring new columns
//!
//! File names encode the table name reversibly (`%XX` for bytes outside
//! `[A-Za-z0-9_-]`), so `tables()` lists the partition keys themselves.
//!
//! Saves are serialized per store and replace the table file atomically, so
//! a failed save never leaves a partial record behind.

mod config;
pub use config::{StorageBackend, StorageConfig};

mod csv_store;
pub use csv_store::{CsvStore, read_records};

mod file;

mod json;
pub use json::JsonStore;
