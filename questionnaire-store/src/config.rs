use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use questionnaire_types::PersistenceSink;
use serde::{Deserialize, Serialize};

use crate::{CsvStore, JsonStore};

/// Which file format a store writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON object per line.
    #[default]
    Json,
    /// One CSV file per table; the header grows with new columns.
    Csv,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unknown storage backend '{other}', expected json or csv")),
        }
    }
}

/// The `[storage]` section of the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding one file per table.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            directory: default_directory(),
        }
    }
}

impl StorageConfig {
    /// Open the configured store.
    pub fn open(&self) -> Box<dyn PersistenceSink + Send + Sync> {
        match self.backend {
            StorageBackend::Json => Box::new(JsonStore::new(self.directory.clone())),
            StorageBackend::Csv => Box::new(CsvStore::new(self.directory.clone())),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("responses")
}
