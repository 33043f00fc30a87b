use std::path::PathBuf;

use questionnaire_types::StorageError;

/// Error type for loading and aggregating response tables.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid JSON in {} (line {line}): {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object per record in {} (line {line})", path.display())]
    NotAnObject { path: PathBuf, line: usize },

    #[error("Unsupported input format: {} (expected .csv, .json or .jsonl)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Could not write the unified table: {0}")]
    Output(#[from] csv::Error),
}
