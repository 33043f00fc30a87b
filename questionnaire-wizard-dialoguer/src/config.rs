//! Configuration for the `questionnaire` binary.

use std::path::Path;

use anyhow::{Context, Result};
use questionnaire::SessionConfig;
use questionnaire_store::StorageConfig;
use serde::{Deserialize, Serialize};

/// Settings read from a TOML file.
///
/// ```toml
/// [session]
/// group_selection = "random"
/// group_on_reset = "retain"
/// save_attempts = 3
///
/// [storage]
/// backend = "csv"
/// directory = "responses"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load a config file. Missing tables and fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
