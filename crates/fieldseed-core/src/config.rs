//! # Configuration File Parser
//!
//! Reads and parses `fieldseed.toml`, the optional configuration file that
//! pins run settings without CLI flags:
//!
//! - `[generate]`: default seed, base date and output directory
//! - `[full]`: row counts for a full generation, keyed by table name
//! - `[incremental]`: batch sizes for an incremental run, keyed by table name
//!
//! Example `fieldseed.toml`:
//!
//! ```toml
//! [generate]
//! seed = 42
//! base_date = "2025-06-15"
//! output_dir = "seeds"
//!
//! [full]
//! customers = 1000
//! service_calls = 5000
//!
//! [incremental]
//! service_calls = 300
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{FieldSeedError, Result};
use crate::generate::plan::{GenerationMode, RowCounts};
use crate::schema::types::TableName;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "fieldseed.toml";

/// Top-level fieldseed.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldSeedConfig {
    pub generate: GenerateConfig,
    /// Row counts for full runs.
    pub full: BTreeMap<String, usize>,
    /// Batch sizes for incremental runs.
    pub incremental: BTreeMap<String, usize>,
}

/// Default run settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Fixed random seed for reproducible runs.
    pub seed: Option<u64>,
    /// Date treated as "today" by every relative date window.
    pub base_date: Option<NaiveDate>,
    /// Directory holding the table files.
    pub output_dir: Option<PathBuf>,
}

/// Read and parse a fieldseed.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or validated.
pub fn read_config(dir: &Path) -> Result<Option<FieldSeedConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| FieldSeedError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: FieldSeedConfig = toml::from_str(&content).map_err(|e| FieldSeedError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    config.validate()?;

    Ok(Some(config))
}

impl FieldSeedConfig {
    /// The row-count section for `mode`.
    pub fn table_rows(&self, mode: GenerationMode) -> &BTreeMap<String, usize> {
        match mode {
            GenerationMode::Full => &self.full,
            GenerationMode::Incremental => &self.incremental,
        }
    }

    /// Validate what serde cannot: every key must name a table whose count
    /// can be set. Keys naming tables the mode does not generate are only
    /// warned about.
    pub fn validate(&self) -> Result<()> {
        for mode in [GenerationMode::Full, GenerationMode::Incremental] {
            let section = mode.to_string();
            for (name, rows) in self.table_rows(mode) {
                let table: TableName = name.parse().map_err(|_| FieldSeedError::Config {
                    message: format!("[{}] names unknown table '{}'", section, name),
                })?;
                if !mode.tables().contains(&table) {
                    tracing::warn!(
                        "fieldseed.toml: [{}] {} = {} is ignored, {} runs do not generate '{}'",
                        section,
                        name,
                        rows,
                        section,
                        table
                    );
                    continue;
                }
                RowCounts::full_defaults()
                    .set(table, *rows)
                    .map_err(|e| FieldSeedError::Config {
                        message: format!("[{}] {}", section, e),
                    })?;
            }
        }
        Ok(())
    }
}
