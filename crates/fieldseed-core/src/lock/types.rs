use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::generate::assembler::GeneratedData;
use crate::generate::plan::{GenerationMode, GenerationPlan};

/// The fieldseed.lock file: the history of runs that produced the dataset
/// currently in the output directory.
///
/// A full run replaces the dataset, so it starts a new history. Each
/// incremental run appends one record. Replaying the records in order with
/// the same row counts reproduces the stored tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockFile {
    /// fieldseed version that wrote the most recent record.
    pub fieldseed_version: String,
    /// Runs in the order they were applied.
    pub runs: Vec<RunRecord>,
}

/// One generation run.
///
/// `tables` uses `BTreeMap` so the serialized JSON has a stable key order
/// and lock file diffs stay clean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub mode: GenerationMode,
    pub seed: u64,
    /// Date the run treated as "today".
    pub base_date: NaiveDate,
    /// Wall-clock time the run finished, RFC 3339.
    pub created_at: String,
    /// Rows written per table.
    pub tables: BTreeMap<String, usize>,
}

impl RunRecord {
    pub fn new(plan: &GenerationPlan, data: &GeneratedData) -> Self {
        Self {
            mode: plan.mode,
            seed: plan.seed,
            base_date: plan.base_date,
            created_at: chrono::Utc::now().to_rfc3339(),
            tables: data
                .row_counts()
                .into_iter()
                .map(|(name, rows)| (name.to_string(), rows))
                .collect(),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().sum()
    }
}

impl LockFile {
    pub fn new() -> Self {
        Self {
            fieldseed_version: env!("CARGO_PKG_VERSION").to_string(),
            runs: Vec::new(),
        }
    }

    /// Add a run. A full run discards the previous history.
    pub fn record(&mut self, run: RunRecord) {
        if run.mode == GenerationMode::Full {
            self.runs.clear();
        }
        self.fieldseed_version = env!("CARGO_PKG_VERSION").to_string();
        self.runs.push(run);
    }

    /// The most recent run, if any.
    pub fn last_run(&self) -> Option<&RunRecord> {
        self.runs.last()
    }
}

impl Default for LockFile {
    fn default() -> Self {
        Self::new()
    }
}
