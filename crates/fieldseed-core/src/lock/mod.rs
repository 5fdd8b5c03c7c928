//! # Lock File
//!
//! `fieldseed.lock` sits next to the table files and records every run that
//! shaped them: mode, seed, base date and rows written. It is a
//! machine-generated artifact, not a config file. Delete it together with
//! the tables when starting over.

pub mod types;

use std::fs;
use std::path::Path;

use self::types::{LockFile, RunRecord};
use crate::error::{FieldSeedError, Result};
use crate::generate::assembler::GeneratedData;
use crate::generate::plan::GenerationPlan;

/// Default lock file name.
pub const LOCK_FILE_NAME: &str = "fieldseed.lock";

/// Write a lock file to disk atomically.
///
/// Writes to a temporary file in the same directory, then renames it
/// into place, so an interrupted write leaves the previous lock file intact.
pub fn write_lock_file(lock: &LockFile, path: &Path) -> Result<()> {
    use std::io::Write;

    let json = serde_json::to_string_pretty(lock).map_err(|e| FieldSeedError::LockFile {
        message: format!("Failed to serialize lock file: {}", e),
    })?;

    let dir = path.parent().unwrap_or(Path::new("."));
    let tmp_path = dir.join(".fieldseed.lock.tmp");

    let mut file = fs::File::create(&tmp_path).map_err(|e| FieldSeedError::Output {
        message: format!("Failed to create temp lock file at {}", tmp_path.display()),
        source: e,
    })?;
    file.write_all(json.as_bytes())
        .map_err(|e| FieldSeedError::Output {
            message: format!("Failed to write temp lock file at {}", tmp_path.display()),
            source: e,
        })?;
    file.sync_all().map_err(|e| FieldSeedError::Output {
        message: "Failed to sync lock file to disk".to_string(),
        source: e,
    })?;

    fs::rename(&tmp_path, path).map_err(|e| FieldSeedError::Output {
        message: format!(
            "Failed to rename {} to {}",
            tmp_path.display(),
            path.display()
        ),
        source: e,
    })?;

    Ok(())
}

/// Read a lock file from disk.
pub fn read_lock_file(path: &Path) -> Result<LockFile> {
    let content = fs::read_to_string(path).map_err(|e| FieldSeedError::Output {
        message: format!("Failed to read lock file from {}", path.display()),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| FieldSeedError::LockFile {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })
}

/// Append a run to `dir/fieldseed.lock`, creating the file if needed.
///
/// An unreadable lock file is replaced with a fresh history rather than
/// failing a run whose tables are already written.
pub fn record_run(dir: &Path, plan: &GenerationPlan, data: &GeneratedData) -> Result<LockFile> {
    let path = dir.join(LOCK_FILE_NAME);
    let mut lock = if path.exists() {
        match read_lock_file(&path) {
            Ok(lock) => lock,
            Err(e) => {
                tracing::warn!("Replacing unreadable lock file: {}", e);
                LockFile::new()
            }
        }
    } else {
        LockFile::new()
    };

    lock.record(RunRecord::new(plan, data));
    write_lock_file(&lock, &path)?;
    tracing::debug!("Recorded run {} in {}", lock.runs.len(), path.display());
    Ok(lock)
}
