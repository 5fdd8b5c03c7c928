use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{FieldSeedError, Result};
use crate::generate::value::Value;
use crate::schema::types::{Table, TableName};
use crate::store::{TableStore, WriteMode};

/// A directory holding one `<table>.csv` file per table.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    dir: PathBuf,
}

impl CsvTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: TableName) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| FieldSeedError::Output {
            message: format!("Failed to create output directory {}", self.dir.display()),
            source: e,
        })
    }

    fn tmp_path(&self, name: TableName) -> PathBuf {
        self.dir.join(format!(".{}.csv.tmp", name))
    }

    fn backup_path(&self, name: TableName) -> PathBuf {
        self.dir.join(format!(".{}.csv.bak", name))
    }

    /// Write header and rows to `tmp`. The table file itself is untouched.
    fn write_staged(&self, table: &Table, tmp: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .from_path(tmp)
            .map_err(|e| csv_error(table.name, e))?;
        writer
            .write_record(&table.columns)
            .map_err(|e| csv_error(table.name, e))?;
        write_rows(&mut writer, table)?;
        writer.flush().map_err(|e| FieldSeedError::Output {
            message: format!("Failed to flush {}", tmp.display()),
            source: e,
        })
    }

    fn append(&self, table: &Table) -> Result<()> {
        let path = self.path_of(table.name);
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| FieldSeedError::Output {
                message: format!("Failed to open {} for appending", path.display()),
                source: e,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        write_rows(&mut writer, table)?;
        writer.flush().map_err(|e| FieldSeedError::Output {
            message: format!("Failed to flush {}", path.display()),
            source: e,
        })
    }

    /// Append to existing files and stage replacements, then move every
    /// staged file into place. Each touched file is recorded in `pending`
    /// before it is modified.
    fn stage_and_commit(
        &self,
        tables: &[&Table],
        mode: WriteMode,
        pending: &mut Vec<Pending>,
    ) -> Result<usize> {
        self.ensure_dir()?;

        let mut written = 0;
        for table in tables {
            let path = self.path_of(table.name);
            if mode == WriteMode::Append && self.table_exists(table.name) {
                let len = fs::metadata(&path)
                    .map_err(|e| FieldSeedError::Output {
                        message: format!("Failed to stat {}", path.display()),
                        source: e,
                    })?
                    .len();
                pending.push(Pending::Appended { path, len });
                self.append(table)?;
            } else {
                let tmp = self.tmp_path(table.name);
                pending.push(Pending::Replaced {
                    tmp: tmp.clone(),
                    path,
                    backup: self.backup_path(table.name),
                    backed_up: false,
                    committed: false,
                });
                self.write_staged(table, &tmp)?;
            }
            written += table.len();
        }

        for entry in pending.iter_mut() {
            if let Pending::Replaced {
                tmp,
                path,
                backup,
                backed_up,
                committed,
            } = entry
            {
                if path.is_file() {
                    rename(path, backup)?;
                    *backed_up = true;
                }
                rename(tmp, path)?;
                *committed = true;
            }
        }
        Ok(written)
    }
}

/// A file touched by a batch that has not finished yet.
#[derive(Debug)]
enum Pending {
    /// Rows were appended to `path`, which was `len` bytes long before.
    Appended { path: PathBuf, len: u64 },
    /// `tmp` holds the new content of `path`. The previous file is moved to
    /// `backup` while the batch commits.
    Replaced {
        tmp: PathBuf,
        path: PathBuf,
        backup: PathBuf,
        backed_up: bool,
        committed: bool,
    },
}

impl Pending {
    /// Put the file back the way it was before the batch started.
    fn undo(&self) -> std::io::Result<()> {
        match self {
            Pending::Appended { path, len } => {
                OpenOptions::new().write(true).open(path)?.set_len(*len)
            }
            Pending::Replaced {
                tmp,
                path,
                backup,
                backed_up,
                committed,
            } => {
                if *committed {
                    fs::remove_file(path)?;
                } else {
                    remove_if_present(tmp)?;
                }
                if *backed_up {
                    fs::rename(backup, path)?;
                }
                Ok(())
            }
        }
    }

    /// Drop the backup of a replaced file once the batch has committed.
    fn finish(&self) -> std::io::Result<()> {
        match self {
            Pending::Replaced {
                backup,
                backed_up: true,
                ..
            } => remove_if_present(backup),
            _ => Ok(()),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Pending::Appended { path, .. } | Pending::Replaced { path, .. } => path,
        }
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| FieldSeedError::Output {
        message: format!("Failed to rename {} → {}", from.display(), to.display()),
        source: e,
    })
}

fn csv_error(name: TableName, source: csv::Error) -> FieldSeedError {
    FieldSeedError::Csv {
        table: name.to_string(),
        source,
    }
}

fn write_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Value::to_csv_string))
            .map_err(|e| csv_error(table.name, e))?;
    }
    Ok(())
}

impl TableStore for CsvTableStore {
    fn write_table(&mut self, table: &Table, mode: WriteMode) -> Result<usize> {
        self.write_tables(&[table], mode)
    }

    /// Either every table is written or every file is left as it was.
    fn write_tables(&mut self, tables: &[&Table], mode: WriteMode) -> Result<usize> {
        let mut pending = Vec::with_capacity(tables.len());
        match self.stage_and_commit(tables, mode, &mut pending) {
            Ok(written) => {
                for entry in &pending {
                    if let Err(e) = entry.finish() {
                        tracing::warn!("Failed to clean up after {}: {}", entry.path().display(), e);
                    }
                }
                Ok(written)
            }
            Err(err) => {
                for entry in pending.iter().rev() {
                    if let Err(e) = entry.undo() {
                        tracing::warn!("Failed to roll back {}: {}", entry.path().display(), e);
                    }
                }
                Err(err)
            }
        }
    }

    fn read_table(&self, name: TableName) -> Result<Table> {
        let path = self.path_of(name);
        if !path.exists() {
            return Err(FieldSeedError::NoExistingData {
                table: name.to_string(),
            });
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| csv_error(name, e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(name, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Table::new(name, columns);
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(name, e))?;
            table
                .rows
                .push(record.iter().map(Value::from_csv_field).collect());
        }
        Ok(table)
    }

    fn table_exists(&self, name: TableName) -> bool {
        self.path_of(name).is_file()
    }

    fn read_columns(&self, name: TableName) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(self.path_of(name))
            .map_err(|e| csv_error(name, e))?;
        Ok(reader
            .headers()
            .map_err(|e| csv_error(name, e))?
            .iter()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn customers(ids: &[i64]) -> Table {
        let mut table = Table::new(
            TableName::Customers,
            vec!["customer_id".into(), "customer_name".into(), "address".into()],
        );
        for id in ids {
            table.rows.push(vec![
                Value::Int(*id),
                format!("Customer {}", id).into(),
                "12 Elm St, Springfield, IL 62701".into(),
            ]);
        }
        table
    }

    #[test]
    fn test_overwrite_then_read() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path());

        assert_eq!(store.write_table(&customers(&[1, 2, 3]), WriteMode::Overwrite).unwrap(), 3);
        let table = store.read_table(TableName::Customers).unwrap();

        assert_eq!(table.columns, vec!["customer_id", "customer_name", "address"]);
        assert_eq!(table.len(), 3);
        // quoted field with commas survives
        assert_eq!(
            table.get(0, "address").and_then(Value::as_string),
            Some("12 Elm St, Springfield, IL 62701")
        );
        assert!(!dir.path().join(".customers.csv.tmp").exists());
    }

    #[test]
    fn test_append_keeps_one_header() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path());

        store.write_table(&customers(&[1, 2]), WriteMode::Overwrite).unwrap();
        store.write_table(&customers(&[3]), WriteMode::Append).unwrap();

        let table = store.read_table(TableName::Customers).unwrap();
        assert_eq!(table.keys().unwrap(), vec![1, 2, 3]);
        assert_eq!(store.max_key(TableName::Customers).unwrap(), Some(3));
    }

    #[test]
    fn test_append_creates_missing_table() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path().join("nested"));

        store.write_table(&customers(&[7]), WriteMode::Append).unwrap();
        assert_eq!(
            store.read_columns(TableName::Customers).unwrap(),
            vec!["customer_id", "customer_name", "address"]
        );
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak"))
            .collect()
    }

    /// A directory where the table file should be makes the rename fail.
    fn block_table(dir: &Path, name: &str) {
        let blocked = dir.join(name);
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();
    }

    #[test]
    fn test_failed_overwrite_keeps_previous_tables() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path());
        store.write_table(&customers(&[1, 2]), WriteMode::Overwrite).unwrap();
        let before = fs::read(store.path_of(TableName::Customers)).unwrap();
        block_table(dir.path(), "parts.csv");

        let mut parts = Table::new(TableName::Parts, vec!["part_id".into()]);
        parts.rows.push(vec![Value::Int(1)]);
        let result = store.write_tables(&[&customers(&[9]), &parts], WriteMode::Overwrite);

        assert!(result.is_err());
        assert_eq!(fs::read(store.path_of(TableName::Customers)).unwrap(), before);
        assert!(leftovers(dir.path()).is_empty(), "{:?}", leftovers(dir.path()));
    }

    #[test]
    fn test_failed_append_truncates_back() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path());
        store.write_table(&customers(&[1, 2]), WriteMode::Overwrite).unwrap();
        let before = fs::read(store.path_of(TableName::Customers)).unwrap();
        block_table(dir.path(), "parts.csv");

        let mut parts = Table::new(TableName::Parts, vec!["part_id".into()]);
        parts.rows.push(vec![Value::Int(1)]);
        let result = store.write_tables(&[&customers(&[3, 4]), &parts], WriteMode::Append);

        assert!(result.is_err());
        assert_eq!(fs::read(store.path_of(TableName::Customers)).unwrap(), before);
        assert_eq!(store.read_table(TableName::Customers).unwrap().keys().unwrap(), vec![1, 2]);
        assert!(leftovers(dir.path()).is_empty(), "{:?}", leftovers(dir.path()));
    }

    #[test]
    fn test_overwrite_leaves_no_backups() {
        let dir = tempdir().unwrap();
        let mut store = CsvTableStore::new(dir.path());
        store.write_table(&customers(&[1]), WriteMode::Overwrite).unwrap();
        store.write_table(&customers(&[5, 6]), WriteMode::Overwrite).unwrap();

        assert_eq!(store.read_table(TableName::Customers).unwrap().keys().unwrap(), vec![5, 6]);
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_table() {
        let dir = tempdir().unwrap();
        let store = CsvTableStore::new(dir.path());

        assert!(!store.table_exists(TableName::Parts));
        assert_eq!(store.max_key(TableName::Parts).unwrap(), None);
        assert!(matches!(
            store.read_table(TableName::Parts),
            Err(FieldSeedError::NoExistingData { .. })
        ));
    }

    #[test]
    fn test_non_numeric_key_is_malformed() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("customers.csv"),
            "customer_id,customer_name\n1,Ada\nabc,Bob\n",
        )
        .unwrap();
        let store = CsvTableStore::new(dir.path());

        let err = store.max_key(TableName::Customers).unwrap_err();
        assert!(matches!(err, FieldSeedError::MalformedRow { row_index: 1, .. }));
    }
}
