//! # Table Store
//!
//! Persistence per named table. The engine only needs to write a table
//! (replacing or extending what is there), read one back, and ask for the
//! highest primary key. `CsvTableStore` keeps one `<table>.csv` file per
//! table; `MemoryTableStore` backs tests.

pub mod csv;
pub mod memory;

pub use self::csv::CsvTableStore;
pub use self::memory::MemoryTableStore;

use crate::error::Result;
use crate::generate::assembler::GeneratedData;
use crate::schema::types::{Table, TableName};

/// How `write_table` treats rows already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the table.
    Overwrite,
    /// Add rows after the existing ones. A table that does not exist yet is
    /// created with a header.
    Append,
}

pub trait TableStore {
    /// Persist `table`. Returns the number of rows written.
    fn write_table(&mut self, table: &Table, mode: WriteMode) -> Result<usize>;

    /// Read a whole table back.
    fn read_table(&self, name: TableName) -> Result<Table>;

    fn table_exists(&self, name: TableName) -> bool;

    /// Persist several tables as one unit. Returns the total rows written.
    ///
    /// The default writes them one at a time. Stores that can fail partway
    /// through override this so an error leaves every table as it was.
    fn write_tables(&mut self, tables: &[&Table], mode: WriteMode) -> Result<usize> {
        let mut written = 0;
        for table in tables {
            written += self.write_table(table, mode)?;
        }
        Ok(written)
    }

    /// Stored column header of a table.
    fn read_columns(&self, name: TableName) -> Result<Vec<String>> {
        Ok(self.read_table(name)?.columns)
    }

    /// Highest primary key stored for `name`, or `None` when the table is
    /// missing or empty.
    fn max_key(&self, name: TableName) -> Result<Option<i64>> {
        if !self.table_exists(name) {
            return Ok(None);
        }
        self.read_table(name)?.max_key()
    }
}

/// Write every table of a generated dataset, in generation order, as a
/// single batch. Returns the total number of rows written.
pub fn write_all(
    store: &mut dyn TableStore,
    data: &GeneratedData,
    mode: WriteMode,
) -> Result<usize> {
    let tables: Vec<&Table> = data.tables.values().collect();
    let written = store.write_tables(&tables, mode)?;
    for table in &tables {
        tracing::info!("Wrote {} rows to {} ({:?})", table.len(), table.name, mode);
    }
    Ok(written)
}
