use std::collections::BTreeMap;

use crate::error::{FieldSeedError, Result};
use crate::schema::types::{Table, TableName};
use crate::store::{TableStore, WriteMode};

/// Tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: BTreeMap<TableName, Table>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }
}

impl TableStore for MemoryTableStore {
    fn write_table(&mut self, table: &Table, mode: WriteMode) -> Result<usize> {
        match (mode, self.tables.get_mut(&table.name)) {
            (WriteMode::Append, Some(existing)) => {
                existing.rows.extend(table.rows.iter().cloned());
            }
            _ => {
                self.tables.insert(table.name, table.clone());
            }
        }
        Ok(table.len())
    }

    fn read_table(&self, name: TableName) -> Result<Table> {
        self.tables
            .get(&name)
            .cloned()
            .ok_or_else(|| FieldSeedError::NoExistingData {
                table: name.to_string(),
            })
    }

    fn table_exists(&self, name: TableName) -> bool {
        self.tables.contains_key(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::value::Value;

    fn parts(ids: &[i64]) -> Table {
        let mut table = Table::new(TableName::Parts, vec!["part_id".into()]);
        table.rows = ids.iter().map(|id| vec![Value::Int(*id)]).collect();
        table
    }

    #[test]
    fn test_append_and_overwrite() {
        let mut store = MemoryTableStore::new();
        store.write_table(&parts(&[1, 2]), WriteMode::Append).unwrap();
        store.write_table(&parts(&[3]), WriteMode::Append).unwrap();
        assert_eq!(store.max_key(TableName::Parts).unwrap(), Some(3));

        store.write_table(&parts(&[1]), WriteMode::Overwrite).unwrap();
        assert_eq!(store.total_rows(), 1);
    }
}
