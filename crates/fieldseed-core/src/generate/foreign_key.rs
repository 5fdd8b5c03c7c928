//! # Foreign Key Pool
//!
//! Tracks the primary keys in scope for each parent table so child
//! generators can pick valid references. Parents are generated first, and in
//! incremental mode the pool is seeded with the keys already in the store,
//! so a child can point at an old or a new parent row.

use rand::Rng;
use std::collections::HashMap;

use crate::schema::types::{Record, TableName};

/// Primary keys available for reference, per table.
#[derive(Debug, Default, Clone)]
pub struct KeyPool {
    pools: HashMap<TableName, Vec<i64>>,
}

impl KeyPool {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// Record many keys, e.g. every key already in the store.
    pub fn extend(&mut self, table: TableName, keys: impl IntoIterator<Item = i64>) {
        self.pools.entry(table).or_default().extend(keys);
    }

    /// Record the keys of freshly generated rows.
    pub fn record_all<R: Record>(&mut self, records: &[R]) {
        self.extend(R::TABLE, records.iter().map(Record::key));
    }

    /// Uniform pick, with replacement. `None` when the table has no keys.
    pub fn pick(&self, table: TableName, rng: &mut impl Rng) -> Option<i64> {
        self.pools.get(&table).and_then(|pool| {
            if pool.is_empty() {
                None
            } else {
                Some(pool[rng.random_range(0..pool.len())])
            }
        })
    }

    pub fn pool_size(&self, table: TableName) -> usize {
        self.pools.get(&table).map(Vec::len).unwrap_or(0)
    }

    /// True when any of the given tables has nothing to reference.
    pub fn any_empty(&self, tables: &[TableName]) -> bool {
        tables.iter().any(|t| self.pool_size(*t) == 0)
    }

    pub fn keys(&self, table: TableName) -> &[i64] {
        self.pools.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }
}
