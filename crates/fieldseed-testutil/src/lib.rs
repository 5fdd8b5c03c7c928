use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use fieldseed_core::store::write_all;
use fieldseed_core::{
    assemble_full, GeneratedData, GenerationMode, GenerationPlan, MemoryTableStore, RowCounts,
    Table, TableName, TableStore, WriteMode,
};

/// Base date shared by fixtures, so date windows don't move between runs.
pub fn fixed_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid fixture date")
}

/// Row counts small enough for fast tests that still exercise every table.
pub fn small_counts() -> RowCounts {
    RowCounts {
        customers: 60,
        technicians: 6,
        equipment_types: 10,
        parts: 25,
        installed_devices: 80,
        service_calls: 200,
        avg_parts_per_call: 2,
        incident_responses: 20,
        vehicles: 5,
        mailing_list_prospects: 15,
        subscriptions: 30,
        invoices: None,
        appointments: 220,
        quotes: 40,
        customer_feedback: 60,
        leads: 25,
    }
}

/// A full plan over `small_counts`, or the built-in incremental batch sizes.
pub fn small_plan(mode: GenerationMode, seed: u64) -> GenerationPlan {
    let plan = GenerationPlan::new(mode, seed, fixed_base_date());
    match mode {
        GenerationMode::Full => plan.with_counts(small_counts()),
        GenerationMode::Incremental => plan,
    }
}

/// Assemble a small full dataset and write it to `store`.
pub fn seed_store(store: &mut dyn TableStore, seed: u64) -> GeneratedData {
    let data = assemble_full(&small_plan(GenerationMode::Full, seed), None)
        .expect("full generation succeeds");
    write_all(store, &data, WriteMode::Overwrite).expect("store accepts the dataset");
    data
}

/// Load a generated dataset into a memory store, for integrity checks.
pub fn memory_store(data: &GeneratedData) -> MemoryTableStore {
    let mut store = MemoryTableStore::new();
    write_all(&mut store, data, WriteMode::Overwrite).expect("memory store accepts the dataset");
    store
}

/// Assert that every non-empty foreign key in every stored table names an
/// existing row of its parent table.
pub fn assert_referential_integrity(store: &dyn TableStore) {
    let mut keys: BTreeMap<TableName, HashSet<i64>> = BTreeMap::new();
    for table in TableName::ALL {
        if store.table_exists(table) {
            let stored = store.read_table(table).expect("stored table is readable");
            let table_keys: HashSet<i64> = stored.keys().expect("keys").into_iter().collect();
            keys.insert(table, table_keys);
        }
    }

    for table in TableName::ALL {
        if !store.table_exists(table) {
            continue;
        }
        let stored = store.read_table(table).expect("stored table is readable");
        for reference in table.references() {
            let parent_keys = keys.get(&reference.parent).unwrap_or_else(|| {
                panic!(
                    "{} references {} which is not stored",
                    table, reference.parent
                )
            });
            let values = stored
                .int_column(reference.column)
                .expect("foreign key column is readable");
            for (row, value) in values.into_iter().enumerate() {
                match value {
                    Some(key) => assert!(
                        parent_keys.contains(&key),
                        "{}.{} row {} points at missing {} {}",
                        table,
                        reference.column,
                        row,
                        reference.parent,
                        key
                    ),
                    None => assert!(
                        reference.nullable,
                        "{}.{} row {} is empty but required",
                        table,
                        reference.column,
                        row
                    ),
                }
            }
        }
    }
}

/// Assert primary keys of a table are unique.
pub fn assert_unique_keys(table: &Table) {
    let keys = table.keys().expect("keys");
    let unique: HashSet<i64> = keys.iter().copied().collect();
    assert_eq!(unique.len(), keys.len(), "{} has duplicate keys", table.name);
}

/// Float view of a numeric cell; money read back from CSV is a float.
pub fn number(table: &Table, row: usize, column: &str) -> f64 {
    use fieldseed_core::generate::value::Value;
    match table.get(row, column) {
        Some(Value::Int(i)) => *i as f64,
        Some(Value::Float(f)) => *f,
        Some(Value::Money(m)) => m.as_dollars(),
        other => panic!("{}.{} row {} is not numeric: {:?}", table.name, column, row, other),
    }
}

/// String view of a cell.
pub fn text(table: &Table, row: usize, column: &str) -> String {
    table
        .get(row, column)
        .map(|v| v.to_csv_string())
        .unwrap_or_else(|| panic!("{} has no column {}", table.name, column))
}
