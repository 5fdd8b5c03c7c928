//! # Incremental Extender
//!
//! Grows a stored dataset instead of replacing it. Every table continues
//! from its own highest stored key, and the key pools children draw from
//! hold both the stored parent keys and the parents generated in this run,
//! so new rows may reference old ones.
//!
//! Nothing is written here: the caller appends the returned tables with
//! `store::write_all`. Any failure (missing base data, a changed column
//! layout, an unreadable row) is raised before a single row is generated.

use crate::error::{FieldSeedError, Result};
use crate::generate::assembler::{Collector, GeneratedData, ProgressCallback};
use crate::generate::entities::{billing, catalog, columns_of, customers, service, staff};
use crate::generate::foreign_key::KeyPool;
use crate::generate::plan::{GenerationMode, GenerationPlan};
use crate::generate::random::RandomSource;
use crate::graph::topo::check_order;
use crate::schema::types::TableName;
use crate::store::TableStore;

/// Tables that must already exist before a dataset can be extended.
pub const BASE_TABLES: [TableName; 5] = [
    TableName::Customers,
    TableName::Technicians,
    TableName::EquipmentTypes,
    TableName::Parts,
    TableName::ServiceCalls,
];

/// Tables an incremental run appends to, in generation order.
pub const INCREMENTAL_TABLES: [TableName; 13] = [
    TableName::Customers,
    TableName::Technicians,
    TableName::EquipmentTypes,
    TableName::Parts,
    TableName::ServiceCalls,
    TableName::PartsUsage,
    TableName::Invoices,
    TableName::Payments,
    TableName::Appointments,
    TableName::Quotes,
    TableName::WorkOrders,
    TableName::CustomerFeedback,
    TableName::Leads,
];

/// Fail with `NoExistingData` unless every base table is stored.
fn require_base_tables(store: &dyn TableStore) -> Result<()> {
    for table in BASE_TABLES {
        if !store.table_exists(table) {
            return Err(FieldSeedError::NoExistingData {
                table: table.to_string(),
            });
        }
    }
    Ok(())
}

/// Fail with `SchemaDrift` when a stored header differs from the header
/// this build writes.
fn check_columns(store: &dyn TableStore) -> Result<()> {
    for table in INCREMENTAL_TABLES {
        if !store.table_exists(table) {
            continue;
        }
        let stored = store.read_columns(table)?;
        let expected = columns_of(table);
        if stored.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(FieldSeedError::SchemaDrift {
                table: table.to_string(),
                stored: stored.join(","),
                expected: expected.join(","),
            });
        }
    }
    Ok(())
}

/// Highest stored key per appended table. Missing tables count as 0.
struct KeyOffsets {
    max_keys: Vec<(TableName, i64)>,
}

impl KeyOffsets {
    fn read(store: &dyn TableStore) -> Result<Self> {
        let mut max_keys = Vec::with_capacity(INCREMENTAL_TABLES.len());
        for table in INCREMENTAL_TABLES {
            let max = store.max_key(table)?.unwrap_or(0);
            tracing::debug!("Existing max key for {}: {}", table, max);
            max_keys.push((table, max));
        }
        Ok(Self { max_keys })
    }

    /// First key to hand out for `table`.
    fn next(&self, table: TableName) -> i64 {
        self.max_keys
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, max)| max + 1)
            .unwrap_or(1)
    }
}

/// Generate the next increment of a stored dataset.
///
/// `plan.mode` should be `Incremental`; its counts are the batch sizes and
/// its lookback windows date the new base entities.
pub fn extend_dataset(
    store: &dyn TableStore,
    plan: &GenerationPlan,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GeneratedData> {
    check_order(&INCREMENTAL_TABLES)?;
    require_base_tables(store)?;
    check_columns(store)?;

    let offsets = KeyOffsets::read(store)?;
    let mut keys = KeyPool::new();
    for table in [
        TableName::Customers,
        TableName::Technicians,
        TableName::EquipmentTypes,
        TableName::Parts,
    ] {
        keys.extend(table, store.read_table(table)?.keys()?);
    }

    let counts = &plan.counts;
    let mut random = RandomSource::new(plan.seed, plan.base_date);
    let mut out = Collector::new(GenerationMode::Incremental, progress);

    let customers = customers::generate_customers(
        &mut random,
        offsets.next(TableName::Customers),
        counts.customers,
        plan.customers_created(),
    );
    keys.record_all(&customers);
    out.push(&customers);

    let technicians = staff::generate_technicians(
        &mut random,
        offsets.next(TableName::Technicians),
        counts.technicians,
        plan.technicians_hired(),
    );
    keys.record_all(&technicians);
    out.push(&technicians);

    let equipment = catalog::generate_equipment_types(
        &mut random,
        offsets.next(TableName::EquipmentTypes),
        counts.equipment_types,
    );
    keys.record_all(&equipment);
    out.push(&equipment);

    let parts = catalog::generate_parts(
        &mut random,
        offsets.next(TableName::Parts),
        counts.parts,
    );
    keys.record_all(&parts);
    out.push(&parts);

    let calls = service::generate_service_calls(
        &mut random,
        offsets.next(TableName::ServiceCalls),
        &keys,
        counts.service_calls,
        plan.service_calls_dated(),
    );
    keys.record_all(&calls);
    out.push(&calls);

    // children of this run's calls only
    let usage = service::generate_parts_usage(
        &mut random,
        offsets.next(TableName::PartsUsage),
        &calls,
        &keys,
        counts.avg_parts_per_call,
    );
    out.push(&usage);

    let invoices = billing::generate_invoices(
        &mut random,
        offsets.next(TableName::Invoices),
        &calls,
        counts.invoices_for(calls.len()),
    );
    out.push(&invoices);

    let payments =
        billing::generate_payments(&mut random, offsets.next(TableName::Payments), &invoices);
    out.push(&payments);

    let appointments = service::generate_appointments(
        &mut random,
        offsets.next(TableName::Appointments),
        &calls,
        &keys,
        counts.appointments,
    );
    out.push(&appointments);

    let quotes = billing::generate_quotes(
        &mut random,
        offsets.next(TableName::Quotes),
        &keys,
        counts.quotes,
    );
    out.push(&quotes);

    let work_orders = service::generate_work_orders(&mut random, &calls);
    out.push(&work_orders);

    let feedback = service::generate_feedback(
        &mut random,
        offsets.next(TableName::CustomerFeedback),
        &calls,
        counts.customer_feedback,
    );
    out.push(&feedback);

    let leads = customers::generate_leads(&mut random, offsets.next(TableName::Leads), counts.leads);
    out.push(&leads);

    let data = out.finish();
    tracing::debug!(
        "Generated increment of {} rows across {} tables",
        data.total_rows(),
        data.tables.len()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::assembler::assemble_full;
    use crate::generate::plan::RowCounts;
    use crate::schema::types::Table;
    use crate::store::{write_all, MemoryTableStore, WriteMode};
    use chrono::NaiveDate;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn seeded_store() -> MemoryTableStore {
        let mut counts = RowCounts::full_defaults();
        counts.customers = 30;
        counts.service_calls = 100;
        counts.installed_devices = 20;
        counts.appointments = 0;
        counts.quotes = 10;
        counts.customer_feedback = 20;
        counts.leads = 10;
        let plan = GenerationPlan::new(GenerationMode::Full, 5, base_date()).with_counts(counts);
        let data = assemble_full(&plan, None).unwrap();

        let mut store = MemoryTableStore::new();
        write_all(&mut store, &data, WriteMode::Overwrite).unwrap();
        store
    }

    fn incremental_plan() -> GenerationPlan {
        GenerationPlan::new(GenerationMode::Incremental, 6, base_date())
    }

    #[test]
    fn test_keys_continue_after_stored_max() {
        let store = seeded_store();
        let data = extend_dataset(&store, &incremental_plan(), None).unwrap();

        let customers = data.get(TableName::Customers).unwrap().keys().unwrap();
        assert_eq!(customers, vec![31, 32, 33, 34, 35]);

        let calls = data.get(TableName::ServiceCalls).unwrap().keys().unwrap();
        assert_eq!(calls.first(), Some(&101));
        assert_eq!(calls.len(), 200);

        let stored_quotes = store.max_key(TableName::Quotes).unwrap().unwrap();
        let quotes = data.get(TableName::Quotes).unwrap().keys().unwrap();
        assert_eq!(quotes.first(), Some(&(stored_quotes + 1)));
    }

    #[test]
    fn test_produces_the_incremental_tables() {
        let store = seeded_store();
        let data = extend_dataset(&store, &incremental_plan(), None).unwrap();
        let names: Vec<TableName> = data.tables.keys().copied().collect();
        assert_eq!(names, INCREMENTAL_TABLES.to_vec());
    }

    #[test]
    fn test_missing_base_table() {
        let mut store = MemoryTableStore::new();
        let customers = Table::new(
            TableName::Customers,
            columns_of(TableName::Customers)
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        store.write_table(&customers, WriteMode::Overwrite).unwrap();

        let err = extend_dataset(&store, &incremental_plan(), None).unwrap_err();
        match err {
            FieldSeedError::NoExistingData { table } => assert_eq!(table, "technicians"),
            other => panic!("Expected NoExistingData, got {:?}", other),
        }
    }

    #[test]
    fn test_column_drift_is_rejected() {
        let mut store = seeded_store();
        let mut leads = store.read_table(TableName::Leads).unwrap();
        leads.columns[1] = "given_name".to_string();
        store.write_table(&leads, WriteMode::Overwrite).unwrap();

        let err = extend_dataset(&store, &incremental_plan(), None).unwrap_err();
        assert!(
            matches!(err, FieldSeedError::SchemaDrift { ref table, .. } if table == "leads"),
            "got {:?}",
            err
        );
    }

    #[test]
    fn test_new_rows_may_reference_old_parents() {
        let store = seeded_store();
        let mut plan = incremental_plan();
        plan.counts.service_calls = 500;
        let data = extend_dataset(&store, &plan, None).unwrap();

        let customer_refs = data
            .get(TableName::ServiceCalls)
            .unwrap()
            .int_column("customer_id")
            .unwrap();
        assert!(customer_refs.iter().flatten().any(|id| *id <= 30));
        assert!(customer_refs.iter().flatten().all(|id| *id <= 35));
    }
}
