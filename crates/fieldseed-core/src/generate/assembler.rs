//! # Dataset Assembler
//!
//! Runs every entity generator once, in dependency order, and collects the
//! tables into a `GeneratedData`. Parents are generated before children,
//! and each parent's keys are recorded into the `KeyPool` as soon as its
//! rows exist, so no child can reference a row that was never produced.
//!
//! Everything is driven by one `RandomSource`: the same seed, base date and
//! counts yield the same dataset.

use indexmap::IndexMap;

use crate::error::Result;
use crate::generate::entities::{billing, catalog, customers, service, staff};
use crate::generate::foreign_key::KeyPool;
use crate::generate::plan::{GenerationMode, GenerationPlan};
use crate::generate::random::RandomSource;
use crate::graph::topo::check_order;
use crate::schema::types::{Record, Table, TableName};

/// Called after each table with `(table, tables done, tables in the run)`.
pub type ProgressCallback<'a> = &'a dyn Fn(TableName, usize, usize);

/// The generated tables of one run, in generation order.
#[derive(Debug, Clone, Default)]
pub struct GeneratedData {
    pub tables: IndexMap<TableName, Table>,
}

impl GeneratedData {
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name, table);
    }

    pub fn get(&self, name: TableName) -> Option<&Table> {
        self.tables.get(&name)
    }

    /// Rows per table, in generation order.
    pub fn row_counts(&self) -> Vec<(TableName, usize)> {
        self.tables.iter().map(|(name, t)| (*name, t.len())).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }
}

/// Collects finished tables and reports progress.
pub(crate) struct Collector<'a> {
    data: GeneratedData,
    progress: Option<ProgressCallback<'a>>,
    total: usize,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(mode: GenerationMode, progress: Option<ProgressCallback<'a>>) -> Self {
        Self {
            data: GeneratedData::new(),
            progress,
            total: mode.tables().len(),
        }
    }

    pub(crate) fn push<R: Record>(&mut self, records: &[R]) {
        let table = Table::from_records(records);
        tracing::debug!("Generated {} rows for {}", table.len(), table.name);
        let name = table.name;
        self.data.insert(table);
        if let Some(callback) = self.progress {
            callback(name, self.data.tables.len(), self.total);
        }
    }

    pub(crate) fn finish(self) -> GeneratedData {
        self.data
    }
}

/// Generate a complete dataset with keys starting at 1.
pub fn assemble_full(
    plan: &GenerationPlan,
    progress: Option<ProgressCallback<'_>>,
) -> Result<GeneratedData> {
    check_order(GenerationMode::Full.tables())?;

    let counts = &plan.counts;
    let mut random = RandomSource::new(plan.seed, plan.base_date);
    let mut keys = KeyPool::new();
    let mut out = Collector::new(GenerationMode::Full, progress);

    // independent entities
    let customers = customers::generate_customers(
        &mut random,
        1,
        counts.customers,
        plan.customers_created(),
    );
    keys.record_all(&customers);
    out.push(&customers);

    let technicians = staff::generate_technicians(
        &mut random,
        1,
        counts.technicians,
        plan.technicians_hired(),
    );
    keys.record_all(&technicians);
    out.push(&technicians);

    let equipment = catalog::generate_equipment_types(&mut random, 1, counts.equipment_types);
    keys.record_all(&equipment);
    out.push(&equipment);

    let parts = catalog::generate_parts(&mut random, 1, counts.parts);
    keys.record_all(&parts);
    out.push(&parts);

    // first-order dependents
    let devices =
        service::generate_installed_devices(&mut random, 1, &keys, counts.installed_devices);
    out.push(&devices);

    let calls = service::generate_service_calls(
        &mut random,
        1,
        &keys,
        counts.service_calls,
        plan.service_calls_dated(),
    );
    keys.record_all(&calls);
    out.push(&calls);

    // everything hanging off calls, staff and customers
    let usage =
        service::generate_parts_usage(&mut random, 1, &calls, &keys, counts.avg_parts_per_call);
    out.push(&usage);

    let incidents =
        service::generate_incidents(&mut random, 1, &calls, &keys, counts.incident_responses);
    out.push(&incidents);

    let vehicles = staff::generate_vehicles(&mut random, 1, &keys, counts.vehicles);
    out.push(&vehicles);

    let contacts = customers::generate_mailing_list(
        &mut random,
        1,
        &customers,
        counts.mailing_list_prospects,
    );
    out.push(&contacts);

    let subscriptions =
        customers::generate_subscriptions(&mut random, 1, &keys, counts.subscriptions);
    out.push(&subscriptions);

    let invoices = billing::generate_invoices(
        &mut random,
        1,
        &calls,
        counts.invoices_for(calls.len()),
    );
    out.push(&invoices);

    let payments = billing::generate_payments(&mut random, 1, &invoices);
    out.push(&payments);

    let inventory = catalog::generate_inventory(&mut random, &parts);
    out.push(&inventory);

    let appointments =
        service::generate_appointments(&mut random, 1, &calls, &keys, counts.appointments);
    out.push(&appointments);

    let quotes = billing::generate_quotes(&mut random, 1, &keys, counts.quotes);
    out.push(&quotes);

    let work_orders = service::generate_work_orders(&mut random, &calls);
    out.push(&work_orders);

    let feedback = service::generate_feedback(&mut random, 1, &calls, counts.customer_feedback);
    out.push(&feedback);

    let leads = customers::generate_leads(&mut random, 1, counts.leads);
    out.push(&leads);

    let data = out.finish();
    tracing::debug!(
        "Assembled {} tables with {} rows",
        data.tables.len(),
        data.total_rows()
    );
    Ok(data)
}
