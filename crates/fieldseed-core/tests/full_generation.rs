//! Full generation written through the CSV store and read back.

use std::fs;

use fieldseed_core::generate::value::Money;
use fieldseed_core::store::write_all;
use fieldseed_core::{
    assemble_full, CsvTableStore, GenerationMode, GenerationPlan, Table, TableName, TableStore,
    WriteMode,
};
use fieldseed_testutil::{
    assert_referential_integrity, assert_unique_keys, fixed_base_date, memory_store, number,
    seed_store, small_plan, text,
};

fn cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

#[test]
fn test_default_row_counts() {
    let plan = GenerationPlan::new(GenerationMode::Full, 2024, fixed_base_date());
    let data = assemble_full(&plan, None).unwrap();
    let rows = |t: TableName| data.get(t).map(Table::len).unwrap_or(0);

    assert_eq!(data.tables.len(), 19);
    assert_eq!(rows(TableName::Customers), 500);
    assert_eq!(rows(TableName::Technicians), 15);
    assert_eq!(rows(TableName::EquipmentTypes), 50);
    assert_eq!(rows(TableName::Parts), 200);
    assert_eq!(rows(TableName::InstalledDevices), 800);
    assert_eq!(rows(TableName::ServiceCalls), 2000);
    assert_eq!(rows(TableName::VehicleFleet), 20);
    assert_eq!(rows(TableName::Subscriptions), 250);
    assert_eq!(rows(TableName::Quotes), 400);
    assert_eq!(rows(TableName::Leads), 600);
    assert_eq!(rows(TableName::MailingList), 800);
    assert_eq!(rows(TableName::Inventory), 200);
    assert_eq!(rows(TableName::WorkOrders), 2000);
    assert_eq!(rows(TableName::Invoices), 1700);
    assert_eq!(rows(TableName::CustomerFeedback), 800);
    assert!(rows(TableName::IncidentResponse) <= 150);

    assert_referential_integrity(&memory_store(&data));
}

#[test]
fn test_csv_round_trip_keeps_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvTableStore::new(dir.path());
    let data = seed_store(&mut store, 11);

    for table in TableName::ALL {
        assert!(store.path_of(table).exists(), "{} was not written", table);
        let stored = store.read_table(table).unwrap();
        assert_eq!(stored.len(), data.get(table).unwrap().len(), "{}", table);
        assert_unique_keys(&stored);
    }
    assert_referential_integrity(&store);

    // no temp files left behind
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_derived_money_fields_survive_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvTableStore::new(dir.path());
    seed_store(&mut store, 12);

    let calls = store.read_table(TableName::ServiceCalls).unwrap();
    for row in 0..calls.len() {
        assert_eq!(
            cents(number(&calls, row, "total_cost")),
            cents(number(&calls, row, "labor_cost")) + cents(number(&calls, row, "parts_cost")),
            "service call row {}",
            row
        );
    }

    let invoices = store.read_table(TableName::Invoices).unwrap();
    for row in 0..invoices.len() {
        let subtotal = cents(number(&invoices, row, "subtotal"));
        let tax = cents(number(&invoices, row, "tax_amount"));
        let rate = number(&invoices, row, "tax_rate");
        assert_eq!(cents(number(&invoices, row, "total_amount")), subtotal + tax);
        assert_eq!(
            tax,
            Money::from_cents(subtotal).scale(rate).cents(),
            "invoice row {}",
            row
        );
    }
}

#[test]
fn test_payments_follow_invoice_status() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvTableStore::new(dir.path());
    seed_store(&mut store, 13);

    let invoices = store.read_table(TableName::Invoices).unwrap();
    let payments = store.read_table(TableName::Payments).unwrap();
    let paid_invoice_ids = payments.int_column("invoice_id").unwrap();

    for row in 0..invoices.len() {
        let id = invoices.keys().unwrap()[row];
        let status = text(&invoices, row, "status");
        let total = cents(number(&invoices, row, "total_amount"));
        let payment_rows: Vec<usize> = paid_invoice_ids
            .iter()
            .enumerate()
            .filter(|(_, invoice)| **invoice == Some(id))
            .map(|(i, _)| i)
            .collect();

        match status.as_str() {
            "Paid" => {
                assert_eq!(payment_rows.len(), 1, "paid invoice {}", id);
                assert_eq!(cents(number(&payments, payment_rows[0], "amount")), total);
            }
            "Pending" => {
                assert!(payment_rows.len() <= 1, "pending invoice {}", id);
                for p in payment_rows {
                    assert!(cents(number(&payments, p, "amount")) < total);
                }
            }
            _ => assert!(payment_rows.is_empty(), "{} invoice {} has payments", status, id),
        }
    }
}

#[test]
fn test_skills_and_incidents() {
    let data = assemble_full(&small_plan(GenerationMode::Full, 14), None).unwrap();

    let technicians = data.get(TableName::Technicians).unwrap();
    for column in &technicians.columns[8..] {
        for skill in technicians.int_column(column).unwrap() {
            let skill = skill.unwrap();
            assert!((1..=10).contains(&skill), "{} = {}", column, skill);
        }
    }

    let calls = data.get(TableName::ServiceCalls).unwrap();
    let call_keys = calls.keys().unwrap();
    let incidents = data.get(TableName::IncidentResponse).unwrap();
    for call_id in incidents.int_column("service_call_id").unwrap() {
        let row = call_keys
            .iter()
            .position(|k| Some(*k) == call_id)
            .unwrap();
        assert_eq!(text(calls, row, "service_type"), "Emergency");
    }
}

#[test]
fn test_same_seed_writes_identical_files() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    for dir in [first.path(), second.path()] {
        let data = assemble_full(&small_plan(GenerationMode::Full, 77), None).unwrap();
        let mut store = CsvTableStore::new(dir);
        write_all(&mut store, &data, WriteMode::Overwrite).unwrap();
    }

    for table in TableName::ALL {
        let name = format!("{}.csv", table);
        let a = fs::read(first.path().join(&name)).unwrap();
        let b = fs::read(second.path().join(&name)).unwrap();
        assert!(a == b, "{} differs between runs with the same seed", name);
    }
}

#[test]
fn test_overwrite_replaces_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvTableStore::new(dir.path());
    seed_store(&mut store, 15);

    let mut plan = small_plan(GenerationMode::Full, 16);
    plan.counts.leads = 3;
    let data = assemble_full(&plan, None).unwrap();
    write_all(&mut store, &data, WriteMode::Overwrite).unwrap();

    assert_eq!(store.read_table(TableName::Leads).unwrap().len(), 3);
    assert_referential_integrity(&store);
}

#[test]
fn test_failed_overwrite_keeps_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvTableStore::new(dir.path());
    seed_store(&mut store, 17);

    let leads = store.path_of(TableName::Leads);
    fs::remove_file(&leads).unwrap();
    fs::create_dir(&leads).unwrap();
    fs::write(leads.join("keep"), "x").unwrap();
    let customers_before = fs::read(store.path_of(TableName::Customers)).unwrap();

    let data = assemble_full(&small_plan(GenerationMode::Full, 18), None).unwrap();
    assert!(write_all(&mut store, &data, WriteMode::Overwrite).is_err());

    assert_eq!(
        fs::read(store.path_of(TableName::Customers)).unwrap(),
        customers_before
    );
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp") || name.ends_with(".bak"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}
