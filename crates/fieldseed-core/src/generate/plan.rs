use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FieldSeedError, Result};
use crate::generate::incremental::INCREMENTAL_TABLES;
use crate::generate::random::{DateWindow, DAYS_PER_YEAR};
use crate::schema::types::TableName;

/// Which kind of run a plan describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// All 19 tables, written over whatever is in the store.
    Full,
    /// A small batch appended to an existing dataset.
    Incremental,
}

impl GenerationMode {
    /// Tables produced by a run of this mode, in generation order.
    pub fn tables(self) -> &'static [TableName] {
        match self {
            GenerationMode::Full => &TableName::ALL,
            GenerationMode::Incremental => &INCREMENTAL_TABLES,
        }
    }

    pub fn default_counts(self) -> RowCounts {
        match self {
            GenerationMode::Full => RowCounts::full_defaults(),
            GenerationMode::Incremental => RowCounts::incremental_defaults(),
        }
    }

    /// How far back creation dates of the base entities reach.
    pub fn lookback(self) -> Lookback {
        match self {
            GenerationMode::Full => Lookback {
                customers_days: 2 * DAYS_PER_YEAR,
                technicians_days: 5 * DAYS_PER_YEAR,
                service_calls_days: DAYS_PER_YEAR,
            },
            GenerationMode::Incremental => Lookback {
                customers_days: 30,
                technicians_days: 90,
                service_calls_days: 30,
            },
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Full => write!(f, "full"),
            GenerationMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// Creation-date windows for the base entities, in days before the base date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub customers_days: i64,
    pub technicians_days: i64,
    pub service_calls_days: i64,
}

/// Requested row counts.
///
/// Tables whose size follows a parent population (payments, inventory, work
/// orders) have no entry here. `mailing_list_prospects` counts only the
/// contacts added on top of one contact per customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub customers: usize,
    pub technicians: usize,
    pub equipment_types: usize,
    pub parts: usize,
    pub installed_devices: usize,
    pub service_calls: usize,
    pub avg_parts_per_call: usize,
    pub incident_responses: usize,
    pub vehicles: usize,
    pub mailing_list_prospects: usize,
    pub subscriptions: usize,
    /// `None` means 85% of the service calls.
    pub invoices: Option<usize>,
    pub appointments: usize,
    pub quotes: usize,
    pub customer_feedback: usize,
    pub leads: usize,
}

impl RowCounts {
    pub fn full_defaults() -> Self {
        Self {
            customers: 500,
            technicians: 15,
            equipment_types: 50,
            parts: 200,
            installed_devices: 800,
            service_calls: 2000,
            avg_parts_per_call: 2,
            incident_responses: 150,
            vehicles: 20,
            mailing_list_prospects: 300,
            subscriptions: 250,
            invoices: None,
            appointments: 500,
            quotes: 400,
            customer_feedback: 800,
            leads: 600,
        }
    }

    /// Batch sizes for an incremental run. Tables the extender does not
    /// produce are zero.
    pub fn incremental_defaults() -> Self {
        Self {
            customers: 5,
            technicians: 2,
            equipment_types: 3,
            parts: 10,
            installed_devices: 0,
            service_calls: 200,
            avg_parts_per_call: 2,
            incident_responses: 0,
            vehicles: 0,
            mailing_list_prospects: 0,
            subscriptions: 0,
            invoices: None,
            appointments: 50,
            quotes: 30,
            customer_feedback: 100,
            leads: 50,
        }
    }

    /// Invoices to issue for `calls` service calls.
    pub fn invoices_for(&self, calls: usize) -> usize {
        self.invoices.unwrap_or(calls * 85 / 100).min(calls)
    }

    /// Override the count of one table.
    pub fn set(&mut self, table: TableName, rows: usize) -> Result<()> {
        match table {
            TableName::Customers => self.customers = rows,
            TableName::Technicians => self.technicians = rows,
            TableName::EquipmentTypes => self.equipment_types = rows,
            TableName::Parts => self.parts = rows,
            TableName::InstalledDevices => self.installed_devices = rows,
            TableName::ServiceCalls => self.service_calls = rows,
            TableName::IncidentResponse => self.incident_responses = rows,
            TableName::VehicleFleet => self.vehicles = rows,
            TableName::MailingList => self.mailing_list_prospects = rows,
            TableName::Subscriptions => self.subscriptions = rows,
            TableName::Invoices => self.invoices = Some(rows),
            TableName::Appointments => self.appointments = rows,
            TableName::Quotes => self.quotes = rows,
            TableName::CustomerFeedback => self.customer_feedback = rows,
            TableName::Leads => self.leads = rows,
            TableName::PartsUsage
            | TableName::Payments
            | TableName::Inventory
            | TableName::WorkOrders => {
                return Err(FieldSeedError::Config {
                    message: format!(
                        "The row count of '{}' follows its parent table and cannot be set",
                        table
                    ),
                });
            }
        }
        Ok(())
    }

    /// Apply `table name -> rows` overrides for a run of `mode`.
    ///
    /// Unknown table names are an error. Tables the mode does not produce are
    /// skipped with a warning.
    pub fn apply_overrides(
        &mut self,
        mode: GenerationMode,
        overrides: &BTreeMap<String, usize>,
    ) -> Result<()> {
        for (name, rows) in overrides {
            let table: TableName = name.parse()?;
            if !mode.tables().contains(&table) {
                tracing::warn!(
                    "Ignoring row count for '{}': {} runs do not generate it",
                    table,
                    mode
                );
                continue;
            }
            self.set(table, *rows)?;
        }
        Ok(())
    }
}

/// Everything needed to reproduce a run.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub mode: GenerationMode,
    /// Seed for the run's random source.
    pub seed: u64,
    /// The pinned "today" every relative date window is computed from.
    pub base_date: NaiveDate,
    pub counts: RowCounts,
}

impl GenerationPlan {
    /// A plan with the mode's default counts.
    pub fn new(mode: GenerationMode, seed: u64, base_date: NaiveDate) -> Self {
        Self {
            mode,
            seed,
            base_date,
            counts: mode.default_counts(),
        }
    }

    pub fn with_counts(mut self, counts: RowCounts) -> Self {
        self.counts = counts;
        self
    }

    pub fn customers_created(&self) -> DateWindow {
        DateWindow::last_days(self.base_date, self.mode.lookback().customers_days)
    }

    pub fn technicians_hired(&self) -> DateWindow {
        DateWindow::last_days(self.base_date, self.mode.lookback().technicians_days)
    }

    pub fn service_calls_dated(&self) -> DateWindow {
        DateWindow::last_days(self.base_date, self.mode.lookback().service_calls_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_invoice_default_is_85_percent() {
        let counts = RowCounts::full_defaults();
        assert_eq!(counts.invoices_for(2000), 1700);
        assert_eq!(counts.invoices_for(200), 170);
        assert_eq!(counts.invoices_for(0), 0);
    }

    #[test]
    fn test_invoice_override_clamps_to_calls() {
        let mut counts = RowCounts::full_defaults();
        counts.set(TableName::Invoices, 5000).unwrap();
        assert_eq!(counts.invoices_for(2000), 2000);
    }

    #[test]
    fn test_population_driven_tables_cannot_be_set() {
        let mut counts = RowCounts::full_defaults();
        for table in [
            TableName::Payments,
            TableName::Inventory,
            TableName::WorkOrders,
            TableName::PartsUsage,
        ] {
            assert!(counts.set(table, 10).is_err(), "{} should be rejected", table);
        }
    }

    #[test]
    fn test_apply_overrides() {
        let mut counts = RowCounts::incremental_defaults();
        let overrides = BTreeMap::from([
            ("service_calls".to_string(), 300),
            ("subscriptions".to_string(), 99),
        ]);
        counts
            .apply_overrides(GenerationMode::Incremental, &overrides)
            .unwrap();
        assert_eq!(counts.service_calls, 300);
        // not an incremental table, so skipped
        assert_eq!(counts.subscriptions, 0);

        let unknown = BTreeMap::from([("widgets".to_string(), 1)]);
        assert!(counts
            .apply_overrides(GenerationMode::Incremental, &unknown)
            .is_err());
    }

    #[test]
    fn test_lookback_windows() {
        let full = GenerationPlan::new(GenerationMode::Full, 1, base_date());
        let inc = GenerationPlan::new(GenerationMode::Incremental, 1, base_date());
        assert_eq!((full.customers_created().end - full.customers_created().start).num_days(), 730);
        assert_eq!((inc.customers_created().end - inc.customers_created().start).num_days(), 30);
        assert_eq!((inc.technicians_hired().end - inc.technicians_hired().start).num_days(), 90);
        assert_eq!(inc.service_calls_dated().end, base_date());
    }

    #[test]
    fn test_mode_tables() {
        assert_eq!(GenerationMode::Full.tables().len(), 19);
        assert_eq!(GenerationMode::Incremental.tables().len(), 13);
    }
}
