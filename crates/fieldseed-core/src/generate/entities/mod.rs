//! # Entity Generators
//!
//! One generator per table. Generators take the run's `RandomSource`, the
//! first primary key to hand out, and either the parent rows they derive
//! fields from or a `KeyPool` of parent keys to reference. Keys are dense
//! from `first_id`. A generator whose parents are empty returns no rows.

pub mod billing;
pub mod catalog;
pub mod customers;
pub mod service;
pub mod staff;

use crate::schema::types::{Record, TableName};

pub use billing::{Invoice, InvoiceStatus, Payment, Quote};
pub use catalog::{EquipmentType, InventoryItem, Part, StockStatus};
pub use customers::{Customer, Lead, MailingContact, Subscription};
pub use service::{
    Appointment, CustomerFeedback, IncidentResponse, InstalledDevice, PartsUsage, ServiceCall,
    ServiceType, WorkOrder,
};
pub use staff::{Skill, Technician, TechnicianLevel, Vehicle, SKILLS};

/// The column header every run writes for `table`.
pub fn columns_of(table: TableName) -> &'static [&'static str] {
    match table {
        TableName::Customers => Customer::COLUMNS,
        TableName::Technicians => Technician::COLUMNS,
        TableName::EquipmentTypes => EquipmentType::COLUMNS,
        TableName::Parts => Part::COLUMNS,
        TableName::InstalledDevices => InstalledDevice::COLUMNS,
        TableName::ServiceCalls => ServiceCall::COLUMNS,
        TableName::PartsUsage => PartsUsage::COLUMNS,
        TableName::IncidentResponse => IncidentResponse::COLUMNS,
        TableName::VehicleFleet => Vehicle::COLUMNS,
        TableName::MailingList => MailingContact::COLUMNS,
        TableName::Subscriptions => Subscription::COLUMNS,
        TableName::Invoices => Invoice::COLUMNS,
        TableName::Payments => Payment::COLUMNS,
        TableName::Inventory => InventoryItem::COLUMNS,
        TableName::Appointments => Appointment::COLUMNS,
        TableName::Quotes => Quote::COLUMNS,
        TableName::WorkOrders => WorkOrder::COLUMNS,
        TableName::CustomerFeedback => CustomerFeedback::COLUMNS,
        TableName::Leads => Lead::COLUMNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_leads_with_its_key() {
        for table in TableName::ALL {
            assert_eq!(
                columns_of(table).first(),
                Some(&table.key_column()),
                "{} header must start with its primary key",
                table
            );
        }
    }

    #[test]
    fn test_every_reference_is_a_column() {
        for table in TableName::ALL {
            for reference in table.references() {
                assert!(
                    columns_of(table).contains(&reference.column),
                    "{} is missing foreign key column {}",
                    table,
                    reference.column
                );
            }
        }
    }
}
