use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FieldSeedError, Result};
use crate::generate::value::Value;

/// Every table the engine knows how to produce.
///
/// Variant order is the full-generation dependency order: a table never
/// appears before a table it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Customers,
    Technicians,
    EquipmentTypes,
    Parts,
    InstalledDevices,
    ServiceCalls,
    PartsUsage,
    IncidentResponse,
    VehicleFleet,
    MailingList,
    Subscriptions,
    Invoices,
    Payments,
    Inventory,
    Appointments,
    Quotes,
    WorkOrders,
    CustomerFeedback,
    Leads,
}

/// A foreign-key column and the table whose primary key it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub column: &'static str,
    pub parent: TableName,
    pub nullable: bool,
}

const fn required(column: &'static str, parent: TableName) -> Reference {
    Reference {
        column,
        parent,
        nullable: false,
    }
}

const fn optional(column: &'static str, parent: TableName) -> Reference {
    Reference {
        column,
        parent,
        nullable: true,
    }
}

const INSTALLED_DEVICE_REFS: &[Reference] = &[
    required("customer_id", TableName::Customers),
    required("equipment_id", TableName::EquipmentTypes),
];
const SERVICE_CALL_REFS: &[Reference] = &[
    required("customer_id", TableName::Customers),
    required("technician_id", TableName::Technicians),
    required("equipment_id", TableName::EquipmentTypes),
];
const PARTS_USAGE_REFS: &[Reference] = &[
    required("service_call_id", TableName::ServiceCalls),
    required("part_id", TableName::Parts),
];
const INCIDENT_REFS: &[Reference] = &[
    required("service_call_id", TableName::ServiceCalls),
    required("responding_technician_id", TableName::Technicians),
    optional("backup_technician_id", TableName::Technicians),
];
const VEHICLE_REFS: &[Reference] = &[optional("assigned_technician_id", TableName::Technicians)];
const MAILING_LIST_REFS: &[Reference] = &[optional("customer_id", TableName::Customers)];
const SUBSCRIPTION_REFS: &[Reference] = &[required("customer_id", TableName::Customers)];
const INVOICE_REFS: &[Reference] = &[
    required("service_call_id", TableName::ServiceCalls),
    required("customer_id", TableName::Customers),
];
const PAYMENT_REFS: &[Reference] = &[required("invoice_id", TableName::Invoices)];
const INVENTORY_REFS: &[Reference] = &[required("part_id", TableName::Parts)];
const APPOINTMENT_REFS: &[Reference] = &[
    required("customer_id", TableName::Customers),
    required("technician_id", TableName::Technicians),
    optional("service_call_id", TableName::ServiceCalls),
];
const QUOTE_REFS: &[Reference] = &[
    required("customer_id", TableName::Customers),
    optional("equipment_id", TableName::EquipmentTypes),
];
const WORK_ORDER_REFS: &[Reference] = &[
    required("service_call_id", TableName::ServiceCalls),
    required("technician_id", TableName::Technicians),
];
const FEEDBACK_REFS: &[Reference] = &[
    required("service_call_id", TableName::ServiceCalls),
    required("customer_id", TableName::Customers),
];

impl TableName {
    pub const ALL: [TableName; 19] = [
        TableName::Customers,
        TableName::Technicians,
        TableName::EquipmentTypes,
        TableName::Parts,
        TableName::InstalledDevices,
        TableName::ServiceCalls,
        TableName::PartsUsage,
        TableName::IncidentResponse,
        TableName::VehicleFleet,
        TableName::MailingList,
        TableName::Subscriptions,
        TableName::Invoices,
        TableName::Payments,
        TableName::Inventory,
        TableName::Appointments,
        TableName::Quotes,
        TableName::WorkOrders,
        TableName::CustomerFeedback,
        TableName::Leads,
    ];

    /// File stem used by the table store.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Customers => "customers",
            TableName::Technicians => "technicians",
            TableName::EquipmentTypes => "equipment_types",
            TableName::Parts => "parts",
            TableName::InstalledDevices => "installed_devices",
            TableName::ServiceCalls => "service_calls",
            TableName::PartsUsage => "parts_usage",
            TableName::IncidentResponse => "incident_response",
            TableName::VehicleFleet => "vehicle_fleet",
            TableName::MailingList => "mailing_list",
            TableName::Subscriptions => "subscriptions",
            TableName::Invoices => "invoices",
            TableName::Payments => "payments",
            TableName::Inventory => "inventory",
            TableName::Appointments => "appointments",
            TableName::Quotes => "quotes",
            TableName::WorkOrders => "work_orders",
            TableName::CustomerFeedback => "customer_feedback",
            TableName::Leads => "leads",
        }
    }

    /// Name of the surrogate primary key column.
    pub fn key_column(self) -> &'static str {
        match self {
            TableName::Customers => "customer_id",
            TableName::Technicians => "technician_id",
            TableName::EquipmentTypes => "equipment_id",
            TableName::Parts => "part_id",
            TableName::InstalledDevices => "installation_id",
            TableName::ServiceCalls => "service_call_id",
            TableName::PartsUsage => "usage_id",
            TableName::IncidentResponse => "incident_id",
            TableName::VehicleFleet => "vehicle_id",
            TableName::MailingList => "contact_id",
            TableName::Subscriptions => "subscription_id",
            TableName::Invoices => "invoice_id",
            TableName::Payments => "payment_id",
            TableName::Inventory => "inventory_id",
            TableName::Appointments => "appointment_id",
            TableName::Quotes => "quote_id",
            TableName::WorkOrders => "work_order_id",
            TableName::CustomerFeedback => "feedback_id",
            TableName::Leads => "lead_id",
        }
    }

    /// Foreign-key columns of this table.
    pub fn references(self) -> &'static [Reference] {
        use TableName::*;
        match self {
            Customers | Technicians | EquipmentTypes | Parts | Leads => &[],
            InstalledDevices => INSTALLED_DEVICE_REFS,
            ServiceCalls => SERVICE_CALL_REFS,
            PartsUsage => PARTS_USAGE_REFS,
            IncidentResponse => INCIDENT_REFS,
            VehicleFleet => VEHICLE_REFS,
            MailingList => MAILING_LIST_REFS,
            Subscriptions => SUBSCRIPTION_REFS,
            Invoices => INVOICE_REFS,
            Payments => PAYMENT_REFS,
            Inventory => INVENTORY_REFS,
            Appointments => APPOINTMENT_REFS,
            Quotes => QUOTE_REFS,
            WorkOrders => WORK_ORDER_REFS,
            CustomerFeedback => FEEDBACK_REFS,
        }
    }

    /// Distinct parent tables, in declaration order.
    pub fn parents(self) -> Vec<TableName> {
        let mut parents = Vec::new();
        for reference in self.references() {
            if !parents.contains(&reference.parent) {
                parents.push(reference.parent);
            }
        }
        parents
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = FieldSeedError;

    fn from_str(s: &str) -> Result<Self> {
        TableName::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FieldSeedError::Config {
                message: format!("Unknown table '{}'", s),
            })
    }
}

/// A typed entity row with a fixed column layout.
///
/// `COLUMNS` is the wire contract with the table store: full and
/// incremental runs write the same header for the same table.
pub trait Record {
    const TABLE: TableName;
    const COLUMNS: &'static [&'static str];

    /// Surrogate primary key.
    fn key(&self) -> i64;

    /// Cell values in `COLUMNS` order.
    fn values(&self) -> Vec<Value>;
}

/// A materialized table: header plus rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: TableName,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: TableName, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_records<R: Record>(records: &[R]) -> Self {
        Self {
            name: R::TABLE,
            columns: R::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(Record::values).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Integer cells of a column. Empty cells are `None`; anything that is
    /// not an integer is a `MalformedRow` error.
    pub fn int_column(&self, column: &str) -> Result<Vec<Option<i64>>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| FieldSeedError::MalformedRow {
                table: self.name.to_string(),
                row_index: 0,
                column: column.to_string(),
                message: "column is missing from the header".to_string(),
            })?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| match row.get(idx) {
                None | Some(Value::Null) => Ok(None),
                Some(value) => value.as_int().map(Some).ok_or_else(|| {
                    FieldSeedError::MalformedRow {
                        table: self.name.to_string(),
                        row_index,
                        column: column.to_string(),
                        message: format!("expected an integer, found '{}'", value),
                    }
                }),
            })
            .collect()
    }

    /// All primary key values. A missing key is a malformed row.
    pub fn keys(&self) -> Result<Vec<i64>> {
        let column = self.name.key_column();
        self.int_column(column)?
            .into_iter()
            .enumerate()
            .map(|(row_index, key)| {
                key.ok_or_else(|| FieldSeedError::MalformedRow {
                    table: self.name.to_string(),
                    row_index,
                    column: column.to_string(),
                    message: "primary key is empty".to_string(),
                })
            })
            .collect()
    }

    /// Highest primary key, or `None` for a table with no rows.
    pub fn max_key(&self) -> Result<Option<i64>> {
        Ok(self.keys()?.into_iter().max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers(rows: Vec<Vec<Value>>) -> Table {
        Table {
            name: TableName::Customers,
            columns: vec!["customer_id".into(), "customer_name".into()],
            rows,
        }
    }

    #[test]
    fn test_table_name_round_trip() {
        for table in TableName::ALL {
            assert_eq!(table.as_str().parse::<TableName>().unwrap(), table);
        }
        assert!("widgets".parse::<TableName>().is_err());
    }

    #[test]
    fn test_parents_precede_children_in_all() {
        for (pos, table) in TableName::ALL.iter().enumerate() {
            for parent in table.parents() {
                let parent_pos = TableName::ALL.iter().position(|t| *t == parent).unwrap();
                assert!(parent_pos < pos, "{} must precede {}", parent, table);
            }
        }
    }

    #[test]
    fn test_references_outlive_the_call() {
        let all: Vec<&'static [Reference]> =
            TableName::ALL.iter().map(|t| t.references()).collect();
        let edges: usize = all.iter().map(|refs| refs.len()).sum();
        assert_eq!(edges, 26);

        let incident = TableName::IncidentResponse.references();
        assert_eq!(
            incident.iter().filter(|r| r.nullable).map(|r| r.column).collect::<Vec<_>>(),
            vec!["backup_technician_id"]
        );
        assert!(TableName::Leads.references().is_empty());
        assert_eq!(TableName::Payments.parents(), vec![TableName::Invoices]);
    }

    #[test]
    fn test_max_key() {
        let table = customers(vec![
            vec![Value::Int(3), "a".into()],
            vec![Value::Int(500), "b".into()],
            vec![Value::Int(42), "c".into()],
        ]);
        assert_eq!(table.max_key().unwrap(), Some(500));
        assert_eq!(customers(Vec::new()).max_key().unwrap(), None);
    }

    #[test]
    fn test_malformed_key_is_an_error() {
        let table = customers(vec![
            vec![Value::Int(1), "a".into()],
            vec!["oops".into(), "b".into()],
        ]);
        let err = table.max_key().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 1"), "{}", msg);
        assert!(msg.contains("customer_id"), "{}", msg);
    }

    #[test]
    fn test_missing_key_column_is_an_error() {
        let table = Table::new(TableName::Parts, vec!["part_name".into()]);
        assert!(table.max_key().is_err());
    }
}
