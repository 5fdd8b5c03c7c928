//! Equipment models, spare parts and the warehouse stock of those parts.

use chrono::NaiveDate;

use crate::generate::random::{round1, DateWindow, RandomSource, DAYS_PER_MONTH};
use crate::generate::value::{Money, Value};
use crate::schema::types::{Record, TableName};

const BRANDS: &[&str] = &["Carrier", "Trane", "Lennox", "Rheem", "Goodman", "York", "Daikin"];
const MODEL_LINES: &[&str] = &["X", "Pro", "Elite", "Prime"];
const EQUIPMENT_TYPES: &[&str] = &[
    "Central AC",
    "Heat Pump",
    "Furnace",
    "Ductless Mini-Split",
    "Package Unit",
];
const BTU_RATINGS: &[i64] = &[18_000, 24_000, 36_000, 48_000, 60_000];

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentType {
    pub equipment_id: i64,
    pub brand: &'static str,
    pub model: String,
    pub equipment_type: &'static str,
    pub btu_rating: i64,
    /// SEER, one decimal.
    pub energy_rating: f64,
}

impl Record for EquipmentType {
    const TABLE: TableName = TableName::EquipmentTypes;
    const COLUMNS: &'static [&'static str] = &[
        "equipment_id",
        "brand",
        "model",
        "equipment_type",
        "btu_rating",
        "energy_rating",
    ];

    fn key(&self) -> i64 {
        self.equipment_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.equipment_id.into(),
            self.brand.into(),
            self.model.clone().into(),
            self.equipment_type.into(),
            self.btu_rating.into(),
            self.energy_rating.into(),
        ]
    }
}

pub fn generate_equipment_types(
    random: &mut RandomSource,
    first_id: i64,
    count: usize,
) -> Vec<EquipmentType> {
    (0..count as i64)
        .map(|i| EquipmentType {
            equipment_id: first_id + i,
            brand: random.pick(BRANDS),
            model: format!("{}{}", random.pick(MODEL_LINES), random.int(100, 999)),
            equipment_type: random.pick(EQUIPMENT_TYPES),
            btu_rating: random.pick(BTU_RATINGS),
            energy_rating: round1(random.uniform(13.0, 20.0)),
        })
        .collect()
}

const PART_TYPES: &[&str] = &[
    "Filter",
    "Compressor",
    "Coil",
    "Fan Motor",
    "Thermostat",
    "Capacitor",
    "Contactor",
    "Refrigerant",
    "Ductwork",
    "Valve",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub part_id: i64,
    pub part_name: String,
    pub part_category: &'static str,
    pub unit_cost: Money,
    pub supplier: String,
}

impl Record for Part {
    const TABLE: TableName = TableName::Parts;
    const COLUMNS: &'static [&'static str] =
        &["part_id", "part_name", "part_category", "unit_cost", "supplier"];

    fn key(&self) -> i64 {
        self.part_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.part_id.into(),
            self.part_name.clone().into(),
            self.part_category.into(),
            self.unit_cost.into(),
            self.supplier.clone().into(),
        ]
    }
}

pub fn generate_parts(random: &mut RandomSource, first_id: i64, count: usize) -> Vec<Part> {
    (0..count as i64)
        .map(|i| Part {
            part_id: first_id + i,
            part_name: format!("{} - {}", random.pick(PART_TYPES), random.title_word()),
            part_category: random.pick(PART_TYPES),
            unit_cost: Money::from_dollars(random.uniform(5.0, 500.0)),
            supplier: random.company(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    LowStock,
    InStock,
}

impl StockStatus {
    /// At or below the reorder point counts as low.
    pub fn classify(current_stock: i64, reorder_point: i64) -> Self {
        if current_stock <= reorder_point {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

const WAREHOUSE_ZONES: &[&str] = &["A", "B", "C"];
const ABC_CLASSES: &[&str] = &["A", "B", "C"];

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    /// Same value as `part_id`.
    pub inventory_id: i64,
    pub part_id: i64,
    pub warehouse_location: String,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub max_stock_level: i64,
    pub last_restock_date: NaiveDate,
    pub last_restock_quantity: i64,
    pub avg_monthly_usage: i64,
    pub stock_status: StockStatus,
    pub supplier_lead_time_days: i64,
    pub abc_classification: &'static str,
    pub last_count_date: NaiveDate,
    pub unit_cost: Money,
    pub total_value: Money,
}

impl Record for InventoryItem {
    const TABLE: TableName = TableName::Inventory;
    const COLUMNS: &'static [&'static str] = &[
        "inventory_id",
        "part_id",
        "warehouse_location",
        "current_stock",
        "reorder_point",
        "max_stock_level",
        "last_restock_date",
        "last_restock_quantity",
        "avg_monthly_usage",
        "stock_status",
        "supplier_lead_time_days",
        "abc_classification",
        "last_count_date",
        "unit_cost",
        "total_value",
    ];

    fn key(&self) -> i64 {
        self.inventory_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.inventory_id.into(),
            self.part_id.into(),
            self.warehouse_location.clone().into(),
            self.current_stock.into(),
            self.reorder_point.into(),
            self.max_stock_level.into(),
            self.last_restock_date.into(),
            self.last_restock_quantity.into(),
            self.avg_monthly_usage.into(),
            self.stock_status.as_str().into(),
            self.supplier_lead_time_days.into(),
            self.abc_classification.into(),
            self.last_count_date.into(),
            self.unit_cost.into(),
            self.total_value.into(),
        ]
    }
}

/// One stock record per part, keyed by the part's own id.
pub fn generate_inventory(random: &mut RandomSource, parts: &[Part]) -> Vec<InventoryItem> {
    let today = random.today();
    parts
        .iter()
        .map(|part| {
            let current_stock = random.int(0, 100);
            let reorder_point = random.int(5, 25);
            InventoryItem {
                inventory_id: part.part_id,
                part_id: part.part_id,
                warehouse_location: format!(
                    "{}-{:02}-{}",
                    random.pick(WAREHOUSE_ZONES),
                    random.int(1, 20),
                    random.int(1, 10)
                ),
                current_stock,
                reorder_point,
                max_stock_level: random.int(50, 200),
                last_restock_date: random
                    .date_in(DateWindow::last_days(today, 6 * DAYS_PER_MONTH)),
                last_restock_quantity: random.int(20, 100),
                avg_monthly_usage: random.int(2, 30),
                stock_status: StockStatus::classify(current_stock, reorder_point),
                supplier_lead_time_days: random.int(3, 21),
                abc_classification: random.pick(ABC_CLASSES),
                last_count_date: random.date_in(DateWindow::last_days(today, 3 * DAYS_PER_MONTH)),
                unit_cost: part.unit_cost,
                total_value: Money::from_cents(current_stock * part.unit_cost.cents()),
            }
        })
        .collect()
}
