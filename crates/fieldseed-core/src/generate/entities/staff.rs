//! Field staff: technicians and the vehicles they drive.

use chrono::{Duration as ChronoDuration, NaiveDate};

use crate::generate::foreign_key::KeyPool;
use crate::generate::random::{DateWindow, RandomSource, DAYS_PER_YEAR};
use crate::generate::value::Value;
use crate::schema::types::{Record, TableName};

/// Seniority tier. The tier sets the baseline for every skill score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicianLevel {
    Junior,
    Senior,
    Lead,
    Specialist,
}

impl TechnicianLevel {
    pub const ALL: [TechnicianLevel; 4] = [
        TechnicianLevel::Junior,
        TechnicianLevel::Senior,
        TechnicianLevel::Lead,
        TechnicianLevel::Specialist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TechnicianLevel::Junior => "junior",
            TechnicianLevel::Senior => "senior",
            TechnicianLevel::Lead => "lead",
            TechnicianLevel::Specialist => "specialist",
        }
    }

    pub fn base_skill(self) -> i64 {
        match self {
            TechnicianLevel::Junior => 3,
            TechnicianLevel::Senior => 6,
            TechnicianLevel::Lead => 8,
            TechnicianLevel::Specialist => 9,
        }
    }
}

/// A scored skill. Each one becomes a `<skill>_skill` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    HvacInstallation,
    Electrical,
    Refrigeration,
    Ductwork,
    Diagnostics,
    CustomerService,
    SafetyProtocols,
}

/// Skills in column order.
pub const SKILLS: [Skill; 7] = [
    Skill::HvacInstallation,
    Skill::Electrical,
    Skill::Refrigeration,
    Skill::Ductwork,
    Skill::Diagnostics,
    Skill::CustomerService,
    Skill::SafetyProtocols,
];

impl Skill {
    pub fn column(self) -> &'static str {
        match self {
            Skill::HvacInstallation => "hvac_installation_skill",
            Skill::Electrical => "electrical_skill",
            Skill::Refrigeration => "refrigeration_skill",
            Skill::Ductwork => "ductwork_skill",
            Skill::Diagnostics => "diagnostics_skill",
            Skill::CustomerService => "customer_service_skill",
            Skill::SafetyProtocols => "safety_protocols_skill",
        }
    }
}

pub const MIN_SKILL: i64 = 1;
pub const MAX_SKILL: i64 = 10;

const CERTIFICATIONS: &[&str] = &["Basic", "Intermediate", "Advanced", "Master"];

#[derive(Debug, Clone, PartialEq)]
pub struct Technician {
    pub technician_id: i64,
    pub technician_name: String,
    pub phone: String,
    pub level: TechnicianLevel,
    pub hourly_rate: i64,
    pub hire_date: NaiveDate,
    pub years_experience: i64,
    pub certification_level: &'static str,
    /// Scores in `SKILLS` order.
    pub skills: [i64; SKILLS.len()],
}

impl Technician {
    pub fn skill(&self, skill: Skill) -> i64 {
        let idx = SKILLS.iter().position(|s| *s == skill).unwrap_or(0);
        self.skills[idx]
    }
}

impl Record for Technician {
    const TABLE: TableName = TableName::Technicians;
    const COLUMNS: &'static [&'static str] = &[
        "technician_id",
        "technician_name",
        "phone",
        "technician_level",
        "hourly_rate",
        "hire_date",
        "years_experience",
        "certification_level",
        "hvac_installation_skill",
        "electrical_skill",
        "refrigeration_skill",
        "ductwork_skill",
        "diagnostics_skill",
        "customer_service_skill",
        "safety_protocols_skill",
    ];

    fn key(&self) -> i64 {
        self.technician_id
    }

    fn values(&self) -> Vec<Value> {
        let mut values: Vec<Value> = vec![
            self.technician_id.into(),
            self.technician_name.clone().into(),
            self.phone.clone().into(),
            self.level.as_str().into(),
            self.hourly_rate.into(),
            self.hire_date.into(),
            self.years_experience.into(),
            self.certification_level.into(),
        ];
        values.extend(self.skills.iter().map(|s| Value::Int(*s)));
        values
    }
}

/// Tier baseline plus a -2..=2 variance per skill, clamped to the score range.
fn skill_scores(random: &mut RandomSource, level: TechnicianLevel) -> [i64; SKILLS.len()] {
    let mut scores = [0; SKILLS.len()];
    for score in scores.iter_mut() {
        *score = (level.base_skill() + random.int(-2, 2)).clamp(MIN_SKILL, MAX_SKILL);
    }
    scores
}

pub fn generate_technicians(
    random: &mut RandomSource,
    first_id: i64,
    count: usize,
    hired: DateWindow,
) -> Vec<Technician> {
    (0..count as i64)
        .map(|i| {
            let level = random.pick(&TechnicianLevel::ALL);
            let skills = skill_scores(random, level);
            Technician {
                technician_id: first_id + i,
                technician_name: random.person_name(),
                phone: random.phone(),
                level,
                hourly_rate: random.int(25, 75),
                hire_date: random.date_in(hired),
                years_experience: random.int(1, 20),
                certification_level: random.pick(CERTIFICATIONS),
                skills,
            }
        })
        .collect()
}

const VEHICLE_TYPES: &[&str] = &["Van", "Truck", "SUV"];
const MAKES: &[&str] = &["Ford", "Chevrolet", "Ram", "GMC", "Mercedes"];
const VEHICLE_STATUSES: &[&str] = &["Active", "Maintenance", "Out of Service", "Retired"];
const FUEL_TYPES: &[&str] = &["Gasoline", "Diesel", "Hybrid"];

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub vehicle_number: String,
    pub make: &'static str,
    pub model: String,
    pub year: i64,
    pub vehicle_type: &'static str,
    pub license_plate: String,
    pub vin: String,
    pub assigned_technician_id: Option<i64>,
    pub purchase_date: NaiveDate,
    pub current_mileage: i64,
    pub last_maintenance_date: NaiveDate,
    pub next_maintenance_mileage: i64,
    pub status: &'static str,
    pub fuel_type: &'static str,
    pub gps_enabled: bool,
}

impl Record for Vehicle {
    const TABLE: TableName = TableName::VehicleFleet;
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_id",
        "vehicle_number",
        "make",
        "model",
        "year",
        "vehicle_type",
        "license_plate",
        "vin",
        "assigned_technician_id",
        "purchase_date",
        "current_mileage",
        "last_maintenance_date",
        "next_maintenance_mileage",
        "status",
        "fuel_type",
        "gps_enabled",
    ];

    fn key(&self) -> i64 {
        self.vehicle_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.vehicle_id.into(),
            self.vehicle_number.clone().into(),
            self.make.into(),
            self.model.clone().into(),
            self.year.into(),
            self.vehicle_type.into(),
            self.license_plate.clone().into(),
            self.vin.clone().into(),
            self.assigned_technician_id.into(),
            self.purchase_date.into(),
            self.current_mileage.into(),
            self.last_maintenance_date.into(),
            self.next_maintenance_mileage.into(),
            self.status.into(),
            self.fuel_type.into(),
            self.gps_enabled.into(),
        ]
    }
}

/// The company fleet. Without technicians there is no fleet to assign.
pub fn generate_vehicles(
    random: &mut RandomSource,
    first_id: i64,
    keys: &KeyPool,
    count: usize,
) -> Vec<Vehicle> {
    if keys.any_empty(&[TableName::Technicians]) {
        return Vec::new();
    }
    let today = random.today();
    let bought = DateWindow::new(
        today - ChronoDuration::days(8 * DAYS_PER_YEAR),
        today - ChronoDuration::days(DAYS_PER_YEAR),
    );

    (0..count as i64)
        .map(|i| {
            let vehicle_id = first_id + i;
            let purchase_date = random.date_in(bought);
            let current_mileage = random.int(20_000, 150_000);
            Vehicle {
                vehicle_id,
                vehicle_number: format!("HVAC-{:03}", vehicle_id),
                make: random.pick(MAKES),
                model: random.title_word(),
                year: random.int(2015, 2023),
                vehicle_type: random.pick(VEHICLE_TYPES),
                license_plate: random.bothify("???-####"),
                vin: random.bothify("?#?##?##?#?######"),
                assigned_technician_id: random
                    .maybe(|r| keys.pick(TableName::Technicians, r.rng()))
                    .flatten(),
                purchase_date,
                current_mileage,
                last_maintenance_date: random.date_since(purchase_date),
                next_maintenance_mileage: current_mileage + random.int(3_000, 8_000),
                status: random.pick(VEHICLE_STATUSES),
                fuel_type: random.pick(FUEL_TYPES),
                gps_enabled: random.coin(),
            }
        })
        .collect()
}
