//! Field work: installed equipment, service calls and everything hanging off
//! a call (parts, incidents, appointments, work orders, feedback).

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::generate::foreign_key::KeyPool;
use crate::generate::random::{
    round1, round2, DateWindow, RandomSource, DAYS_PER_MONTH, DAYS_PER_YEAR,
};
use crate::generate::value::{Money, Value};
use crate::schema::types::{Record, TableName};

const WARRANTY_MONTHS: &[i64] = &[12, 24, 36, 60];
const LOCATIONS: &[&str] = &["Main Floor", "Basement", "Attic", "Garage", "Roof"];
const DEVICE_STATUSES: &[&str] = &["Active", "Inactive", "Under Maintenance", "Replaced"];

#[derive(Debug, Clone, PartialEq)]
pub struct InstalledDevice {
    pub installation_id: i64,
    pub customer_id: i64,
    pub equipment_id: i64,
    pub installation_date: NaiveDate,
    pub warranty_end_date: NaiveDate,
    pub serial_number: String,
    pub installation_location: &'static str,
    pub status: &'static str,
    pub last_maintenance_date: Option<NaiveDate>,
}

impl Record for InstalledDevice {
    const TABLE: TableName = TableName::InstalledDevices;
    const COLUMNS: &'static [&'static str] = &[
        "installation_id",
        "customer_id",
        "equipment_id",
        "installation_date",
        "warranty_end_date",
        "serial_number",
        "installation_location",
        "status",
        "last_maintenance_date",
    ];

    fn key(&self) -> i64 {
        self.installation_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.installation_id.into(),
            self.customer_id.into(),
            self.equipment_id.into(),
            self.installation_date.into(),
            self.warranty_end_date.into(),
            self.serial_number.clone().into(),
            self.installation_location.into(),
            self.status.into(),
            self.last_maintenance_date.into(),
        ]
    }
}

pub fn generate_installed_devices(
    random: &mut RandomSource,
    first_id: i64,
    keys: &KeyPool,
    count: usize,
) -> Vec<InstalledDevice> {
    if keys.any_empty(&[TableName::Customers, TableName::EquipmentTypes]) {
        return Vec::new();
    }
    let installed = DateWindow::last_days(random.today(), 3 * DAYS_PER_YEAR);

    let mut devices = Vec::with_capacity(count);
    for i in 0..count as i64 {
        let (Some(customer_id), Some(equipment_id)) = (
            keys.pick(TableName::Customers, random.rng()),
            keys.pick(TableName::EquipmentTypes, random.rng()),
        ) else {
            break;
        };
        let installation_date = random.date_in(installed);
        let warranty_months = random.pick(WARRANTY_MONTHS);

        devices.push(InstalledDevice {
            installation_id: first_id + i,
            customer_id,
            equipment_id,
            installation_date,
            warranty_end_date: installation_date
                + ChronoDuration::days(warranty_months * DAYS_PER_MONTH),
            serial_number: random.bothify("??##-####-####"),
            installation_location: random.pick(LOCATIONS),
            status: random.pick(DEVICE_STATUSES),
            last_maintenance_date: random.maybe(|r| r.date_since(installation_date)),
        });
    }
    devices
}

/// Kind of visit. Only `Emergency` calls can raise an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Maintenance,
    Repair,
    Installation,
    Emergency,
    Inspection,
}

impl ServiceType {
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Maintenance,
        ServiceType::Repair,
        ServiceType::Installation,
        ServiceType::Emergency,
        ServiceType::Inspection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Maintenance => "Maintenance",
            ServiceType::Repair => "Repair",
            ServiceType::Installation => "Installation",
            ServiceType::Emergency => "Emergency",
            ServiceType::Inspection => "Inspection",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub service_call_id: i64,
    pub customer_id: i64,
    pub technician_id: i64,
    pub equipment_id: i64,
    pub service_date: NaiveDate,
    pub service_type: ServiceType,
    pub duration_hours: f64,
    pub labor_cost: Money,
    pub parts_cost: Money,
    pub total_cost: Money,
}

impl Record for ServiceCall {
    const TABLE: TableName = TableName::ServiceCalls;
    const COLUMNS: &'static [&'static str] = &[
        "service_call_id",
        "customer_id",
        "technician_id",
        "equipment_id",
        "service_date",
        "service_type",
        "duration_hours",
        "labor_cost",
        "parts_cost",
        "total_cost",
    ];

    fn key(&self) -> i64 {
        self.service_call_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.service_call_id.into(),
            self.customer_id.into(),
            self.technician_id.into(),
            self.equipment_id.into(),
            self.service_date.into(),
            self.service_type.as_str().into(),
            self.duration_hours.into(),
            self.labor_cost.into(),
            self.parts_cost.into(),
            self.total_cost.into(),
        ]
    }
}

/// Service visits. Labor is billed at a per-call rate of 50..=100 an hour.
pub fn generate_service_calls(
    random: &mut RandomSource,
    first_id: i64,
    keys: &KeyPool,
    count: usize,
    dated: DateWindow,
) -> Vec<ServiceCall> {
    let parents = [
        TableName::Customers,
        TableName::Technicians,
        TableName::EquipmentTypes,
    ];
    if keys.any_empty(&parents) {
        return Vec::new();
    }

    let mut calls = Vec::with_capacity(count);
    for i in 0..count as i64 {
        let (Some(customer_id), Some(technician_id), Some(equipment_id)) = (
            keys.pick(TableName::Customers, random.rng()),
            keys.pick(TableName::Technicians, random.rng()),
            keys.pick(TableName::EquipmentTypes, random.rng()),
        ) else {
            break;
        };
        let service_date = random.date_in(dated);
        let service_type = random.pick(&ServiceType::ALL);
        let duration_hours = round1(random.uniform(1.0, 8.0));
        let rate = random.int(50, 100) as f64;
        let labor_cost = Money::from_dollars(duration_hours * rate);
        let parts_cost = Money::from_dollars(random.uniform(0.0, 300.0));

        calls.push(ServiceCall {
            service_call_id: first_id + i,
            customer_id,
            technician_id,
            equipment_id,
            service_date,
            service_type,
            duration_hours,
            labor_cost,
            parts_cost,
            total_cost: labor_cost + parts_cost,
        });
    }
    calls
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartsUsage {
    pub usage_id: i64,
    pub service_call_id: i64,
    pub part_id: i64,
    pub quantity_used: i64,
    pub usage_date: NaiveDate,
}

impl Record for PartsUsage {
    const TABLE: TableName = TableName::PartsUsage;
    const COLUMNS: &'static [&'static str] = &[
        "usage_id",
        "service_call_id",
        "part_id",
        "quantity_used",
        "usage_date",
    ];

    fn key(&self) -> i64 {
        self.usage_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.usage_id.into(),
            self.service_call_id.into(),
            self.part_id.into(),
            self.quantity_used.into(),
            self.usage_date.into(),
        ]
    }
}

/// Between zero and twice `avg_per_call` parts for every call, used on the
/// call's own date.
pub fn generate_parts_usage(
    random: &mut RandomSource,
    first_id: i64,
    calls: &[ServiceCall],
    keys: &KeyPool,
    avg_per_call: usize,
) -> Vec<PartsUsage> {
    if keys.any_empty(&[TableName::Parts]) {
        return Vec::new();
    }
    let mut usage = Vec::new();
    let mut next_id = first_id;
    for call in calls {
        let n_parts = random.int(0, 2 * avg_per_call as i64);
        for _ in 0..n_parts {
            let Some(part_id) = keys.pick(TableName::Parts, random.rng()) else {
                break;
            };
            usage.push(PartsUsage {
                usage_id: next_id,
                service_call_id: call.service_call_id,
                part_id,
                quantity_used: random.int(1, 5),
                usage_date: call.service_date,
            });
            next_id += 1;
        }
    }
    usage
}

const INCIDENT_TYPES: &[&str] = &[
    "No Heat/AC",
    "Gas Leak",
    "Electrical Issue",
    "Water Damage",
    "System Failure",
    "Carbon Monoxide Alert",
];
const SEVERITIES: &[&str] = &["Low", "Medium", "High", "Critical"];
const RESOLUTION_STATUSES: &[&str] = &["Resolved", "Pending", "Escalated", "Requires Follow-up"];

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentResponse {
    pub incident_id: i64,
    pub service_call_id: i64,
    pub incident_type: &'static str,
    pub severity_level: &'static str,
    pub reported_time: NaiveDateTime,
    pub response_time_minutes: i64,
    pub resolution_time_minutes: i64,
    pub responding_technician_id: i64,
    pub backup_technician_id: Option<i64>,
    pub resolution_status: &'static str,
    pub customer_satisfaction: i64,
    pub follow_up_required: bool,
}

impl Record for IncidentResponse {
    const TABLE: TableName = TableName::IncidentResponse;
    const COLUMNS: &'static [&'static str] = &[
        "incident_id",
        "service_call_id",
        "incident_type",
        "severity_level",
        "reported_time",
        "response_time_minutes",
        "resolution_time_minutes",
        "responding_technician_id",
        "backup_technician_id",
        "resolution_status",
        "customer_satisfaction",
        "follow_up_required",
    ];

    fn key(&self) -> i64 {
        self.incident_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.incident_id.into(),
            self.service_call_id.into(),
            self.incident_type.into(),
            self.severity_level.into(),
            self.reported_time.into(),
            self.response_time_minutes.into(),
            self.resolution_time_minutes.into(),
            self.responding_technician_id.into(),
            self.backup_technician_id.into(),
            self.resolution_status.into(),
            self.customer_satisfaction.into(),
            self.follow_up_required.into(),
        ]
    }
}

/// Incidents raised by emergency calls, walked in call order. At most one
/// incident per emergency call, so the count is capped by the emergencies.
pub fn generate_incidents(
    random: &mut RandomSource,
    first_id: i64,
    calls: &[ServiceCall],
    keys: &KeyPool,
    count: usize,
) -> Vec<IncidentResponse> {
    if keys.any_empty(&[TableName::Technicians]) {
        return Vec::new();
    }
    let emergencies: Vec<&ServiceCall> = calls
        .iter()
        .filter(|c| c.service_type == ServiceType::Emergency)
        .collect();
    let count = count.min(emergencies.len());

    (0..count)
        .map(|i| {
            let call = emergencies[i % emergencies.len()];
            IncidentResponse {
                incident_id: first_id + i as i64,
                service_call_id: call.service_call_id,
                incident_type: random.pick(INCIDENT_TYPES),
                severity_level: random.pick(SEVERITIES),
                reported_time: random.time_on(call.service_date),
                response_time_minutes: random.int(15, 240),
                resolution_time_minutes: random.int(30, 480),
                responding_technician_id: call.technician_id,
                backup_technician_id: random
                    .maybe(|r| keys.pick(TableName::Technicians, r.rng()))
                    .flatten(),
                resolution_status: random.pick(RESOLUTION_STATUSES),
                customer_satisfaction: random.int(1, 10),
                follow_up_required: random.coin(),
            }
        })
        .collect()
}

const APPOINTMENT_TYPES: &[&str] = &[
    "Maintenance",
    "Repair",
    "Installation",
    "Inspection",
    "Emergency",
    "Consultation",
];
const HISTORICAL_PRIORITIES: &[&str] = &["Low", "Medium", "High", "Emergency"];
const UPCOMING_PRIORITIES: &[&str] = &["Low", "Medium", "High"];
const UPCOMING_STATUSES: &[&str] = &["Scheduled", "Confirmed"];

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub appointment_id: i64,
    pub customer_id: i64,
    pub technician_id: i64,
    /// Set for appointments that already turned into a service call.
    pub service_call_id: Option<i64>,
    pub appointment_date: NaiveDate,
    pub scheduled_time: NaiveDateTime,
    pub appointment_type: &'static str,
    pub estimated_duration_hours: f64,
    pub status: &'static str,
    pub priority: &'static str,
    pub special_instructions: Option<String>,
    pub created_date: NaiveDateTime,
    pub confirmed_date: Option<NaiveDateTime>,
}

impl Record for Appointment {
    const TABLE: TableName = TableName::Appointments;
    const COLUMNS: &'static [&'static str] = &[
        "appointment_id",
        "customer_id",
        "technician_id",
        "service_call_id",
        "appointment_date",
        "scheduled_time",
        "appointment_type",
        "estimated_duration_hours",
        "status",
        "priority",
        "special_instructions",
        "created_date",
        "confirmed_date",
    ];

    fn key(&self) -> i64 {
        self.appointment_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.appointment_id.into(),
            self.customer_id.into(),
            self.technician_id.into(),
            self.service_call_id.into(),
            self.appointment_date.into(),
            self.scheduled_time.into(),
            self.appointment_type.into(),
            self.estimated_duration_hours.into(),
            self.status.into(),
            self.priority.into(),
            self.special_instructions.clone().into(),
            self.created_date.into(),
            self.confirmed_date.into(),
        ]
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// A completed appointment for every call, then upcoming appointments until
/// `count` is reached. With more calls than `count` there are no upcoming
/// appointments at all.
pub fn generate_appointments(
    random: &mut RandomSource,
    first_id: i64,
    calls: &[ServiceCall],
    keys: &KeyPool,
    count: usize,
) -> Vec<Appointment> {
    let today = random.today();
    let mut appointments = Vec::with_capacity(calls.len().max(count));
    let mut next_id = first_id;

    for call in calls {
        let scheduled_time = random.datetime_between(
            start_of(call.service_date - ChronoDuration::days(14)),
            start_of(call.service_date),
        );
        appointments.push(Appointment {
            appointment_id: next_id,
            customer_id: call.customer_id,
            technician_id: call.technician_id,
            service_call_id: Some(call.service_call_id),
            appointment_date: call.service_date,
            scheduled_time,
            appointment_type: call.service_type.as_str(),
            estimated_duration_hours: call.duration_hours,
            status: "Completed",
            priority: random.pick(HISTORICAL_PRIORITIES),
            special_instructions: random.maybe(RandomSource::sentence),
            created_date: scheduled_time - ChronoDuration::days(random.int(1, 7)),
            confirmed_date: random
                .maybe(|r| scheduled_time + ChronoDuration::hours(r.int(1, 48))),
        });
        next_id += 1;
    }

    let upcoming = count.saturating_sub(calls.len());
    if upcoming == 0 || keys.any_empty(&[TableName::Customers, TableName::Technicians]) {
        return appointments;
    }

    let ahead = DateWindow::next_days(today, 3 * DAYS_PER_MONTH);
    let booked = DateWindow::last_days(today, 14);
    let end_of_today = start_of(today) + ChronoDuration::seconds(86_399);
    for _ in 0..upcoming {
        let (Some(customer_id), Some(technician_id)) = (
            keys.pick(TableName::Customers, random.rng()),
            keys.pick(TableName::Technicians, random.rng()),
        ) else {
            break;
        };
        let appointment_date = random.date_in(ahead);
        let created_date = {
            let day = random.date_in(booked);
            random.time_on(day)
        };
        appointments.push(Appointment {
            appointment_id: next_id,
            customer_id,
            technician_id,
            service_call_id: None,
            appointment_date,
            scheduled_time: random.time_on(appointment_date),
            appointment_type: random.pick(APPOINTMENT_TYPES),
            estimated_duration_hours: round1(random.uniform(1.0, 6.0)),
            status: random.pick(UPCOMING_STATUSES),
            priority: random.pick(UPCOMING_PRIORITIES),
            special_instructions: random.maybe(RandomSource::sentence),
            created_date,
            confirmed_date: random.maybe(|r| r.datetime_between(created_date, end_of_today)),
        });
        next_id += 1;
    }
    appointments
}

const SAFETY_REQUIREMENTS: &[&str] = &[
    "Standard PPE",
    "Electrical Safety",
    "Confined Space",
    "Height Work",
];
const WORK_PRIORITIES: &[&str] = &["Low", "Medium", "High", "Emergency"];

#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrder {
    /// Same value as `service_call_id`.
    pub work_order_id: i64,
    pub service_call_id: i64,
    pub technician_id: i64,
    pub work_order_number: String,
    pub description: String,
    pub instructions: String,
    pub safety_requirements: &'static str,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub status: &'static str,
    pub priority: &'static str,
    pub completion_notes: String,
    pub customer_signature_required: bool,
}

impl Record for WorkOrder {
    const TABLE: TableName = TableName::WorkOrders;
    const COLUMNS: &'static [&'static str] = &[
        "work_order_id",
        "service_call_id",
        "technician_id",
        "work_order_number",
        "description",
        "instructions",
        "safety_requirements",
        "estimated_hours",
        "actual_hours",
        "status",
        "priority",
        "completion_notes",
        "customer_signature_required",
    ];

    fn key(&self) -> i64 {
        self.work_order_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.work_order_id.into(),
            self.service_call_id.into(),
            self.technician_id.into(),
            self.work_order_number.clone().into(),
            self.description.clone().into(),
            self.instructions.clone().into(),
            self.safety_requirements.into(),
            self.estimated_hours.into(),
            self.actual_hours.into(),
            self.status.into(),
            self.priority.into(),
            self.completion_notes.clone().into(),
            self.customer_signature_required.into(),
        ]
    }
}

/// One completed work order per call, sharing the call's id and technician.
pub fn generate_work_orders(random: &mut RandomSource, calls: &[ServiceCall]) -> Vec<WorkOrder> {
    calls
        .iter()
        .map(|call| WorkOrder {
            work_order_id: call.service_call_id,
            service_call_id: call.service_call_id,
            technician_id: call.technician_id,
            work_order_number: format!(
                "WO-{}-{:04}",
                call.service_date.year(),
                call.service_call_id
            ),
            description: random.text(300),
            instructions: random.text(200),
            safety_requirements: random.pick(SAFETY_REQUIREMENTS),
            estimated_hours: call.duration_hours,
            actual_hours: round2(call.duration_hours + random.uniform(-0.5, 1.0)),
            status: "Completed",
            priority: random.pick(WORK_PRIORITIES),
            completion_notes: random.text(150),
            customer_signature_required: random.coin(),
        })
        .collect()
}

const FEEDBACK_TYPES: &[&str] = &["Survey", "Review", "Complaint", "Compliment", "Suggestion"];
const FEEDBACK_SOURCES: &[&str] = &["Email Survey", "Phone Call", "Online Review", "In Person"];

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFeedback {
    pub feedback_id: i64,
    pub service_call_id: i64,
    pub customer_id: i64,
    pub feedback_date: NaiveDate,
    pub feedback_type: &'static str,
    pub overall_satisfaction: i64,
    pub technician_rating: i64,
    pub timeliness_rating: i64,
    pub quality_rating: i64,
    pub value_rating: i64,
    pub comments: String,
    pub would_recommend: bool,
    pub follow_up_required: bool,
    pub source: &'static str,
}

impl Record for CustomerFeedback {
    const TABLE: TableName = TableName::CustomerFeedback;
    const COLUMNS: &'static [&'static str] = &[
        "feedback_id",
        "service_call_id",
        "customer_id",
        "feedback_date",
        "feedback_type",
        "overall_satisfaction",
        "technician_rating",
        "timeliness_rating",
        "quality_rating",
        "value_rating",
        "comments",
        "would_recommend",
        "follow_up_required",
        "source",
    ];

    fn key(&self) -> i64 {
        self.feedback_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.feedback_id.into(),
            self.service_call_id.into(),
            self.customer_id.into(),
            self.feedback_date.into(),
            self.feedback_type.into(),
            self.overall_satisfaction.into(),
            self.technician_rating.into(),
            self.timeliness_rating.into(),
            self.quality_rating.into(),
            self.value_rating.into(),
            self.comments.clone().into(),
            self.would_recommend.into(),
            self.follow_up_required.into(),
            self.source.into(),
        ]
    }
}

/// Feedback on a sample of distinct calls, left 1..=14 days after the visit
/// by the customer who booked it.
pub fn generate_feedback(
    random: &mut RandomSource,
    first_id: i64,
    calls: &[ServiceCall],
    count: usize,
) -> Vec<CustomerFeedback> {
    let sampled = random.sample_indices(calls.len(), count);
    sampled
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let call = &calls[idx];
            CustomerFeedback {
                feedback_id: first_id + i as i64,
                service_call_id: call.service_call_id,
                customer_id: call.customer_id,
                feedback_date: call.service_date + ChronoDuration::days(random.int(1, 14)),
                feedback_type: random.pick(FEEDBACK_TYPES),
                overall_satisfaction: random.int(1, 10),
                technician_rating: random.int(1, 10),
                timeliness_rating: random.int(1, 10),
                quality_rating: random.int(1, 10),
                value_rating: random.int(1, 10),
                comments: random.text(250),
                would_recommend: random.coin(),
                follow_up_required: random.coin(),
                source: random.pick(FEEDBACK_SOURCES),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn random() -> RandomSource {
        RandomSource::new(42, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn base_keys() -> KeyPool {
        let mut keys = KeyPool::new();
        keys.extend(TableName::Customers, 1..=50);
        keys.extend(TableName::Technicians, 1..=5);
        keys.extend(TableName::EquipmentTypes, 1..=10);
        keys.extend(TableName::Parts, 1..=20);
        keys
    }

    fn calls(random: &mut RandomSource, count: usize) -> Vec<ServiceCall> {
        let dated = DateWindow::last_days(random.today(), DAYS_PER_YEAR);
        generate_service_calls(random, 1, &base_keys(), count, dated)
    }

    #[test]
    fn test_service_call_total_is_exact() {
        let mut random = random();
        for call in calls(&mut random, 500) {
            assert_eq!(call.total_cost, call.labor_cost + call.parts_cost);
            assert!((1.0..=8.0).contains(&call.duration_hours));
        }
    }

    #[test]
    fn test_service_calls_need_every_parent() {
        let mut random = random();
        let mut keys = KeyPool::new();
        keys.extend(TableName::Customers, 1..=50);
        keys.extend(TableName::EquipmentTypes, 1..=10);
        let dated = DateWindow::last_days(random.today(), 30);
        assert!(generate_service_calls(&mut random, 1, &keys, 10, dated).is_empty());
    }

    #[test]
    fn test_installed_device_warranty() {
        let mut random = random();
        let devices = generate_installed_devices(&mut random, 1, &base_keys(), 200);
        assert_eq!(devices.len(), 200);
        for d in &devices {
            let days = (d.warranty_end_date - d.installation_date).num_days();
            assert!(WARRANTY_MONTHS.iter().any(|m| m * DAYS_PER_MONTH == days));
            if let Some(maintained) = d.last_maintenance_date {
                assert!(maintained >= d.installation_date);
            }
        }
    }

    #[test]
    fn test_parts_usage_follows_call_dates() {
        let mut random = random();
        let calls = calls(&mut random, 100);
        let usage = generate_parts_usage(&mut random, 1, &calls, &base_keys(), 2);

        let ids: Vec<i64> = usage.iter().map(|u| u.usage_id).collect();
        assert_eq!(ids, (1..=usage.len() as i64).collect::<Vec<_>>());
        for u in &usage {
            let call = calls
                .iter()
                .find(|c| c.service_call_id == u.service_call_id)
                .unwrap();
            assert_eq!(u.usage_date, call.service_date);
            assert!((1..=20).contains(&u.part_id));
        }
        for call in &calls {
            let per_call = usage
                .iter()
                .filter(|u| u.service_call_id == call.service_call_id)
                .count();
            assert!(per_call <= 4);
        }
    }

    #[test]
    fn test_incidents_only_for_emergencies() {
        let mut random = random();
        let calls = calls(&mut random, 300);
        let emergencies = calls
            .iter()
            .filter(|c| c.service_type == ServiceType::Emergency)
            .count();
        let incidents = generate_incidents(&mut random, 1, &calls, &base_keys(), 1_000);

        assert_eq!(incidents.len(), emergencies);
        for incident in &incidents {
            let call = calls
                .iter()
                .find(|c| c.service_call_id == incident.service_call_id)
                .unwrap();
            assert_eq!(call.service_type, ServiceType::Emergency);
            assert_eq!(incident.responding_technician_id, call.technician_id);
            assert_eq!(incident.reported_time.date(), call.service_date);
        }
    }

    #[test]
    fn test_incidents_without_emergencies() {
        let mut random = random();
        let calls: Vec<ServiceCall> = calls(&mut random, 50)
            .into_iter()
            .filter(|c| c.service_type != ServiceType::Emergency)
            .collect();
        assert!(generate_incidents(&mut random, 1, &calls, &base_keys(), 10).is_empty());
    }

    #[test]
    fn test_appointments_historical_then_upcoming() {
        let mut random = random();
        let calls = calls(&mut random, 20);
        let appointments = generate_appointments(&mut random, 1, &calls, &base_keys(), 30);

        assert_eq!(appointments.len(), 30);
        for (appt, call) in appointments.iter().zip(&calls) {
            assert_eq!(appt.service_call_id, Some(call.service_call_id));
            assert_eq!(appt.customer_id, call.customer_id);
            assert_eq!(appt.appointment_date, call.service_date);
            assert_eq!(appt.status, "Completed");
            assert!(appt.scheduled_time.date() <= call.service_date);
        }
        for appt in &appointments[20..] {
            assert!(appt.service_call_id.is_none());
            assert!(appt.appointment_date >= random.today());
            assert!(UPCOMING_STATUSES.contains(&appt.status));
        }
    }

    #[test]
    fn test_appointments_never_fewer_than_calls() {
        let mut random = random();
        let calls = calls(&mut random, 40);
        let appointments = generate_appointments(&mut random, 101, &calls, &base_keys(), 10);
        assert_eq!(appointments.len(), 40);
        assert_eq!(appointments[0].appointment_id, 101);
    }

    #[test]
    fn test_work_orders_mirror_calls() {
        let mut random = random();
        let calls = calls(&mut random, 50);
        let orders = generate_work_orders(&mut random, &calls);

        assert_eq!(orders.len(), calls.len());
        for (order, call) in orders.iter().zip(&calls) {
            assert_eq!(order.work_order_id, call.service_call_id);
            assert_eq!(order.technician_id, call.technician_id);
            assert!(order
                .work_order_number
                .ends_with(&format!("-{:04}", call.service_call_id)));
            let delta = order.actual_hours - order.estimated_hours;
            assert!((-0.5 - 1e-9..=1.0 + 1e-9).contains(&delta));
        }
    }

    #[test]
    fn test_feedback_samples_distinct_calls() {
        let mut random = random();
        let calls = calls(&mut random, 30);
        let feedback = generate_feedback(&mut random, 1, &calls, 100);

        assert_eq!(feedback.len(), 30);
        let distinct: HashSet<i64> = feedback.iter().map(|f| f.service_call_id).collect();
        assert_eq!(distinct.len(), 30);
        for f in &feedback {
            let call = calls
                .iter()
                .find(|c| c.service_call_id == f.service_call_id)
                .unwrap();
            assert_eq!(f.customer_id, call.customer_id);
            let lag = (f.feedback_date - call.service_date).num_days();
            assert!((1..=14).contains(&lag));
        }
    }
}
