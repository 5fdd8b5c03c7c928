//! Customer-facing tables: customers, leads, the mailing list and service
//! subscriptions.

use chrono::{Duration as ChronoDuration, NaiveDate};

use crate::generate::foreign_key::KeyPool;
use crate::generate::random::{DateWindow, RandomSource, DAYS_PER_MONTH, DAYS_PER_YEAR};
use crate::generate::value::{Money, Value};
use crate::schema::types::{Record, TableName};

const CUSTOMER_TYPES: &[&str] = &["residential", "commercial"];

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
    pub address: String,
    pub phone: String,
    pub customer_type: &'static str,
    pub created_at: NaiveDate,
}

impl Record for Customer {
    const TABLE: TableName = TableName::Customers;
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "customer_name",
        "address",
        "phone",
        "customer_type",
        "created_at",
    ];

    fn key(&self) -> i64 {
        self.customer_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.customer_id.into(),
            self.customer_name.clone().into(),
            self.address.clone().into(),
            self.phone.clone().into(),
            self.customer_type.into(),
            self.created_at.into(),
        ]
    }
}

/// Half the customers are businesses, half are people.
pub fn generate_customers(
    random: &mut RandomSource,
    first_id: i64,
    count: usize,
    created: DateWindow,
) -> Vec<Customer> {
    (0..count as i64)
        .map(|i| Customer {
            customer_id: first_id + i,
            customer_name: if random.coin() {
                random.company()
            } else {
                random.person_name()
            },
            address: random.address(),
            phone: random.phone(),
            customer_type: random.pick(CUSTOMER_TYPES),
            created_at: random.date_in(created),
        })
        .collect()
}

const LEAD_SOURCES: &[&str] = &[
    "Website",
    "Referral",
    "Cold Call",
    "Trade Show",
    "Social Media",
    "Advertisement",
];
const LEAD_STATUSES: &[&str] = &["New", "Contacted", "Qualified", "Converted", "Lost", "Nurturing"];
const SERVICE_INTERESTS: &[&str] = &[
    "AC Repair",
    "Heating Repair",
    "Installation",
    "Maintenance",
    "Emergency Service",
];
const URGENCIES: &[&str] = &["Low", "Medium", "High"];

#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub lead_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub lead_source: &'static str,
    pub service_interest: &'static str,
    pub estimated_value: Money,
    pub urgency: &'static str,
    pub status: &'static str,
    pub created_date: NaiveDate,
    pub last_contact_date: Option<NaiveDate>,
    pub assigned_to: String,
    pub notes: String,
    pub conversion_probability: i64,
}

impl Record for Lead {
    const TABLE: TableName = TableName::Leads;
    const COLUMNS: &'static [&'static str] = &[
        "lead_id",
        "first_name",
        "last_name",
        "company_name",
        "phone",
        "email",
        "address",
        "lead_source",
        "service_interest",
        "estimated_value",
        "urgency",
        "status",
        "created_date",
        "last_contact_date",
        "assigned_to",
        "notes",
        "conversion_probability",
    ];

    fn key(&self) -> i64 {
        self.lead_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.lead_id.into(),
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.company_name.clone().into(),
            self.phone.clone().into(),
            self.email.clone().into(),
            self.address.clone().into(),
            self.lead_source.into(),
            self.service_interest.into(),
            self.estimated_value.into(),
            self.urgency.into(),
            self.status.into(),
            self.created_date.into(),
            self.last_contact_date.into(),
            self.assigned_to.clone().into(),
            self.notes.clone().into(),
            self.conversion_probability.into(),
        ]
    }
}

/// Sales prospects created within the last year. Leads reference nothing.
pub fn generate_leads(random: &mut RandomSource, first_id: i64, count: usize) -> Vec<Lead> {
    let created_window = DateWindow::last_days(random.today(), DAYS_PER_YEAR);
    (0..count as i64)
        .map(|i| {
            let created_date = random.date_in(created_window);
            Lead {
                lead_id: first_id + i,
                first_name: random.first_name(),
                last_name: random.last_name(),
                company_name: random.maybe(RandomSource::company),
                phone: random.phone(),
                email: random.email(),
                address: random.address(),
                lead_source: random.pick(LEAD_SOURCES),
                service_interest: random.pick(SERVICE_INTERESTS),
                estimated_value: Money::from_dollars(random.uniform(200.0, 5000.0)),
                urgency: random.pick(URGENCIES),
                status: random.pick(LEAD_STATUSES),
                created_date,
                last_contact_date: random.maybe(|r| r.date_since(created_date)),
                assigned_to: format!("Sales Rep {}", random.int(1, 5)),
                notes: random.text(200),
                conversion_probability: random.int(10, 90),
            }
        })
        .collect()
}

const CONTACT_SOURCES: &[&str] = &[
    "Website",
    "Referral",
    "Trade Show",
    "Social Media",
    "Direct Mail",
];
const SUBSCRIPTION_STATUSES: &[&str] = &["Subscribed", "Unsubscribed"];
const CONTACT_METHODS: &[&str] = &["Email", "Phone", "Mail"];
const INTERESTS: &[&str] = &[
    "Maintenance Tips",
    "Seasonal Offers",
    "New Products",
    "Energy Efficiency",
];

#[derive(Debug, Clone, PartialEq)]
pub struct MailingContact {
    pub contact_id: i64,
    pub customer_id: Option<i64>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub contact_source: &'static str,
    pub subscription_status: &'static str,
    pub subscription_date: NaiveDate,
    pub preferred_contact_method: &'static str,
    pub interests: &'static str,
}

impl Record for MailingContact {
    const TABLE: TableName = TableName::MailingList;
    const COLUMNS: &'static [&'static str] = &[
        "contact_id",
        "customer_id",
        "email",
        "first_name",
        "last_name",
        "phone",
        "address",
        "contact_source",
        "subscription_status",
        "subscription_date",
        "preferred_contact_method",
        "interests",
    ];

    fn key(&self) -> i64 {
        self.contact_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.contact_id.into(),
            self.customer_id.into(),
            self.email.clone().into(),
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.phone.clone().into(),
            self.address.clone().into(),
            self.contact_source.into(),
            self.subscription_status.into(),
            self.subscription_date.into(),
            self.preferred_contact_method.into(),
            self.interests.into(),
        ]
    }
}

/// Split a customer name into first and last name. Single-word names (most
/// company names are not) keep the whole name as the first name.
fn split_name(name: &str) -> (String, String) {
    let mut words = name.split_whitespace();
    match (words.next(), words.next_back()) {
        (Some(first), Some(last)) => (first.to_string(), last.to_string()),
        _ => (name.to_string(), String::new()),
    }
}

/// One contact per existing customer, followed by `prospects` contacts with
/// no customer behind them.
pub fn generate_mailing_list(
    random: &mut RandomSource,
    first_id: i64,
    customers: &[Customer],
    prospects: usize,
) -> Vec<MailingContact> {
    let today = random.today();
    let mut contacts = Vec::with_capacity(customers.len() + prospects);
    let mut next_id = first_id;

    for customer in customers {
        let (first_name, last_name) = split_name(&customer.customer_name);
        contacts.push(MailingContact {
            contact_id: next_id,
            customer_id: Some(customer.customer_id),
            email: random.email(),
            first_name,
            last_name,
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            contact_source: "Existing Customer",
            subscription_status: random.pick(SUBSCRIPTION_STATUSES),
            subscription_date: random.date_in(DateWindow::last_days(today, 2 * DAYS_PER_YEAR)),
            preferred_contact_method: random.pick(CONTACT_METHODS),
            interests: random.pick(INTERESTS),
        });
        next_id += 1;
    }

    for _ in 0..prospects {
        contacts.push(MailingContact {
            contact_id: next_id,
            customer_id: None,
            email: random.email(),
            first_name: random.first_name(),
            last_name: random.last_name(),
            phone: random.phone(),
            address: random.address(),
            contact_source: random.pick(CONTACT_SOURCES),
            subscription_status: random.pick(SUBSCRIPTION_STATUSES),
            subscription_date: random.date_in(DateWindow::last_days(today, DAYS_PER_YEAR)),
            preferred_contact_method: random.pick(CONTACT_METHODS),
            interests: random.pick(INTERESTS),
        });
        next_id += 1;
    }

    contacts
}

/// Service plans and their annual price in dollars.
const SERVICE_PLANS: &[(&str, i64)] = &[
    ("Basic", 120),
    ("Premium", 200),
    ("Comprehensive", 350),
    ("Commercial", 500),
];
const CONTRACT_MONTHS: &[i64] = &[12, 24, 36];
const PAYMENT_FREQUENCIES: &[&str] = &["Monthly", "Quarterly", "Annual"];
const CONTRACT_STATUSES: &[&str] = &["Active", "Expired", "Cancelled", "Suspended"];
const SERVICES_INCLUDED: &[&str] = &[
    "Seasonal Tune-ups, Priority Service",
    "Bi-annual Maintenance, Parts Discount",
    "Quarterly Inspections, Emergency Service",
    "Monthly Monitoring, Full Coverage",
];
const DISCOUNTS: &[i64] = &[0, 5, 10, 15, 20];

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub subscription_id: i64,
    pub customer_id: i64,
    pub service_plan: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub annual_cost: Money,
    pub payment_frequency: &'static str,
    pub status: &'static str,
    pub auto_renewal: bool,
    pub services_included: &'static str,
    pub discount_percentage: i64,
    pub next_service_date: Option<NaiveDate>,
}

impl Record for Subscription {
    const TABLE: TableName = TableName::Subscriptions;
    const COLUMNS: &'static [&'static str] = &[
        "subscription_id",
        "customer_id",
        "service_plan",
        "start_date",
        "end_date",
        "annual_cost",
        "payment_frequency",
        "status",
        "auto_renewal",
        "services_included",
        "discount_percentage",
        "next_service_date",
    ];

    fn key(&self) -> i64 {
        self.subscription_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.subscription_id.into(),
            self.customer_id.into(),
            self.service_plan.into(),
            self.start_date.into(),
            self.end_date.into(),
            self.annual_cost.into(),
            self.payment_frequency.into(),
            self.status.into(),
            self.auto_renewal.into(),
            self.services_included.into(),
            self.discount_percentage.into(),
            self.next_service_date.into(),
        ]
    }
}

/// Service contracts of 12, 24 or 36 months.
pub fn generate_subscriptions(
    random: &mut RandomSource,
    first_id: i64,
    keys: &KeyPool,
    count: usize,
) -> Vec<Subscription> {
    if keys.any_empty(&[TableName::Customers]) {
        return Vec::new();
    }
    let today = random.today();

    let mut subscriptions = Vec::with_capacity(count);
    for i in 0..count as i64 {
        let Some(customer_id) = keys.pick(TableName::Customers, random.rng()) else {
            break;
        };
        let start_date = random.date_in(DateWindow::last_days(today, 2 * DAYS_PER_YEAR));
        let (service_plan, annual_dollars) = random.pick(SERVICE_PLANS);
        let contract_months = random.pick(CONTRACT_MONTHS);

        subscriptions.push(Subscription {
            subscription_id: first_id + i,
            customer_id,
            service_plan,
            start_date,
            end_date: start_date + ChronoDuration::days(contract_months * DAYS_PER_MONTH),
            annual_cost: Money::from_cents(annual_dollars * 100),
            payment_frequency: random.pick(PAYMENT_FREQUENCIES),
            status: random.pick(CONTRACT_STATUSES),
            auto_renewal: random.coin(),
            services_included: random.pick(SERVICES_INCLUDED),
            discount_percentage: random.pick(DISCOUNTS),
            next_service_date: random
                .maybe(|r| r.date_in(DateWindow::next_days(today, 6 * DAYS_PER_MONTH))),
        });
    }
    subscriptions
}
