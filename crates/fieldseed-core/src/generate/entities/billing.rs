//! Money coming in: invoices for service calls, payments against invoices,
//! and quotes for prospective work.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

use crate::generate::entities::service::ServiceCall;
use crate::generate::foreign_key::KeyPool;
use crate::generate::random::{round1, DateWindow, RandomSource, DAYS_PER_MONTH};
use crate::generate::value::{Money, Value};
use crate::schema::types::{Record, TableName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Paid,
        InvoiceStatus::Pending,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }
}

const PAYMENT_TERMS: &[&str] = &["Net 15", "Net 30", "Due on Receipt", "Net 45"];
const DUE_DAYS: &[i64] = &[15, 30, 45];
const TAX_RATES: &[f64] = &[0.065, 0.075, 0.08, 0.085];

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub invoice_id: i64,
    pub invoice_number: String,
    pub service_call_id: i64,
    pub customer_id: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_terms: &'static str,
    pub subtotal: Money,
    pub tax_rate: f64,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl Record for Invoice {
    const TABLE: TableName = TableName::Invoices;
    const COLUMNS: &'static [&'static str] = &[
        "invoice_id",
        "invoice_number",
        "service_call_id",
        "customer_id",
        "issue_date",
        "due_date",
        "payment_terms",
        "subtotal",
        "tax_rate",
        "tax_amount",
        "total_amount",
        "status",
        "notes",
    ];

    fn key(&self) -> i64 {
        self.invoice_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.invoice_id.into(),
            self.invoice_number.clone().into(),
            self.service_call_id.into(),
            self.customer_id.into(),
            self.issue_date.into(),
            self.due_date.into(),
            self.payment_terms.into(),
            self.subtotal.into(),
            self.tax_rate.into(),
            self.tax_amount.into(),
            self.total_amount.into(),
            self.status.as_str().into(),
            self.notes.clone().into(),
        ]
    }
}

/// Invoices for a sample of distinct calls, billed to the call's customer.
///
/// The subtotal marks the call's total up by 10..30%; tax is computed on
/// the rounded subtotal.
pub fn generate_invoices(
    random: &mut RandomSource,
    first_id: i64,
    calls: &[ServiceCall],
    count: usize,
) -> Vec<Invoice> {
    let sampled = random.sample_indices(calls.len(), count);
    sampled
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let call = &calls[idx];
            let invoice_id = first_id + i as i64;
            let issue_date = call.service_date + ChronoDuration::days(random.int(0, 3));
            let due_date = issue_date + ChronoDuration::days(random.pick(DUE_DAYS));
            let subtotal = call.total_cost.scale(random.uniform(1.1, 1.3));
            let tax_rate = random.pick(TAX_RATES);
            let tax_amount = subtotal.scale(tax_rate);

            Invoice {
                invoice_id,
                invoice_number: format!("INV-{}-{:04}", issue_date.year(), invoice_id),
                service_call_id: call.service_call_id,
                customer_id: call.customer_id,
                issue_date,
                due_date,
                payment_terms: random.pick(PAYMENT_TERMS),
                subtotal,
                tax_rate,
                tax_amount,
                total_amount: subtotal + tax_amount,
                status: random.pick(&InvoiceStatus::ALL),
                notes: random.maybe(RandomSource::sentence),
            }
        })
        .collect()
}

const PAYMENT_METHODS: &[&str] = &[
    "Credit Card",
    "Check",
    "Cash",
    "ACH Transfer",
    "Online Payment",
];
const PARTIAL_STATUSES: &[&str] = &["Completed", "Pending"];

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub payment_id: i64,
    pub invoice_id: i64,
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub payment_method: &'static str,
    pub transaction_id: String,
    pub status: &'static str,
    pub processing_fee: Money,
    pub notes: Option<&'static str>,
}

impl Record for Payment {
    const TABLE: TableName = TableName::Payments;
    const COLUMNS: &'static [&'static str] = &[
        "payment_id",
        "invoice_id",
        "payment_date",
        "amount",
        "payment_method",
        "transaction_id",
        "status",
        "processing_fee",
        "notes",
    ];

    fn key(&self) -> i64 {
        self.payment_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.payment_id.into(),
            self.invoice_id.into(),
            self.payment_date.into(),
            self.amount.into(),
            self.payment_method.into(),
            self.transaction_id.clone().into(),
            self.status.into(),
            self.processing_fee.into(),
            self.notes.into(),
        ]
    }
}

/// Card and transfer fees, charged on about half the payments.
fn processing_fee(random: &mut RandomSource, amount: Money) -> Money {
    if random.coin() {
        amount.scale(random.uniform(0.02, 0.035))
    } else {
        Money::ZERO
    }
}

/// A partial payment strictly below the invoice total.
fn partial_amount(random: &mut RandomSource, total: Money) -> Money {
    let amount = total.scale(random.uniform(0.3, 0.8));
    if amount >= total && total > Money::ZERO {
        total - Money::from_cents(1)
    } else {
        amount
    }
}

/// Paid invoices get one full payment. Pending invoices get a partial
/// payment half of the time. Overdue and cancelled invoices get nothing.
pub fn generate_payments(
    random: &mut RandomSource,
    first_id: i64,
    invoices: &[Invoice],
) -> Vec<Payment> {
    let today = random.today();
    let mut payments = Vec::new();
    let mut next_id = first_id;

    for invoice in invoices {
        let payment = match invoice.status {
            InvoiceStatus::Paid => {
                let latest = invoice.due_date + ChronoDuration::days(30);
                let payment_date = random.date_in(DateWindow::new(invoice.issue_date, latest));
                let amount = invoice.total_amount;
                Payment {
                    payment_id: next_id,
                    invoice_id: invoice.invoice_id,
                    payment_date,
                    amount,
                    payment_method: random.pick(PAYMENT_METHODS),
                    transaction_id: random.bothify("TXN-########"),
                    status: "Completed",
                    processing_fee: processing_fee(random, amount),
                    notes: None,
                }
            }
            InvoiceStatus::Pending if random.coin() => {
                let amount = partial_amount(random, invoice.total_amount);
                let latest = invoice.issue_date.max(today);
                let payment_date = random.date_in(DateWindow::new(invoice.issue_date, latest));
                Payment {
                    payment_id: next_id,
                    invoice_id: invoice.invoice_id,
                    payment_date,
                    amount,
                    payment_method: random.pick(PAYMENT_METHODS),
                    transaction_id: random.bothify("TXN-########"),
                    status: random.pick(PARTIAL_STATUSES),
                    processing_fee: processing_fee(random, amount),
                    notes: Some("Partial payment"),
                }
            }
            _ => continue,
        };
        payments.push(payment);
        next_id += 1;
    }
    payments
}

const QUOTE_TYPES: &[&str] = &[
    "Repair",
    "Installation",
    "Replacement",
    "Maintenance Contract",
    "System Upgrade",
];
const QUOTE_STATUSES: &[&str] = &["Pending", "Accepted", "Declined", "Expired", "Revised"];

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub quote_id: i64,
    pub quote_number: String,
    pub customer_id: i64,
    /// Only quotes that include equipment name a model.
    pub equipment_id: Option<i64>,
    pub quote_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub quote_type: &'static str,
    pub description: String,
    pub labor_hours: f64,
    pub labor_rate: i64,
    pub labor_cost: Money,
    pub equipment_cost: Money,
    pub parts_cost: Money,
    pub total_amount: Money,
    pub status: &'static str,
    pub created_by: String,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Record for Quote {
    const TABLE: TableName = TableName::Quotes;
    const COLUMNS: &'static [&'static str] = &[
        "quote_id",
        "quote_number",
        "customer_id",
        "equipment_id",
        "quote_date",
        "valid_until",
        "quote_type",
        "description",
        "labor_hours",
        "labor_rate",
        "labor_cost",
        "equipment_cost",
        "parts_cost",
        "total_amount",
        "status",
        "created_by",
        "follow_up_date",
        "notes",
    ];

    fn key(&self) -> i64 {
        self.quote_id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.quote_id.into(),
            self.quote_number.clone().into(),
            self.customer_id.into(),
            self.equipment_id.into(),
            self.quote_date.into(),
            self.valid_until.into(),
            self.quote_type.into(),
            self.description.clone().into(),
            self.labor_hours.into(),
            self.labor_rate.into(),
            self.labor_cost.into(),
            self.equipment_cost.into(),
            self.parts_cost.into(),
            self.total_amount.into(),
            self.status.into(),
            self.created_by.clone().into(),
            self.follow_up_date.into(),
            self.notes.clone().into(),
        ]
    }
}

/// Quotes from the last six months. Half of them include equipment, and
/// only those reference an equipment model. With no equipment catalog no
/// quote includes equipment.
pub fn generate_quotes(
    random: &mut RandomSource,
    first_id: i64,
    keys: &KeyPool,
    count: usize,
) -> Vec<Quote> {
    if keys.any_empty(&[TableName::Customers]) {
        return Vec::new();
    }
    let dated = DateWindow::last_days(random.today(), 6 * DAYS_PER_MONTH);
    let has_equipment = keys.pool_size(TableName::EquipmentTypes) > 0;

    let mut quotes = Vec::with_capacity(count);
    for i in 0..count as i64 {
        let Some(customer_id) = keys.pick(TableName::Customers, random.rng()) else {
            break;
        };
        let quote_id = first_id + i;
        let quote_date = random.date_in(dated);
        let valid_until = quote_date + ChronoDuration::days(random.int(15, 45));

        let labor_hours = round1(random.uniform(2.0, 16.0));
        let labor_rate = random.int(75, 125);
        let labor_cost = Money::from_dollars(labor_hours * labor_rate as f64);
        let equipment_cost = if has_equipment {
            random
                .maybe(|r| Money::from_dollars(r.uniform(500.0, 8000.0)))
                .unwrap_or(Money::ZERO)
        } else {
            Money::ZERO
        };
        let parts_cost = Money::from_dollars(random.uniform(50.0, 1200.0));
        let total_amount =
            (labor_cost + equipment_cost + parts_cost).scale(random.uniform(1.1, 1.4));

        let equipment_id = if equipment_cost > Money::ZERO {
            keys.pick(TableName::EquipmentTypes, random.rng())
        } else {
            None
        };

        quotes.push(Quote {
            quote_id,
            quote_number: format!("QUO-{}-{:04}", quote_date.year(), quote_id),
            customer_id,
            equipment_id,
            quote_date,
            valid_until,
            quote_type: random.pick(QUOTE_TYPES),
            description: random.text(200),
            labor_hours,
            labor_rate,
            labor_cost,
            equipment_cost,
            parts_cost,
            total_amount,
            status: random.pick(QUOTE_STATUSES),
            created_by: format!("Sales Rep {}", random.int(1, 5)),
            follow_up_date: random
                .maybe(|r| quote_date + ChronoDuration::days(r.int(3, 14))),
            notes: random.maybe(RandomSource::sentence),
        });
    }
    quotes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::entities::service::generate_service_calls;
    use crate::generate::random::DAYS_PER_YEAR;
    use std::collections::HashSet;

    fn random() -> RandomSource {
        RandomSource::new(42, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn keys() -> KeyPool {
        let mut keys = KeyPool::new();
        keys.extend(TableName::Customers, 1..=50);
        keys.extend(TableName::Technicians, 1..=5);
        keys.extend(TableName::EquipmentTypes, 1..=10);
        keys
    }

    fn calls(random: &mut RandomSource, count: usize) -> Vec<ServiceCall> {
        let dated = DateWindow::last_days(random.today(), DAYS_PER_YEAR);
        generate_service_calls(random, 1, &keys(), count, dated)
    }

    #[test]
    fn test_invoice_arithmetic() {
        let mut random = random();
        let calls = calls(&mut random, 200);
        let invoices = generate_invoices(&mut random, 1, &calls, 170);

        assert_eq!(invoices.len(), 170);
        for inv in &invoices {
            assert_eq!(inv.total_amount, inv.subtotal + inv.tax_amount);
            assert_eq!(inv.tax_amount, Money::from_dollars(inv.subtotal.as_dollars() * inv.tax_rate));
            let call = calls
                .iter()
                .find(|c| c.service_call_id == inv.service_call_id)
                .unwrap();
            assert_eq!(inv.customer_id, call.customer_id);
            assert!(inv.subtotal >= call.total_cost.scale(1.1) - Money::from_cents(1));
            assert!(inv.subtotal <= call.total_cost.scale(1.3) + Money::from_cents(1));
            let lag = (inv.issue_date - call.service_date).num_days();
            assert!((0..=3).contains(&lag));
            assert!(DUE_DAYS.contains(&(inv.due_date - inv.issue_date).num_days()));
            assert!(inv.invoice_number.ends_with(&format!("-{:04}", inv.invoice_id)));
        }
    }

    #[test]
    fn test_invoices_cover_distinct_calls_and_clamp() {
        let mut random = random();
        let calls = calls(&mut random, 40);
        let invoices = generate_invoices(&mut random, 1, &calls, 100);
        assert_eq!(invoices.len(), 40);
        let distinct: HashSet<i64> = invoices.iter().map(|i| i.service_call_id).collect();
        assert_eq!(distinct.len(), 40);
    }

    #[test]
    fn test_payments_follow_invoice_status() {
        let mut random = random();
        let calls = calls(&mut random, 400);
        let invoices = generate_invoices(&mut random, 1, &calls, 400);
        let payments = generate_payments(&mut random, 1, &invoices);

        for inv in &invoices {
            let for_invoice: Vec<&Payment> = payments
                .iter()
                .filter(|p| p.invoice_id == inv.invoice_id)
                .collect();
            match inv.status {
                InvoiceStatus::Paid => {
                    assert_eq!(for_invoice.len(), 1);
                    let p = for_invoice[0];
                    assert_eq!(p.amount, inv.total_amount);
                    assert_eq!(p.status, "Completed");
                    assert!(p.payment_date >= inv.issue_date);
                    assert!(p.payment_date <= inv.due_date + ChronoDuration::days(30));
                }
                InvoiceStatus::Pending => {
                    assert!(for_invoice.len() <= 1);
                    if let Some(p) = for_invoice.first() {
                        assert!(p.amount < inv.total_amount);
                        assert_eq!(p.notes, Some("Partial payment"));
                    }
                }
                InvoiceStatus::Overdue | InvoiceStatus::Cancelled => {
                    assert!(for_invoice.is_empty());
                }
            }
        }
        let ids: Vec<i64> = payments.iter().map(|p| p.payment_id).collect();
        assert_eq!(ids, (1..=payments.len() as i64).collect::<Vec<_>>());
    }

    #[test]
    fn test_partial_amount_stays_below_total() {
        let mut random = random();
        for cents in [1, 2, 3, 10, 999, 123_456] {
            let total = Money::from_cents(cents);
            for _ in 0..50 {
                assert!(partial_amount(&mut random, total) < total);
            }
        }
    }

    #[test]
    fn test_quote_totals_and_equipment_link() {
        let mut random = random();
        let quotes = generate_quotes(&mut random, 1, &keys(), 300);

        assert_eq!(quotes.len(), 300);
        for q in &quotes {
            assert_eq!(q.equipment_id.is_some(), q.equipment_cost > Money::ZERO);
            assert_eq!(
                q.labor_cost,
                Money::from_dollars(q.labor_hours * q.labor_rate as f64)
            );
            let base = q.labor_cost + q.equipment_cost + q.parts_cost;
            assert!(q.total_amount >= base.scale(1.1) - Money::from_cents(1));
            assert!(q.total_amount <= base.scale(1.4) + Money::from_cents(1));
            let validity = (q.valid_until - q.quote_date).num_days();
            assert!((15..=45).contains(&validity));
        }
    }

    #[test]
    fn test_quotes_without_equipment_pool() {
        let mut random = random();
        let mut keys = KeyPool::new();
        keys.extend(TableName::Customers, 1..=5);
        let quotes = generate_quotes(&mut random, 1, &keys, 50);
        assert_eq!(quotes.len(), 50);
        assert!(quotes
            .iter()
            .all(|q| q.equipment_id.is_none() && q.equipment_cost == Money::ZERO));
    }
}
