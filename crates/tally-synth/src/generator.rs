//! Candidate row generation
//!
//! Reference catalogs are fixed sets proposed in full on every run - the
//! controller's novelty check decides what actually lands. Transactional
//! batches are randomized but always reference parent keys the caller
//! obtained from committed appends, so foreign keys never dangle.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tally_core_types::{Row, Value};

const COMPANY_STEMS: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbra", "Vertex", "Lumon", "Hooli", "Stark", "Wayne",
    "Tyrell", "Cyberdyne", "Aperture",
];
const COMPANY_SUFFIXES: &[&str] = &["Systems", "Labs", "Industries", "Software", "Analytics", "Cloud"];
const SEGMENTS: &[&str] = &["self-serve", "mid-market", "enterprise"];
const COUNTRIES: &[&str] = &["US", "GB", "DE", "FR", "NL", "SE", "AU", "CA", "JP", "BR"];
const PAYMENT_METHODS: &[&str] = &["card", "ach", "wire", "paypal"];
const INVOICE_STATUSES: &[&str] = &["paid", "open", "past_due"];

/// Synthetic billing data producer
///
/// Seedable so a run can be reproduced exactly.
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    /// Create a generator with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Full product catalog (reference candidates, proposed every run)
    pub fn product_catalog(&self) -> Vec<Row> {
        let items: &[(&str, &str, f64)] = &[
            ("Core Platform", "platform", 99.0),
            ("Analytics Add-on", "addon", 39.0),
            ("API Access", "addon", 29.0),
            ("Priority Support", "support", 149.0),
            ("Data Export", "addon", 19.0),
            ("Audit Trail", "compliance", 59.0),
        ];
        items
            .iter()
            .map(|(name, category, price)| {
                Row::new()
                    .with("product_name", *name)
                    .with("category", *category)
                    .with("list_price", *price)
            })
            .collect()
    }

    /// Full plan catalog (reference candidates, proposed every run)
    pub fn plan_catalog(&self) -> Vec<Row> {
        let items: &[(&str, &str, f64, Option<i64>)] = &[
            ("Starter", "monthly", 29.0, Some(5)),
            ("Growth", "monthly", 99.0, Some(25)),
            ("Scale", "monthly", 299.0, Some(100)),
            ("Enterprise", "annual", 999.0, None),
        ];
        items
            .iter()
            .map(|(name, period, price, seats)| {
                let row = Row::new()
                    .with("plan_name", *name)
                    .with("billing_period", *period)
                    .with("monthly_price", *price);
                match seats {
                    Some(limit) => row.with("seat_limit", *limit),
                    None => row.with("seat_limit", Value::Null),
                }
            })
            .collect()
    }

    /// Full discount catalog (reference candidates, proposed every run)
    pub fn discount_catalog(&self) -> Vec<Row> {
        let items: &[(&str, f64)] = &[
            ("WELCOME10", 10.0),
            ("ANNUAL20", 20.0),
            ("PARTNER15", 15.0),
            ("FOUNDER50", 50.0),
        ];
        items
            .iter()
            .map(|(code, percent)| {
                Row::new()
                    .with("discount_code", *code)
                    .with("percent_off", *percent)
                    .with("expires_at", Value::Null)
            })
            .collect()
    }

    /// A batch of new customers
    pub fn customers(&mut self, count: u64) -> Vec<Row> {
        (0..count)
            .map(|_| {
                let name = format!(
                    "{} {}",
                    self.pick(COMPANY_STEMS),
                    self.pick(COMPANY_SUFFIXES)
                );
                let segment = self.pick(SEGMENTS).to_string();
                let country = self.pick(COUNTRIES).to_string();
                let signed_up_at = self.recent_timestamp(365);
                Row::new()
                    .with("company_name", name)
                    .with("segment", segment)
                    .with("country", country)
                    .with("signed_up_at", signed_up_at)
            })
            .collect()
    }

    /// One subscription per customer key in `customer_keys`
    ///
    /// Plan keys are sampled from [1, max_plan_key]; keys 1..=max are valid
    /// because allocation is contiguous from 1.
    pub fn subscriptions(
        &mut self,
        customer_keys: RangeInclusive<u64>,
        max_plan_key: u64,
    ) -> Vec<Row> {
        if range_is_empty(&customer_keys) || max_plan_key == 0 {
            return Vec::new();
        }
        customer_keys
            .map(|customer_key| {
                let plan_key = self.rng.gen_range(1..=max_plan_key);
                let seats = self.rng.gen_range(1..=50i64);
                let started_at = self.recent_timestamp(180);
                Row::new()
                    .with("customer_key", customer_key as i64)
                    .with("plan_key", plan_key as i64)
                    .with("status", "active")
                    .with("seats", seats)
                    .with("started_at", started_at)
            })
            .collect()
    }

    /// One or two invoices per subscription key
    pub fn invoices(&mut self, subscription_keys: RangeInclusive<u64>) -> Vec<Row> {
        if range_is_empty(&subscription_keys) {
            return Vec::new();
        }
        let mut rows = Vec::new();
        for subscription_key in subscription_keys {
            let invoices = self.rng.gen_range(1..=2);
            for _ in 0..invoices {
                let issued_at = self.recent_timestamp(90);
                let total = self.money(20.0, 1500.0);
                let status = self.pick(INVOICE_STATUSES).to_string();
                rows.push(
                    Row::new()
                        .with("subscription_key", subscription_key as i64)
                        .with("issued_at", issued_at)
                        .with("total_amount", total)
                        .with("status", status),
                );
            }
        }
        rows
    }

    /// One to three line items per invoice key
    pub fn line_items(
        &mut self,
        invoice_keys: RangeInclusive<u64>,
        max_product_key: u64,
    ) -> Vec<Row> {
        if range_is_empty(&invoice_keys) || max_product_key == 0 {
            return Vec::new();
        }
        let mut rows = Vec::new();
        for invoice_key in invoice_keys {
            let items = self.rng.gen_range(1..=3);
            for _ in 0..items {
                let product_key = self.rng.gen_range(1..=max_product_key);
                let quantity = self.rng.gen_range(1..=10i64);
                let unit_price = self.money(9.0, 199.0);
                rows.push(
                    Row::new()
                        .with("invoice_key", invoice_key as i64)
                        .with("product_key", product_key as i64)
                        .with("quantity", quantity)
                        .with("unit_price", unit_price),
                );
            }
        }
        rows
    }

    /// A payment for roughly four out of five invoice keys
    pub fn payments(&mut self, invoice_keys: RangeInclusive<u64>) -> Vec<Row> {
        if range_is_empty(&invoice_keys) {
            return Vec::new();
        }
        let mut rows = Vec::new();
        for invoice_key in invoice_keys {
            if self.rng.gen_bool(0.8) {
                let paid_at = self.recent_timestamp(60);
                let amount = self.money(20.0, 1500.0);
                let method = self.pick(PAYMENT_METHODS).to_string();
                rows.push(
                    Row::new()
                        .with("invoice_key", invoice_key as i64)
                        .with("paid_at", paid_at)
                        .with("amount", amount)
                        .with("method", method),
                );
            }
        }
        rows
    }

    /// A discount link for roughly one in three subscription keys
    pub fn subscription_discounts(
        &mut self,
        subscription_keys: RangeInclusive<u64>,
        max_discount_key: u64,
    ) -> Vec<Row> {
        if range_is_empty(&subscription_keys) || max_discount_key == 0 {
            return Vec::new();
        }
        let mut rows = Vec::new();
        for subscription_key in subscription_keys {
            if self.rng.gen_bool(0.3) {
                let discount_key = self.rng.gen_range(1..=max_discount_key);
                let applied_at = self.recent_timestamp(180);
                rows.push(
                    Row::new()
                        .with("subscription_key", subscription_key as i64)
                        .with("discount_key", discount_key as i64)
                        .with("applied_at", applied_at),
                );
            }
        }
        rows
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.gen_range(0..items.len())]
    }

    fn recent_timestamp(&mut self, max_days_ago: i64) -> DateTime<Utc> {
        Utc::now() - Duration::days(self.rng.gen_range(0..max_days_ago))
    }

    /// Random amount rounded to cents
    fn money(&mut self, min: f64, max: f64) -> f64 {
        (self.rng.gen_range(min..max) * 100.0).round() / 100.0
    }
}

fn range_is_empty(range: &RangeInclusive<u64>) -> bool {
    range.start() > range.end()
}
