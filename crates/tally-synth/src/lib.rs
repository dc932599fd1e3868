//! Tally Synth - synthetic SaaS billing data
//!
//! Produces the candidate rows the load controller appends: slowly changing
//! reference catalogs (products, plans, discounts) and always-growing
//! transactional batches (customers, subscriptions, invoices, payments,
//! line items, subscription-discount links).
//!
//! The producer never assigns surrogate keys - that is the controller's job.
//! Foreign keys are wired from key ranges reported by earlier appends in the
//! same run, plus pre-existing parent keys, which is what keeps referential
//! integrity a property of generation order.

pub mod generator;
pub mod schemas;

pub use generator::Generator;
