//! Run command
//!
//! Usage: tally run --db <PATH> [--customers N] [--seed S] [--json]
//!
//! Executes one load run in dependency order. Reference catalogs are
//! proposed in full and novelty-filtered; transactional batches are
//! generated from key ranges reported by the appends that precede them, so
//! children always reference committed parents.

use std::path::PathBuf;

use clap::Args;
use tally_core::{AppendController, AppendOutcome, RunReport, Warehouse};
use tally_core_types::{RunId, TableId};
use tally_store::SqliteWarehouse;
use tally_synth::{schemas, Generator};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the SQLite warehouse file (must be initialized, see `tally init`)
    #[arg(long, default_value = "tally.db")]
    pub db: PathBuf,

    /// Number of new customers to generate this run
    #[arg(long, default_value_t = 25)]
    pub customers: u64,

    /// RNG seed for reproducible runs (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Execute one load run end to end
pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = tally_store::db::open(&args.db)?;
    tally_store::db::configure(&conn)?;
    let mut warehouse = SqliteWarehouse::new(conn);

    let mut generator = match args.seed {
        Some(seed) => Generator::new(seed),
        None => Generator::from_entropy(),
    };

    let run_id = RunId::new();
    let controller = AppendController::new(run_id.clone());
    let mut report = RunReport::new(run_id);

    // Reference catalogs first
    report.push(controller.append_reference(
        &mut warehouse,
        &TableId::new(schemas::PRODUCTS),
        schemas::PRODUCT_BUSINESS_KEY,
        &generator.product_catalog(),
    )?);
    report.push(controller.append_reference(
        &mut warehouse,
        &TableId::new(schemas::PLANS),
        schemas::PLAN_BUSINESS_KEY,
        &generator.plan_catalog(),
    )?);
    report.push(controller.append_reference(
        &mut warehouse,
        &TableId::new(schemas::DISCOUNTS),
        schemas::DISCOUNT_BUSINESS_KEY,
        &generator.discount_catalog(),
    )?);

    // Contiguous allocation from 1 makes "max key" the full set of valid
    // parent keys for sampling.
    let max_product = warehouse.max_key(&TableId::new(schemas::PRODUCTS))?.value();
    let max_plan = warehouse.max_key(&TableId::new(schemas::PLANS))?.value();
    let max_discount = warehouse.max_key(&TableId::new(schemas::DISCOUNTS))?.value();

    // Customers, then each child level from the range its parent reported
    let customers = controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::CUSTOMERS),
        &generator.customers(args.customers),
    )?;
    let customer_range = key_range_or_empty(&customers);
    report.push(customers);

    let subscriptions = controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::SUBSCRIPTIONS),
        &generator.subscriptions(customer_range, max_plan),
    )?;
    let subscription_range = key_range_or_empty(&subscriptions);
    report.push(subscriptions);

    let invoices = controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::INVOICES),
        &generator.invoices(subscription_range.clone()),
    )?;
    let invoice_range = key_range_or_empty(&invoices);
    report.push(invoices);

    report.push(controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::INVOICE_LINE_ITEMS),
        &generator.line_items(invoice_range.clone(), max_product),
    )?);
    report.push(controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::PAYMENTS),
        &generator.payments(invoice_range),
    )?);
    report.push(controller.append_transactional(
        &mut warehouse,
        &TableId::new(schemas::SUBSCRIPTION_DISCOUNTS),
        &generator.subscription_discounts(subscription_range, max_discount),
    )?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Inclusive key range of an append, or the canonical empty range
fn key_range_or_empty(outcome: &AppendOutcome) -> std::ops::RangeInclusive<u64> {
    match outcome.key_range() {
        Some((first, last)) => first.value()..=last.value(),
        None => 1..=0,
    }
}

fn print_summary(report: &RunReport) {
    println!("Run {}", report.run_id);
    for outcome in &report.outcomes {
        match outcome {
            AppendOutcome::Appended {
                table,
                first_key,
                rows,
            } => println!(
                "  {:<24} appended {:>5} rows (keys {}..={})",
                table.as_str(),
                rows,
                first_key,
                first_key.offset(rows.saturating_sub(1))
            ),
            AppendOutcome::Skipped { table, reason } => {
                println!("  {:<24} skipped ({})", table.as_str(), reason)
            }
        }
    }
    println!("Total rows appended: {}", report.rows_appended());
}
