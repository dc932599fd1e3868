//! Status command
//!
//! Usage: tally status --db <PATH>

use std::path::PathBuf;

use clap::Args;
use tally_core::Warehouse;
use tally_store::SqliteWarehouse;
use tally_synth::schemas;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Path to the SQLite warehouse file
    #[arg(long, default_value = "tally.db")]
    pub db: PathBuf,
}

/// Print row counts and max keys per table
pub fn execute(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = tally_store::db::open(&args.db)?;
    let warehouse = SqliteWarehouse::new(conn);

    println!("{:<24} {:>10} {:>10}", "table", "rows", "max_key");
    for schema in schemas::all() {
        let rows = warehouse.row_count(&schema.table)?;
        let max_key = warehouse.max_key(&schema.table)?;
        println!("{:<24} {:>10} {:>10}", schema.table.as_str(), rows, max_key);
    }
    Ok(())
}
