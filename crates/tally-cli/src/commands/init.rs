//! Init command
//!
//! Usage: tally init --db <PATH>

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path to the SQLite warehouse file (created if absent)
    #[arg(long, default_value = "tally.db")]
    pub db: PathBuf,
}

/// Provision every billing table
pub fn execute(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = tally_store::db::open(&args.db)?;
    tally_store::db::configure(&conn)?;

    for schema in tally_synth::schemas::all() {
        tally_store::provision(&conn, &schema)?;
        println!("Provisioned {}", schema.table);
    }
    Ok(())
}
