//! Tally CLI
//!
//! Command-line driver for the billing warehouse loader

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(about = "Tally - append-only billing warehouse loader", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Provision all warehouse tables in a SQLite file
    Init(commands::init::InitArgs),
    /// Generate and load one run of billing data
    Run(commands::run::RunArgs),
    /// Show row counts and max keys per table
    Status(commands::status::StatusArgs),
}

fn main() {
    tally_core::logging::init(tally_core::logging::Profile::Development);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Run(args) => commands::run::execute(args),
        Commands::Status(args) => commands::status::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
