//! Tiller CLI - schema migrations for the storefront database

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{doctor, logs, revert, status, up};

/// Tiller - schema migrations for the storefront database
#[derive(Parser)]
#[command(name = "tiller", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revert the most recently applied migrations
    Revert {
        /// Number of migrations to revert
        #[arg(long, default_value_t = 1)]
        steps: usize,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show applied and pending migrations
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run ledger and registry health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent runner events
    Logs {
        /// Maximum entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Only show events with errors
        #[arg(long)]
        errors: bool,
        /// Delete events older than this many days
        #[arg(long)]
        prune_days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Up { json } => up::run(json),
        Commands::Revert { steps, force, json } => revert::run(steps, force, json),
        Commands::Status { json } => status::run(json),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Logs {
            limit,
            errors,
            prune_days,
            json,
        } => logs::run(limit, errors, prune_days, json),
    }
}
