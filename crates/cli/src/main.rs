//! Salvage command line
//!
//! Runs the markdown and donation analysis over an inventory snapshot CSV, or writes a
//! fixture set out as a sample snapshot.

use std::process;

use anyhow::Result;

use crate::config::{CliConfig, Command};

mod commands;
mod config;
mod observability;

/// Salvage entry point
pub fn main() {
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(source) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {source}");
        }

        process::exit(1);
    }

    if let Err(source) = run(config) {
        #[expect(clippy::print_stderr, reason = "final error report to the user")]
        {
            eprintln!("Error: {source:#}");
        }

        process::exit(1);
    }
}

fn run(config: CliConfig) -> Result<()> {
    match config.command {
        Command::Analyse(args) => commands::analyse::run_to_stdout(&config.analysis, &args),
        Command::Sample(args) => commands::sample::run(&config.analysis, &args),
    }
}
