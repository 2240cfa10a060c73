//! Command line configuration

use clap::{Parser, Subcommand};

use crate::{
    commands::{analyse::AnalyseArgs, sample::SampleArgs},
    config::{analysis::AnalysisConfig, logging::LoggingConfig},
};

pub(crate) mod analysis;
pub(crate) mod logging;

/// Salvage command line configuration
#[derive(Debug, Parser)]
#[command(
    name = "salvage",
    about = "Plan markdowns and donations for perishable stock",
    long_about = None
)]
pub struct CliConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Analysis settings shared by every subcommand.
    #[command(flatten)]
    pub analysis: AnalysisConfig,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse an inventory snapshot and print the action report
    Analyse(AnalyseArgs),

    /// Write a fixture set out as an inventory snapshot CSV
    Sample(SampleArgs),
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
