//! Analysis Config

use std::path::PathBuf;

use clap::Args;
use jiff::{Zoned, civil::Date};
use rusty_money::iso::Currency;
use salvage::pricing::parse_currency;

/// Settings shared by the analysis subcommands.
#[derive(Debug, Args)]
pub struct AnalysisConfig {
    /// Sell-through model artifact. Markdowns are disabled when it is missing or invalid.
    #[arg(
        long,
        env = "SALVAGE_MODEL_PATH",
        default_value = "models/sell-through.yml",
        global = true
    )]
    pub model_path: PathBuf,

    /// Currency snapshot prices are given in (GBP, USD, EUR)
    #[arg(
        long,
        env = "SALVAGE_CURRENCY",
        default_value = "USD",
        value_parser = currency_arg,
        global = true
    )]
    pub currency: &'static Currency,

    /// Evaluation date, YYYY-MM-DD (defaults to the current local date)
    #[arg(long, env = "SALVAGE_TODAY", global = true)]
    pub today: Option<Date>,
}

impl AnalysisConfig {
    /// The configured evaluation date, or today's local date.
    pub fn today(&self) -> Date {
        self.today.unwrap_or_else(|| Zoned::now().date())
    }
}

fn currency_arg(code: &str) -> Result<&'static Currency, String> {
    parse_currency(code).ok_or_else(|| format!("unsupported currency: {code}"))
}
