//! `sample` subcommand

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Args;
use tracing::info;

use salvage::prelude::*;

use crate::config::analysis::AnalysisConfig;

/// Arguments for `sample`.
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Directory holding `products/`, `inventory/` and `models/`
    #[arg(long, default_value = "fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set name
    #[arg(short, long, default_value = "daily")]
    pub set: String,

    /// Where to write the snapshot CSV
    #[arg(short, long)]
    pub out: PathBuf,
}

/// Materialise a fixture set against the evaluation date and write it as CSV.
///
/// Snapshot prices carry no currency, so the set must be priced in the configured currency.
pub(crate) fn run(config: &AnalysisConfig, args: &SampleArgs) -> Result<()> {
    let fixture = Fixture::from_set_in(&args.fixtures, &args.set).with_context(|| {
        format!(
            "failed to load fixture set {} from {}",
            args.set,
            args.fixtures.display()
        )
    })?;

    let fixture_currency = fixture.currency()?;

    ensure!(
        fixture_currency == config.currency,
        "fixture set {} is priced in {}, but the configured currency is {}",
        args.set,
        fixture_currency.iso_alpha_code,
        config.currency.iso_alpha_code
    );

    let today = config.today();
    let items = fixture.snapshot(today)?;

    let file = File::create(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;

    write_snapshot_csv(&items, file)?;

    info!(
        set = %args.set,
        rows = items.len(),
        %today,
        path = %args.out.display(),
        "wrote sample snapshot"
    );

    Ok(())
}
