//! `analyse` subcommand

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use salvage::prelude::*;

use crate::config::analysis::AnalysisConfig;

/// Arguments for `analyse`.
#[derive(Debug, Args)]
pub struct AnalyseArgs {
    /// Inventory snapshot CSV
    #[arg(short, long)]
    pub inventory: PathBuf,
}

/// Load a snapshot, route every row and write the action report to `out`.
pub(crate) fn run(
    config: &AnalysisConfig,
    args: &AnalyseArgs,
    mut out: impl Write,
) -> Result<()> {
    let snapshot = load_snapshot_file(&args.inventory, config.currency).with_context(|| {
        format!(
            "failed to read inventory snapshot {}",
            args.inventory.display()
        )
    })?;

    let model = load_sell_through_model(&config.model_path);
    let today = config.today();

    let start = Instant::now();

    let analysis = analyse(&snapshot.items, today, model.as_ref());
    let metrics = SummaryMetrics::summarise(&analysis, config.currency)?;

    let elapsed = start.elapsed();

    info!(
        rows = snapshot.items.len(),
        rejected = snapshot.rejected.len(),
        elapsed_us = elapsed.as_micros(),
        "analysed inventory snapshot"
    );

    ActionReport::new(&analysis, &metrics).write_to(&mut out)?;

    if !snapshot.rejected.is_empty() {
        writeln!(out, " Skipped {} invalid rows:", snapshot.rejected.len())?;

        for rejected in &snapshot.rejected {
            writeln!(out, "   {rejected}")?;
        }

        writeln!(out)?;
    }

    writeln!(
        out,
        " {} rows as of {today} ({})",
        snapshot.items.len(),
        elapsed.human(Truncate::Nano)
    )?;

    Ok(())
}

/// Run against stdout.
pub(crate) fn run_to_stdout(config: &AnalysisConfig, args: &AnalyseArgs) -> Result<()> {
    let stdout = io::stdout();

    run(config, args, stdout.lock())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jiff::civil::date;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    const SNAPSHOT: &str = "\
product_id,product_name,category,avg_daily_sales,current_stock,expiry_date,price
105,Artisan Bread,Bakery,40,30,2026-10-20,5.50
101,Chicken Breast,Meat,25,180,2026-10-22,12.50
106,Greek Yogurt,Dairy,70,-4,2026-10-25,2.50
";

    fn config(model_path: PathBuf) -> AnalysisConfig {
        AnalysisConfig {
            model_path,
            currency: USD,
            today: Some(date(2026, 10, 19)),
        }
    }

    #[test]
    fn writes_report_with_model() -> TestResult {
        let dir = tempfile::tempdir()?;
        let inventory = dir.path().join("snapshot.csv");

        fs::write(&inventory, SNAPSHOT)?;

        let mut out = Vec::new();

        run(
            &config(PathBuf::from("../core/fixtures/models/daily.yml")),
            &AnalyseArgs { inventory },
            &mut out,
        )?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Chicken Breast"), "{text}");
        assert!(text.contains("75%"), "{text}");
        assert!(text.contains("Artisan Bread"), "{text}");
        assert!(text.contains("Skipped 1 invalid rows"), "{text}");
        assert!(text.contains("line 4 (106)"), "{text}");

        Ok(())
    }

    #[test]
    fn missing_model_still_reports_donations() -> TestResult {
        let dir = tempfile::tempdir()?;
        let inventory = dir.path().join("snapshot.csv");

        fs::write(&inventory, SNAPSHOT)?;

        let mut out = Vec::new();

        run(
            &config(dir.path().join("no-model.yml")),
            &AnalyseArgs { inventory },
            &mut out,
        )?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("No items need marking down."), "{text}");
        assert!(text.contains("Artisan Bread"), "{text}");

        Ok(())
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let result = run(
            &config(PathBuf::from("no-model.yml")),
            &AnalyseArgs {
                inventory: PathBuf::from("does-not-exist.csv"),
            },
            io::sink(),
        );

        assert!(result.is_err(), "a missing snapshot must fail");
    }
}
