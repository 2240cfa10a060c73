//! Action report
//!
//! Renders a [`TacticalAnalysis`] and its [`SummaryMetrics`] as console tables: one for stock
//! to mark down, one for stock to donate, followed by the impact summary.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{analysis::TacticalAnalysis, items::AnnotatedItem, metrics::SummaryMetrics};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Console report for a tactical analysis.
#[derive(Debug, Clone, Copy)]
pub struct ActionReport<'r, 'a> {
    analysis: &'r TacticalAnalysis<'a>,
    metrics: &'r SummaryMetrics<'a>,
}

impl<'r, 'a> ActionReport<'r, 'a> {
    /// Create a report over an analysis and the metrics derived from it.
    #[must_use]
    pub fn new(analysis: &'r TacticalAnalysis<'a>, metrics: &'r SummaryMetrics<'a>) -> Self {
        Self { analysis, metrics }
    }

    /// Write the flash sale table, the donation table and the impact summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "\n\x1b[1mFlash sale\x1b[0m")?;

        if self.analysis.flash_sale_items().is_empty() {
            writeln!(out, "  No items need marking down.")?;
        } else {
            let builder = flash_sale_rows(self.analysis.flash_sale_items());

            write_table(&mut out, builder, &[2, 4, 5, 6, 7])?;
        }

        writeln!(out, "\n\x1b[1mDonation\x1b[0m")?;

        if self.analysis.donation_items().is_empty() {
            writeln!(out, "  No items to donate.")?;
        } else {
            let builder = donation_rows(self.analysis.donation_items());

            write_table(&mut out, builder, &[2, 4])?;
        }

        write_summary(&mut out, self.metrics)
    }
}

fn flash_sale_rows(items: &[AnnotatedItem<'_>]) -> Builder {
    let mut builder = Builder::default();

    builder.push_record([
        "Product",
        "Category",
        "Stock",
        "Expiry",
        "Days Left",
        "Discount",
        "Unit Price",
        "Recovered",
    ]);

    for annotated in items {
        let item = annotated.item();

        builder.push_record([
            item.product_name.clone(),
            item.category.clone(),
            item.current_stock.to_string(),
            item.expiry_date.to_string(),
            annotated.days_until_expiry().to_string(),
            annotated.discount().to_string(),
            money_cell(&item.price),
            money_cell(&annotated.recovered_revenue()),
        ]);
    }

    builder
}

fn donation_rows(items: &[AnnotatedItem<'_>]) -> Builder {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Category", "Stock", "Expiry", "Days Left"]);

    for annotated in items {
        let item = annotated.item();

        builder.push_record([
            item.product_name.clone(),
            item.category.clone(),
            item.current_stock.to_string(),
            item.expiry_date.to_string(),
            annotated.days_until_expiry().to_string(),
        ]);
    }

    builder
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: &[usize],
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    for &column in right_aligned {
        table.modify(Columns::one(column), Alignment::right());
    }

    writeln!(out, "{table}")?;

    Ok(())
}

fn write_summary(
    out: &mut impl io::Write,
    metrics: &SummaryMetrics<'_>,
) -> Result<(), ReportError> {
    let waste = group_thousands(&metrics.total_waste_prevented.to_string());
    let meals = group_thousands(&metrics.potential_meals.to_string());

    let rows = [
        ("Waste prevented:", format!("{waste} units")),
        ("Revenue recovered:", money_cell(&metrics.total_revenue_recovered)),
        ("CO2 saved:", format!("{:.1} kg", metrics.co2_saved)),
        ("Water saved:", format!("{} L", format_whole(metrics.water_saved))),
        ("Potential meals:", format!("~{meals}")),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0);

    writeln!(out, "\n\x1b[1mImpact\x1b[0m")?;

    for (label, value) in rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}

/// Format money rounded to the currency's minor unit.
fn money_cell(money: &Money<'_, Currency>) -> String {
    let currency = money.currency();
    let rounded = money
        .amount()
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, currency).to_string()
}

/// Round to a whole number and group its digits in thousands.
fn format_whole(value: Decimal) -> String {
    group_thousands(&value.round().to_string())
}

/// Insert `,` between each group of three digits, e.g. `"13500"` becomes `"13,500"`.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(ch);
    }

    format!("{sign}{grouped}")
}
