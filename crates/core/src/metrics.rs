//! Impact metrics

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{analysis::TacticalAnalysis, items::AnnotatedItem};

/// Kilograms of CO2 avoided per unit of stock kept out of waste.
pub const CO2_KG_PER_UNIT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Litres of water avoided per unit of stock kept out of waste.
pub const WATER_LITRES_PER_UNIT: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Meals provided per donated unit.
pub const MEALS_PER_UNIT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Errors that can occur while summarising an analysis.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Revenue rows could not be added, usually because their currencies differ.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Headline figures for a tactical analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics<'a> {
    /// Units sold on flash sale or donated
    pub total_waste_prevented: u64,

    /// Revenue from flash sale rows only
    pub total_revenue_recovered: Money<'a, Currency>,

    /// Kilograms of CO2 avoided
    pub co2_saved: Decimal,

    /// Litres of water avoided
    pub water_saved: Decimal,

    /// Meals provided by donated stock, rounded down
    pub potential_meals: u64,
}

impl<'a> SummaryMetrics<'a> {
    /// Reduce an analysis to its headline figures.
    ///
    /// `currency` is used for the revenue total, which is zero when nothing goes on sale.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Money`] if a flash sale row is priced in a different currency.
    pub fn summarise(
        analysis: &TacticalAnalysis<'a>,
        currency: &'a Currency,
    ) -> Result<Self, MetricsError> {
        let flash_sale_stock = total_stock(analysis.flash_sale_items());
        let donation_stock = total_stock(analysis.donation_items());
        let total_waste_prevented = flash_sale_stock + donation_stock;

        let total_revenue_recovered = analysis.flash_sale_items().iter().try_fold(
            Money::from_minor(0, currency),
            |acc, item| acc.add(item.recovered_revenue()),
        )?;

        let prevented = Decimal::from(total_waste_prevented);

        let potential_meals = (Decimal::from(donation_stock) * MEALS_PER_UNIT)
            .floor()
            .to_u64()
            .unwrap_or(u64::MAX);

        Ok(Self {
            total_waste_prevented,
            total_revenue_recovered,
            co2_saved: prevented * CO2_KG_PER_UNIT,
            water_saved: prevented * WATER_LITRES_PER_UNIT,
            potential_meals,
        })
    }
}

fn total_stock(items: &[AnnotatedItem<'_>]) -> u64 {
    items.iter().map(|item| u64::from(item.current_stock())).sum()
}
