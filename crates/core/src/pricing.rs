//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::policy::DiscountTier;

/// Errors that can occur while parsing prices.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),

    /// The amount parsed but was zero or negative.
    #[error("price must be positive, got: {0}")]
    NotPositive(String),

    /// The amount does not fit in minor units.
    #[error("price out of range: {0}")]
    OutOfRange(String),

    /// The string was not in the `AMOUNT CURRENCY` format.
    #[error("expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// Unknown currency code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported ISO currency by its alphabetic code.
pub fn parse_currency(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Parse a bare decimal amount (e.g. `"12.50"`) as a positive price in `currency`.
///
/// # Errors
///
/// Returns an error if the amount is not a decimal, is not positive, or does not fit in
/// minor units.
pub fn parse_amount<'a>(
    s: &str,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PriceError> {
    let trimmed = s.trim();

    let amount = trimmed
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidAmount(trimmed.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(PriceError::NotPositive(trimmed.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| PriceError::OutOfRange(trimmed.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a price string with an explicit currency (e.g. `"2.99 GBP"`).
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the currency is
/// not recognised, or if the amount is rejected by [`parse_amount`].
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(s.to_string()));
    };

    let currency =
        parse_currency(code).ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))?;

    parse_amount(amount, currency)
}

/// Revenue recovered by selling `stock` units at `price` with the tier's markdown applied.
///
/// The amount is exact and may hold fractions of the minor unit; round it only for display.
pub fn recovered_revenue<'a>(
    price: &Money<'a, Currency>,
    stock: u32,
    tier: DiscountTier,
) -> Money<'a, Currency> {
    let retained = Decimal::ONE - tier.rate();

    let amount = price
        .amount()
        .saturating_mul(Decimal::from(stock))
        .saturating_mul(retained);

    Money::from_decimal(amount, price.currency())
}
