//! Discount policy
//!
//! Maps a sell-through prediction onto one of four markdown tiers. Markdowns are only ever
//! applied inside the seven day expiry horizon; outside it every item is sold at full price no
//! matter how poorly it is predicted to sell.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::predictor::{SellThroughPredictor, TacticalFeatures};

/// Items further than this many days from expiry are never discounted.
pub const DISCOUNT_HORIZON_DAYS: i32 = 7;

/// A markdown tier.
///
/// Lower predicted sell-through selects a steeper tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DiscountTier {
    /// Full price.
    #[default]
    None,

    /// 25% off.
    Quarter,

    /// 50% off.
    Half,

    /// 75% off.
    ThreeQuarters,
}

impl DiscountTier {
    /// Every tier, shallowest first.
    pub const ALL: [Self; 4] = [Self::None, Self::Quarter, Self::Half, Self::ThreeQuarters];

    /// Select the tier for a predicted sell-through rate.
    ///
    /// `NaN` predictions select [`DiscountTier::None`].
    pub fn from_sell_through(predicted: f64) -> Self {
        if predicted < 0.30 {
            Self::ThreeQuarters
        } else if predicted < 0.60 {
            Self::Half
        } else if predicted < 0.85 {
            Self::Quarter
        } else {
            Self::None
        }
    }

    /// The discount as a fraction of the price, to two decimal places.
    pub fn rate(self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Quarter => Decimal::new(25, 2),
            Self::Half => Decimal::new(50, 2),
            Self::ThreeQuarters => Decimal::new(75, 2),
        }
    }

    /// The discount as a percentage.
    pub fn percentage(self) -> Percentage {
        Percentage::from(self.rate())
    }

    /// True for any tier that reduces the price.
    pub fn is_discounted(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let points = (self.percentage() * Decimal::ONE_HUNDRED).round_dp(0);

        write!(f, "{points}%")
    }
}

/// Decide the markdown tier for a single item.
///
/// Returns [`DiscountTier::None`] without consulting the predictor when the item has already
/// expired, has no stock, has no recorded sales, or when no predictor is available. Otherwise
/// the predictor is asked for a sell-through estimate, the estimate is mapped onto a tier, and
/// finally any item more than [`DISCOUNT_HORIZON_DAYS`] from expiry is forced back to full
/// price.
pub fn compute_discount<P>(
    days_left: i32,
    stock: u32,
    avg_sales: f64,
    predictor: Option<&P>,
) -> DiscountTier
where
    P: SellThroughPredictor + ?Sized,
{
    if days_left < 0 || stock == 0 || avg_sales.is_nan() || avg_sales <= 0.0 {
        return DiscountTier::None;
    }

    let Some(predictor) = predictor else {
        return DiscountTier::None;
    };

    let stock_ratio = f64::from(stock) / avg_sales;
    let predicted = predictor.predict_sell_through(TacticalFeatures::new(days_left, stock_ratio));
    let tier = DiscountTier::from_sell_through(predicted);

    if days_left > DISCOUNT_HORIZON_DAYS {
        DiscountTier::None
    } else {
        tier
    }
}

#[cfg(test)]
mod tests {
    use crate::predictor::MockSellThroughPredictor;

    use super::*;

    fn constant(value: f64) -> impl Fn(TacticalFeatures) -> f64 {
        move |_| value
    }

    #[test]
    fn ladder_boundaries() {
        assert_eq!(DiscountTier::from_sell_through(0.0), DiscountTier::ThreeQuarters);
        assert_eq!(DiscountTier::from_sell_through(0.29), DiscountTier::ThreeQuarters);
        assert_eq!(DiscountTier::from_sell_through(0.30), DiscountTier::Half);
        assert_eq!(DiscountTier::from_sell_through(0.59), DiscountTier::Half);
        assert_eq!(DiscountTier::from_sell_through(0.60), DiscountTier::Quarter);
        assert_eq!(DiscountTier::from_sell_through(0.84), DiscountTier::Quarter);
        assert_eq!(DiscountTier::from_sell_through(0.85), DiscountTier::None);
        assert_eq!(DiscountTier::from_sell_through(1.3), DiscountTier::None);
    }

    #[test]
    fn out_of_range_predictions_still_map_to_a_tier() {
        assert_eq!(DiscountTier::from_sell_through(-0.4), DiscountTier::ThreeQuarters);
        assert_eq!(DiscountTier::from_sell_through(f64::NAN), DiscountTier::None);
    }

    #[test]
    fn rates_are_two_decimal_places() {
        let rates: Vec<String> = DiscountTier::ALL
            .iter()
            .map(|tier| tier.rate().to_string())
            .collect();

        assert_eq!(rates, ["0", "0.25", "0.50", "0.75"]);
    }

    #[test]
    fn display_shows_percent_points() {
        assert_eq!(DiscountTier::ThreeQuarters.to_string(), "75%");
        assert_eq!(DiscountTier::None.to_string(), "0%");
    }

    #[test]
    fn guards_short_circuit_before_prediction() {
        let mut predictor = MockSellThroughPredictor::new();
        predictor.expect_predict_sell_through().never();

        assert_eq!(compute_discount(-1, 10, 2.0, Some(&predictor)), DiscountTier::None);
        assert_eq!(compute_discount(3, 0, 2.0, Some(&predictor)), DiscountTier::None);
        assert_eq!(compute_discount(3, 10, 0.0, Some(&predictor)), DiscountTier::None);
        assert_eq!(compute_discount(3, 10, -5.0, Some(&predictor)), DiscountTier::None);
        assert_eq!(compute_discount(3, 10, f64::NAN, Some(&predictor)), DiscountTier::None);
    }

    #[test]
    fn unavailable_predictor_means_no_discount() {
        assert_eq!(
            compute_discount::<MockSellThroughPredictor>(3, 180, 25.0, None),
            DiscountTier::None
        );
    }

    #[test]
    fn predictor_receives_stock_to_sales_ratio() {
        let mut predictor = MockSellThroughPredictor::new();

        predictor
            .expect_predict_sell_through()
            .once()
            .withf(|features| {
                features.days_until_expiry == 3
                    && (features.stock_to_sales_ratio - 7.2).abs() < 1e-9
            })
            .return_const(0.25);

        assert_eq!(
            compute_discount(3, 180, 25.0, Some(&predictor)),
            DiscountTier::ThreeQuarters
        );
    }

    #[test]
    fn horizon_override_applies_after_prediction() {
        let mut predictor = MockSellThroughPredictor::new();

        predictor
            .expect_predict_sell_through()
            .once()
            .return_const(0.1);

        assert_eq!(compute_discount(10, 50, 5.0, Some(&predictor)), DiscountTier::None);
    }

    #[test]
    fn horizon_edge_is_inclusive() {
        let predictor = constant(0.1);

        assert_eq!(
            compute_discount(7, 50, 5.0, Some(&predictor)),
            DiscountTier::ThreeQuarters
        );
        assert_eq!(compute_discount(8, 50, 5.0, Some(&predictor)), DiscountTier::None);
    }

    #[test]
    fn expiring_today_is_still_eligible() {
        let predictor = constant(0.5);

        assert_eq!(compute_discount(0, 12, 3.0, Some(&predictor)), DiscountTier::Half);
    }

    #[test]
    fn discount_is_monotone_in_sell_through() {
        let mut previous = DiscountTier::ThreeQuarters;

        for step in 0..=120 {
            let predicted = f64::from(step) / 100.0;
            let predictor = constant(predicted);
            let tier = compute_discount(4, 40, 10.0, Some(&predictor));

            assert!(tier <= previous, "tier increased at sell-through {predicted}");

            previous = tier;
        }
    }
}
