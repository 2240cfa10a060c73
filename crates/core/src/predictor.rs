//! Sell-through predictors
//!
//! A predictor estimates the fraction of current stock that will sell before it expires. The
//! estimate is probability-like but callers must not assume it lies within `[0, 1]`; nothing
//! here clamps it.
//!
//! An unavailable predictor is represented by passing `None` wherever an `Option<&P>` is
//! expected.

/// Inputs to a sell-through prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TacticalFeatures {
    /// Whole days until the item expires. Negative when already expired.
    pub days_until_expiry: i32,

    /// Current stock divided by average daily sales.
    pub stock_to_sales_ratio: f64,
}

impl TacticalFeatures {
    /// Create a new feature vector.
    pub fn new(days_until_expiry: i32, stock_to_sales_ratio: f64) -> Self {
        Self {
            days_until_expiry,
            stock_to_sales_ratio,
        }
    }
}

/// Estimates sell-through for an item nearing expiry.
///
/// Implementations must be pure: the same features always produce the same estimate, and
/// concurrent calls through a shared reference are safe.
#[cfg_attr(test, mockall::automock)]
pub trait SellThroughPredictor {
    /// Predict the sell-through rate for the given features.
    fn predict_sell_through(&self, features: TacticalFeatures) -> f64;
}

impl<F> SellThroughPredictor for F
where
    F: Fn(TacticalFeatures) -> f64,
{
    fn predict_sell_through(&self, features: TacticalFeatures) -> f64 {
        self(features)
    }
}
