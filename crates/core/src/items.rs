//! Items

use jiff::civil::Date;
use rusty_money::{Money, iso::Currency};

use crate::{
    policy::{DiscountTier, compute_discount},
    predictor::SellThroughPredictor,
    pricing::recovered_revenue,
};

/// A single row of an inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem<'a> {
    /// Product identifier
    pub product_id: String,

    /// Product name
    pub product_name: String,

    /// Product category
    pub category: String,

    /// Average units sold per day
    pub avg_daily_sales: f64,

    /// Units currently on hand
    pub current_stock: u32,

    /// Date the stock expires
    pub expiry_date: Date,

    /// Unit price
    pub price: Money<'a, Currency>,
}

impl<'a> InventoryItem<'a> {
    /// Whole days from `today` until the item expires. Negative once it has expired.
    pub fn days_until_expiry(&self, today: Date) -> i32 {
        (self.expiry_date - today).get_days()
    }

    /// Score the item against `today` and produce its annotated counterpart.
    ///
    /// The item itself is left untouched.
    pub fn annotate<P>(&self, today: Date, predictor: Option<&P>) -> AnnotatedItem<'a>
    where
        P: SellThroughPredictor + ?Sized,
    {
        let days_until_expiry = self.days_until_expiry(today);
        let discount = compute_discount(
            days_until_expiry,
            self.current_stock,
            self.avg_daily_sales,
            predictor,
        );

        AnnotatedItem {
            recovered_revenue: recovered_revenue(&self.price, self.current_stock, discount),
            item: self.clone(),
            days_until_expiry,
            discount,
        }
    }
}

/// An inventory row together with its markdown decision.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedItem<'a> {
    item: InventoryItem<'a>,
    days_until_expiry: i32,
    discount: DiscountTier,
    recovered_revenue: Money<'a, Currency>,
}

impl<'a> AnnotatedItem<'a> {
    /// The source inventory row
    pub fn item(&self) -> &InventoryItem<'a> {
        &self.item
    }

    /// Whole days until expiry at the time of annotation
    pub fn days_until_expiry(&self) -> i32 {
        self.days_until_expiry
    }

    /// Selected markdown tier
    pub fn discount(&self) -> DiscountTier {
        self.discount
    }

    /// Revenue from selling all current stock at the marked down price
    pub fn recovered_revenue(&self) -> Money<'a, Currency> {
        self.recovered_revenue
    }

    /// Units on hand
    pub fn current_stock(&self) -> u32 {
        self.item.current_stock
    }
}
