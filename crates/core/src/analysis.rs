//! Tactical analysis
//!
//! Annotates every row of an inventory snapshot and routes it to a flash sale, a donation, or
//! no action. Each run is independent: the only shared input is the predictor, which is only
//! ever read.

use jiff::{Zoned, civil::Date};
use tracing::{debug, info};

use crate::{
    items::{AnnotatedItem, InventoryItem},
    policy::DiscountTier,
    predictor::SellThroughPredictor,
};

/// Items this many days or fewer from expiry are donated.
pub const DONATION_WINDOW_DAYS: i32 = 2;

/// What should happen to a row of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Sell at the marked down price.
    FlashSale,

    /// Give away before it expires.
    Donation,

    /// Leave on the shelf at full price.
    NoAction,
}

impl Disposition {
    /// Route an item by its days until expiry and markdown tier.
    ///
    /// Anything inside the donation window is donated, even if it also earned a markdown.
    pub fn classify(days_until_expiry: i32, discount: DiscountTier) -> Self {
        if days_until_expiry <= DONATION_WINDOW_DAYS {
            Self::Donation
        } else if discount.is_discounted() {
            Self::FlashSale
        } else {
            Self::NoAction
        }
    }
}

/// The routed rows of a single snapshot.
///
/// Each group keeps the relative order the rows had in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TacticalAnalysis<'a> {
    flash_sale_items: Vec<AnnotatedItem<'a>>,
    donation_items: Vec<AnnotatedItem<'a>>,
    no_action_items: Vec<AnnotatedItem<'a>>,
}

impl<'a> TacticalAnalysis<'a> {
    /// Rows to mark down
    pub fn flash_sale_items(&self) -> &[AnnotatedItem<'a>] {
        &self.flash_sale_items
    }

    /// Rows to donate
    pub fn donation_items(&self) -> &[AnnotatedItem<'a>] {
        &self.donation_items
    }

    /// Rows that need nothing doing
    pub fn no_action_items(&self) -> &[AnnotatedItem<'a>] {
        &self.no_action_items
    }

    /// True when every row can stay on the shelf at full price
    pub fn needs_no_action(&self) -> bool {
        self.flash_sale_items.is_empty() && self.donation_items.is_empty()
    }

    fn push(&mut self, disposition: Disposition, item: AnnotatedItem<'a>) {
        match disposition {
            Disposition::FlashSale => self.flash_sale_items.push(item),
            Disposition::Donation => self.donation_items.push(item),
            Disposition::NoAction => self.no_action_items.push(item),
        }
    }
}

/// Annotate and route a batch of inventory rows as of `today`.
///
/// Passing `None` for the predictor disables every markdown; near-expiry rows are still
/// donated.
pub fn analyse<'a, P>(
    items: &[InventoryItem<'a>],
    today: Date,
    predictor: Option<&P>,
) -> TacticalAnalysis<'a>
where
    P: SellThroughPredictor + ?Sized,
{
    let mut analysis = TacticalAnalysis::default();

    for item in items {
        let annotated = item.annotate(today, predictor);
        let disposition =
            Disposition::classify(annotated.days_until_expiry(), annotated.discount());

        debug!(
            product_id = %item.product_id,
            days_until_expiry = annotated.days_until_expiry(),
            discount = %annotated.discount(),
            ?disposition,
            "annotated inventory row"
        );

        analysis.push(disposition, annotated);
    }

    info!(
        %today,
        rows = items.len(),
        predictor_available = predictor.is_some(),
        flash_sale = analysis.flash_sale_items.len(),
        donation = analysis.donation_items.len(),
        no_action = analysis.no_action_items.len(),
        "tactical analysis complete"
    );

    analysis
}

/// [`analyse`] as of the current local date.
pub fn analyse_today<'a, P>(
    items: &[InventoryItem<'a>],
    predictor: Option<&P>,
) -> TacticalAnalysis<'a>
where
    P: SellThroughPredictor + ?Sized,
{
    analyse(items, Zoned::now().date(), predictor)
}
