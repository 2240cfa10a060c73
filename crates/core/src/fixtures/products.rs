//! Product Fixtures

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::parse_price};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier written to snapshots
    pub product_id: String,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Product price (e.g., "12.50 USD")
    pub price: String,
}

/// A catalogue product loaded from a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub product_id: String,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Unit price
    pub price: Money<'static, Currency>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        Ok(Product {
            product_id: fixture.product_id,
            name: fixture.name,
            category: fixture.category,
            price: parse_price(&fixture.price)?,
        })
    }
}
