//! Inventory Fixtures

use serde::Deserialize;

/// Wrapper for inventory rows in YAML
#[derive(Debug, Deserialize)]
pub struct InventoryFixture {
    /// Rows, in snapshot order
    pub inventory: Vec<InventoryRowFixture>,
}

/// A snapshot row, with expiry given relative to the snapshot date.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRowFixture {
    /// Product key reference
    pub product: String,

    /// Average units sold per day
    pub avg_daily_sales: f64,

    /// Units on hand
    pub current_stock: u32,

    /// Days after the snapshot date that the stock expires
    pub expires_in_days: i32,
}
