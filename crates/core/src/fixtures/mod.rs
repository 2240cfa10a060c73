//! Fixtures
//!
//! Named YAML fixture sets describing a product catalogue, an inventory snapshot, and a trained
//! sell-through model:
//!
//! - `<base>/products/<set>.yml`
//! - `<base>/inventory/<set>.yml`
//! - `<base>/models/<set>.yml`
//!
//! Inventory expiry dates are relative, so a set can be materialised against any date.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jiff::{ToSpan, civil::Date};
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    fixtures::{
        inventory::{InventoryFixture, InventoryRowFixture},
        products::{Product, ProductsFixture},
    },
    items::InventoryItem,
    model::{ForestModel, ModelError},
    pricing::PriceError,
};

pub mod inventory;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Model artifact error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Expiry date arithmetic overflowed
    #[error("Invalid expiry offset: {0}")]
    Date(#[from] jiff::Error),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Product key -> product
    products: FxHashMap<String, Product>,

    /// Inventory rows (reference products by key)
    inventory: Vec<InventoryRowFixture>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            inventory: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.set_path("products", name);
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = Product::try_from(product_fixture)?;
            let currency = product.price.currency();

            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load inventory rows from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_inventory(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.set_path("inventory", name);
        let contents = fs::read_to_string(&file_path)?;
        let fixture: InventoryFixture = serde_norway::from_str(&contents)?;

        for row in fixture.inventory {
            if !self.products.contains_key(&row.product) {
                return Err(FixtureError::ProductNotFound(row.product));
            }

            self.inventory.push(row);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products and inventory with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_inventory(name)?;

        Ok(fixture)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_products(name)?.load_inventory(name)?;

        Ok(fixture)
    }

    /// Path of the sell-through model artifact for a set
    pub fn model_path(&self, name: &str) -> PathBuf {
        self.set_path("models", name)
    }

    /// Load the sell-through model artifact for a set
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be read or fails validation.
    pub fn model(&self, name: &str) -> Result<ForestModel, FixtureError> {
        Ok(ForestModel::from_path(self.model_path(name))?)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Currency shared by every product in the set
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Get all inventory rows
    pub fn inventory(&self) -> &[InventoryRowFixture] {
        &self.inventory
    }

    /// Materialise the inventory rows as a snapshot taken on `today`
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced product is missing or an expiry offset overflows.
    pub fn snapshot(&self, today: Date) -> Result<Vec<InventoryItem<'static>>, FixtureError> {
        self.inventory
            .iter()
            .map(|row| -> Result<InventoryItem<'static>, FixtureError> {
                let product = self.product(&row.product)?;
                let expiry_date = today.checked_add(i64::from(row.expires_in_days).days())?;

                Ok(InventoryItem {
                    product_id: product.product_id.clone(),
                    product_name: product.name.clone(),
                    category: product.category.clone(),
                    avg_daily_sales: row.avg_daily_sales,
                    current_stock: row.current_stock,
                    expiry_date,
                    price: product.price,
                })
            })
            .collect()
    }

    fn set_path(&self, kind: &str, name: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{name}.yml"))
    }

    /// Base path for fixture files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn daily_set_loads() -> TestResult {
        let fixture = Fixture::from_set("daily")?;

        assert_eq!(fixture.currency()?, USD);
        assert_eq!(fixture.inventory().len(), 6);
        assert_eq!(fixture.product("chicken")?.name, "Chicken Breast");

        Ok(())
    }

    #[test]
    fn snapshot_resolves_relative_expiry() -> TestResult {
        let fixture = Fixture::from_set("daily")?;
        let today = date(2026, 12, 30);

        let items = fixture.snapshot(today)?;
        let chicken = items
            .iter()
            .find(|item| item.product_id == "101")
            .ok_or("chicken missing")?;

        assert_eq!(chicken.expiry_date, date(2027, 1, 2));
        assert_eq!(chicken.current_stock, 180);
        assert_eq!(chicken.price, Money::from_minor(1250, USD));

        Ok(())
    }

    #[test]
    fn daily_model_loads() -> TestResult {
        let fixture = Fixture::new();
        let model = fixture.model("daily")?;

        assert_eq!(model.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_set_is_an_io_error() {
        assert!(matches!(
            Fixture::from_set("does-not-exist"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn unknown_product_reference_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("products"))?;
        fs::create_dir_all(dir.path().join("inventory"))?;
        fs::write(
            dir.path().join("products").join("tiny.yml"),
            "products:\n  jam:\n    product_id: \"1\"\n    name: Jam\n    category: Pantry\n    price: 3.00 GBP\n",
        )?;
        fs::write(
            dir.path().join("inventory").join("tiny.yml"),
            "inventory:\n  - product: honey\n    avg_daily_sales: 2\n    current_stock: 4\n    expires_in_days: 3\n",
        )?;

        assert!(matches!(
            Fixture::from_set_in(dir.path(), "tiny"),
            Err(FixtureError::ProductNotFound(key)) if key == "honey"
        ));

        Ok(())
    }
}
