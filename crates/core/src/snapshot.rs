//! Inventory snapshots
//!
//! Reads inventory CSV files into validated [`InventoryItem`]s. Expected columns:
//!   `product_id, product_name, category, avg_daily_sales, current_stock, expiry_date, price`
//!
//! A row that fails validation is set aside with the reason it was rejected; the rest of the
//! snapshot is still loaded.

use std::{fmt, fs::File, io, path::Path};

use jiff::civil::Date;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    items::InventoryItem,
    pricing::{PriceError, parse_amount},
};

/// Errors that prevent a snapshot from being read at all.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// IO error opening or writing a snapshot
    #[error("snapshot IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error writing a snapshot
    #[error("snapshot CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single row was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowErrorKind {
    /// The record could not be read as CSV
    #[error("malformed record: {0}")]
    Csv(String),

    /// A required column was missing or blank
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The expiry date was not a calendar date
    #[error("invalid expiry date: {0}")]
    InvalidDate(String),

    /// A numeric column did not parse
    #[error("invalid number in `{field}`: {value}")]
    InvalidNumber {
        /// Column name
        field: &'static str,
        /// Raw value
        value: String,
    },

    /// The price did not parse or was not positive
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),

    /// Stock on hand was below zero
    #[error("current stock cannot be negative: {0}")]
    NegativeStock(i64),
}

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source file, counting the header
    pub line: u64,

    /// Product identifier, when the row had one
    pub product_id: Option<String>,

    /// Reason the row was rejected
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.product_id {
            Some(product_id) => write!(f, "line {} ({product_id}): {}", self.line, self.kind),
            None => write!(f, "line {}: {}", self.line, self.kind),
        }
    }
}

/// A loaded snapshot: the rows that validated and the rows that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot<'a> {
    /// Valid rows, in file order
    pub items: Vec<InventoryItem<'a>>,

    /// Rejected rows, in file order
    pub rejected: Vec<RowError>,
}

impl Snapshot<'_> {
    fn reject(&mut self, error: RowError) {
        warn!("rejected inventory row: {error}");

        self.rejected.push(error);
    }
}

/// A CSV record before validation.
#[derive(Debug, Default, Deserialize)]
struct RawInventoryRecord {
    product_id: Option<String>,
    product_name: Option<String>,
    category: Option<String>,
    avg_daily_sales: Option<String>,
    current_stock: Option<String>,
    expiry_date: Option<String>,
    price: Option<String>,
}

impl RawInventoryRecord {
    fn validate<'a>(self, currency: &'a Currency) -> Result<InventoryItem<'a>, RowErrorKind> {
        let product_id = required(self.product_id, "product_id")?;
        let product_name = required(self.product_name, "product_name")?;
        let category = required(self.category, "category")?;

        let avg_daily_sales = required(self.avg_daily_sales, "avg_daily_sales")?;
        let avg_daily_sales = avg_daily_sales
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(RowErrorKind::InvalidNumber {
                field: "avg_daily_sales",
                value: avg_daily_sales,
            })?;

        let current_stock = parse_stock(required(self.current_stock, "current_stock")?)?;
        let expiry_date = parse_expiry_date(&required(self.expiry_date, "expiry_date")?)?;
        let price = parse_amount(&required(self.price, "price")?, currency)?;

        Ok(InventoryItem {
            product_id,
            product_name,
            category,
            avg_daily_sales,
            current_stock,
            expiry_date,
            price,
        })
    }
}

/// A CSV record as written by [`write_snapshot_csv`].
#[derive(Debug, Serialize)]
struct SnapshotRecord<'r> {
    product_id: &'r str,
    product_name: &'r str,
    category: &'r str,
    avg_daily_sales: f64,
    current_stock: u32,
    expiry_date: String,
    price: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RowErrorKind> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(RowErrorKind::MissingField(field))
}

fn parse_stock(value: String) -> Result<u32, RowErrorKind> {
    let Ok(stock) = value.parse::<i64>() else {
        return Err(RowErrorKind::InvalidNumber {
            field: "current_stock",
            value,
        });
    };

    if stock < 0 {
        return Err(RowErrorKind::NegativeStock(stock));
    }

    u32::try_from(stock).map_err(|_err| RowErrorKind::InvalidNumber {
        field: "current_stock",
        value,
    })
}

/// Parse an expiry date, accepting `YYYY-MM-DD` or a datetime whose date part is used.
fn parse_expiry_date(value: &str) -> Result<Date, RowErrorKind> {
    value
        .split(['T', ' '])
        .next()
        .and_then(|date| date.parse::<Date>().ok())
        .ok_or_else(|| RowErrorKind::InvalidDate(value.to_string()))
}

/// Load a snapshot from CSV, pricing every row in `currency`.
///
/// Rows that fail validation are collected in [`Snapshot::rejected`] and logged; they never
/// abort the load.
pub fn load_snapshot<'a, R: io::Read>(reader: R, currency: &'a Currency) -> Snapshot<'a> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut snapshot = Snapshot::default();

    let headers = match csv_reader.headers() {
        Ok(headers) => headers.clone(),
        Err(source) => {
            snapshot.reject(RowError {
                line: 1,
                product_id: None,
                kind: RowErrorKind::Csv(source.to_string()),
            });

            return snapshot;
        }
    };

    // Only used when the reader cannot say where a record started.
    let mut next_line = 2;

    for result in csv_reader.records() {
        let (line, product_id, outcome) = match result {
            Ok(record) => {
                let line = record.position().map_or(next_line, csv::Position::line);

                match record.deserialize::<RawInventoryRecord>(Some(&headers)) {
                    Ok(raw) => (
                        line,
                        raw.product_id.clone().filter(|id| !id.trim().is_empty()),
                        raw.validate(currency),
                    ),
                    Err(source) => (line, None, Err(RowErrorKind::Csv(source.to_string()))),
                }
            }
            Err(source) => (
                source.position().map_or(next_line, csv::Position::line),
                None,
                Err(RowErrorKind::Csv(source.to_string())),
            ),
        };

        next_line = line.saturating_add(1);

        match outcome {
            Ok(item) => snapshot.items.push(item),
            Err(kind) => snapshot.reject(RowError {
                line,
                product_id,
                kind,
            }),
        }
    }

    snapshot
}

/// Load a snapshot from a CSV file.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be opened.
pub fn load_snapshot_file(
    path: impl AsRef<Path>,
    currency: &Currency,
) -> Result<Snapshot<'_>, SnapshotError> {
    let file = File::open(path)?;

    Ok(load_snapshot(file, currency))
}

/// Write inventory rows in the format [`load_snapshot`] reads.
///
/// # Errors
///
/// Returns an error if a record cannot be serialised or written.
pub fn write_snapshot_csv<W: io::Write>(
    items: &[InventoryItem<'_>],
    writer: W,
) -> Result<(), SnapshotError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for item in items {
        csv_writer.serialize(SnapshotRecord {
            product_id: &item.product_id,
            product_name: &item.product_name,
            category: &item.category,
            avg_daily_sales: item.avg_daily_sales,
            current_stock: item.current_stock,
            expiry_date: item.expiry_date.to_string(),
            price: item.price.amount().to_string(),
        })?;
    }

    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    const SAMPLE_CSV: &str = "\
product_id,product_name,category,avg_daily_sales,current_stock,expiry_date,price
105,Artisan Bread,Bakery,40,30,2026-10-20,5.50
101,Chicken Breast,Meat,25,180,2026-10-22T00:00:00,12.50
103,Gallon Milk,Dairy,100,120,2026-10-28 08:30:00,4.25
";

    #[test]
    fn load_sample_csv() -> TestResult {
        let snapshot = load_snapshot(SAMPLE_CSV.as_bytes(), USD);

        assert!(snapshot.rejected.is_empty());
        assert_eq!(snapshot.items.len(), 3);

        let bread = snapshot.items.first().ok_or("no rows loaded")?;

        assert_eq!(bread.product_id, "105");
        assert_eq!(bread.product_name, "Artisan Bread");
        assert_eq!(bread.category, "Bakery");
        assert!((bread.avg_daily_sales - 40.0).abs() < f64::EPSILON);
        assert_eq!(bread.current_stock, 30);
        assert_eq!(bread.expiry_date, date(2026, 10, 20));
        assert_eq!(bread.price, Money::from_minor(550, USD));

        let expiry_dates: Vec<Date> = snapshot.items.iter().map(|item| item.expiry_date).collect();

        assert_eq!(
            expiry_dates,
            [date(2026, 10, 20), date(2026, 10, 22), date(2026, 10, 28)]
        );

        Ok(())
    }

    #[test]
    fn bad_rows_are_rejected_without_losing_the_rest() {
        let csv_data = "\
product_id,product_name,category,avg_daily_sales,current_stock,expiry_date,price
1,Apples,Produce,10,5,,1.00
2,Pears,Produce,10,5,next tuesday,1.00
3,Plums,Produce,lots,5,2026-10-20,1.00
4,Figs,Produce,10,-3,2026-10-20,1.00
5,Kiwis,Produce,10,5,2026-10-20,free
6,Limes,Produce,10,5,2026-10-20,1.00
7,Dates,Produce,10,5,2026-10-20
";

        let snapshot = load_snapshot(csv_data.as_bytes(), USD);

        let ids: Vec<&str> = snapshot
            .items
            .iter()
            .map(|item| item.product_id.as_str())
            .collect();

        assert_eq!(ids, ["6"]);

        let kinds: Vec<(u64, RowErrorKind)> = snapshot
            .rejected
            .iter()
            .map(|error| (error.line, error.kind.clone()))
            .collect();

        assert_eq!(kinds.len(), 6);
        assert!(matches!(
            kinds.first(),
            Some((2, RowErrorKind::MissingField("expiry_date")))
        ));
        assert!(matches!(kinds.get(1), Some((3, RowErrorKind::InvalidDate(_)))));
        assert!(matches!(
            kinds.get(2),
            Some((
                4,
                RowErrorKind::InvalidNumber {
                    field: "avg_daily_sales",
                    ..
                }
            ))
        ));
        assert!(matches!(kinds.get(3), Some((5, RowErrorKind::NegativeStock(-3)))));
        assert!(matches!(kinds.get(4), Some((6, RowErrorKind::InvalidPrice(_)))));
        assert!(matches!(kinds.get(5), Some((8, RowErrorKind::Csv(_)))));
    }

    #[test]
    fn non_positive_sales_are_kept() {
        let csv_data = "\
product_id,product_name,category,avg_daily_sales,current_stock,expiry_date,price
9,Soup,Tins,0,0,2026-10-20,1.20
";

        let snapshot = load_snapshot(csv_data.as_bytes(), USD);

        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn missing_column_is_a_missing_field() {
        let csv_data = "\
product_id,product_name,avg_daily_sales,current_stock,expiry_date,price
9,Soup,2,4,2026-10-20,1.20
";

        let snapshot = load_snapshot(csv_data.as_bytes(), USD);

        assert!(snapshot.items.is_empty());
        assert_eq!(
            snapshot.rejected,
            [RowError {
                line: 2,
                product_id: Some("9".to_string()),
                kind: RowErrorKind::MissingField("category"),
            }]
        );
    }

    #[test]
    fn row_error_display_includes_line_and_product() {
        let error = RowError {
            line: 4,
            product_id: Some("42".to_string()),
            kind: RowErrorKind::NegativeStock(-1),
        };

        assert_eq!(
            error.to_string(),
            "line 4 (42): current stock cannot be negative: -1"
        );
    }

    #[test]
    fn rejected_lines_account_for_multi_line_fields() {
        let csv_data = "\
product_id,product_name,category,avg_daily_sales,current_stock,expiry_date,price
1,\"Sourdough
Loaf\",Bakery,10,5,2026-10-20,3.00
2,Rye,Bakery,10,5,someday,3.00
";

        let snapshot = load_snapshot(csv_data.as_bytes(), USD);

        let lines: Vec<u64> = snapshot.rejected.iter().map(|error| error.line).collect();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(lines, [4]);
    }

    #[test]
    fn written_snapshots_load_back() -> TestResult {
        let original = load_snapshot(SAMPLE_CSV.as_bytes(), USD);

        let mut out = Vec::new();
        write_snapshot_csv(&original.items, &mut out)?;

        let reloaded = load_snapshot(out.as_slice(), USD);

        assert!(reloaded.rejected.is_empty());
        assert_eq!(reloaded.items, original.items);

        Ok(())
    }

    #[test]
    fn load_snapshot_file_reports_missing_files() -> TestResult {
        let dir = tempfile::tempdir()?;

        assert!(matches!(
            load_snapshot_file(dir.path().join("nope.csv"), USD),
            Err(SnapshotError::Io(_))
        ));

        Ok(())
    }
}
