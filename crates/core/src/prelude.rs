//! Salvage prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    analysis::{Disposition, TacticalAnalysis, analyse, analyse_today},
    fixtures::{Fixture, FixtureError},
    items::{AnnotatedItem, InventoryItem},
    metrics::{MetricsError, SummaryMetrics},
    model::{Feature, ForestModel, ModelError, load_sell_through_model},
    policy::{DiscountTier, compute_discount},
    predictor::{SellThroughPredictor, TacticalFeatures},
    pricing::{PriceError, parse_amount, parse_currency, parse_price, recovered_revenue},
    report::{ActionReport, ReportError},
    snapshot::{
        RowError, RowErrorKind, Snapshot, SnapshotError, load_snapshot, load_snapshot_file,
        write_snapshot_csv,
    },
};
