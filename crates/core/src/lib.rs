//! Salvage
//!
//! Salvage decides what to do with perishable stock that is running out of shelf life. Each row
//! of an inventory snapshot is scored by a sell-through predictor, mapped onto a fixed markdown
//! tier, and routed to a flash sale, a donation, or left alone. The routed rows are then reduced
//! into revenue and waste-avoidance figures.

pub mod analysis;
pub mod fixtures;
pub mod items;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod predictor;
pub mod prelude;
pub mod pricing;
pub mod report;
pub mod snapshot;
