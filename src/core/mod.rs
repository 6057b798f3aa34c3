//! Lineup aggregation core

pub mod aggregate;
pub mod blend;
pub mod chemistry;
pub mod lineup;

pub use aggregate::{FeatureVector, LineupAggregator, MatchFeatures, SideAggregate, FEATURE_NAMES};
pub use blend::StatBlender;
pub use chemistry::{ChemistryAggregator, ChemistryScore};
pub use lineup::{Lineup, LineupError, LineupSlot, Unit, LINEUP_SIZE};
