//! Catalog data model and loading

pub mod catalog;
pub mod csv_loader;

// Re-export commonly used types
pub use catalog::{
    CatalogHandle, CatalogSnapshot, ChemistryEdge, MetricClass, MetricKey, MetricSeries, PairKey,
    PlayerRecord, Position, PositionStats,
};
pub use csv_loader::{load_catalog, CatalogError, CHEMISTRY_FILE, PLAYERS_FILE};
