//! Lineupcast - Football match outcome prediction from starting lineups
//!
//! This library provides:
//! - A versioned, atomically swappable player catalog snapshot
//! - Position-aware blending of season baselines with rolling form
//! - Lineup chemistry scoring over the pairwise shared-history graph
//! - Fixed-schema feature vectors and a published team-strength formula
//! - ONNX-backed outcome prediction with a heuristic fallback
//!
//! # Example
//!
//! ```no_run
//! use lineupcast::config::EngineConfig;
//! use lineupcast::core::LineupAggregator;
//! use lineupcast::data::load_catalog;
//! use lineupcast::predictor::FallbackPredictor;
//!
//! let catalog = load_catalog("data").unwrap();
//! let aggregator = LineupAggregator::new(EngineConfig::default());
//!
//! let team_a: Vec<String> = Vec::new(); // eleven starter names in slot order
//! let team_b: Vec<String> = Vec::new();
//! let features = aggregator.aggregate(&catalog, &team_a, &team_b).unwrap();
//!
//! let prediction = FallbackPredictor::new().predict(&features);
//! println!("win probability: {:.2}", prediction.win_probability);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod predictor;

// Re-export commonly used types
pub use config::EngineConfig;
pub use core::{FeatureVector, LineupAggregator, LineupError, LineupSlot, MatchFeatures};
pub use data::{load_catalog, CatalogHandle, CatalogSnapshot, PlayerRecord, Position};
pub use predictor::{FallbackPredictor, MatchPrediction, OnnxPredictor, PredictionError};
