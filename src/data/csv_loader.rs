//! CSV loading for the player catalog
//!
//! Builds a [`CatalogSnapshot`] from two files in a data directory:
//! `players.csv` (one row per player per match, wide metric columns) and
//! `chemistry.csv` (one row per player pair with shared history).

use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::data::catalog::{
    CatalogSnapshot, ChemistryEdge, MetricKey, PairKey, PlayerRecord, Position, PositionStats,
};

/// Per-match player statistics file.
pub const PLAYERS_FILE: &str = "players.csv";
/// Pairwise shared-history file.
pub const CHEMISTRY_FILE: &str = "chemistry.csv";

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog data: {0}")]
    Data(#[from] PolarsError),

    #[error("catalog file missing required column: {name}")]
    MissingColumn { name: String },

    #[error("unknown position code '{code}' for player {player}")]
    UnknownPosition { player: String, code: String },
}

/// Load a full catalog snapshot from `dir`.
///
/// A missing chemistry file is not an error: every pair then simply has no
/// recorded history.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<CatalogSnapshot, CatalogError> {
    let dir = dir.as_ref();
    let players = load_players(&dir.join(PLAYERS_FILE))?;

    let chemistry_path = dir.join(CHEMISTRY_FILE);
    let edges = if chemistry_path.exists() {
        load_edges(&chemistry_path)?
    } else {
        warn!("no {} found, catalog has no chemistry edges", CHEMISTRY_FILE);
        HashMap::new()
    };

    Ok(CatalogSnapshot::new(players, edges))
}

fn read_csv(path: &Path) -> Result<DataFrame, CatalogError> {
    let df = CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn str_col(df: &DataFrame, name: &str) -> Result<StringChunked, CatalogError> {
    let series = df.column(name).map_err(|_| CatalogError::MissingColumn {
        name: name.to_string(),
    })?;
    Ok(series.cast(&DataType::String)?.str()?.clone())
}

fn int_col(df: &DataFrame, name: &str) -> Result<Int64Chunked, CatalogError> {
    let series = df.column(name).map_err(|_| CatalogError::MissingColumn {
        name: name.to_string(),
    })?;
    Ok(series.cast(&DataType::Int64)?.i64()?.clone())
}

fn float_col(df: &DataFrame, name: &str) -> Result<Float64Chunked, CatalogError> {
    let series = df.column(name).map_err(|_| CatalogError::MissingColumn {
        name: name.to_string(),
    })?;
    Ok(series.cast(&DataType::Float64)?.f64()?.clone())
}

fn load_players(path: &Path) -> Result<HashMap<String, PlayerRecord>, CatalogError> {
    let df = read_csv(path)?;

    let player_col = str_col(&df, "player")?;
    let team_col = str_col(&df, "team")?;
    let pos_col = str_col(&df, "pos")?;
    let age_col = int_col(&df, "age")?;
    let date_col = int_col(&df, "date")?;

    let metric_cols: Vec<(MetricKey, Float64Chunked)> = MetricKey::ALL
        .iter()
        .map(|&key| Ok((key, float_col(&df, key.name())?)))
        .collect::<Result<_, CatalogError>>()?;

    // Sentiment is an optional extension column.
    let sentiment_col = df
        .column("sentiment")
        .ok()
        .and_then(|s| s.cast(&DataType::Float64).ok())
        .and_then(|s| s.f64().ok().cloned());

    let mut records: HashMap<String, PlayerRecord> = HashMap::new();
    // Latest row date per player, driving team/age/sentiment updates.
    let mut latest_date: HashMap<String, i64> = HashMap::new();
    // Observations as (date, key, value), sorted per player before insertion
    // so series end up match-ordered even when file rows are not.
    let mut observations: HashMap<String, Vec<(i64, MetricKey, f64)>> = HashMap::new();

    for i in 0..df.height() {
        let (Some(name), Some(team), Some(pos_code), Some(age), Some(date)) = (
            player_col.get(i),
            team_col.get(i),
            pos_col.get(i),
            age_col.get(i),
            date_col.get(i),
        ) else {
            continue;
        };

        let position =
            Position::from_code(pos_code).ok_or_else(|| CatalogError::UnknownPosition {
                player: name.to_string(),
                code: pos_code.to_string(),
            })?;

        let sentiment = sentiment_col.as_ref().and_then(|col| col.get(i));

        let record = records
            .entry(name.to_string())
            .or_insert_with(|| PlayerRecord {
                name: name.to_string(),
                team: team.to_string(),
                age: age.clamp(0, u8::MAX as i64) as u8,
                stats: PositionStats::new(position),
                sentiment: None,
            });

        let is_latest = latest_date.get(name).map_or(true, |&d| date >= d);
        if is_latest {
            latest_date.insert(name.to_string(), date);
            record.team = team.to_string();
            record.age = age.clamp(0, u8::MAX as i64) as u8;
            if sentiment.is_some() {
                record.sentiment = sentiment;
            }
        }

        // Only the columns owned by the player's category are read; values in
        // foreign columns never reach the record.
        let rows = observations.entry(name.to_string()).or_default();
        for (key, col) in &metric_cols {
            if !record.position().metrics().contains(key) {
                continue;
            }
            if let Some(value) = col.get(i) {
                rows.push((date, *key, value));
            }
        }
    }

    for (name, mut rows) in observations {
        rows.sort_by_key(|&(date, _, _)| date);
        if let Some(record) = records.get_mut(&name) {
            for (_, key, value) in rows {
                if let Some(series) = record.stats.series_mut(key) {
                    series.push(value);
                }
            }
        }
    }

    Ok(records)
}

fn load_edges(path: &Path) -> Result<HashMap<PairKey, ChemistryEdge>, CatalogError> {
    let df = read_csv(path)?;

    let a_col = str_col(&df, "player_a")?;
    let b_col = str_col(&df, "player_b")?;
    let minutes_col = float_col(&df, "shared_minutes")?;
    let matches_col = int_col(&df, "matches_together")?;
    let recency_col = float_col(&df, "recency_weight")?;

    let mut edges = HashMap::new();
    for i in 0..df.height() {
        let (Some(a), Some(b), Some(minutes), Some(matches), Some(recency)) = (
            a_col.get(i),
            b_col.get(i),
            minutes_col.get(i),
            matches_col.get(i),
            recency_col.get(i),
        ) else {
            continue;
        };

        edges.insert(
            PairKey::new(a, b),
            ChemistryEdge {
                shared_minutes: minutes,
                matches_together: matches.max(0) as u32,
                recency_weight: recency,
            },
        );
    }

    Ok(edges)
}
