//! Lineup slots and lineup resolution
//!
//! A lineup is exactly eleven distinct catalog players assigned to the fixed
//! positional slot taxonomy. All lineup invariants are enforced here, before
//! any aggregation work begins.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::data::catalog::{CatalogSnapshot, PlayerRecord};

/// Number of starters per side.
pub const LINEUP_SIZE: usize = 11;

/// Fixed positional slot taxonomy. Request arrays are positional: the i-th
/// name fills the i-th slot of [`LineupSlot::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineupSlot {
    Gk,
    Rb,
    Rcb,
    Lcb,
    Lb,
    Rcm,
    Cdm,
    Lcm,
    Rw,
    St,
    Lw,
}

/// Positionally adjacent slot group, used for chemistry sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Defense,
    Midfield,
    Attack,
}

impl LineupSlot {
    /// All slots in canonical order (also the request array order).
    pub const ALL: [LineupSlot; LINEUP_SIZE] = [
        LineupSlot::Gk,
        LineupSlot::Rb,
        LineupSlot::Rcb,
        LineupSlot::Lcb,
        LineupSlot::Lb,
        LineupSlot::Rcm,
        LineupSlot::Cdm,
        LineupSlot::Lcm,
        LineupSlot::Rw,
        LineupSlot::St,
        LineupSlot::Lw,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineupSlot::Gk => "GK",
            LineupSlot::Rb => "RB",
            LineupSlot::Rcb => "RCB",
            LineupSlot::Lcb => "LCB",
            LineupSlot::Lb => "LB",
            LineupSlot::Rcm => "RCM",
            LineupSlot::Cdm => "CDM",
            LineupSlot::Lcm => "LCM",
            LineupSlot::Rw => "RW",
            LineupSlot::St => "ST",
            LineupSlot::Lw => "LW",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            LineupSlot::Gk
            | LineupSlot::Rb
            | LineupSlot::Rcb
            | LineupSlot::Lcb
            | LineupSlot::Lb => Unit::Defense,
            LineupSlot::Rcm | LineupSlot::Cdm | LineupSlot::Lcm => Unit::Midfield,
            LineupSlot::Rw | LineupSlot::St | LineupSlot::Lw => Unit::Attack,
        }
    }
}

/// Lineup validation errors. All fail the whole request before any
/// aggregation work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineupError {
    #[error("expected {LINEUP_SIZE} starters, got {actual}")]
    WrongSize { actual: usize },

    #[error("duplicate starter in lineup: {name}")]
    DuplicatePlayer { name: String },

    #[error("unknown player: {name}")]
    UnknownPlayer { name: String },

    #[error("player named in both lineups: {name}")]
    PlayerOnBothSides { name: String },
}

/// Eleven resolved starters, indexed by slot. Immutable once constructed and
/// discarded with the request.
#[derive(Debug)]
pub struct Lineup<'a> {
    starters: Vec<&'a PlayerRecord>,
}

impl<'a> Lineup<'a> {
    /// Resolve eleven names against the catalog, enforcing size, distinctness
    /// and existence. Resolution failure names the offending entry.
    pub fn resolve(
        catalog: &'a CatalogSnapshot,
        names: &[String],
    ) -> Result<Lineup<'a>, LineupError> {
        if names.len() != LINEUP_SIZE {
            return Err(LineupError::WrongSize {
                actual: names.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(LineupError::DuplicatePlayer { name: name.clone() });
            }
        }

        let mut starters = Vec::with_capacity(LINEUP_SIZE);
        for name in names {
            let record = catalog
                .player(name)
                .ok_or_else(|| LineupError::UnknownPlayer { name: name.clone() })?;
            starters.push(record);
        }

        Ok(Lineup { starters })
    }

    /// Resolve both sides of a match and reject a player named on both.
    pub fn resolve_pair(
        catalog: &'a CatalogSnapshot,
        team_a: &[String],
        team_b: &[String],
    ) -> Result<(Lineup<'a>, Lineup<'a>), LineupError> {
        let a = Lineup::resolve(catalog, team_a)?;
        let b = Lineup::resolve(catalog, team_b)?;

        let a_names: HashSet<&str> = team_a.iter().map(String::as_str).collect();
        for name in team_b {
            if a_names.contains(name.as_str()) {
                return Err(LineupError::PlayerOnBothSides { name: name.clone() });
            }
        }

        Ok((a, b))
    }

    pub fn starter(&self, slot: LineupSlot) -> &'a PlayerRecord {
        self.starters[slot as usize]
    }

    /// Starters in canonical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (LineupSlot, &'a PlayerRecord)> + '_ {
        LineupSlot::ALL
            .iter()
            .zip(self.starters.iter())
            .map(|(&slot, &player)| (slot, player))
    }

    pub fn players(&self) -> &[&'a PlayerRecord] {
        &self.starters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{PlayerRecord, Position, PositionStats};
    use std::collections::HashMap;

    fn snapshot_with(names: &[&str]) -> CatalogSnapshot {
        let mut players = HashMap::new();
        for name in names {
            players.insert(
                name.to_string(),
                PlayerRecord {
                    name: name.to_string(),
                    team: "Test FC".to_string(),
                    age: 25,
                    stats: PositionStats::new(Position::Midfielder),
                    sentiment: None,
                },
            );
        }
        CatalogSnapshot::new(players, HashMap::new())
    }

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_slot_order_matches_lineup_size() {
        assert_eq!(LineupSlot::ALL.len(), LINEUP_SIZE);
        assert_eq!(LineupSlot::ALL[0].label(), "GK");
        assert_eq!(LineupSlot::ALL[10].label(), "LW");
    }

    #[test]
    fn test_unit_grouping() {
        assert_eq!(LineupSlot::Gk.unit(), Unit::Defense);
        assert_eq!(LineupSlot::Cdm.unit(), Unit::Midfield);
        assert_eq!(LineupSlot::St.unit(), Unit::Attack);
    }

    #[test]
    fn test_resolve_valid_lineup() {
        let team = names("a", 11);
        let catalog = snapshot_with(&team.iter().map(String::as_str).collect::<Vec<_>>());
        let lineup = Lineup::resolve(&catalog, &team).unwrap();
        assert_eq!(lineup.players().len(), LINEUP_SIZE);
        assert_eq!(lineup.starter(LineupSlot::Gk).name, "a0");
        assert_eq!(lineup.starter(LineupSlot::Lw).name, "a10");
    }

    #[test]
    fn test_wrong_size_is_rejected_with_count() {
        let catalog = snapshot_with(&[]);
        for n in [10, 12] {
            let err = Lineup::resolve(&catalog, &names("a", n)).unwrap_err();
            assert_eq!(err, LineupError::WrongSize { actual: n });
        }
    }

    #[test]
    fn test_duplicate_player_is_named() {
        let team = {
            let mut t = names("a", 11);
            t[10] = "a0".to_string();
            t
        };
        let catalog = snapshot_with(&team.iter().map(String::as_str).collect::<Vec<_>>());
        let err = Lineup::resolve(&catalog, &team).unwrap_err();
        assert_eq!(
            err,
            LineupError::DuplicatePlayer {
                name: "a0".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_player_is_named() {
        let mut team = names("a", 11);
        team[5] = "Ghost".to_string();
        let known: Vec<String> = names("a", 11);
        let catalog = snapshot_with(&known.iter().map(String::as_str).collect::<Vec<_>>());
        let err = Lineup::resolve(&catalog, &team).unwrap_err();
        assert_eq!(
            err,
            LineupError::UnknownPlayer {
                name: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn test_player_on_both_sides_is_rejected() {
        let team_a = names("a", 11);
        let mut team_b = names("b", 11);
        team_b[3] = "a7".to_string();

        let all: Vec<String> = team_a.iter().chain(team_b.iter()).cloned().collect();
        let catalog = snapshot_with(&all.iter().map(String::as_str).collect::<Vec<_>>());

        let err = Lineup::resolve_pair(&catalog, &team_a, &team_b).unwrap_err();
        assert_eq!(
            err,
            LineupError::PlayerOnBothSides {
                name: "a7".to_string()
            }
        );
    }
}
