//! Chemistry Aggregator
//!
//! Scores a lineup's synergy from the pairwise shared-history graph
//! restricted to its eleven starters. All 55 slot pairs are combined with an
//! order-independent weighted average, so the score never depends on starter
//! enumeration order.

use std::collections::HashMap;

use crate::config::ChemistryConfig;
use crate::core::lineup::{Lineup, LineupSlot, Unit};
use crate::data::catalog::{CatalogSnapshot, ChemistryEdge};

/// Overall synergy plus the positionally adjacent group sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemistryScore {
    pub overall: f64,
    pub defense: f64,
    pub midfield: f64,
    pub attack: f64,
}

/// Order-independent weighted mean accumulator.
#[derive(Default)]
struct WeightedMean {
    numerator: f64,
    denominator: f64,
}

impl WeightedMean {
    fn add(&mut self, weight: f64, value: f64) {
        self.numerator += weight * value;
        self.denominator += weight;
    }

    fn value(&self) -> f64 {
        if self.denominator > 0.0 {
            self.numerator / self.denominator
        } else {
            0.0
        }
    }
}

/// Synergy scoring over the lineup-restricted chemistry graph.
pub struct ChemistryAggregator {
    config: ChemistryConfig,
    /// Slot pair (lower index first) to adjacency multiplier.
    adjacency: HashMap<(LineupSlot, LineupSlot), f64>,
}

impl ChemistryAggregator {
    pub fn from_config(config: &ChemistryConfig) -> ChemistryAggregator {
        let mut adjacency = HashMap::new();
        for entry in &config.adjacency {
            adjacency.insert(Self::pair(entry.a, entry.b), entry.multiplier);
        }
        ChemistryAggregator {
            config: config.clone(),
            adjacency,
        }
    }

    fn pair(a: LineupSlot, b: LineupSlot) -> (LineupSlot, LineupSlot) {
        if (a as usize) <= (b as usize) {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn multiplier(&self, a: LineupSlot, b: LineupSlot) -> f64 {
        self.adjacency
            .get(&Self::pair(a, b))
            .copied()
            .unwrap_or(self.config.default_multiplier)
    }

    /// Familiarity of one pair in [0, 1]: the precomputed recency weight
    /// scaled by saturating shared-minutes and match-count components. Pairs
    /// with no recorded edge get the configured neutral floor.
    fn familiarity(&self, edge: Option<&ChemistryEdge>) -> f64 {
        let Some(edge) = edge else {
            return self.config.neutral_familiarity;
        };

        let sat = |x: f64, scale: f64| x.max(0.0) / (x.max(0.0) + scale);
        let minutes = sat(edge.shared_minutes, self.config.minutes_scale);
        let matches = sat(edge.matches_together as f64, self.config.matches_scale);

        let raw = edge.recency_weight.clamp(0.0, 1.0)
            * (self.config.minutes_weight * minutes + self.config.matches_weight * matches);
        raw.max(self.config.neutral_familiarity)
    }

    /// Score a lineup. Pairs are enumerated in canonical slot order, so the
    /// same lineup against the same snapshot always reduces identically.
    pub fn score(&self, lineup: &Lineup, catalog: &CatalogSnapshot) -> ChemistryScore {
        let mut overall = WeightedMean::default();
        let mut defense = WeightedMean::default();
        let mut midfield = WeightedMean::default();
        let mut attack = WeightedMean::default();

        let slots = LineupSlot::ALL;
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                let (slot_a, slot_b) = (slots[i], slots[j]);
                let player_a = lineup.starter(slot_a);
                let player_b = lineup.starter(slot_b);

                let familiarity =
                    self.familiarity(catalog.edge(&player_a.name, &player_b.name));
                let weight = self.multiplier(slot_a, slot_b);

                overall.add(weight, familiarity);
                if slot_a.unit() == slot_b.unit() {
                    match slot_a.unit() {
                        Unit::Defense => defense.add(weight, familiarity),
                        Unit::Midfield => midfield.add(weight, familiarity),
                        Unit::Attack => attack.add(weight, familiarity),
                    }
                }
            }
        }

        ChemistryScore {
            overall: overall.value(),
            defense: defense.value(),
            midfield: midfield.value(),
            attack: attack.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChemistryConfig;
    use crate::data::catalog::{PairKey, PlayerRecord, Position, PositionStats};
    use std::collections::HashMap;

    fn player(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            team: "Test FC".to_string(),
            age: 25,
            stats: PositionStats::new(Position::Midfielder),
            sentiment: None,
        }
    }

    fn snapshot(names: &[String], edges: Vec<(&str, &str, ChemistryEdge)>) -> CatalogSnapshot {
        let players = names
            .iter()
            .map(|n| (n.clone(), player(n)))
            .collect::<HashMap<_, _>>();
        let edges = edges
            .into_iter()
            .map(|(a, b, e)| (PairKey::new(a, b), e))
            .collect();
        CatalogSnapshot::new(players, edges)
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{i}")).collect()
    }

    fn strong_edge() -> ChemistryEdge {
        ChemistryEdge {
            shared_minutes: 4500.0,
            matches_together: 50,
            recency_weight: 1.0,
        }
    }

    #[test]
    fn test_no_history_lineup_scores_neutral_floor() {
        let team = names(11);
        let catalog = snapshot(&team, vec![]);
        let lineup = Lineup::resolve(&catalog, &team).unwrap();

        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());
        let score = aggregator.score(&lineup, &catalog);

        // Every pair contributes the neutral familiarity, so the weighted
        // average collapses to it exactly, for overall and all units.
        assert!((score.overall - 0.10).abs() < 1e-12);
        assert!((score.defense - 0.10).abs() < 1e-12);
        assert!((score.midfield - 0.10).abs() < 1e-12);
        assert!((score.attack - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_recorded_pair_beats_no_history_pair() {
        let team = names(11);
        let without = snapshot(&team, vec![]);
        let with = snapshot(&team, vec![("p2", "p3", strong_edge())]);

        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());

        let lineup = Lineup::resolve(&without, &team).unwrap();
        let baseline = aggregator.score(&lineup, &without);

        let lineup = Lineup::resolve(&with, &team).unwrap();
        let boosted = aggregator.score(&lineup, &with);

        assert!(boosted.overall > baseline.overall);
        // p2/p3 fill RCB/LCB, so the defense sub-score moves too.
        assert!(boosted.defense > baseline.defense);
        assert!((boosted.attack - baseline.attack).abs() < 1e-12);
    }

    #[test]
    fn test_score_is_deterministic() {
        let team = names(11);
        let catalog = snapshot(
            &team,
            vec![
                ("p0", "p1", strong_edge()),
                (
                    "p9",
                    "p10",
                    ChemistryEdge {
                        shared_minutes: 700.0,
                        matches_together: 9,
                        recency_weight: 0.6,
                    },
                ),
            ],
        );
        let lineup = Lineup::resolve(&catalog, &team).unwrap();
        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());

        let first = aggregator.score(&lineup, &catalog);
        let second = aggregator.score(&lineup, &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_permutation_invariance_over_starters() {
        // Same slot assignment queried twice must reduce identically no
        // matter how callers ordered the underlying edge inserts; and a
        // lineup whose non-adjacent starters swap edges keeps the pair set,
        // so the score only depends on which pairs exist, not on enumeration.
        let team = names(11);
        let edges_forward = vec![
            ("p1", "p4", strong_edge()),
            ("p6", "p8", strong_edge()),
        ];
        let edges_reversed = vec![
            ("p8", "p6", strong_edge()),
            ("p4", "p1", strong_edge()),
        ];

        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());

        let a = snapshot(&team, edges_forward);
        let lineup = Lineup::resolve(&a, &team).unwrap();
        let forward = aggregator.score(&lineup, &a);

        let b = snapshot(&team, edges_reversed);
        let lineup = Lineup::resolve(&b, &team).unwrap();
        let reversed = aggregator.score(&lineup, &b);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_adjacent_pair_outweighs_distant_pair() {
        // The same strong edge placed on an adjacent pair (RCB/LCB) must
        // move the overall score more than on a distant pair (RCB/LW).
        let team = names(11);
        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());

        let adjacent = snapshot(&team, vec![("p2", "p3", strong_edge())]);
        let lineup = Lineup::resolve(&adjacent, &team).unwrap();
        let adjacent_score = aggregator.score(&lineup, &adjacent).overall;

        let distant = snapshot(&team, vec![("p2", "p10", strong_edge())]);
        let lineup = Lineup::resolve(&distant, &team).unwrap();
        let distant_score = aggregator.score(&lineup, &distant).overall;

        assert!(adjacent_score > distant_score);
    }

    #[test]
    fn test_familiarity_never_below_neutral() {
        let aggregator = ChemistryAggregator::from_config(&ChemistryConfig::default());
        let stale = ChemistryEdge {
            shared_minutes: 30.0,
            matches_together: 1,
            recency_weight: 0.01,
        };
        assert!(aggregator.familiarity(Some(&stale)) >= 0.10);
        assert!((aggregator.familiarity(None) - 0.10).abs() < 1e-12);
    }
}
