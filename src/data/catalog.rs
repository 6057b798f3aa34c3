//! Player catalog snapshot
//!
//! Read-only reference data for predictions: player records keyed by name and
//! chemistry edges keyed by unordered player pair. A snapshot is immutable
//! once built; refreshing the catalog swaps the shared reference so that a
//! request in flight keeps reading one consistent snapshot.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Position category of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

impl Position {
    /// All categories in feature-schema order.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Attacker,
    ];

    /// Short code used in catalog CSVs and the players endpoint.
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Attacker => "FW",
        }
    }

    pub fn from_code(code: &str) -> Option<Position> {
        match code {
            "GK" => Some(Position::Goalkeeper),
            "DF" => Some(Position::Defender),
            "MF" => Some(Position::Midfielder),
            "FW" => Some(Position::Attacker),
            _ => None,
        }
    }

    /// Feature-name prefix for this category.
    pub fn prefix(self) -> &'static str {
        match self {
            Position::Goalkeeper => "gk",
            Position::Defender => "df",
            Position::Midfielder => "mf",
            Position::Attacker => "fw",
        }
    }

    /// The fixed, ordered metric set owned by this category.
    pub fn metrics(self) -> &'static [MetricKey] {
        use MetricKey::*;
        match self {
            Position::Goalkeeper => &[Saves, SavePct, GoalsConceded, PassAccuracy],
            Position::Defender => &[Tackles, Interceptions, Clearances, AerialsWon, PassAccuracy],
            Position::Midfielder => {
                &[PassesCompleted, PassAccuracy, KeyPasses, Tackles, ExpectedAssists]
            }
            Position::Attacker => &[Goals, ExpectedGoals, ShotsOnTarget, ShotConversion, KeyPasses],
        }
    }
}

/// Blend class of a metric: form-sensitive metrics weight the rolling window
/// more heavily than stable ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricClass {
    FormSensitive,
    Stable,
}

/// Every metric tracked across all position categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    Saves,
    SavePct,
    GoalsConceded,
    PassAccuracy,
    Tackles,
    Interceptions,
    Clearances,
    AerialsWon,
    PassesCompleted,
    KeyPasses,
    ExpectedAssists,
    Goals,
    ExpectedGoals,
    ShotsOnTarget,
    ShotConversion,
}

impl MetricKey {
    pub const ALL: [MetricKey; 15] = [
        MetricKey::Saves,
        MetricKey::SavePct,
        MetricKey::GoalsConceded,
        MetricKey::PassAccuracy,
        MetricKey::Tackles,
        MetricKey::Interceptions,
        MetricKey::Clearances,
        MetricKey::AerialsWon,
        MetricKey::PassesCompleted,
        MetricKey::KeyPasses,
        MetricKey::ExpectedAssists,
        MetricKey::Goals,
        MetricKey::ExpectedGoals,
        MetricKey::ShotsOnTarget,
        MetricKey::ShotConversion,
    ];

    /// Column name in the players CSV, and suffix of the feature name.
    pub fn name(self) -> &'static str {
        match self {
            MetricKey::Saves => "saves",
            MetricKey::SavePct => "save_pct",
            MetricKey::GoalsConceded => "goals_conceded",
            MetricKey::PassAccuracy => "pass_accuracy",
            MetricKey::Tackles => "tackles",
            MetricKey::Interceptions => "interceptions",
            MetricKey::Clearances => "clearances",
            MetricKey::AerialsWon => "aerials_won",
            MetricKey::PassesCompleted => "passes_completed",
            MetricKey::KeyPasses => "key_passes",
            MetricKey::ExpectedAssists => "expected_assists",
            MetricKey::Goals => "goals",
            MetricKey::ExpectedGoals => "expected_goals",
            MetricKey::ShotsOnTarget => "shots_on_target",
            MetricKey::ShotConversion => "shot_conversion",
        }
    }

    pub fn class(self) -> MetricClass {
        match self {
            MetricKey::PassAccuracy
            | MetricKey::Tackles
            | MetricKey::Interceptions
            | MetricKey::Clearances
            | MetricKey::AerialsWon
            | MetricKey::PassesCompleted => MetricClass::Stable,
            _ => MetricClass::FormSensitive,
        }
    }
}

/// Per-metric observation series, ordered oldest to newest by match.
#[derive(Debug, Clone, Default)]
pub struct MetricSeries {
    values: Vec<f64>,
}

impl MetricSeries {
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean over the full series, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Mean over the most recent `window` observations. Falls back to the
    /// full-series mean when fewer observations exist.
    pub fn recent_mean(&self, window: usize) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let start = self.values.len().saturating_sub(window.max(1));
        let tail = &self.values[start..];
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalkeeperStats {
    pub saves: MetricSeries,
    pub save_pct: MetricSeries,
    pub goals_conceded: MetricSeries,
    pub pass_accuracy: MetricSeries,
}

#[derive(Debug, Clone, Default)]
pub struct DefenderStats {
    pub tackles: MetricSeries,
    pub interceptions: MetricSeries,
    pub clearances: MetricSeries,
    pub aerials_won: MetricSeries,
    pub pass_accuracy: MetricSeries,
}

#[derive(Debug, Clone, Default)]
pub struct MidfielderStats {
    pub passes_completed: MetricSeries,
    pub pass_accuracy: MetricSeries,
    pub key_passes: MetricSeries,
    pub tackles: MetricSeries,
    pub expected_assists: MetricSeries,
}

#[derive(Debug, Clone, Default)]
pub struct AttackerStats {
    pub goals: MetricSeries,
    pub expected_goals: MetricSeries,
    pub shots_on_target: MetricSeries,
    pub shot_conversion: MetricSeries,
    pub key_passes: MetricSeries,
}

/// Position-tagged statistics. A metric can only live on the variant whose
/// category owns it, so cross-category mixing cannot happen silently.
#[derive(Debug, Clone)]
pub enum PositionStats {
    Goalkeeper(GoalkeeperStats),
    Defender(DefenderStats),
    Midfielder(MidfielderStats),
    Attacker(AttackerStats),
}

impl PositionStats {
    pub fn new(position: Position) -> Self {
        match position {
            Position::Goalkeeper => PositionStats::Goalkeeper(GoalkeeperStats::default()),
            Position::Defender => PositionStats::Defender(DefenderStats::default()),
            Position::Midfielder => PositionStats::Midfielder(MidfielderStats::default()),
            Position::Attacker => PositionStats::Attacker(AttackerStats::default()),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            PositionStats::Goalkeeper(_) => Position::Goalkeeper,
            PositionStats::Defender(_) => Position::Defender,
            PositionStats::Midfielder(_) => Position::Midfielder,
            PositionStats::Attacker(_) => Position::Attacker,
        }
    }

    /// Series for `key`, or None when this category does not own the metric.
    pub fn series(&self, key: MetricKey) -> Option<&MetricSeries> {
        use MetricKey::*;
        match (self, key) {
            (PositionStats::Goalkeeper(s), Saves) => Some(&s.saves),
            (PositionStats::Goalkeeper(s), SavePct) => Some(&s.save_pct),
            (PositionStats::Goalkeeper(s), GoalsConceded) => Some(&s.goals_conceded),
            (PositionStats::Goalkeeper(s), PassAccuracy) => Some(&s.pass_accuracy),
            (PositionStats::Defender(s), Tackles) => Some(&s.tackles),
            (PositionStats::Defender(s), Interceptions) => Some(&s.interceptions),
            (PositionStats::Defender(s), Clearances) => Some(&s.clearances),
            (PositionStats::Defender(s), AerialsWon) => Some(&s.aerials_won),
            (PositionStats::Defender(s), PassAccuracy) => Some(&s.pass_accuracy),
            (PositionStats::Midfielder(s), PassesCompleted) => Some(&s.passes_completed),
            (PositionStats::Midfielder(s), PassAccuracy) => Some(&s.pass_accuracy),
            (PositionStats::Midfielder(s), KeyPasses) => Some(&s.key_passes),
            (PositionStats::Midfielder(s), Tackles) => Some(&s.tackles),
            (PositionStats::Midfielder(s), ExpectedAssists) => Some(&s.expected_assists),
            (PositionStats::Attacker(s), Goals) => Some(&s.goals),
            (PositionStats::Attacker(s), ExpectedGoals) => Some(&s.expected_goals),
            (PositionStats::Attacker(s), ShotsOnTarget) => Some(&s.shots_on_target),
            (PositionStats::Attacker(s), ShotConversion) => Some(&s.shot_conversion),
            (PositionStats::Attacker(s), KeyPasses) => Some(&s.key_passes),
            _ => None,
        }
    }

    /// Mutable counterpart of [`series`](Self::series), used by the loader.
    pub fn series_mut(&mut self, key: MetricKey) -> Option<&mut MetricSeries> {
        use MetricKey::*;
        match (self, key) {
            (PositionStats::Goalkeeper(s), Saves) => Some(&mut s.saves),
            (PositionStats::Goalkeeper(s), SavePct) => Some(&mut s.save_pct),
            (PositionStats::Goalkeeper(s), GoalsConceded) => Some(&mut s.goals_conceded),
            (PositionStats::Goalkeeper(s), PassAccuracy) => Some(&mut s.pass_accuracy),
            (PositionStats::Defender(s), Tackles) => Some(&mut s.tackles),
            (PositionStats::Defender(s), Interceptions) => Some(&mut s.interceptions),
            (PositionStats::Defender(s), Clearances) => Some(&mut s.clearances),
            (PositionStats::Defender(s), AerialsWon) => Some(&mut s.aerials_won),
            (PositionStats::Defender(s), PassAccuracy) => Some(&mut s.pass_accuracy),
            (PositionStats::Midfielder(s), PassesCompleted) => Some(&mut s.passes_completed),
            (PositionStats::Midfielder(s), PassAccuracy) => Some(&mut s.pass_accuracy),
            (PositionStats::Midfielder(s), KeyPasses) => Some(&mut s.key_passes),
            (PositionStats::Midfielder(s), Tackles) => Some(&mut s.tackles),
            (PositionStats::Midfielder(s), ExpectedAssists) => Some(&mut s.expected_assists),
            (PositionStats::Attacker(s), Goals) => Some(&mut s.goals),
            (PositionStats::Attacker(s), ExpectedGoals) => Some(&mut s.expected_goals),
            (PositionStats::Attacker(s), ShotsOnTarget) => Some(&mut s.shots_on_target),
            (PositionStats::Attacker(s), ShotConversion) => Some(&mut s.shot_conversion),
            (PositionStats::Attacker(s), KeyPasses) => Some(&mut s.key_passes),
            _ => None,
        }
    }
}

/// One player in the catalog. Identity is the exact name string.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub age: u8,
    pub stats: PositionStats,
    /// Most recent sentiment scalar, if any was ever observed.
    pub sentiment: Option<f64>,
}

impl PlayerRecord {
    pub fn position(&self) -> Position {
        self.stats.position()
    }
}

/// Unordered player pair, normalized so lookup ignores argument order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> PairKey {
        if a <= b {
            PairKey(a.to_string(), b.to_string())
        } else {
            PairKey(b.to_string(), a.to_string())
        }
    }
}

/// Shared-history edge between two players. Absent edge means no shared
/// history, which is not an error.
#[derive(Debug, Clone)]
pub struct ChemistryEdge {
    pub shared_minutes: f64,
    pub matches_together: u32,
    /// Precomputed recency decay in [0, 1], supplied by the ingestion side.
    pub recency_weight: f64,
}

/// One immutable catalog version.
#[derive(Debug)]
pub struct CatalogSnapshot {
    players: HashMap<String, PlayerRecord>,
    edges: HashMap<PairKey, ChemistryEdge>,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(
        players: HashMap<String, PlayerRecord>,
        edges: HashMap<PairKey, ChemistryEdge>,
    ) -> CatalogSnapshot {
        CatalogSnapshot {
            players,
            edges,
            loaded_at: Utc::now(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(name)
    }

    pub fn edge(&self, a: &str, b: &str) -> Option<&ChemistryEdge> {
        self.edges.get(&PairKey::new(a, b))
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Shared handle to the current snapshot. Readers clone the Arc once per
/// request; a refresh publishes a new snapshot without touching old records.
pub struct CatalogHandle {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogHandle {
    pub fn new(snapshot: CatalogSnapshot) -> CatalogHandle {
        CatalogHandle {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().unwrap().clone()
    }

    pub fn swap(&self, snapshot: CatalogSnapshot) {
        *self.current.write().unwrap() = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attacker(name: &str) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            team: "Test FC".to_string(),
            age: 27,
            stats: PositionStats::new(Position::Attacker),
            sentiment: None,
        }
    }

    #[test]
    fn test_position_codes_round_trip() {
        for pos in Position::ALL {
            assert_eq!(Position::from_code(pos.code()), Some(pos));
        }
        assert_eq!(Position::from_code("XX"), None);
    }

    #[test]
    fn test_metric_sets_are_category_owned() {
        // A goalkeeper has no shots metric, an attacker no saves metric.
        let gk = PositionStats::new(Position::Goalkeeper);
        assert!(gk.series(MetricKey::Saves).is_some());
        assert!(gk.series(MetricKey::ShotsOnTarget).is_none());

        let fw = PositionStats::new(Position::Attacker);
        assert!(fw.series(MetricKey::ShotsOnTarget).is_some());
        assert!(fw.series(MetricKey::Saves).is_none());
    }

    #[test]
    fn test_every_category_metric_resolves() {
        for pos in Position::ALL {
            let stats = PositionStats::new(pos);
            for &key in pos.metrics() {
                assert!(stats.series(key).is_some(), "{:?} missing {:?}", pos, key);
            }
        }
    }

    #[test]
    fn test_recent_mean_window() {
        let mut series = MetricSeries::default();
        for v in [1.0, 2.0, 3.0, 4.0] {
            series.push(v);
        }
        assert!((series.mean() - 2.5).abs() < 1e-12);
        assert!((series.recent_mean(2) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_recent_mean_falls_back_when_short() {
        let mut series = MetricSeries::default();
        series.push(2.0);
        series.push(4.0);
        assert!((series.recent_mean(5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(PairKey::new("Kane", "Son"), PairKey::new("Son", "Kane"));
    }

    #[test]
    fn test_edge_lookup_ignores_order() {
        let mut edges = HashMap::new();
        edges.insert(
            PairKey::new("Kane", "Son"),
            ChemistryEdge {
                shared_minutes: 2500.0,
                matches_together: 30,
                recency_weight: 0.9,
            },
        );
        let snapshot = CatalogSnapshot::new(HashMap::new(), edges);
        assert!(snapshot.edge("Son", "Kane").is_some());
        assert!(snapshot.edge("Kane", "Maddison").is_none());
    }

    #[test]
    fn test_handle_swap_preserves_old_snapshot_for_readers() {
        let mut players = HashMap::new();
        players.insert("Kane".to_string(), attacker("Kane"));
        let handle = CatalogHandle::new(CatalogSnapshot::new(players, HashMap::new()));

        let before = handle.snapshot();
        assert_eq!(before.player_count(), 1);

        handle.swap(CatalogSnapshot::new(HashMap::new(), HashMap::new()));

        // The reader that grabbed the old snapshot still sees it in full.
        assert_eq!(before.player_count(), 1);
        assert_eq!(handle.snapshot().player_count(), 0);
    }
}
