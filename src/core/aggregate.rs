//! Lineup Aggregation Engine
//!
//! Orchestrates the Statistic Blender and Chemistry Aggregator across both
//! lineups and emits a pair of fixed-schema feature vectors plus a
//! team-strength scalar per side. Validation fails fast: no partial lineup
//! ever reaches the aggregation steps.

use crate::config::EngineConfig;
use crate::core::blend::StatBlender;
use crate::core::chemistry::{ChemistryAggregator, ChemistryScore};
use crate::core::lineup::{Lineup, LineupError};
use crate::data::catalog::{CatalogSnapshot, MetricClass, PlayerRecord, Position};

/// Fixed feature order: category-aggregated metrics in catalog order,
/// followed by the chemistry scores. Must stay in lockstep with
/// `Position::metrics`; `test_feature_names_match_metric_registry` guards
/// the coupling.
pub const FEATURE_NAMES: [&str; 23] = [
    "gk_saves",
    "gk_save_pct",
    "gk_goals_conceded",
    "gk_pass_accuracy",
    "df_tackles",
    "df_interceptions",
    "df_clearances",
    "df_aerials_won",
    "df_pass_accuracy",
    "mf_passes_completed",
    "mf_pass_accuracy",
    "mf_key_passes",
    "mf_tackles",
    "mf_expected_assists",
    "fw_goals",
    "fw_expected_goals",
    "fw_shots_on_target",
    "fw_shot_conversion",
    "fw_key_passes",
    "chemistry_overall",
    "chemistry_defense",
    "chemistry_midfield",
    "chemistry_attack",
];

/// Ordered, fixed-schema numeric summary of one lineup. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema_version: String,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(schema_version: String, values: Vec<f64>) -> FeatureVector {
        FeatureVector {
            schema_version,
            values,
        }
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value by feature name, None for a name outside the schema.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values[i])
    }
}

/// Aggregation output for one side.
#[derive(Debug, Clone)]
pub struct SideAggregate {
    pub features: FeatureVector,
    pub strength: f64,
    pub chemistry: ChemistryScore,
}

/// Aggregation output for a full match request.
#[derive(Debug, Clone)]
pub struct MatchFeatures {
    pub schema_version: String,
    pub team_a: SideAggregate,
    pub team_b: SideAggregate,
}

/// The engine. Stateless per request: one instance serves any number of
/// concurrent `aggregate` calls against shared snapshots.
pub struct LineupAggregator {
    config: EngineConfig,
    schema_version: String,
    blender: StatBlender,
    chemistry: ChemistryAggregator,
}

impl LineupAggregator {
    /// Build from a validated configuration.
    pub fn new(config: EngineConfig) -> LineupAggregator {
        let schema_version = config.schema_version();
        let blender = StatBlender::from_config(&config.blend);
        let chemistry = ChemistryAggregator::from_config(&config.chemistry);
        LineupAggregator {
            config,
            schema_version,
            blender,
            chemistry,
        }
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Aggregate both lineups into comparable feature vectors and strengths.
    ///
    /// All lineup invariants (size, distinctness, resolution, cross-side
    /// distinctness) are enforced before any aggregation work; partial
    /// results are never produced.
    pub fn aggregate(
        &self,
        catalog: &CatalogSnapshot,
        team_a: &[String],
        team_b: &[String],
    ) -> Result<MatchFeatures, LineupError> {
        let (a, b) = Lineup::resolve_pair(catalog, team_a, team_b)?;

        Ok(MatchFeatures {
            schema_version: self.schema_version.clone(),
            team_a: self.aggregate_side(catalog, &a),
            team_b: self.aggregate_side(catalog, &b),
        })
    }

    fn aggregate_side(&self, catalog: &CatalogSnapshot, lineup: &Lineup) -> SideAggregate {
        let mut values = Vec::with_capacity(FEATURE_NAMES.len());

        for position in Position::ALL {
            let starters: Vec<&PlayerRecord> = lineup
                .players()
                .iter()
                .copied()
                .filter(|p| p.position() == position)
                .collect();
            let multiplier = self.sentiment_multiplier(&starters);

            for &metric in position.metrics() {
                let blended: Vec<f64> = starters
                    .iter()
                    .filter_map(|p| self.blender.blend(&p.stats, metric))
                    .collect();

                // Unknown for every starter of the category (or an empty
                // category): neutral baseline instead of aborting.
                let value = if blended.is_empty() {
                    self.config.blend.neutral_value
                } else {
                    let mean = blended.iter().sum::<f64>() / blended.len() as f64;
                    match metric.class() {
                        MetricClass::FormSensitive => mean * multiplier,
                        MetricClass::Stable => mean,
                    }
                };
                values.push(value);
            }
        }

        let chemistry = self.chemistry.score(lineup, catalog);
        values.extend([
            chemistry.overall,
            chemistry.defense,
            chemistry.midfield,
            chemistry.attack,
        ]);

        let features = FeatureVector::new(self.schema_version.clone(), values);
        let strength = self.strength(&features);

        SideAggregate {
            features,
            strength,
            chemistry,
        }
    }

    /// Bounded multiplicative sentiment adjustment for one category's
    /// starters. Disabled flag or no observed sentiment means exactly 1.0,
    /// keeping the pipeline shape unchanged.
    fn sentiment_multiplier(&self, starters: &[&PlayerRecord]) -> f64 {
        if !self.config.sentiment.enabled {
            return 1.0;
        }
        let observed: Vec<f64> = starters.iter().filter_map(|p| p.sentiment).collect();
        if observed.is_empty() {
            return 1.0;
        }
        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
        1.0 + mean.clamp(-1.0, 1.0) * self.config.sentiment.max_swing
    }

    /// The published team-strength formula: a configured weighted sum over
    /// the feature vector. Computable with no prediction adapter at all.
    fn strength(&self, features: &FeatureVector) -> f64 {
        self.config
            .strength
            .terms
            .iter()
            .map(|term| term.weight * features.get(&term.feature).unwrap_or(0.0))
            .sum()
    }
}
