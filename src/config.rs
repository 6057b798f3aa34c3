//! Engine configuration
//!
//! All tunable constants of the aggregation pipeline live here: blend
//! coefficients and window, the chemistry pair-weight function and the
//! slot-adjacency table, the sentiment capability flag, and the published
//! team-strength formula. Loaded from a JSON file, with defaults that work
//! out of the box. The feature-schema version is derived purely from this
//! configuration, never from runtime data availability.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::aggregate::FEATURE_NAMES;
use crate::core::lineup::LineupSlot;

/// Base feature-schema tag. The sentiment capability flag appends a suffix.
pub const FEATURE_SCHEMA_BASE: &str = "lineup-features/1";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config value out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("strength formula references unknown feature: {feature}")]
    UnknownStrengthFeature { feature: String },

    #[error("adjacency entry pairs a slot with itself: {slot}")]
    SelfPair { slot: String },
}

/// Statistic Blender settings (per-metric-class blend of rolling form and
/// season baseline).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Rolling-form window in matches.
    pub form_window: usize,
    /// Blend weight toward rolling form for form-sensitive metrics.
    pub alpha_form_sensitive: f64,
    /// Blend weight toward rolling form for stable metrics.
    pub alpha_stable: f64,
    /// Feature value used when a metric is unknown for a whole category.
    pub neutral_value: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        BlendConfig {
            form_window: 6,
            alpha_form_sensitive: 0.7,
            alpha_stable: 0.3,
            neutral_value: 0.0,
        }
    }
}

/// One slot-pair adjacency multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyWeight {
    pub a: LineupSlot,
    pub b: LineupSlot,
    pub multiplier: f64,
}

/// Chemistry Aggregator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemistryConfig {
    /// Familiarity assigned to a pair with no recorded edge. Kept above zero
    /// so new pairings are not treated as actively negative.
    pub neutral_familiarity: f64,
    /// Saturation scale for shared minutes in the pair weight function.
    pub minutes_scale: f64,
    /// Saturation scale for matches played together.
    pub matches_scale: f64,
    /// Weight of the shared-minutes component.
    pub minutes_weight: f64,
    /// Weight of the match-count component.
    pub matches_weight: f64,
    /// Multiplier for slot pairs not listed in `adjacency`.
    pub default_multiplier: f64,
    /// Enumerated slot-pair multipliers. Positionally adjacent pairs weigh
    /// more than distant ones.
    pub adjacency: Vec<AdjacencyWeight>,
}

fn adj(a: LineupSlot, b: LineupSlot, multiplier: f64) -> AdjacencyWeight {
    AdjacencyWeight { a, b, multiplier }
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        use LineupSlot::*;
        ChemistryConfig {
            neutral_familiarity: 0.10,
            minutes_scale: 900.0,
            matches_scale: 10.0,
            minutes_weight: 0.6,
            matches_weight: 0.4,
            default_multiplier: 1.0,
            adjacency: vec![
                adj(Gk, Rcb, 1.6),
                adj(Gk, Lcb, 1.6),
                adj(Gk, Rb, 1.2),
                adj(Gk, Lb, 1.2),
                adj(Rcb, Lcb, 2.0),
                adj(Rb, Rcb, 1.8),
                adj(Lb, Lcb, 1.8),
                adj(Rcb, Cdm, 1.6),
                adj(Lcb, Cdm, 1.6),
                adj(Rb, Rcm, 1.4),
                adj(Lb, Lcm, 1.4),
                adj(Rb, Rw, 1.3),
                adj(Lb, Lw, 1.3),
                adj(Rcm, Cdm, 1.8),
                adj(Lcm, Cdm, 1.8),
                adj(Rcm, Lcm, 1.5),
                adj(Rcm, Rw, 1.4),
                adj(Lcm, Lw, 1.4),
                adj(Rcm, St, 1.2),
                adj(Lcm, St, 1.2),
                adj(Rw, St, 1.7),
                adj(Lw, St, 1.7),
                adj(Rw, Lw, 1.2),
            ],
        }
    }
}

/// Sentiment capability flag. Disabled by default; when disabled the
/// pipeline shape is unchanged and every multiplier is exactly 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub enabled: bool,
    /// Maximum multiplicative swing applied to form-sensitive aggregates.
    pub max_swing: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        SentimentConfig {
            enabled: false,
            max_swing: 0.10,
        }
    }
}

/// One term of the team-strength formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthTerm {
    pub feature: String,
    pub weight: f64,
}

fn term(feature: &str, weight: f64) -> StrengthTerm {
    StrengthTerm {
        feature: feature.to_string(),
        weight,
    }
}

/// Published team-strength formula: a weighted sum over named features,
/// usable for lineup comparison without any prediction adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub terms: Vec<StrengthTerm>,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        StrengthConfig {
            terms: vec![
                term("fw_expected_goals", 1.0),
                term("fw_goals", 0.8),
                term("fw_shots_on_target", 0.2),
                term("fw_shot_conversion", 0.5),
                term("mf_expected_assists", 0.6),
                term("mf_key_passes", 0.4),
                term("mf_pass_accuracy", 0.01),
                term("df_tackles", 0.3),
                term("df_interceptions", 0.3),
                term("df_aerials_won", 0.2),
                term("gk_save_pct", 0.01),
                term("gk_goals_conceded", -0.5),
                term("chemistry_overall", 1.5),
                term("chemistry_defense", 0.5),
                term("chemistry_attack", 0.5),
            ],
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub blend: BlendConfig,
    pub chemistry: ChemistryConfig,
    pub sentiment: SentimentConfig,
    pub strength: StrengthConfig,
}

impl EngineConfig {
    /// Load and validate a configuration from a JSON file. Absent fields fall
    /// back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Feature-schema version: a pure function of configuration.
    pub fn schema_version(&self) -> String {
        if self.sentiment.enabled {
            format!("{FEATURE_SCHEMA_BASE}+sentiment")
        } else {
            FEATURE_SCHEMA_BASE.to_string()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
            Ok(())
        }
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
            Ok(())
        }

        if self.blend.form_window == 0 {
            return Err(ConfigError::OutOfRange {
                field: "blend.form_window",
                value: 0.0,
            });
        }
        unit_range("blend.alpha_form_sensitive", self.blend.alpha_form_sensitive)?;
        unit_range("blend.alpha_stable", self.blend.alpha_stable)?;
        unit_range("sentiment.max_swing", self.sentiment.max_swing)?;

        positive("chemistry.minutes_scale", self.chemistry.minutes_scale)?;
        positive("chemistry.matches_scale", self.chemistry.matches_scale)?;
        positive("chemistry.default_multiplier", self.chemistry.default_multiplier)?;
        if self.chemistry.neutral_familiarity < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "chemistry.neutral_familiarity",
                value: self.chemistry.neutral_familiarity,
            });
        }

        for entry in &self.chemistry.adjacency {
            if entry.a == entry.b {
                return Err(ConfigError::SelfPair {
                    slot: entry.a.label().to_string(),
                });
            }
            positive("chemistry.adjacency.multiplier", entry.multiplier)?;
        }

        for term in &self.strength.terms {
            if !FEATURE_NAMES.contains(&term.feature.as_str()) {
                return Err(ConfigError::UnknownStrengthFeature {
                    feature: term.feature.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_schema_version_tracks_sentiment_flag() {
        let mut config = EngineConfig::default();
        assert_eq!(config.schema_version(), "lineup-features/1");
        config.sentiment.enabled = true;
        assert_eq!(config.schema_version(), "lineup-features/1+sentiment");
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.blend.alpha_form_sensitive = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field, .. }) if field == "blend.alpha_form_sensitive"
        ));
    }

    #[test]
    fn test_unknown_strength_feature_rejected() {
        let mut config = EngineConfig::default();
        config.strength.terms.push(StrengthTerm {
            feature: "fw_backheels".to_string(),
            weight: 1.0,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownStrengthFeature { feature }) if feature == "fw_backheels"
        ));
    }

    #[test]
    fn test_self_pair_rejected() {
        let mut config = EngineConfig::default();
        config.chemistry.adjacency.push(AdjacencyWeight {
            a: LineupSlot::St,
            b: LineupSlot::St,
            multiplier: 2.0,
        });
        assert!(matches!(config.validate(), Err(ConfigError::SelfPair { .. })));
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"sentiment": {"enabled": true}}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.sentiment.enabled);
        assert_eq!(config.blend.form_window, 6);
    }
}
