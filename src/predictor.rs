//! Prediction adapter
//!
//! Boundary to the trained outcome model. [`OnnxPredictor`] feeds both
//! feature vectors (plus their difference block) into an ONNX regression
//! model that returns expected goals per side; win/draw/loss probabilities
//! are derived from the two expected-goal rates over an independent-Poisson
//! score grid. [`FallbackPredictor`] produces the same contract from the two
//! team strengths alone when no model artifact is configured.

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::core::aggregate::{MatchFeatures, FEATURE_NAMES};

/// Score grid bound for outcome probabilities.
const MAX_GOALS: u32 = 10;
/// League-average total goals per match, split between the sides.
const GOALS_TOTAL_BASE: f64 = 2.60;
/// Goals-per-strength-unit slope of the fallback model.
const STRENGTH_SCALE: f64 = 0.45;

/// Adapter errors. Never retried here; a failed call never yields a partial
/// prediction.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("feature schema mismatch: model expects {expected}, vectors carry {actual}")]
    SchemaMismatch { expected: String, actual: String },

    #[error("failed to load model: {0}")]
    LoadFailed(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Win/draw/loss probabilities plus expected goals per side.
#[derive(Debug, Clone)]
pub struct MatchPrediction {
    pub team_a_expected_goals: f64,
    pub team_b_expected_goals: f64,
    pub win_probability: f64,
    pub draw_probability: f64,
    pub loss_probability: f64,
}

fn check_schema(expected: &str, actual: &str) -> Result<(), PredictionError> {
    if expected != actual {
        return Err(PredictionError::SchemaMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// ONNX-backed match outcome predictor.
///
/// Input layout: `[1, 3 * 23]` f32 tensor of team A features, team B
/// features, then the A minus B difference block. Output: `[xg_a, xg_b]`.
pub struct OnnxPredictor {
    session: Session,
    schema_version: String,
}

impl OnnxPredictor {
    /// Load the model and pin the feature-schema version it was trained on.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        schema_version: &str,
    ) -> Result<OnnxPredictor, PredictionError> {
        let session = Session::builder()
            .map_err(|e| PredictionError::LoadFailed(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PredictionError::LoadFailed(e.to_string()))?
            .commit_from_file(model_path.as_ref())
            .map_err(|e| PredictionError::LoadFailed(e.to_string()))?;

        info!("loaded match outcome model from {:?}", model_path.as_ref());

        Ok(OnnxPredictor {
            session,
            schema_version: schema_version.to_string(),
        })
    }

    /// Predict from two feature vectors of matching schema version. A version
    /// mismatch is rejected, never coerced.
    pub fn predict(
        &mut self,
        features: &MatchFeatures,
    ) -> Result<MatchPrediction, PredictionError> {
        check_schema(&self.schema_version, &features.schema_version)?;

        let a = features.team_a.features.values();
        let b = features.team_b.features.values();

        let mut input: Vec<f32> = Vec::with_capacity(3 * FEATURE_NAMES.len());
        input.extend(a.iter().map(|&x| x as f32));
        input.extend(b.iter().map(|&x| x as f32));
        input.extend(a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) as f32));

        let tensor = Tensor::from_array(([1usize, 3 * FEATURE_NAMES.len()], input))
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs!["input" => tensor])
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictionError::Inference(e.to_string()))?;

        if data.len() < 2 {
            return Err(PredictionError::MalformedOutput(format!(
                "expected 2 expected-goal outputs, got {}",
                data.len()
            )));
        }

        let xg_a = data[0] as f64;
        let xg_b = data[1] as f64;
        if !xg_a.is_finite() || !xg_b.is_finite() {
            return Err(PredictionError::MalformedOutput(
                "non-finite expected goals".to_string(),
            ));
        }

        Ok(prediction_from_goals(xg_a.max(0.0), xg_b.max(0.0)))
    }
}

/// Heuristic predictor used when no ONNX model is configured: expected goals
/// from the strength difference, then the same Poisson grid.
pub struct FallbackPredictor {
    goals_total_base: f64,
    strength_scale: f64,
}

impl FallbackPredictor {
    pub fn new() -> FallbackPredictor {
        FallbackPredictor {
            goals_total_base: GOALS_TOTAL_BASE,
            strength_scale: STRENGTH_SCALE,
        }
    }

    pub fn predict(&self, features: &MatchFeatures) -> MatchPrediction {
        let diff = self.strength_scale * (features.team_a.strength - features.team_b.strength);
        let xg_a = (self.goals_total_base / 2.0 + diff / 2.0).clamp(0.2, 3.8);
        let xg_b = (self.goals_total_base / 2.0 - diff / 2.0).clamp(0.2, 3.8);
        prediction_from_goals(xg_a, xg_b)
    }
}

impl Default for FallbackPredictor {
    fn default() -> Self {
        Self::new()
    }
}

fn prediction_from_goals(xg_a: f64, xg_b: f64) -> MatchPrediction {
    let (win, draw, loss) = outcome_probs(xg_a, xg_b, MAX_GOALS);
    MatchPrediction {
        team_a_expected_goals: xg_a,
        team_b_expected_goals: xg_b,
        win_probability: win,
        draw_probability: draw,
        loss_probability: loss,
    }
}

/// Win/draw/loss for side A over an independent-Poisson score grid up to
/// `max_goals` per side, renormalized against the truncation residue.
fn outcome_probs(lambda_a: f64, lambda_b: f64, max_goals: u32) -> (f64, f64, f64) {
    let pmf_a = poisson_pmf(lambda_a, max_goals);
    let pmf_b = poisson_pmf(lambda_b, max_goals);

    let mut win = 0.0;
    let mut draw = 0.0;
    let mut loss = 0.0;

    for (i, p_i) in pmf_a.iter().enumerate() {
        for (j, p_j) in pmf_b.iter().enumerate() {
            let p = p_i * p_j;
            if i > j {
                win += p;
            } else if i < j {
                loss += p;
            } else {
                draw += p;
            }
        }
    }

    let sum = win + draw + loss;
    if sum > 0.0 {
        (win / sum, draw / sum, loss / sum)
    } else {
        (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

/// Poisson pmf for k = 0..=max_k, with the tail mass folded into the last
/// bucket so the vector always sums to 1.
fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let max_k = max_k as usize;
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];

    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }

    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::{FeatureVector, SideAggregate};
    use crate::core::chemistry::ChemistryScore;

    fn side(strength: f64) -> SideAggregate {
        SideAggregate {
            features: FeatureVector::new(
                "lineup-features/1".to_string(),
                vec![0.0; FEATURE_NAMES.len()],
            ),
            strength,
            chemistry: ChemistryScore {
                overall: 0.0,
                defense: 0.0,
                midfield: 0.0,
                attack: 0.0,
            },
        }
    }

    fn match_features(strength_a: f64, strength_b: f64) -> MatchFeatures {
        MatchFeatures {
            schema_version: "lineup-features/1".to_string(),
            team_a: side(strength_a),
            team_b: side(strength_b),
        }
    }

    #[test]
    fn test_check_schema_rejects_mismatch() {
        assert!(check_schema("lineup-features/1", "lineup-features/1").is_ok());
        let err = check_schema("lineup-features/1", "lineup-features/1+sentiment").unwrap_err();
        match err {
            PredictionError::SchemaMismatch { expected, actual } => {
                assert_eq!(expected, "lineup-features/1");
                assert_eq!(actual, "lineup-features/1+sentiment");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_poisson_pmf_sums_to_one() {
        for lambda in [0.0, 0.5, 1.3, 3.8] {
            let pmf = poisson_pmf(lambda, MAX_GOALS);
            let sum: f64 = pmf.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "lambda {lambda}: sum {sum}");
        }
    }

    #[test]
    fn test_outcome_probs_sum_to_one() {
        let (win, draw, loss) = outcome_probs(1.6, 1.1, MAX_GOALS);
        assert!((win + draw + loss - 1.0).abs() < 1e-9);
        assert!(win > 0.0 && draw > 0.0 && loss > 0.0);
    }

    #[test]
    fn test_equal_lambdas_are_symmetric() {
        let (win, _, loss) = outcome_probs(1.3, 1.3, MAX_GOALS);
        assert!((win - loss).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_favors_stronger_side() {
        let predictor = FallbackPredictor::new();
        let prediction = predictor.predict(&match_features(2.0, 0.5));

        assert!(prediction.team_a_expected_goals > prediction.team_b_expected_goals);
        assert!(prediction.win_probability > prediction.loss_probability);

        let total = prediction.win_probability
            + prediction.draw_probability
            + prediction.loss_probability;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_equal_strengths_are_even() {
        let predictor = FallbackPredictor::new();
        let prediction = predictor.predict(&match_features(1.0, 1.0));
        assert!((prediction.win_probability - prediction.loss_probability).abs() < 1e-9);
        assert!(
            (prediction.team_a_expected_goals - prediction.team_b_expected_goals).abs() < 1e-12
        );
    }

    #[test]
    fn test_fallback_expected_goals_are_bounded() {
        let predictor = FallbackPredictor::new();
        let prediction = predictor.predict(&match_features(100.0, -100.0));
        assert!((prediction.team_a_expected_goals - 3.8).abs() < 1e-12);
        assert!((prediction.team_b_expected_goals - 0.2).abs() < 1e-12);
    }
}
