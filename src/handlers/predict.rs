use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use lineupcast::error::AppError;
use lineupcast::models::{PredictRequest, PredictResponse};

/// Predict a match outcome from two starting lineups.
///
/// Validation failures (wrong count, duplicate or unknown player, player on
/// both sides) return 400 before any aggregation work; a configured but
/// failing model surfaces as 502 rather than silently degrading.
pub async fn predict_match(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.snapshot();

    let features =
        state
            .aggregator
            .aggregate(&catalog, &req.team_a_players, &req.team_b_players)?;

    let prediction = if let Some(ref predictor_mutex) = state.predictor {
        let mut predictor = predictor_mutex.lock().unwrap();
        predictor.predict(&features)?
    } else {
        state.fallback.predict(&features)
    };

    let response = PredictResponse {
        team_a_expected_goals: prediction.team_a_expected_goals,
        team_b_expected_goals: prediction.team_b_expected_goals,
        win_probability: prediction.win_probability,
        draw_probability: prediction.draw_probability,
        loss_probability: prediction.loss_probability,
        team_a_strength: features.team_a.strength,
        team_b_strength: features.team_b.strength,
    };

    Ok(HttpResponse::Ok().json(response))
}
