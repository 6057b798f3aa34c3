use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use lineupcast::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let catalog = state.catalog.snapshot();

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: state.predictor.is_some(),
        player_count: catalog.player_count(),
        snapshot_loaded_at: catalog.loaded_at.to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
