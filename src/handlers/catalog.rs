use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use lineupcast::data::load_catalog;
use lineupcast::error::AppError;
use lineupcast::models::ReloadResponse;

/// Reload the catalog from the data directory and publish the new snapshot.
/// Requests already holding the old snapshot finish against it unchanged.
pub async fn reload_catalog(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let snapshot =
        load_catalog(&state.data_dir).map_err(|e| AppError::InternalError(e.to_string()))?;

    let players = snapshot.player_count();
    let edges = snapshot.edge_count();
    state.catalog.swap(snapshot);

    info!("catalog reloaded: {} players, {} edges", players, edges);

    Ok(HttpResponse::Ok().json(ReloadResponse { players, edges }))
}
