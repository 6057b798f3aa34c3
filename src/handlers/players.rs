use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use lineupcast::models::{PlayerSummary, PlayersResponse};

/// List every catalog player with the latest known team and position.
pub async fn list_players(state: web::Data<Arc<AppState>>) -> impl Responder {
    let catalog = state.catalog.snapshot();

    let mut players: Vec<PlayerSummary> = catalog
        .players()
        .map(|p| PlayerSummary {
            name: p.name.clone(),
            team: p.team.clone(),
            position: p.position().code().to_string(),
            age: p.age,
        })
        .collect();
    players.sort_by(|a, b| a.name.cmp(&b.name));

    HttpResponse::Ok().json(PlayersResponse { players })
}
