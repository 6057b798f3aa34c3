use serde::{Deserialize, Serialize};

/// Match prediction request: eleven starter names per side, in slot order
/// (GK, RB, RCB, LCB, LB, RCM, CDM, LCM, RW, ST, LW).
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub team_a_players: Vec<String>,
    pub team_b_players: Vec<String>,
}

/// Match prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub team_a_expected_goals: f64,
    pub team_b_expected_goals: f64,
    pub win_probability: f64,
    pub draw_probability: f64,
    pub loss_probability: f64,
    pub team_a_strength: f64,
    pub team_b_strength: f64,
}

/// One catalog player, latest known record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: u8,
}

/// Catalog listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerSummary>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub player_count: usize,
    pub snapshot_loaded_at: String,
}

/// Catalog reload response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub players: usize,
    pub edges: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
