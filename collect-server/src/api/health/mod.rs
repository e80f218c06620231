//! Health endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Server instance epoch; changes on restart
    pub epoch: String,
    pub sequence: u64,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        epoch: state.manager.epoch().to_string(),
        sequence: state.manager.get_current_sequence().unwrap_or(0),
    })
}
