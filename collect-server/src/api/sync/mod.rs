//! Kitchen sync API

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sync", get(handler::sync))
        .route("/api/sync/history", get(handler::history))
        .route("/api/sync/stream", get(handler::stream))
}
