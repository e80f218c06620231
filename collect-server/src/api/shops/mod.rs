//! Shop status API

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/shops/{id}/availability",
            get(handler::get_availability).post(handler::status_action),
        )
        .route("/api/shops/{id}/rating", get(handler::get_rating))
}
