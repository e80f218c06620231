//! Customer-facing order API

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", post(handler::submit))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/timeline", get(handler::timeline))
        .route("/api/orders/{id}/resolve", post(handler::resolve))
        .route("/api/orders/{id}/review", post(handler::review))
        .route("/api/orders/{id}/cancel", post(handler::cancel))
        .route("/api/orders/{id}/rate", post(handler::rate))
}
