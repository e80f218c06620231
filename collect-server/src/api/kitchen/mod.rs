//! Kitchen terminal API

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/kitchen/orders", get(handler::open_orders))
        .route("/api/kitchen/orders/{id}/action", post(handler::action))
}
