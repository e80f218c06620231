//! HTTP API
//!
//! Route map:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /api/orders` | Admission (customer submits an order) |
//! | `GET /api/orders/{id}` | Order record |
//! | `GET /api/orders/{id}/timeline` | Append-only timeline |
//! | `POST /api/orders/{id}/resolve` | Customer stock decisions |
//! | `POST /api/orders/{id}/review` | Customer weight-review consent |
//! | `POST /api/orders/{id}/cancel` | Customer cancel |
//! | `POST /api/orders/{id}/rate` | Rating, closes the order |
//! | `GET /api/kitchen/orders` | Open-order set for the kitchen display |
//! | `POST /api/kitchen/orders/{id}/action` | Kitchen action envelope |
//! | `GET/POST /api/shops/{id}/availability` | Shop status operations |
//! | `GET /api/sync` | Sequence-based catch-up sync |
//! | `GET /api/sync/history` | Bounded recent-history window |
//! | `GET /api/sync/stream` | SSE push channel |
//! | `GET /api/health` | Liveness |

pub mod health;
pub mod kitchen;
pub mod orders;
pub mod shops;
pub mod sync;

use crate::core::ServerState;
use axum::Router;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(kitchen::router())
        .merge(shops::router())
        .merge(sync::router())
        .merge(health::router())
}

use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::CommandResponse;

/// Map a command response onto the API error surface
pub(crate) fn check_command(response: CommandResponse) -> AppResult<()> {
    if response.success {
        return Ok(());
    }
    let err = response
        .error
        .unwrap_or_else(|| shared::order::CommandError::new(ErrorCode::InternalError, "command failed"));
    Err(AppError::with_message(err.code, err.message))
}
