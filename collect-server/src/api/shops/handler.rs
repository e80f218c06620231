//! Shop availability handlers
//!
//! Status operations are idempotent setters on the availability controller;
//! every response is the resolved snapshot (effective state + countdowns)
//! enriched with the rolling rating.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use shared::error::{AppError, AppResult};
use shared::shop::AvailabilitySnapshot;
use shared::util::now_millis;

/// Shop status operation, tagged by action name
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StatusActionRequest {
    Pause {
        reason: String,
        duration_minutes: Option<u32>,
    },
    Resume,
    Busy {
        extra_minutes: u32,
        duration_minutes: u32,
    },
    EndBusy,
    Vacation {
        until: i64,
        message: Option<String>,
    },
    EndVacation,
}

/// POST /api/shops/{id}/availability - status operation
pub async fn status_action(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<StatusActionRequest>,
) -> AppResult<Json<AvailabilitySnapshot>> {
    let now = now_millis();
    match request {
        StatusActionRequest::Pause {
            reason,
            duration_minutes,
        } => state.availability.pause(&id, &reason, duration_minutes, now),
        StatusActionRequest::Resume => state.availability.resume(&id),
        StatusActionRequest::Busy {
            extra_minutes,
            duration_minutes,
        } => state
            .availability
            .enter_busy(&id, extra_minutes, duration_minutes, now),
        StatusActionRequest::EndBusy => state.availability.exit_busy(&id),
        StatusActionRequest::Vacation { until, message } => {
            state.availability.enter_vacation(&id, until, message)
        }
        StatusActionRequest::EndVacation => state.availability.exit_vacation(&id),
    }

    snapshot(&state, &id)
}

/// GET /api/shops/{id}/availability - resolved snapshot with countdowns
pub async fn get_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AvailabilitySnapshot>> {
    snapshot(&state, &id)
}

/// Rating aggregate response
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub shop_id: String,
    pub count: u64,
    pub average: Option<f64>,
}

/// GET /api/shops/{id}/rating
pub async fn get_rating(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RatingResponse>> {
    let rating = state
        .manager
        .shop_rating(&id)
        .map_err(|e| AppError::storage(e.to_string()))?;
    Ok(Json(RatingResponse {
        shop_id: id,
        count: rating.count,
        average: rating.average(),
    }))
}

fn snapshot(state: &ServerState, shop_id: &str) -> AppResult<Json<AvailabilitySnapshot>> {
    let mut snapshot = state.availability.snapshot(shop_id, now_millis());
    let rating = state
        .manager
        .shop_rating(shop_id)
        .map_err(|e| AppError::storage(e.to_string()))?;
    snapshot.rating_average = rating.average();
    snapshot.rating_count = rating.count;
    Ok(Json(snapshot))
}
