//! Sync handlers
//!
//! Poll sync answers from the event log (at-least-once, idempotent for
//! consumers keying on order id + status); the SSE stream forwards committed
//! transitions from the broadcast channel with per-shop filtering. A client
//! that missed pushes falls back to the poll endpoint - a lagged broadcast
//! receiver only ever means catch-up, never loss.

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::broadcast;

use crate::core::ServerState;
use crate::sync::{SyncRequest, SyncResponse};
use shared::error::{AppError, AppResult};
use shared::order::Order;
use shared::util::now_millis;

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    pub shop_id: String,
    #[serde(default)]
    pub since_sequence: u64,
}

/// GET /api/sync?shop_id=&since_sequence= - catch-up sync
pub async fn sync(
    State(state): State<ServerState>,
    Query(query): Query<SyncQuery>,
) -> AppResult<Json<SyncResponse>> {
    let response = state
        .sync
        .sync(&SyncRequest {
            shop_id: query.shop_id,
            since_sequence: query.since_sequence,
        })
        .map_err(|e| AppError::storage(e.to_string()))?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub shop_id: String,
}

/// GET /api/sync/history?shop_id= - bounded recent-history window
pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .sync
        .recent_history(&query.shop_id, now_millis())
        .map_err(|e| AppError::storage(e.to_string()))?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub shop_id: String,
}

/// GET /api/sync/stream?shop_id= - SSE push channel
pub async fn stream(
    State(state): State<ServerState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.manager.subscribe();
    let shop_id = query.shop_id;

    let stream = futures::stream::unfold(rx, move |mut rx| {
        let shop_id = shop_id.clone();
        async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.shop_id != shop_id {
                            continue;
                        }
                        match Event::default().event("order").json_data(&event) {
                            Ok(sse_event) => return Some((Ok(sse_event), rx)),
                            Err(e) => {
                                tracing::error!(error = %e, "failed to serialize SSE event");
                                continue;
                            }
                        }
                    }
                    // Lagged: the client will catch up through the poll
                    // endpoint; keep streaming from the current position
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "SSE subscriber lagged behind");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
