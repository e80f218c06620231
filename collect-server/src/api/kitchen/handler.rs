//! Kitchen action handlers
//!
//! One envelope endpoint dispatches every kitchen action; a missing or
//! malformed payload is rejected at deserialization, a wrong-state action
//! comes back as a state conflict from the lifecycle.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::check_command;
use crate::core::ServerState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{
    ActorRole, Order, OrderCommand, OrderCommandPayload, WeightInput,
};

/// Kitchen action envelope
#[derive(Debug, Deserialize)]
pub struct KitchenActionRequest {
    /// Operator name for the audit trail
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(flatten)]
    pub action: KitchenAction,
}

fn default_operator() -> String {
    "kitchen".to_string()
}

/// Action-specific payloads, tagged by action name
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum KitchenAction {
    Accept {
        estimated_minutes: u32,
        note: Option<String>,
    },
    Deny {
        reason: String,
    },
    StartPreparing,
    MarkReady,
    AddTime {
        add_minutes: u32,
    },
    ItemUnavailable {
        item_ids: Vec<String>,
    },
    RecordWeighing {
        weights: Vec<WeightInput>,
    },
    ConfirmPickup {
        token: String,
    },
    ManualPickup,
    Cancel,
}

impl KitchenAction {
    fn into_payload(self, order_id: String) -> OrderCommandPayload {
        match self {
            KitchenAction::Accept {
                estimated_minutes,
                note,
            } => OrderCommandPayload::Accept {
                order_id,
                eta_minutes: estimated_minutes,
                shop_note: note,
            },
            KitchenAction::Deny { reason } => OrderCommandPayload::Deny { order_id, reason },
            KitchenAction::StartPreparing => OrderCommandPayload::StartPreparing { order_id },
            KitchenAction::MarkReady => OrderCommandPayload::MarkReady { order_id },
            KitchenAction::AddTime { add_minutes } => OrderCommandPayload::AddTime {
                order_id,
                minutes: add_minutes,
            },
            KitchenAction::ItemUnavailable { item_ids } => {
                OrderCommandPayload::FlagUnavailable { order_id, item_ids }
            }
            KitchenAction::RecordWeighing { weights } => {
                OrderCommandPayload::RecordWeighing { order_id, weights }
            }
            KitchenAction::ConfirmPickup { token } => {
                OrderCommandPayload::ConfirmPickup { order_id, token }
            }
            KitchenAction::ManualPickup => OrderCommandPayload::ManualPickup { order_id },
            KitchenAction::Cancel => OrderCommandPayload::Cancel { order_id },
        }
    }
}

/// POST /api/kitchen/orders/{id}/action
pub async fn action(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<KitchenActionRequest>,
) -> AppResult<Json<Order>> {
    let cmd = OrderCommand::new(
        ActorRole::Shop,
        request.operator,
        request.action.into_payload(id.clone()),
    );
    check_command(state.manager.execute_command(cmd))?;

    let order = state
        .manager
        .get_order(&id)
        .map_err(|e| AppError::storage(e.to_string()))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("order {id} not found"))
        })?;
    Ok(Json(order))
}

/// Query params for the open-order listing
#[derive(Debug, Deserialize)]
pub struct OpenOrdersQuery {
    pub shop_id: String,
}

/// Open-order set response
#[derive(Debug, Serialize)]
pub struct OpenOrdersResponse {
    pub orders: Vec<Order>,
    /// Current server sequence; the client starts its sync cursor here
    pub server_sequence: u64,
}

/// GET /api/kitchen/orders?shop_id= - current open-order set
pub async fn open_orders(
    State(state): State<ServerState>,
    Query(query): Query<OpenOrdersQuery>,
) -> AppResult<Json<OpenOrdersResponse>> {
    let orders = state
        .manager
        .get_open_orders(&query.shop_id)
        .map_err(|e| AppError::storage(e.to_string()))?;
    let server_sequence = state
        .manager
        .get_current_sequence()
        .map_err(|e| AppError::storage(e.to_string()))?;
    Ok(Json(OpenOrdersResponse {
        orders,
        server_sequence,
    }))
}
