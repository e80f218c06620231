//! Customer order handlers
//!
//! Submission runs the full admission path: request validation, catalog price
//! check, availability gate, then the lifecycle Submit command. Everything
//! else wraps a customer lifecycle command and returns the updated record.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::check_command;
use crate::catalog::ProductCatalog;
use crate::core::ServerState;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{
    line_total_cents, ActorRole, ItemDecision, Order, OrderCommand, OrderCommandPayload,
    OrderEvent, PickupTime, Quantity, SubmittedItem,
};
use shared::util::now_millis;

/// Order submission request
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitOrderRequest {
    #[validate(length(min = 1))]
    pub shop_id: String,
    /// Customer identity reference (auth is out of scope; opaque here)
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(length(min = 1))]
    pub items: Vec<SubmitItemRequest>,
    #[serde(default)]
    pub requested_time: PickupTime,
    #[validate(length(min = 1))]
    pub payment_method: String,
    pub customer_note: Option<String>,
    /// Total the customer saw; rejected when it disagrees with the catalog
    pub expected_total_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitItemRequest {
    pub product_id: i64,
    pub quantity: Quantity,
}

/// Created order plus the quoted prep time
#[derive(Debug, Serialize)]
pub struct SubmitOrderResponse {
    pub order: Order,
    pub quoted_prep_minutes: u32,
}

/// POST /api/orders - admission
pub async fn submit(
    State(state): State<ServerState>,
    Json(request): Json<SubmitOrderRequest>,
) -> AppResult<Json<SubmitOrderResponse>> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    // Catalog price check before any state change
    if let Some(expected) = request.expected_total_cents {
        let mut computed = 0i64;
        for item in &request.items {
            let product = state.catalog.get_product(item.product_id).ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("product {} not found", item.product_id),
                )
            })?;
            computed += line_total_cents(item.quantity, product.unit_price_cents);
        }
        if computed != expected {
            return Err(AppError::new(ErrorCode::PriceMismatch)
                .with_detail("expected", expected)
                .with_detail("computed", computed));
        }
    }

    // Admission gate: availability + capacity
    let admission = state.availability.can_admit(&request.shop_id, now_millis())?;

    let cmd = OrderCommand::new(
        ActorRole::Customer,
        request.customer_id.clone(),
        OrderCommandPayload::Submit {
            shop_id: request.shop_id.clone(),
            items: request
                .items
                .iter()
                .map(|i| SubmittedItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
            requested_time: request.requested_time,
            payment_method: request.payment_method.clone(),
            customer_note: request.customer_note.clone(),
            quoted_prep_minutes: admission.quoted_prep_minutes,
        },
    );

    let response = state.manager.execute_command(cmd);
    let order_id = response.order_id.clone();
    check_command(response)?;

    let order_id = order_id.ok_or_else(|| AppError::internal("submit produced no order id"))?;
    let order = load_order(&state, &order_id)?;
    Ok(Json(SubmitOrderResponse {
        order,
        quoted_prep_minutes: admission.quoted_prep_minutes,
    }))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(load_order(&state, &id)?))
}

/// GET /api/orders/{id}/timeline
pub async fn timeline(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderEvent>>> {
    // 404 for unknown orders, empty timeline is impossible for known ones
    load_order(&state, &id)?;
    let events = state
        .manager
        .get_timeline(&id)
        .map_err(|e| AppError::storage(e.to_string()))?;
    Ok(Json(events))
}

/// Stock resolution request: one decision per flagged item
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub customer_id: String,
    pub decisions: Vec<ItemDecision>,
}

/// POST /api/orders/{id}/resolve
pub async fn resolve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<ResolveRequest>,
) -> AppResult<Json<Order>> {
    let cmd = OrderCommand::new(
        ActorRole::Customer,
        request.customer_id,
        OrderCommandPayload::ResolveAlternatives {
            order_id: id.clone(),
            decisions: request.decisions,
        },
    );
    check_command(state.manager.execute_command(cmd))?;
    Ok(Json(load_order(&state, &id)?))
}

/// Weight-review consent request
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub customer_id: String,
    /// true = validate the new price, false = reject and cancel
    pub accept: bool,
}

/// POST /api/orders/{id}/review
pub async fn review(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> AppResult<Json<Order>> {
    let cmd = OrderCommand::new(
        ActorRole::Customer,
        request.customer_id,
        OrderCommandPayload::ResolveWeightReview {
            order_id: id.clone(),
            accept: request.accept,
        },
    );
    check_command(state.manager.execute_command(cmd))?;
    Ok(Json(load_order(&state, &id)?))
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub customer_id: String,
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<CancelRequest>,
) -> AppResult<Json<Order>> {
    let cmd = OrderCommand::new(
        ActorRole::Customer,
        request.customer_id,
        OrderCommandPayload::Cancel {
            order_id: id.clone(),
        },
    );
    check_command(state.manager.execute_command(cmd))?;
    Ok(Json(load_order(&state, &id)?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateRequest {
    pub customer_id: String,
    #[validate(range(min = 1, max = 5))]
    pub score: u8,
    pub comment: Option<String>,
}

/// POST /api/orders/{id}/rate
pub async fn rate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<Order>> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let cmd = OrderCommand::new(
        ActorRole::Customer,
        request.customer_id,
        OrderCommandPayload::Rate {
            order_id: id.clone(),
            score: request.score,
            comment: request.comment,
        },
    );
    check_command(state.manager.execute_command(cmd))?;
    Ok(Json(load_order(&state, &id)?))
}

fn load_order(state: &ServerState, order_id: &str) -> AppResult<Order> {
    state
        .manager
        .get_order(order_id)
        .map_err(|e| AppError::storage(e.to_string()))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("order {order_id} not found"))
        })
}
