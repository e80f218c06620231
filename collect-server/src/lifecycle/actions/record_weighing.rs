//! RecordWeighing command handler
//!
//! ACCEPTED | PREPARING | READY. Reconciles the scale results against the
//! requested grams. If any item exceeds +tolerance the order freezes at
//! WEIGHT_REVIEW pending customer consent; otherwise totals are recomputed
//! silently and the order stays where it is.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::reconcile::weight::{reconcile_weights, requires_review};
use shared::order::{
    EventPayload, OrderEvent, OrderEventType, OrderStatus, WeightInput,
};

/// RecordWeighing action
#[derive(Debug, Clone)]
pub struct RecordWeighingAction {
    pub order_id: String,
    pub weights: Vec<WeightInput>,
    /// Injected from config (default 10%)
    pub tolerance_percent: f64,
}

#[async_trait]
impl CommandHandler for RecordWeighingAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        if !order.status.weighable() {
            if order.status.is_terminal() {
                return Err(OrderError::AlreadyTerminal {
                    order_id: self.order_id.clone(),
                    current: order.status,
                });
            }
            return Err(OrderError::StateConflict {
                order_id: self.order_id.clone(),
                current: order.status,
                action: "record_weighing",
            });
        }

        if self.weights.is_empty() {
            return Err(OrderError::Validation(
                "at least one weighed item is required".to_string(),
            ));
        }

        let checks = reconcile_weights(&order.items, &self.weights, self.tolerance_percent)?;

        // Recompute the order total with adjusted line prices
        let mut total_cents = 0i64;
        for item in &order.items {
            let adjusted = checks
                .iter()
                .find(|c| c.item_id == item.item_id)
                .map(|c| c.adjusted_price_cents);
            total_cents += adjusted.unwrap_or(item.line_total_cents);
        }

        let review_required = requires_review(&checks);
        let status = if review_required {
            OrderStatus::WeightReview
        } else {
            order.status
        };

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            status,
            OrderEventType::WeightRecorded,
            EventPayload::WeightRecorded {
                checks,
                total_cents,
                review_required,
            },
        );

        Ok(vec![event])
    }
}
