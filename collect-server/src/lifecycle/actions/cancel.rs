//! Cancel command handler
//!
//! PENDING | PARTIALLY_DENIED | WEIGHT_REVIEW → CANCELLED. Once the order is
//! ACCEPTED or later, cancellation is no longer exposed to the customer;
//! the kitchen-side escape hatch goes through deny.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// Cancel action
#[derive(Debug, Clone)]
pub struct CancelAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for CancelAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        if !order.status.customer_cancellable() {
            if order.status.is_terminal() {
                return Err(OrderError::AlreadyTerminal {
                    order_id: self.order_id.clone(),
                    current: order.status,
                });
            }
            return Err(OrderError::StateConflict {
                order_id: self.order_id.clone(),
                current: order.status,
                action: "cancel",
            });
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Cancelled,
            OrderEventType::Cancelled,
            EventPayload::Cancelled { by: metadata.actor },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::storage::LifecycleStorage;
    use shared::order::{ActorRole, Order};

    fn metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: ActorRole::Customer,
            actor_id: "cust-9".to_string(),
            timestamp: 0,
        }
    }

    async fn cancel_from(status: OrderStatus) -> Result<Vec<OrderEvent>, OrderError> {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let mut order = Order::new("o1".to_string());
            order.status = status;
            storage.store_order(&txn, &order).unwrap();
            txn.commit().unwrap();
        }
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 1);
        CancelAction {
            order_id: "o1".to_string(),
        }
        .execute(&mut ctx, &metadata())
        .await
    }

    #[tokio::test]
    async fn test_cancellable_states() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::PartiallyDenied,
            OrderStatus::WeightReview,
        ] {
            let events = cancel_from(status).await.unwrap();
            assert_eq!(events[0].status, OrderStatus::Cancelled);
        }
    }

    #[tokio::test]
    async fn test_not_cancellable_once_accepted() {
        for status in [
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::PickedUp,
        ] {
            let result = cancel_from(status).await;
            assert!(matches!(result, Err(OrderError::StateConflict { .. })));
        }
    }

    #[tokio::test]
    async fn test_terminal_is_already_terminal() {
        let result = cancel_from(OrderStatus::Cancelled).await;
        assert!(matches!(result, Err(OrderError::AlreadyTerminal { .. })));
    }
}
