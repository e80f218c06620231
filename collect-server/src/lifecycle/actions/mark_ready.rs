//! MarkReady command handler
//!
//! ACCEPTED | PREPARING → READY. Records `actual_ready` and fires the
//! order-ready notification.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// MarkReady action
#[derive(Debug, Clone)]
pub struct MarkReadyAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for MarkReadyAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::Accepted | OrderStatus::Preparing => {}
            current if current.is_terminal() => {
                return Err(OrderError::AlreadyTerminal {
                    order_id: self.order_id.clone(),
                    current,
                });
            }
            current => {
                return Err(OrderError::StateConflict {
                    order_id: self.order_id.clone(),
                    current,
                    action: "mark_ready",
                });
            }
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Ready,
            OrderEventType::ReadyMarked,
            EventPayload::ReadyMarked {
                actual_ready: shared::util::now_millis(),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::storage::LifecycleStorage;
    use shared::order::{ActorRole, Order};

    async fn run_from(status: OrderStatus) -> Result<Vec<OrderEvent>, OrderError> {
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
        let metadata = CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: ActorRole::Shop,
            actor_id: "Maria".to_string(),
            timestamp: 0,
        };
        MarkReadyAction {
            order_id: "o1".to_string(),
        }
        .execute(&mut ctx, &metadata)
        .await
    }

    #[tokio::test]
    async fn test_ready_from_accepted_and_preparing() {
        for status in [OrderStatus::Accepted, OrderStatus::Preparing] {
            let events = run_from(status).await.unwrap();
            assert_eq!(events[0].status, OrderStatus::Ready);
            let EventPayload::ReadyMarked { actual_ready } = &events[0].payload else {
                panic!("expected ReadyMarked payload");
            };
            assert!(*actual_ready > 0);
        }
    }

    #[tokio::test]
    async fn test_ready_rejected_from_pending() {
        let result = run_from(OrderStatus::Pending).await;
        assert!(matches!(result, Err(OrderError::StateConflict { .. })));
    }
}
