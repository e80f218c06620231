//! StartPreparing command handler
//!
//! ACCEPTED → PREPARING.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// StartPreparing action
#[derive(Debug, Clone)]
pub struct StartPreparingAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for StartPreparingAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::Accepted => {}
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
                    action: "start_preparing",
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
            OrderStatus::Preparing,
            OrderEventType::PreparationStarted,
            EventPayload::PreparationStarted {},
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::storage::LifecycleStorage;
    use shared::order::{ActorRole, Order};

    #[tokio::test]
    async fn test_start_preparing_from_accepted() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let mut order = Order::new("o1".to_string());
            order.status = OrderStatus::Accepted;
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

        let action = StartPreparingAction {
            order_id: "o1".to_string(),
        };
        let events = action.execute(&mut ctx, &metadata).await.unwrap();
        assert_eq!(events[0].status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_start_preparing_rejected_from_pending() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let order = Order::new("o1".to_string());
            storage.store_order(&txn, &order).unwrap();
            txn.commit().unwrap();
        }
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let metadata = CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: ActorRole::Shop,
            actor_id: "Maria".to_string(),
            timestamp: 0,
        };

        let action = StartPreparingAction {
            order_id: "o1".to_string(),
        };
        let result = action.execute(&mut ctx, &metadata).await;
        assert!(matches!(result, Err(OrderError::StateConflict { .. })));
    }
}
