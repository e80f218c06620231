//! ManualPickup command handler
//!
//! READY → PICKED_UP without token verification. Always available as a
//! fallback (manual orders never got a token), but treated as a lower-trust
//! path: the event is flagged and a warning is logged when a token existed.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ManualPickup action
#[derive(Debug, Clone)]
pub struct ManualPickupAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for ManualPickupAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::Ready => {}
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
                    action: "manual_pickup",
                });
            }
        }

        if order.pickup_token.is_some() {
            tracing::warn!(
                order_id = %self.order_id,
                operator = %metadata.actor_id,
                "manual pickup on an order that has a proof token"
            );
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::PickedUp,
            OrderEventType::PickedUp,
            EventPayload::PickedUp { manual: true },
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
            actor: ActorRole::Shop,
            actor_id: "Maria".to_string(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_manual_pickup_succeeds_with_and_without_token() {
        for token in [None, Some("cafebabe")] {
            let storage = LifecycleStorage::open_in_memory().unwrap();
            {
                let txn = storage.begin_write().unwrap();
                let mut order = Order::new("o1".to_string());
                order.status = OrderStatus::Ready;
                order.pickup_token = token.map(str::to_string);
                storage.store_order(&txn, &order).unwrap();
                txn.commit().unwrap();
            }
            let txn = storage.begin_write().unwrap();
            let mut ctx = CommandContext::new(&txn, &storage, 4);

            let action = ManualPickupAction {
                order_id: "o1".to_string(),
            };
            let events = action.execute(&mut ctx, &metadata()).await.unwrap();
            assert_eq!(events[0].status, OrderStatus::PickedUp);
            let EventPayload::PickedUp { manual } = &events[0].payload else {
                panic!("expected PickedUp payload");
            };
            assert!(manual);
        }
    }

    #[tokio::test]
    async fn test_manual_pickup_requires_ready() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let order = Order::new("o1".to_string());
            storage.store_order(&txn, &order).unwrap();
            txn.commit().unwrap();
        }
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ManualPickupAction {
            order_id: "o1".to_string(),
        };
        let result = action.execute(&mut ctx, &metadata()).await;
        assert!(matches!(result, Err(OrderError::StateConflict { .. })));
    }
}
