//! Rate command handler
//!
//! PICKED_UP → COMPLETED. The score feeds the shop's rolling average (folded
//! in by the manager on commit).

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// Rate action
#[derive(Debug, Clone)]
pub struct RateAction {
    pub order_id: String,
    pub score: u8,
    pub comment: Option<String>,
}

#[async_trait]
impl CommandHandler for RateAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::PickedUp => {}
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
                    action: "rate",
                });
            }
        }

        if !(1..=5).contains(&self.score) {
            return Err(OrderError::RatingOutOfRange(self.score));
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Completed,
            OrderEventType::Rated,
            EventPayload::Rated {
                score: self.score,
                comment: self.comment.clone(),
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

    fn metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: ActorRole::Customer,
            actor_id: "cust-9".to_string(),
            timestamp: 0,
        }
    }

    async fn rate(score: u8, status: OrderStatus) -> Result<Vec<OrderEvent>, OrderError> {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let mut order = Order::new("o1".to_string());
            order.status = status;
            storage.store_order(&txn, &order).unwrap();
            txn.commit().unwrap();
        }
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 5);
        RateAction {
            order_id: "o1".to_string(),
            score,
            comment: Some("great cut".to_string()),
        }
        .execute(&mut ctx, &metadata())
        .await
    }

    #[tokio::test]
    async fn test_rating_completes_order() {
        let events = rate(5, OrderStatus::PickedUp).await.unwrap();
        assert_eq!(events[0].status, OrderStatus::Completed);
        let EventPayload::Rated { score, comment } = &events[0].payload else {
            panic!("expected Rated payload");
        };
        assert_eq!(*score, 5);
        assert_eq!(comment.as_deref(), Some("great cut"));
    }

    #[tokio::test]
    async fn test_score_bounds() {
        assert!(matches!(
            rate(0, OrderStatus::PickedUp).await,
            Err(OrderError::RatingOutOfRange(0))
        ));
        assert!(matches!(
            rate(6, OrderStatus::PickedUp).await,
            Err(OrderError::RatingOutOfRange(6))
        ));
        assert!(rate(1, OrderStatus::PickedUp).await.is_ok());
    }

    #[tokio::test]
    async fn test_rating_requires_picked_up() {
        let result = rate(4, OrderStatus::Ready).await;
        assert!(matches!(result, Err(OrderError::StateConflict { .. })));
    }
}
