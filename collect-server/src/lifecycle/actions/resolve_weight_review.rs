//! ResolveWeightReview command handler
//!
//! WEIGHT_REVIEW → the pre-review state (customer validates the new price)
//! or CANCELLED (customer rejects). The pre-review state is recorded on the
//! order when the freeze happens.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ResolveWeightReview action
#[derive(Debug, Clone)]
pub struct ResolveWeightReviewAction {
    pub order_id: String,
    pub accept: bool,
}

#[async_trait]
impl CommandHandler for ResolveWeightReviewAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::WeightReview => {}
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
                    action: "resolve_weight_review",
                });
            }
        }

        let status = if self.accept {
            order.review_return_status.unwrap_or(OrderStatus::Accepted)
        } else {
            OrderStatus::Cancelled
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
            OrderEventType::WeightReviewResolved,
            EventPayload::WeightReviewResolved {
                accepted: self.accept,
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

    fn store_in_review(storage: &LifecycleStorage, return_status: OrderStatus) {
        let txn = storage.begin_write().unwrap();
        let mut order = Order::new("o1".to_string());
        order.status = OrderStatus::WeightReview;
        order.review_return_status = Some(return_status);
        storage.store_order(&txn, &order).unwrap();
        txn.commit().unwrap();
    }

    #[tokio::test]
    async fn test_validation_resumes_pre_review_state() {
        for return_status in [
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let storage = LifecycleStorage::open_in_memory().unwrap();
            store_in_review(&storage, return_status);
            let txn = storage.begin_write().unwrap();
            let mut ctx = CommandContext::new(&txn, &storage, 3);

            let action = ResolveWeightReviewAction {
                order_id: "o1".to_string(),
                accept: true,
            };
            let events = action.execute(&mut ctx, &metadata()).await.unwrap();
            assert_eq!(events[0].status, return_status);
        }
    }

    #[tokio::test]
    async fn test_rejection_cancels() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        store_in_review(&storage, OrderStatus::Preparing);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 3);

        let action = ResolveWeightReviewAction {
            order_id: "o1".to_string(),
            accept: false,
        };
        let events = action.execute(&mut ctx, &metadata()).await.unwrap();
        assert_eq!(events[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_requires_weight_review_state() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        {
            let txn = storage.begin_write().unwrap();
            let order = Order::new("o1".to_string());
            storage.store_order(&txn, &order).unwrap();
            txn.commit().unwrap();
        }
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ResolveWeightReviewAction {
            order_id: "o1".to_string(),
            accept: true,
        };
        let result = action.execute(&mut ctx, &metadata()).await;
        assert!(matches!(result, Err(OrderError::StateConflict { .. })));
    }
}
