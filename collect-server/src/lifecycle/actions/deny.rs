//! Deny command handler
//!
//! PENDING → DENIED. The reason is stored on the order and sent with the
//! cancellation notification.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// Deny action
#[derive(Debug, Clone)]
pub struct DenyAction {
    pub order_id: String,
    pub reason: String,
}

#[async_trait]
impl CommandHandler for DenyAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::Pending => {}
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
                    action: "deny",
                });
            }
        }

        if self.reason.trim().is_empty() {
            return Err(OrderError::Validation("deny reason is required".to_string()));
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Denied,
            OrderEventType::Denied,
            EventPayload::Denied {
                reason: self.reason.clone(),
            },
        );

        Ok(vec![event])
    }
}
