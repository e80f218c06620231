//! AddTime command handler
//!
//! ACCEPTED | PREPARING, stays in place. Extends `estimated_ready`; the ETA
//! is advisory for the customer UI and never changes state by itself.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// AddTime action
#[derive(Debug, Clone)]
pub struct AddTimeAction {
    pub order_id: String,
    pub minutes: u32,
}

#[async_trait]
impl CommandHandler for AddTimeAction {
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
                    action: "add_time",
                });
            }
        }

        if self.minutes == 0 {
            return Err(OrderError::Validation("minutes must be at least 1".to_string()));
        }

        let base = order
            .estimated_ready
            .unwrap_or_else(shared::util::now_millis);
        let estimated_ready = base + self.minutes as i64 * 60_000;

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            order.status,
            OrderEventType::TimeAdded,
            EventPayload::TimeAdded {
                minutes: self.minutes,
                estimated_ready,
            },
        );

        Ok(vec![event])
    }
}
