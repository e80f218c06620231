//! AutoCancel command handler (sweeper only)
//!
//! PENDING → AUTO_CANCELLED once the order has sat unanswered past the
//! timeout. `now` comes from the sweep invocation, not the wall clock, so
//! the cutoff is unit-testable.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// AutoCancel action
#[derive(Debug, Clone)]
pub struct AutoCancelAction {
    pub order_id: String,
    /// Sweep time (Unix millis)
    pub now: i64,
    pub timeout_minutes: u32,
}

#[async_trait]
impl CommandHandler for AutoCancelAction {
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
                    action: "auto_cancel",
                });
            }
        }

        let age_ms = self.now - order.created_at;
        let timeout_ms = self.timeout_minutes as i64 * 60_000;
        if age_ms <= timeout_ms {
            return Err(OrderError::Validation(format!(
                "order {} is only {}ms old, timeout is {}ms",
                self.order_id, age_ms, timeout_ms
            )));
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::AutoCancelled,
            OrderEventType::AutoCancelled,
            EventPayload::AutoCancelled {
                age_minutes: age_ms / 60_000,
            },
        );

        Ok(vec![event])
    }
}
