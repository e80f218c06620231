//! Accept command handler
//!
//! PENDING → ACCEPTED. Issues the pickup proof token (exactly once, here) and
//! quotes the estimated ready time.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// Accept action
#[derive(Debug, Clone)]
pub struct AcceptAction {
    pub order_id: String,
    pub eta_minutes: u32,
    pub shop_note: Option<String>,
}

#[async_trait]
impl CommandHandler for AcceptAction {
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
                    action: "accept",
                });
            }
        }

        if self.eta_minutes == 0 {
            return Err(OrderError::Validation(
                "eta_minutes must be at least 1".to_string(),
            ));
        }

        let now = shared::util::now_millis();
        let estimated_ready = now + self.eta_minutes as i64 * 60_000;
        let pickup_token = shared::util::pickup_token();

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Accepted,
            OrderEventType::Accepted,
            EventPayload::Accepted {
                eta_minutes: self.eta_minutes,
                estimated_ready,
                shop_note: self.shop_note.clone(),
                pickup_token,
            },
        );

        Ok(vec![event])
    }
}
