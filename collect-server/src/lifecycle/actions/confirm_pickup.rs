//! ConfirmPickup command handler
//!
//! READY → PICKED_UP when the presented token byte-matches the stored proof.
//! A mismatch leaves the order in READY. Single-use is implicit: the
//! transition leaves READY, so a replay hits a state conflict.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::pickup::{confirm, PickupCheck};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ConfirmPickup action
#[derive(Debug, Clone)]
pub struct ConfirmPickupAction {
    pub order_id: String,
    pub token: String,
}

#[async_trait]
impl CommandHandler for ConfirmPickupAction {
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
                    action: "confirm_pickup",
                });
            }
        }

        match confirm(&order, &self.token) {
            PickupCheck::Ok => {}
            PickupCheck::Mismatch | PickupCheck::NoTokenIssued => {
                return Err(OrderError::PickupMismatch);
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
            OrderStatus::PickedUp,
            OrderEventType::PickedUp,
            EventPayload::PickedUp { manual: false },
        );

        Ok(vec![event])
    }
}
