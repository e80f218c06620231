//! FlagUnavailable command handler
//!
//! PENDING → PARTIALLY_DENIED. Marks the given items unavailable (freezing
//! their line totals) and attaches substitution candidates for the customer
//! to choose from.

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::ProductCatalog;
use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::reconcile::stock::propose_candidates;
use shared::order::{EventPayload, FlaggedItem, OrderEvent, OrderEventType, OrderStatus};

/// FlagUnavailable action
pub struct FlagUnavailableAction {
    pub order_id: String,
    pub item_ids: Vec<String>,
    /// Catalog handle for candidate proposal
    pub catalog: Arc<dyn ProductCatalog>,
}

#[async_trait]
impl CommandHandler for FlagUnavailableAction {
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
                    action: "item_unavailable",
                });
            }
        }

        if self.item_ids.is_empty() {
            return Err(OrderError::Validation(
                "at least one item must be flagged".to_string(),
            ));
        }

        let mut flagged = Vec::with_capacity(self.item_ids.len());
        for item_id in &self.item_ids {
            let item = order
                .item(item_id)
                .ok_or_else(|| OrderError::Validation(format!("unknown item: {item_id}")))?;
            flagged.push(FlaggedItem {
                item_id: item_id.clone(),
                candidates: propose_candidates(self.catalog.as_ref(), item),
            });
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            order.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::PartiallyDenied,
            OrderEventType::ItemsFlagged,
            EventPayload::ItemsFlagged { flagged },
        );

        Ok(vec![event])
    }
}
