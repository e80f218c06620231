//! ResolveAlternatives command handler
//!
//! PARTIALLY_DENIED → ACCEPTED or CANCELLED. The customer submits exactly one
//! decision per flagged item; the total is recomputed from the resulting item
//! set, and an empty set cancels the order instead of accepting it.
//!
//! The accepted path is the order's first transition into ACCEPTED, so the
//! pickup proof token is issued here (the invariant is one issuance per
//! order, at whichever transition enters ACCEPTED first).

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::ProductCatalog;
use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::reconcile::stock::apply_decisions;
use shared::order::{EventPayload, ItemDecision, OrderEvent, OrderEventType, OrderStatus};

/// ResolveAlternatives action
pub struct ResolveAlternativesAction {
    pub order_id: String,
    pub decisions: Vec<ItemDecision>,
    /// Catalog handle for substitute validation and pricing
    pub catalog: Arc<dyn ProductCatalog>,
}

#[async_trait]
impl CommandHandler for ResolveAlternativesAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let order = ctx.load_order(&self.order_id)?;

        match order.status {
            OrderStatus::PartiallyDenied => {}
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
                    action: "resolve_alternatives",
                });
            }
        }

        let (items, total_cents) =
            apply_decisions(&order.items, &self.decisions, self.catalog.as_ref())?;

        let cancelled = items.is_empty();
        let (status, pickup_token, estimated_ready) = if cancelled {
            (OrderStatus::Cancelled, None, None)
        } else {
            let token = order
                .pickup_token
                .clone()
                .unwrap_or_else(shared::util::pickup_token);
            let eta = shared::util::now_millis()
                + order.quoted_prep_minutes.max(1) as i64 * 60_000;
            (OrderStatus::Accepted, Some(token), Some(eta))
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
            OrderEventType::AlternativesResolved,
            EventPayload::AlternativesResolved {
                decisions: self.decisions.clone(),
                items,
                total_cents,
                cancelled,
                pickup_token,
                estimated_ready,
            },
        );

        Ok(vec![event])
    }
}
