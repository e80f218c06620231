//! Accepted event applier
//!
//! Sets the acceptance timestamps and stores the pickup proof. The token is
//! written once: a replayed or duplicate event never overwrites an existing
//! proof.

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// Accepted applier
pub struct AcceptedApplier;

impl EventApplier for AcceptedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::Accepted {
            estimated_ready,
            shop_note,
            pickup_token,
            ..
        } = &event.payload
        {
            order.accepted_at = Some(event.timestamp);
            order.estimated_ready = Some(*estimated_ready);
            if shop_note.is_some() {
                order.shop_note = shop_note.clone();
            }
            if order.pickup_token.is_none() {
                order.pickup_token = Some(pickup_token.clone());
            }

            super::finish(order, event);
        }
    }
}
