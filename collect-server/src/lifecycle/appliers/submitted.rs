//! Submitted event applier
//!
//! Fills the freshly created order record from the admission payload.

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// Submitted applier
pub struct SubmittedApplier;

impl EventApplier for SubmittedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::Submitted {
            number,
            items,
            total_cents,
            requested_time,
            payment_method,
            customer_note,
            quoted_prep_minutes,
        } = &event.payload
        {
            order.shop_id = event.shop_id.clone();
            order.number = number.clone();
            order.items = items.clone();
            order.total_cents = *total_cents;
            order.requested_time = *requested_time;
            order.payment_method = payment_method.clone();
            order.customer_note = customer_note.clone();
            order.quoted_prep_minutes = *quoted_prep_minutes;
            order.created_at = event.timestamp;

            super::finish(order, event);
        }
    }
}
