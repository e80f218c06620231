//! TimeAdded event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// TimeAdded applier
pub struct TimeAddedApplier;

impl EventApplier for TimeAddedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::TimeAdded { estimated_ready, .. } = &event.payload {
            order.estimated_ready = Some(*estimated_ready);
            super::finish(order, event);
        }
    }
}
