//! ReadyMarked event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// ReadyMarked applier
pub struct ReadyMarkedApplier;

impl EventApplier for ReadyMarkedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::ReadyMarked { actual_ready } = &event.payload {
            order.actual_ready = Some(*actual_ready);
            super::finish(order, event);
        }
    }
}
