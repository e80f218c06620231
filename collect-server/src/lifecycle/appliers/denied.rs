//! Denied event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// Denied applier
pub struct DeniedApplier;

impl EventApplier for DeniedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::Denied { reason } = &event.payload {
            order.deny_reason = Some(reason.clone());
            super::finish(order, event);
        }
    }
}
