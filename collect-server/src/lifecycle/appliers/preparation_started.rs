//! PreparationStarted event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// PreparationStarted applier
pub struct PreparationStartedApplier;

impl EventApplier for PreparationStartedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::PreparationStarted {} = &event.payload {
            super::finish(order, event);
        }
    }
}
