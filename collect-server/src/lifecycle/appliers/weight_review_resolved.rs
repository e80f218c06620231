//! WeightReviewResolved event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// WeightReviewResolved applier
pub struct WeightReviewResolvedApplier;

impl EventApplier for WeightReviewResolvedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::WeightReviewResolved { .. } = &event.payload {
            order.review_return_status = None;
            super::finish(order, event);
        }
    }
}
