//! Rated event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent, Rating};

/// Rated applier
pub struct RatedApplier;

impl EventApplier for RatedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::Rated { score, comment } = &event.payload {
            order.rating = Some(Rating {
                score: *score,
                comment: comment.clone(),
            });
            super::finish(order, event);
        }
    }
}
