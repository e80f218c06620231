//! AutoCancelled event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// AutoCancelled applier
pub struct AutoCancelledApplier;

impl EventApplier for AutoCancelledApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::AutoCancelled { .. } = &event.payload {
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ActorRole, OrderEventType, OrderStatus};

    #[test]
    fn test_auto_cancelled_is_terminal() {
        let mut order = Order::new("o1".to_string());

        let event = OrderEvent::new(
            2,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Sweeper,
            "sweeper".to_string(),
            "cmd-2".to_string(),
            OrderStatus::AutoCancelled,
            OrderEventType::AutoCancelled,
            EventPayload::AutoCancelled { age_minutes: 75 },
        );

        AutoCancelledApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::AutoCancelled);
        assert!(order.is_terminal());
    }
}
