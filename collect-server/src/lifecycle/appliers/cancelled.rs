//! Cancelled event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// Cancelled applier
pub struct CancelledApplier;

impl EventApplier for CancelledApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::Cancelled { .. } = &event.payload {
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ActorRole, OrderEventType, OrderStatus};

    #[test]
    fn test_cancelled_is_terminal() {
        let mut order = Order::new("o1".to_string());

        let event = OrderEvent::new(
            2,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Customer,
            "cust-9".to_string(),
            "cmd-2".to_string(),
            OrderStatus::Cancelled,
            OrderEventType::Cancelled,
            EventPayload::Cancelled {
                by: ActorRole::Customer,
            },
        );

        CancelledApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.is_terminal());
        assert!(!order.is_open());
    }
}
