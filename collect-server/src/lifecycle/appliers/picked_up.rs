//! PickedUp event applier

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// PickedUp applier
pub struct PickedUpApplier;

impl EventApplier for PickedUpApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::PickedUp { .. } = &event.payload {
            order.picked_up_at = Some(event.timestamp);
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ActorRole, OrderEventType, OrderStatus};

    #[test]
    fn test_picked_up_sets_timestamp() {
        let mut order = Order::new("o1".to_string());
        order.status = OrderStatus::Ready;

        let event = OrderEvent::new(
            5,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Shop,
            "Maria".to_string(),
            "cmd-5".to_string(),
            OrderStatus::PickedUp,
            OrderEventType::PickedUp,
            EventPayload::PickedUp { manual: false },
        );

        PickedUpApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::PickedUp);
        assert_eq!(order.picked_up_at, Some(event.timestamp));
    }
}
