//! AlternativesResolved event applier
//!
//! Replaces the item set with the decided one and recomputes the total. The
//! accepted path may carry a first-time pickup token and an ETA.

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// AlternativesResolved applier
pub struct AlternativesResolvedApplier;

impl EventApplier for AlternativesResolvedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::AlternativesResolved {
            items,
            total_cents,
            pickup_token,
            estimated_ready,
            ..
        } = &event.payload
        {
            order.items = items.clone();
            order.total_cents = *total_cents;
            if order.pickup_token.is_none() {
                order.pickup_token = pickup_token.clone();
            }
            if estimated_ready.is_some() {
                order.estimated_ready = *estimated_ready;
                order.accepted_at = Some(event.timestamp);
            }
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ActorRole, OrderEventType, OrderItem, OrderStatus, Quantity};

    #[test]
    fn test_resolution_replaces_items_and_total() {
        let mut order = Order::new("o1".to_string());
        let mut flagged = OrderItem::new(
            "i1".to_string(),
            1,
            "cut-1".to_string(),
            Quantity::Weight { grams: 500 },
            2000,
        );
        flagged.available = false;
        order.items.push(flagged);
        order.status = OrderStatus::PartiallyDenied;
        order.total_cents = 1000;

        let replacement = OrderItem::new(
            "i1".to_string(),
            2,
            "cut-2".to_string(),
            Quantity::Weight { grams: 500 },
            1800,
        );

        let event = OrderEvent::new(
            3,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Customer,
            "cust-9".to_string(),
            "cmd-3".to_string(),
            OrderStatus::Accepted,
            OrderEventType::AlternativesResolved,
            EventPayload::AlternativesResolved {
                decisions: vec![],
                items: vec![replacement],
                total_cents: 900,
                cancelled: false,
                pickup_token: Some("cafebabe".to_string()),
                estimated_ready: Some(2_000_000),
            },
        );

        AlternativesResolvedApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.items[0].product_id, 2);
        assert_eq!(order.total_cents, 900);
        assert_eq!(order.pickup_token.as_deref(), Some("cafebabe"));
        assert_eq!(order.estimated_ready, Some(2_000_000));
    }

    #[test]
    fn test_cancelled_resolution_empties_order() {
        let mut order = Order::new("o1".to_string());
        order.status = OrderStatus::PartiallyDenied;
        order.total_cents = 1000;

        let event = OrderEvent::new(
            3,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Customer,
            "cust-9".to_string(),
            "cmd-3".to_string(),
            OrderStatus::Cancelled,
            OrderEventType::AlternativesResolved,
            EventPayload::AlternativesResolved {
                decisions: vec![],
                items: vec![],
                total_cents: 0,
                cancelled: true,
                pickup_token: None,
                estimated_ready: None,
            },
        );

        AlternativesResolvedApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.items.is_empty());
        // Total reaches 0 before the cancellation lands
        assert_eq!(order.total_cents, 0);
        assert!(order.pickup_token.is_none());
    }
}
