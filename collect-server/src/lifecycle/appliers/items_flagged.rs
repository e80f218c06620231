//! ItemsFlagged event applier
//!
//! Marks the flagged items unavailable. Their line totals stay as they are -
//! frozen until a substitution decision is applied.

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// ItemsFlagged applier
pub struct ItemsFlaggedApplier;

impl EventApplier for ItemsFlaggedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::ItemsFlagged { flagged } = &event.payload {
            for f in flagged {
                if let Some(item) = order.items.iter_mut().find(|i| i.item_id == f.item_id) {
                    item.available = false;
                }
            }
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{
        ActorRole, FlaggedItem, OrderEventType, OrderItem, OrderStatus, Quantity,
    };

    #[test]
    fn test_flagged_items_marked_with_frozen_totals() {
        let mut order = Order::new("o1".to_string());
        order.items.push(OrderItem::new(
            "i1".to_string(),
            1,
            "Morcilla".to_string(),
            Quantity::Weight { grams: 400 },
            1200,
        ));
        let frozen_total = order.items[0].line_total_cents;

        let event = OrderEvent::new(
            2,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Shop,
            "Maria".to_string(),
            "cmd-2".to_string(),
            OrderStatus::PartiallyDenied,
            OrderEventType::ItemsFlagged,
            EventPayload::ItemsFlagged {
                flagged: vec![FlaggedItem {
                    item_id: "i1".to_string(),
                    candidates: vec![],
                }],
            },
        );

        ItemsFlaggedApplier.apply(&mut order, &event);
        assert_eq!(order.status, OrderStatus::PartiallyDenied);
        assert!(!order.items[0].available);
        assert_eq!(order.items[0].line_total_cents, frozen_total);
    }
}
