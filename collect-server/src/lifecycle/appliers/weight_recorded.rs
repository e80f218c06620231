//! WeightRecorded event applier
//!
//! Applies adjusted line prices and the recomputed total. When the check
//! demands review, the pre-freeze status is remembered so validation can
//! resume the pipeline where it left off.

use crate::lifecycle::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent, OrderStatus};

/// WeightRecorded applier
pub struct WeightRecordedApplier;

impl EventApplier for WeightRecordedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::WeightRecorded {
            checks,
            total_cents,
            review_required,
        } = &event.payload
        {
            for check in checks {
                if let Some(item) = order.items.iter_mut().find(|i| i.item_id == check.item_id) {
                    item.line_total_cents = check.adjusted_price_cents;
                }
            }
            order.total_cents = *total_cents;

            if *review_required && event.status == OrderStatus::WeightReview {
                order.review_return_status = Some(order.status);
            }
            super::finish(order, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{
        ActorRole, OrderEventType, OrderItem, Quantity, WeightCheck, WeightVerdict,
    };

    fn weight_event(review: bool, status: OrderStatus) -> OrderEvent {
        OrderEvent::new(
            4,
            "o1".to_string(),
            "s1".to_string(),
            ActorRole::Shop,
            "Maria".to_string(),
            "cmd-4".to_string(),
            status,
            OrderEventType::WeightRecorded,
            EventPayload::WeightRecorded {
                checks: vec![WeightCheck {
                    item_id: "i1".to_string(),
                    requested_grams: 500,
                    actual_grams: 560,
                    deviation_percent: 12.0,
                    adjusted_price_cents: 1120,
                    verdict: WeightVerdict::Exceeds,
                }],
                total_cents: 1120,
                review_required: review,
            },
        )
    }

    fn preparing_order() -> Order {
        let mut order = Order::new("o1".to_string());
        order.status = OrderStatus::Preparing;
        order.items.push(OrderItem::new(
            "i1".to_string(),
            1,
            "Secreto".to_string(),
            Quantity::Weight { grams: 500 },
            2000,
        ));
        order.total_cents = 1000;
        order
    }

    #[test]
    fn test_review_freeze_remembers_return_status() {
        let mut order = preparing_order();
        WeightRecordedApplier.apply(&mut order, &weight_event(true, OrderStatus::WeightReview));

        assert_eq!(order.status, OrderStatus::WeightReview);
        assert_eq!(order.review_return_status, Some(OrderStatus::Preparing));
        assert_eq!(order.items[0].line_total_cents, 1120);
        assert_eq!(order.total_cents, 1120);
    }

    #[test]
    fn test_silent_recompute_keeps_status() {
        let mut order = preparing_order();
        WeightRecordedApplier.apply(&mut order, &weight_event(false, OrderStatus::Preparing));

        assert_eq!(order.status, OrderStatus::Preparing);
        assert!(order.review_return_status.is_none());
        assert_eq!(order.total_cents, 1120);
    }
}
