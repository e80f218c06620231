//! Submit command handler
//!
//! Creates the order in PENDING after the admission gate has already passed.
//! Items arrive priced from the catalog; the order number is pre-generated by
//! the manager outside the transaction.

use async_trait::async_trait;

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    order_total_cents, EventPayload, OrderEvent, OrderEventType, OrderItem, OrderStatus,
    PickupTime,
};

/// Submit action
#[derive(Debug, Clone)]
pub struct SubmitAction {
    /// Pre-generated order ID
    pub order_id: String,
    pub shop_id: String,
    /// Pre-generated shop-scoped number
    pub number: String,
    /// Items priced against the catalog
    pub items: Vec<OrderItem>,
    pub requested_time: PickupTime,
    pub payment_method: String,
    pub customer_note: Option<String>,
    pub quoted_prep_minutes: u32,
}

#[async_trait]
impl CommandHandler for SubmitAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::Validation("order has no items".to_string()));
        }
        if ctx.load_order(&self.order_id).is_ok() {
            return Err(OrderError::Validation(format!(
                "order id collision: {}",
                self.order_id
            )));
        }

        let total_cents = order_total_cents(&self.items);
        let seq = ctx.next_sequence();

        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            self.shop_id.clone(),
            metadata.actor,
            metadata.actor_id.clone(),
            metadata.command_id.clone(),
            OrderStatus::Pending,
            OrderEventType::Submitted,
            EventPayload::Submitted {
                number: self.number.clone(),
                items: self.items.clone(),
                total_cents,
                requested_time: self.requested_time,
                payment_method: self.payment_method.clone(),
                customer_note: self.customer_note.clone(),
                quoted_prep_minutes: self.quoted_prep_minutes,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::storage::LifecycleStorage;
    use shared::order::{ActorRole, Quantity};

    fn metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: ActorRole::Customer,
            actor_id: "cust-9".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    fn item(grams: u32, price: i64) -> OrderItem {
        OrderItem::new(
            "i1".to_string(),
            1,
            "Chuleta".to_string(),
            Quantity::Weight { grams },
            price,
        )
    }

    #[tokio::test]
    async fn test_submit_creates_pending_event_with_total() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = SubmitAction {
            order_id: "o1".to_string(),
            shop_id: "s1".to_string(),
            number: "ORD202608081001".to_string(),
            items: vec![item(500, 2000)],
            requested_time: PickupTime::Asap,
            payment_method: "CASH".to_string(),
            customer_note: Some("no fat please".to_string()),
            quoted_prep_minutes: 25,
        };

        let events = action.execute(&mut ctx, &metadata()).await.unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.sequence, 1);
        assert_eq!(event.status, OrderStatus::Pending);
        assert_eq!(event.event_type, OrderEventType::Submitted);

        let EventPayload::Submitted {
            number, total_cents, ..
        } = &event.payload
        else {
            panic!("expected Submitted payload");
        };
        assert_eq!(number, "ORD202608081001");
        assert_eq!(*total_cents, 1000);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_order() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = SubmitAction {
            order_id: "o1".to_string(),
            shop_id: "s1".to_string(),
            number: "ORD202608081001".to_string(),
            items: vec![],
            requested_time: PickupTime::Asap,
            payment_method: "CASH".to_string(),
            customer_note: None,
            quoted_prep_minutes: 20,
        };

        let result = action.execute(&mut ctx, &metadata()).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }
}
