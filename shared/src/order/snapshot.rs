//! Order record - computed state from the event stream
//!
//! The record includes a `state_checksum` field for drift detection. A kitchen
//! client replaying the same events can compare its locally computed checksum
//! with the server's and trigger a full sync on divergence.

use super::item::OrderItem;
use super::status::OrderStatus;
use super::types::{PickupTime, Rating};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Order record - computed from the event stream
///
/// Mutated only by event application; never deleted (terminal orders are
/// retained for history).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by server)
    pub order_id: String,
    /// Shop this order belongs to
    pub shop_id: String,
    /// Shop-scoped sequential human-readable number
    pub number: String,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Ordered items
    pub items: Vec<OrderItem>,
    /// Total amount in cents; invariant: sum of item line totals
    pub total_cents: i64,
    /// Requested pickup time
    pub requested_time: PickupTime,
    /// Prep minutes quoted by the admission gate
    #[serde(default)]
    pub quoted_prep_minutes: u32,
    /// Payment method chosen at submission
    pub payment_method: String,
    /// Customer note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    /// Shop-side note (set at acceptance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_note: Option<String>,
    /// Deny reason (set on DENIED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny_reason: Option<String>,
    /// Rating (set on COMPLETED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Pickup proof token - set exactly once at acceptance, immutable after
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_token: Option<String>,
    /// Status to resume after WEIGHT_REVIEW validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_return_status: Option<OrderStatus>,

    // ========== Timestamps (Unix millis) ==========
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<i64>,
    /// Advisory ETA shown to the customer; never changes state by itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_ready: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_ready: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<i64>,
    /// Last update timestamp
    pub updated_at: i64,

    /// Last applied event sequence (for incremental sync)
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string)
    #[serde(default)]
    pub state_checksum: String,
}

impl Order {
    /// Create an empty order record; the Submitted event fills it in
    pub fn new(order_id: String) -> Self {
        let now = crate::util::now_millis();
        let mut order = Self {
            order_id,
            shop_id: String::new(),
            number: String::new(),
            status: OrderStatus::Pending,
            items: Vec::new(),
            total_cents: 0,
            requested_time: PickupTime::Asap,
            quoted_prep_minutes: 0,
            payment_method: String::new(),
            customer_note: None,
            shop_note: None,
            deny_reason: None,
            rating: None,
            pickup_token: None,
            review_return_status: None,
            created_at: now,
            accepted_at: None,
            estimated_ready: None,
            actual_ready: None,
            picked_up_at: None,
            updated_at: now,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        order.update_checksum();
        order
    }

    /// Check if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the order belongs to the kitchen display open set
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Items currently flagged unavailable
    pub fn flagged_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|i| !i.available)
    }

    /// Find an item by instance ID
    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Compute state checksum for drift detection
    ///
    /// Computed from key fields that must match between server and client
    /// after applying the same events. Returns a 16-character hex string.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();
        self.items.len().hash(&mut hasher);
        self.total_cents.hash(&mut hasher);
        self.last_sequence.hash(&mut hasher);
        (self.status as u8).hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Verify that the state_checksum matches the computed checksum
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::item::Quantity;

    #[test]
    fn test_new_order_starts_pending() {
        let order = Order::new("o1".to_string());
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.items.is_empty());
        assert!(order.pickup_token.is_none());
        assert!(order.verify_checksum());
    }

    #[test]
    fn test_checksum_changes_with_state() {
        let mut order = Order::new("o1".to_string());
        let before = order.state_checksum.clone();

        order.items.push(OrderItem::new(
            "i1".into(),
            1,
            "Lomo".into(),
            Quantity::Weight { grams: 300 },
            1500,
        ));
        order.total_cents = 450;
        order.last_sequence = 1;
        order.update_checksum();

        assert_ne!(order.state_checksum, before);
        assert!(order.verify_checksum());
    }

    #[test]
    fn test_flagged_items_filter() {
        let mut order = Order::new("o1".to_string());
        order.items.push(OrderItem::new(
            "i1".into(),
            1,
            "Lomo".into(),
            Quantity::Weight { grams: 300 },
            1500,
        ));
        order.items.push(OrderItem::new(
            "i2".into(),
            2,
            "Pan".into(),
            Quantity::Count { units: 1 },
            120,
        ));
        order.items[0].available = false;

        let flagged: Vec<_> = order.flagged_items().map(|i| i.item_id.clone()).collect();
        assert_eq!(flagged, vec!["i1".to_string()]);
    }
}
