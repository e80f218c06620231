//! Pickup proof validation
//!
//! The proof token is generated once at acceptance, stored on the order, and
//! compared byte-for-byte against the presented value. Single-use in effect:
//! the pickup transition leaves `READY`, so a second confirmation hits a
//! state conflict before it ever reaches the validator.

use shared::order::Order;

/// Outcome of a pickup confirmation check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupCheck {
    /// Presented token matches the stored proof
    Ok,
    /// Presented token does not match
    Mismatch,
    /// No token was ever issued for this order (manual flow)
    NoTokenIssued,
}

/// Compare a presented token against the order's stored proof
pub fn confirm(order: &Order, presented: &str) -> PickupCheck {
    match order.pickup_token.as_deref() {
        None => PickupCheck::NoTokenIssued,
        Some(stored) if stored.as_bytes() == presented.as_bytes() => PickupCheck::Ok,
        Some(_) => PickupCheck::Mismatch,
    }
}
