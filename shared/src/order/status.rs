//! Order lifecycle status and the transition graph
//!
//! The status enum is the single source of truth for which transitions exist.
//! Actions perform their own guards, but every committed transition must also
//! be an edge of [`OrderStatus::can_transition`]; the manager asserts this
//! before persisting.

use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Initial: `PENDING`. Terminal: `COMPLETED`, `DENIED`, `CANCELLED`,
/// `AUTO_CANCELLED`. Terminal orders are retained for history, never deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, waiting for the shop to act
    #[default]
    Pending,
    /// Shop accepted; pickup token issued, ETA quoted
    Accepted,
    /// Kitchen started preparing
    Preparing,
    /// Ready for pickup
    Ready,
    /// Weighed total exceeds tolerance; frozen pending customer consent
    WeightReview,
    /// Some items unavailable; waiting for customer substitution decisions
    PartiallyDenied,
    /// Physically collected, waiting for rating
    PickedUp,
    /// Rated and closed
    Completed,
    /// Shop denied the order
    Denied,
    /// Customer cancelled
    Cancelled,
    /// Sweeper cancelled an abandoned order
    AutoCancelled,
}

impl OrderStatus {
    /// Terminal states are never left
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Denied
                | OrderStatus::Cancelled
                | OrderStatus::AutoCancelled
        )
    }

    /// The open-order set shown on the kitchen display
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Accepted
                | OrderStatus::Preparing
                | OrderStatus::Ready
        )
    }

    /// States from which the customer may cancel
    pub fn customer_cancellable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::PartiallyDenied | OrderStatus::WeightReview
        )
    }

    /// States a weight check may be recorded in
    pub fn weighable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    /// Whether `from -> to` is an edge of the transition graph
    ///
    /// Self-loops (weight recompute within tolerance, addTime) are valid.
    pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;
        match (from, to) {
            // Pending fan-out
            (Pending, Accepted)
            | (Pending, Denied)
            | (Pending, PartiallyDenied)
            | (Pending, Cancelled)
            | (Pending, AutoCancelled) => true,

            // Stock resolution
            (PartiallyDenied, Accepted) | (PartiallyDenied, Cancelled) => true,

            // Kitchen pipeline
            (Accepted, Preparing) => true,
            (Accepted, Ready) | (Preparing, Ready) => true,

            // Weight review freeze and resume
            (Accepted, WeightReview) | (Preparing, WeightReview) | (Ready, WeightReview) => true,
            (WeightReview, Accepted) | (WeightReview, Preparing) | (WeightReview, Ready) => true,
            (WeightReview, Cancelled) => true,

            // Pickup and completion
            (Ready, PickedUp) => true,
            (PickedUp, Completed) => true,

            // Self-loops: addTime, in-tolerance weighing
            (Accepted, Accepted) | (Preparing, Preparing) | (Ready, Ready) => true,

            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::WeightReview => "WEIGHT_REVIEW",
            OrderStatus::PartiallyDenied => "PARTIALLY_DENIED",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Denied => "DENIED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::AutoCancelled => "AUTO_CANCELLED",
        };
        write!(f, "{}", s)
    }
}
