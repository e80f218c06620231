//! Order events - the append-only timeline
//!
//! One event is recorded per committed transition and never mutated or
//! deleted. The `status` field carries the status the order holds AFTER the
//! transition, so the event list of an order is a walk of the transition
//! graph starting at `PENDING`.

use super::item::OrderItem;
use super::status::OrderStatus;
use super::types::{
    ActorRole, FlaggedItem, ItemDecision, PickupTime, WeightCheck,
};
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    /// This is the AUTHORITATIVE ordering mechanism for state evolution
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Shop the order belongs to (denormalized for per-shop sync)
    pub shop_id: String,
    /// Server timestamp (Unix milliseconds) - always set at event creation
    pub timestamp: i64,
    /// Who triggered this event
    pub actor: ActorRole,
    /// Actor identity snapshot for audit
    pub actor_id: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Status the order holds after this transition
    pub status: OrderStatus,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    // Admission
    Submitted,

    // Kitchen decisions
    Accepted,
    Denied,
    ItemsFlagged,

    // Stock resolution
    AlternativesResolved,

    // Kitchen pipeline
    PreparationStarted,
    ReadyMarked,
    TimeAdded,

    // Weight reconciliation
    WeightRecorded,
    WeightReviewResolved,

    // Pickup
    PickedUp,

    // Termination
    Cancelled,
    AutoCancelled,

    // Completion
    Rated,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderEventType::Submitted => "SUBMITTED",
            OrderEventType::Accepted => "ACCEPTED",
            OrderEventType::Denied => "DENIED",
            OrderEventType::ItemsFlagged => "ITEMS_FLAGGED",
            OrderEventType::AlternativesResolved => "ALTERNATIVES_RESOLVED",
            OrderEventType::PreparationStarted => "PREPARATION_STARTED",
            OrderEventType::ReadyMarked => "READY_MARKED",
            OrderEventType::TimeAdded => "TIME_ADDED",
            OrderEventType::WeightRecorded => "WEIGHT_RECORDED",
            OrderEventType::WeightReviewResolved => "WEIGHT_REVIEW_RESOLVED",
            OrderEventType::PickedUp => "PICKED_UP",
            OrderEventType::Cancelled => "CANCELLED",
            OrderEventType::AutoCancelled => "AUTO_CANCELLED",
            OrderEventType::Rated => "RATED",
        };
        write!(f, "{}", s)
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Admission ==========
    Submitted {
        /// Shop-scoped sequential human-readable number
        number: String,
        items: Vec<OrderItem>,
        total_cents: i64,
        requested_time: PickupTime,
        payment_method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_note: Option<String>,
        quoted_prep_minutes: u32,
    },

    // ========== Kitchen decisions ==========
    Accepted {
        eta_minutes: u32,
        /// now + eta at the moment of acceptance
        estimated_ready: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        shop_note: Option<String>,
        /// Pickup proof issued at the transition into ACCEPTED; carried on
        /// the event so replay reproduces the order record exactly
        pickup_token: String,
    },

    Denied {
        reason: String,
    },

    ItemsFlagged {
        flagged: Vec<FlaggedItem>,
    },

    // ========== Stock resolution ==========
    AlternativesResolved {
        decisions: Vec<ItemDecision>,
        /// Resulting item set after substitutions/removals
        items: Vec<OrderItem>,
        total_cents: i64,
        /// True when the resulting item set was empty and the order cancelled
        cancelled: bool,
        /// Pickup proof, issued here when the resolution is the order's first
        /// transition into ACCEPTED
        #[serde(skip_serializing_if = "Option::is_none")]
        pickup_token: Option<String>,
        /// ETA derived from the admission quote (accepted path only)
        #[serde(skip_serializing_if = "Option::is_none")]
        estimated_ready: Option<i64>,
    },

    // ========== Kitchen pipeline ==========
    PreparationStarted {},

    ReadyMarked {
        actual_ready: i64,
    },

    TimeAdded {
        minutes: u32,
        estimated_ready: i64,
    },

    // ========== Weight reconciliation ==========
    WeightRecorded {
        checks: Vec<WeightCheck>,
        total_cents: i64,
        /// True when any check exceeded +tolerance and the order froze at
        /// WEIGHT_REVIEW
        review_required: bool,
    },

    WeightReviewResolved {
        accepted: bool,
    },

    // ========== Pickup ==========
    PickedUp {
        /// True for the tokenless fallback path (lower-trust, audited)
        manual: bool,
    },

    // ========== Termination ==========
    Cancelled {
        by: ActorRole,
    },

    AutoCancelled {
        /// Order age at sweep time, minutes
        age_minutes: i64,
    },

    // ========== Completion ==========
    Rated {
        score: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
}

impl OrderEvent {
    /// Create a new event
    ///
    /// The server timestamp is always set here; it is authoritative for state
    /// evolution.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        shop_id: String,
        actor: ActorRole,
        actor_id: String,
        command_id: String,
        status: OrderStatus,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            shop_id,
            timestamp: crate::util::now_millis(),
            actor,
            actor_id,
            command_id,
            status,
            event_type,
            payload,
        }
    }
}
