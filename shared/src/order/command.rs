//! Order commands - requests from actors to mutate an order
//!
//! Commands are validated and processed by the lifecycle manager; only the
//! resulting events are persisted. `command_id` provides idempotency: a
//! replayed command returns a duplicate response without a second transition.

use super::types::{ActorRole, ItemDecision, PickupTime, WeightInput};
use serde::{Deserialize, Serialize};

/// An order command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Unique command ID (idempotency key)
    pub command_id: String,
    /// Who issued the command
    pub actor: ActorRole,
    /// Actor identity snapshot for audit (customer id, operator name, "sweeper")
    pub actor_id: String,
    /// Client timestamp (Unix millis) - audit only, server time is authoritative
    pub timestamp: i64,
    /// The operation
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    /// Create a command with a fresh command_id and the current timestamp
    pub fn new(actor: ActorRole, actor_id: impl Into<String>, payload: OrderCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            actor,
            actor_id: actor_id.into(),
            timestamp: crate::util::now_millis(),
            payload,
        }
    }
}

/// A line item as submitted by the customer (prices resolved from the catalog)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedItem {
    pub product_id: i64,
    /// Grams for weight-based products, unit count otherwise
    pub quantity: super::item::Quantity,
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    // ========== Admission ==========
    Submit {
        shop_id: String,
        items: Vec<SubmittedItem>,
        requested_time: PickupTime,
        payment_method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        customer_note: Option<String>,
        /// Prep minutes quoted by the admission gate (base + busy extra)
        quoted_prep_minutes: u32,
    },

    // ========== Kitchen actions ==========
    Accept {
        order_id: String,
        eta_minutes: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        shop_note: Option<String>,
    },
    Deny {
        order_id: String,
        reason: String,
    },
    FlagUnavailable {
        order_id: String,
        item_ids: Vec<String>,
    },
    StartPreparing {
        order_id: String,
    },
    MarkReady {
        order_id: String,
    },
    AddTime {
        order_id: String,
        minutes: u32,
    },
    RecordWeighing {
        order_id: String,
        weights: Vec<WeightInput>,
    },
    ConfirmPickup {
        order_id: String,
        token: String,
    },
    ManualPickup {
        order_id: String,
    },

    // ========== Customer actions ==========
    ResolveAlternatives {
        order_id: String,
        decisions: Vec<ItemDecision>,
    },
    ResolveWeightReview {
        order_id: String,
        /// true = customer validates the new price, false = customer rejects
        accept: bool,
    },
    Cancel {
        order_id: String,
    },
    Rate {
        order_id: String,
        score: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },

    // ========== Sweeper ==========
    AutoCancel {
        order_id: String,
    },
}

impl OrderCommandPayload {
    /// Order this command targets (None for Submit, which creates one)
    pub fn order_id(&self) -> Option<&str> {
        use OrderCommandPayload::*;
        match self {
            Submit { .. } => None,
            Accept { order_id, .. }
            | Deny { order_id, .. }
            | FlagUnavailable { order_id, .. }
            | StartPreparing { order_id }
            | MarkReady { order_id }
            | AddTime { order_id, .. }
            | RecordWeighing { order_id, .. }
            | ConfirmPickup { order_id, .. }
            | ManualPickup { order_id }
            | ResolveAlternatives { order_id, .. }
            | ResolveWeightReview { order_id, .. }
            | Cancel { order_id }
            | Rate { order_id, .. }
            | AutoCancel { order_id } => Some(order_id),
        }
    }
}
