//! Shared wire types for the order lifecycle

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};

// ============================================================================
// Actors
// ============================================================================

/// Who triggered a command or event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// Customer app
    Customer,
    /// Kitchen terminal / shop staff
    Shop,
    /// Background sweeper
    Sweeper,
}

// ============================================================================
// Pickup time
// ============================================================================

/// Requested pickup time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickupTime {
    /// As soon as possible
    Asap,
    /// Explicit slot (Unix millis)
    Slot { start: i64, end: i64 },
}

impl Default for PickupTime {
    fn default() -> Self {
        PickupTime::Asap
    }
}

// ============================================================================
// Stock resolution
// ============================================================================

/// Customer decision for one flagged item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDecision {
    /// The flagged order item
    pub item_id: String,
    /// What to do with it
    pub action: DecisionAction,
}

/// Substitution or removal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    /// Replace with another product
    Replace { product_id: i64 },
    /// Remove the item from the order
    Remove,
}

/// A proposed substitute for a flagged item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubstituteCandidate {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
}

/// A flagged item together with its substitution candidates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlaggedItem {
    pub item_id: String,
    pub candidates: Vec<SubstituteCandidate>,
}

// ============================================================================
// Weight reconciliation
// ============================================================================

/// Weighed result for one item, as reported by the kitchen scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightInput {
    pub item_id: String,
    pub actual_grams: u32,
}

/// Classification of one weight deviation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightVerdict {
    /// Deviation above +tolerance, customer consent required
    Exceeds,
    /// Deviation below −tolerance, logged only, never blocks
    Underweight,
    /// Within tolerance
    WithinTolerance,
}

/// Per-item weight reconciliation result (ephemeral, not persisted on the order)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightCheck {
    pub item_id: String,
    pub requested_grams: u32,
    pub actual_grams: u32,
    /// (actual − requested) / requested × 100
    pub deviation_percent: f64,
    /// round(actual / 1000 × price_per_kg)
    pub adjusted_price_cents: i64,
    pub verdict: WeightVerdict,
}

// ============================================================================
// Rating
// ============================================================================

/// Post-pickup rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rating {
    /// Score in [1, 5]
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ============================================================================
// Command response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Order ID affected (set for Submit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
