//! Order items and quantity arithmetic
//!
//! All money is integer minor-currency units (cents). Weight-based items
//! price per kilogram; the line total is rounded once per item.

use serde::{Deserialize, Serialize};

/// Requested quantity: grams for weight-sold goods, unit count otherwise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "unit", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quantity {
    /// Weight-based product, quantity in grams
    Weight { grams: u32 },
    /// Count-based product, quantity in units
    Count { units: u32 },
}

impl Quantity {
    pub fn is_weight(&self) -> bool {
        matches!(self, Quantity::Weight { .. })
    }

    /// Grams for weight items, None otherwise
    pub fn grams(&self) -> Option<u32> {
        match self {
            Quantity::Weight { grams } => Some(*grams),
            Quantity::Count { .. } => None,
        }
    }
}

/// Compute a line total in cents
///
/// Weight items: `round(grams / 1000 × price_per_kg)`. Count items:
/// `units × unit_price`. Rounding happens exactly once, here.
pub fn line_total_cents(quantity: Quantity, unit_price_cents: i64) -> i64 {
    match quantity {
        Quantity::Weight { grams } => {
            (grams as f64 / 1000.0 * unit_price_cents as f64).round() as i64
        }
        Quantity::Count { units } => units as i64 * unit_price_cents,
    }
}

/// An item of an order
///
/// Belongs to exactly one order. Once `available` is set to false the line
/// total is frozen until a substitution decision is applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Item instance ID (unique within the order)
    pub item_id: String,
    /// Product reference (catalog ID)
    pub product_id: i64,
    /// Product name snapshot
    pub name: String,
    /// Requested quantity
    pub quantity: Quantity,
    /// Unit price in cents: per-kg for weight items, per-unit otherwise
    pub unit_price_cents: i64,
    /// Line total in cents
    pub line_total_cents: i64,
    /// False once the shop flagged this item as unavailable
    #[serde(default = "default_true")]
    pub available: bool,
    /// Original product ID when this item is the result of a substitution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl OrderItem {
    /// Build an item with its line total computed
    pub fn new(
        item_id: String,
        product_id: i64,
        name: String,
        quantity: Quantity,
        unit_price_cents: i64,
    ) -> Self {
        Self {
            item_id,
            product_id,
            name,
            quantity,
            line_total_cents: line_total_cents(quantity, unit_price_cents),
            unit_price_cents,
            available: true,
            substituted_from: None,
        }
    }
}

/// Sum of line totals over a set of items
pub fn order_total_cents(items: &[OrderItem]) -> i64 {
    items.iter().map(|i| i.line_total_cents).sum()
}
