//! Stock reconciliation
//!
//! When the shop flags items as unavailable, the engine proposes up to
//! [`MAX_CANDIDATES`] substitutes per item (same category, in stock, closest
//! price first). The customer must then decide every flagged item in one call
//! - partial decision sets are rejected.

use crate::catalog::ProductCatalog;
use shared::order::{
    order_total_cents, DecisionAction, ItemDecision, OrderItem, SubstituteCandidate,
};
use std::collections::HashMap;
use thiserror::Error;

/// Candidate list cap per flagged item
pub const MAX_CANDIDATES: usize = 3;

/// Stock resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("missing decision for flagged item {0}")]
    IncompleteDecision(String),

    #[error("item {0} is not flagged as unavailable")]
    ItemNotFlagged(String),

    #[error("duplicate decision for item {0}")]
    DuplicateDecision(String),

    #[error("invalid substitute {product_id}: {reason}")]
    InvalidSubstitute { product_id: i64, reason: String },
}

/// Propose substitutes for one flagged item
///
/// Policy: same category, in stock, the flagged product itself excluded,
/// closest price first, capped at [`MAX_CANDIDATES`].
pub fn propose_candidates(
    catalog: &dyn ProductCatalog,
    item: &OrderItem,
) -> Vec<SubstituteCandidate> {
    let Some(product) = catalog.get_product(item.product_id) else {
        return Vec::new();
    };

    let mut pool: Vec<_> = catalog
        .products_in_category(product.category_id)
        .into_iter()
        .filter(|p| p.in_stock && p.product_id != item.product_id)
        .filter(|p| p.weight_based == item.quantity.is_weight())
        .collect();

    pool.sort_by_key(|p| (p.unit_price_cents - item.unit_price_cents).abs());
    pool.truncate(MAX_CANDIDATES);

    pool.into_iter()
        .map(|p| SubstituteCandidate {
            product_id: p.product_id,
            name: p.name,
            unit_price_cents: p.unit_price_cents,
        })
        .collect()
}

/// Apply a complete decision set to an order's items
///
/// All-or-nothing: every flagged item needs exactly one decision, and no
/// decision may reference an unflagged item. Returns the resulting item set
/// and its recomputed total (the caller cancels the order when the set is
/// empty).
pub fn apply_decisions(
    items: &[OrderItem],
    decisions: &[ItemDecision],
    catalog: &dyn ProductCatalog,
) -> Result<(Vec<OrderItem>, i64), StockError> {
    // Index decisions, rejecting duplicates
    let mut by_item: HashMap<&str, &DecisionAction> = HashMap::new();
    for d in decisions {
        if by_item.insert(d.item_id.as_str(), &d.action).is_some() {
            return Err(StockError::DuplicateDecision(d.item_id.clone()));
        }
    }

    // Every decision must target a flagged item
    for d in decisions {
        match items.iter().find(|i| i.item_id == d.item_id) {
            Some(item) if !item.available => {}
            Some(_) => return Err(StockError::ItemNotFlagged(d.item_id.clone())),
            None => return Err(StockError::ItemNotFlagged(d.item_id.clone())),
        }
    }

    // Every flagged item must have a decision
    for item in items.iter().filter(|i| !i.available) {
        if !by_item.contains_key(item.item_id.as_str()) {
            return Err(StockError::IncompleteDecision(item.item_id.clone()));
        }
    }

    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if item.available {
            result.push(item.clone());
            continue;
        }
        match by_item[item.item_id.as_str()] {
            DecisionAction::Remove => {}
            DecisionAction::Replace { product_id } => {
                let substitute = catalog.get_product(*product_id).ok_or_else(|| {
                    StockError::InvalidSubstitute {
                        product_id: *product_id,
                        reason: "unknown product".into(),
                    }
                })?;
                if !substitute.in_stock {
                    return Err(StockError::InvalidSubstitute {
                        product_id: *product_id,
                        reason: "out of stock".into(),
                    });
                }
                if !substitute.accepts(&item.quantity) {
                    return Err(StockError::InvalidSubstitute {
                        product_id: *product_id,
                        reason: "sale unit mismatch".into(),
                    });
                }

                let mut replaced = OrderItem::new(
                    item.item_id.clone(),
                    substitute.product_id,
                    substitute.name.clone(),
                    item.quantity,
                    substitute.unit_price_cents,
                );
                replaced.substituted_from = Some(item.product_id);
                result.push(replaced);
            }
        }
    }

    let total = order_total_cents(&result);
    Ok((result, total))
}
