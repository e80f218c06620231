//! Weight reconciliation - pure functions
//!
//! `deviation = (actual − requested) / requested × 100`. An item `exceeds`
//! when the deviation is above +tolerance and is `underweight` below
//! −tolerance. The asymmetry is intentional: a higher price than ordered
//! requires consent, a lower one does not block service.

use shared::order::{OrderItem, Quantity, WeightCheck, WeightInput, WeightVerdict};
use thiserror::Error;

/// Weight reconciliation input errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("unknown order item: {0}")]
    UnknownItem(String),

    #[error("item {0} is not sold by weight")]
    NotWeightBased(String),

    #[error("item {0} has zero requested grams")]
    ZeroRequested(String),
}

/// Reconcile one weighed item against its requested grams
fn check_item(
    item: &OrderItem,
    actual_grams: u32,
    tolerance_percent: f64,
) -> Result<WeightCheck, WeightError> {
    let requested = match item.quantity {
        Quantity::Weight { grams } => grams,
        Quantity::Count { .. } => return Err(WeightError::NotWeightBased(item.item_id.clone())),
    };
    if requested == 0 {
        return Err(WeightError::ZeroRequested(item.item_id.clone()));
    }

    let deviation_percent =
        (actual_grams as f64 - requested as f64) / requested as f64 * 100.0;
    let adjusted_price_cents =
        (actual_grams as f64 / 1000.0 * item.unit_price_cents as f64).round() as i64;

    let verdict = if deviation_percent > tolerance_percent {
        WeightVerdict::Exceeds
    } else if deviation_percent < -tolerance_percent {
        WeightVerdict::Underweight
    } else {
        WeightVerdict::WithinTolerance
    };

    Ok(WeightCheck {
        item_id: item.item_id.clone(),
        requested_grams: requested,
        actual_grams,
        deviation_percent,
        adjusted_price_cents,
        verdict,
    })
}

/// Reconcile a batch of weighed items
///
/// Every input must reference an existing weight-based item of the order.
pub fn reconcile_weights(
    items: &[OrderItem],
    weights: &[WeightInput],
    tolerance_percent: f64,
) -> Result<Vec<WeightCheck>, WeightError> {
    weights
        .iter()
        .map(|w| {
            let item = items
                .iter()
                .find(|i| i.item_id == w.item_id)
                .ok_or_else(|| WeightError::UnknownItem(w.item_id.clone()))?;
            check_item(item, w.actual_grams, tolerance_percent)
        })
        .collect()
}

/// Order-level policy: any exceeding item freezes the whole order
pub fn requires_review(checks: &[WeightCheck]) -> bool {
    checks.iter().any(|c| c.verdict == WeightVerdict::Exceeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 10.0;

    fn weight_item(id: &str, grams: u32, price_per_kg: i64) -> OrderItem {
        OrderItem::new(
            id.to_string(),
            1,
            "Solomillo".to_string(),
            Quantity::Weight { grams },
            price_per_kg,
        )
    }

    #[test]
    fn test_exceeding_deviation() {
        // requested 500g, actual 560g, 20.00/kg
        let item = weight_item("i1", 500, 2000);
        let checks = reconcile_weights(
            &[item],
            &[WeightInput {
                item_id: "i1".into(),
                actual_grams: 560,
            }],
            TOLERANCE,
        )
        .unwrap();

        assert_eq!(checks.len(), 1);
        let c = &checks[0];
        assert!((c.deviation_percent - 12.0).abs() < 1e-9);
        assert_eq!(c.verdict, WeightVerdict::Exceeds);
        assert_eq!(c.adjusted_price_cents, 1120);
        assert!(requires_review(&checks));
    }

    #[test]
    fn test_within_tolerance() {
        // requested 500g, actual 520g
        let item = weight_item("i1", 500, 2000);
        let checks = reconcile_weights(
            &[item],
            &[WeightInput {
                item_id: "i1".into(),
                actual_grams: 520,
            }],
            TOLERANCE,
        )
        .unwrap();

        let c = &checks[0];
        assert!((c.deviation_percent - 4.0).abs() < 1e-9);
        assert_eq!(c.verdict, WeightVerdict::WithinTolerance);
        assert_eq!(c.adjusted_price_cents, 1040);
        assert!(!requires_review(&checks));
    }

    #[test]
    fn test_underweight_does_not_require_review() {
        // requested 500g, actual 400g: -20%
        let item = weight_item("i1", 500, 2000);
        let checks = reconcile_weights(
            &[item],
            &[WeightInput {
                item_id: "i1".into(),
                actual_grams: 400,
            }],
            TOLERANCE,
        )
        .unwrap();

        assert_eq!(checks[0].verdict, WeightVerdict::Underweight);
        assert_eq!(checks[0].adjusted_price_cents, 800);
        assert!(!requires_review(&checks));
    }

    #[test]
    fn test_boundary_is_not_exceeding() {
        // exactly +10% with a 10% tolerance stays in place
        let item = weight_item("i1", 500, 2000);
        let checks = reconcile_weights(
            &[item],
            &[WeightInput {
                item_id: "i1".into(),
                actual_grams: 550,
            }],
            TOLERANCE,
        )
        .unwrap();
        assert_eq!(checks[0].verdict, WeightVerdict::WithinTolerance);
    }

    #[test]
    fn test_count_item_rejected() {
        let item = OrderItem::new(
            "i1".into(),
            1,
            "Empanada".into(),
            Quantity::Count { units: 2 },
            350,
        );
        let err = reconcile_weights(
            &[item],
            &[WeightInput {
                item_id: "i1".into(),
                actual_grams: 500,
            }],
            TOLERANCE,
        )
        .unwrap_err();
        assert_eq!(err, WeightError::NotWeightBased("i1".into()));
    }

    #[test]
    fn test_unknown_item_rejected() {
        let err = reconcile_weights(
            &[],
            &[WeightInput {
                item_id: "ghost".into(),
                actual_grams: 500,
            }],
            TOLERANCE,
        )
        .unwrap_err();
        assert_eq!(err, WeightError::UnknownItem("ghost".into()));
    }

    #[test]
    fn test_one_exceeding_item_freezes_order() {
        let items = vec![weight_item("i1", 500, 2000), weight_item("i2", 300, 1000)];
        let checks = reconcile_weights(
            &items,
            &[
                WeightInput {
                    item_id: "i1".into(),
                    actual_grams: 505,
                },
                WeightInput {
                    item_id: "i2".into(),
                    actual_grams: 350,
                },
            ],
            TOLERANCE,
        )
        .unwrap();
        // i2 is +16.7%
        assert!(requires_review(&checks));
    }
}
