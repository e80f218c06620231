use super::*;
use shared::order::OrderStatus;

#[test]
fn test_submit_creates_pending_order() {
    let manager = create_test_manager();
    let order_id = submit_order(&manager, "s1");

    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.shop_id, "s1");
    assert!(order.number.starts_with("ORD"));
    // 500g at 20.00/kg
    assert_eq!(order.total_cents, 1000);
    assert!(order.pickup_token.is_none());
    assert_eq!(manager.get_open_orders("s1").unwrap().len(), 1);
}

#[test]
fn test_order_numbers_are_sequential_per_shop() {
    let manager = create_test_manager();
    let a = submit_order(&manager, "s1");
    let b = submit_order(&manager, "s1");

    let num_a = manager.get_order(&a).unwrap().unwrap().number;
    let num_b = manager.get_order(&b).unwrap().unwrap().number;
    assert_ne!(num_a, num_b);

    let tail_a: u64 = num_a[num_a.len() - 4..].parse().unwrap();
    let tail_b: u64 = num_b[num_b.len() - 4..].parse().unwrap();
    assert_eq!(tail_b, tail_a + 1);
}

#[test]
fn test_idempotency() {
    let manager = create_test_manager();
    let cmd = submit_cmd("s1");

    let response1 = manager.execute_command(cmd.clone());
    assert!(response1.success);

    // Execute same command again
    let response2 = manager.execute_command(cmd);
    assert!(response2.success);
    assert_eq!(response2.order_id, None); // Duplicate returns no order_id

    // Still only one order and one event
    assert_eq!(manager.get_open_orders("s1").unwrap().len(), 1);
    assert_eq!(manager.get_events_since(0).unwrap().len(), 1);
}

#[test]
fn test_unknown_product_rejected() {
    let manager = create_test_manager();
    let cmd = customer_cmd(OrderCommandPayload::Submit {
        shop_id: "s1".to_string(),
        items: vec![SubmittedItem {
            product_id: 999,
            quantity: Quantity::Weight { grams: 100 },
        }],
        requested_time: PickupTime::Asap,
        payment_method: "CASH".to_string(),
        customer_note: None,
        quoted_prep_minutes: 20,
    });

    let response = manager.execute_command(cmd);
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        shared::error::ErrorCode::ProductNotFound
    );
}

#[test]
fn test_out_of_stock_product_rejected_at_submission() {
    let manager = create_test_manager();
    let cmd = customer_cmd(OrderCommandPayload::Submit {
        shop_id: "s1".to_string(),
        items: vec![SubmittedItem {
            product_id: 5,
            quantity: Quantity::Weight { grams: 100 },
        }],
        requested_time: PickupTime::Asap,
        payment_method: "CASH".to_string(),
        customer_note: None,
        quoted_prep_minutes: 20,
    });

    let response = manager.execute_command(cmd);
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        shared::error::ErrorCode::ProductOutOfStock
    );
}

#[test]
fn test_unit_mismatch_rejected_at_submission() {
    let manager = create_test_manager();
    // Product 3 is count-based; submitting grams is a validation error
    let cmd = customer_cmd(OrderCommandPayload::Submit {
        shop_id: "s1".to_string(),
        items: vec![SubmittedItem {
            product_id: 3,
            quantity: Quantity::Weight { grams: 100 },
        }],
        requested_time: PickupTime::Asap,
        payment_method: "CASH".to_string(),
        customer_note: None,
        quoted_prep_minutes: 20,
    });

    let response = manager.execute_command(cmd);
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        shared::error::ErrorCode::ValidationFailed
    );
}

#[test]
fn test_accept_issues_immutable_token() {
    let manager = create_test_manager();
    let (order_id, token) = accepted_order(&manager, "s1");

    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert_eq!(order.pickup_token.as_deref(), Some(token.as_str()));
    assert!(order.estimated_ready.is_some());
    assert!(order.accepted_at.is_some());
    assert_valid_walk(&manager, &order_id);
}

#[test]
fn test_deny_closes_order_and_leaves_open_set() {
    let manager = create_test_manager();
    let order_id = submit_order(&manager, "s1");

    let response = manager.execute_command(kitchen_cmd(OrderCommandPayload::Deny {
        order_id: order_id.clone(),
        reason: "ran out of product".to_string(),
    }));
    assert!(response.success);

    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Denied);
    assert_eq!(order.deny_reason.as_deref(), Some("ran out of product"));
    assert!(manager.get_open_orders("s1").unwrap().is_empty());
    assert_valid_walk(&manager, &order_id);
}

#[test]
fn test_invalid_transition_returns_state_conflict() {
    let manager = create_test_manager();
    let order_id = submit_order(&manager, "s1");

    // mark_ready straight from PENDING is not an edge
    let response = manager.execute_command(kitchen_cmd(OrderCommandPayload::MarkReady {
        order_id: order_id.clone(),
    }));
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        shared::error::ErrorCode::StateConflict
    );

    // Nothing changed
    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(manager.get_timeline(&order_id).unwrap().len(), 1);
}

#[test]
fn test_terminal_orders_are_retained() {
    let manager = create_test_manager();
    let order_id = submit_order(&manager, "s1");

    manager.execute_command(customer_cmd(OrderCommandPayload::Cancel {
        order_id: order_id.clone(),
    }));

    // Gone from the open set, still readable with full history
    assert!(manager.get_open_orders("s1").unwrap().is_empty());
    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(manager.get_timeline(&order_id).unwrap().len(), 2);
}

#[test]
fn test_rebuild_matches_stored_record() {
    let manager = create_test_manager();
    let (order_id, _) = accepted_order(&manager, "s1");

    assert!(manager.verify_order(&order_id).unwrap());
    let rebuilt = manager.rebuild_order(&order_id).unwrap();
    let stored = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(rebuilt.status, stored.status);
    assert_eq!(rebuilt.total_cents, stored.total_cents);
    assert_eq!(rebuilt.pickup_token, stored.pickup_token);
}
