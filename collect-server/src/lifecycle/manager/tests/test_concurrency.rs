use super::*;
use shared::order::{OrderEventType, OrderStatus};
use std::sync::Arc as StdArc;

#[test]
fn test_concurrent_accepts_exactly_one_wins() {
    let manager = StdArc::new(create_test_manager());
    let order_id = submit_order(&manager, "s1");

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let manager = manager.clone();
            let order_id = order_id.clone();
            std::thread::spawn(move || {
                manager.execute_command(kitchen_cmd(OrderCommandPayload::Accept {
                    order_id,
                    eta_minutes: 20,
                    shop_note: None,
                }))
            })
        })
        .collect();

    let responses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = responses.iter().filter(|r| r.success).count();
    let conflicts = responses
        .iter()
        .filter(|r| {
            r.error
                .as_ref()
                .is_some_and(|e| e.code == shared::error::ErrorCode::StateConflict)
        })
        .count();
    assert_eq!(successes, 1, "exactly one accept must win");
    assert_eq!(conflicts, 1, "the loser must see a state conflict");

    // Final state is ACCEPTED with exactly one acceptance event
    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    let acceptances = manager
        .get_timeline(&order_id)
        .unwrap()
        .into_iter()
        .filter(|e| e.event_type == OrderEventType::Accepted)
        .count();
    assert_eq!(acceptances, 1);
    assert_valid_walk(&manager, &order_id);
}

#[test]
fn test_concurrent_accept_and_cancel_never_double_apply() {
    let manager = StdArc::new(create_test_manager());
    let order_id = submit_order(&manager, "s1");

    let accept = {
        let manager = manager.clone();
        let order_id = order_id.clone();
        std::thread::spawn(move || {
            manager.execute_command(kitchen_cmd(OrderCommandPayload::Accept {
                order_id,
                eta_minutes: 20,
                shop_note: None,
            }))
        })
    };
    let cancel = {
        let manager = manager.clone();
        let order_id = order_id.clone();
        std::thread::spawn(move || {
            manager.execute_command(customer_cmd(OrderCommandPayload::Cancel { order_id }))
        })
    };

    let responses = [accept.join().unwrap(), cancel.join().unwrap()];
    let successes = responses.iter().filter(|r| r.success).count();
    assert_eq!(successes, 1, "accept and cancel are mutually exclusive");

    let order = manager.get_order(&order_id).unwrap().unwrap();
    assert!(matches!(
        order.status,
        OrderStatus::Accepted | OrderStatus::Cancelled
    ));
    // One submit event plus exactly one of the competing transitions
    assert_eq!(manager.get_timeline(&order_id).unwrap().len(), 2);
    assert_valid_walk(&manager, &order_id);
}

#[test]
fn test_concurrent_submissions_get_distinct_numbers() {
    let manager = StdArc::new(create_test_manager());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let manager = manager.clone();
            std::thread::spawn(move || {
                let response = manager.execute_command(submit_cmd("s1"));
                assert!(response.success);
                let order_id = response.order_id.unwrap();
                manager.get_order(&order_id).unwrap().unwrap().number
            })
        })
        .collect();

    let mut numbers: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 6, "every submission gets its own number");
}
