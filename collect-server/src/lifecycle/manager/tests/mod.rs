use super::*;
use crate::catalog::{InMemoryCatalog, ProductInfo};
use crate::notify::LogNotifier;
use shared::order::{
    ActorRole, OrderCommand, OrderCommandPayload, PickupTime, Quantity, SubmittedItem,
};

mod test_concurrency;
mod test_core;

/// Catalog used across manager tests
///
/// Category 10: weight-based cuts (1 in stock, 2 in stock, 5 out of stock).
/// Category 11: count-based bakery items.
fn test_catalog() -> Arc<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();
    for (id, category, price, weight_based, in_stock) in [
        (1, 10, 2000, true, true),
        (2, 10, 1800, true, true),
        (3, 11, 120, false, true),
        (5, 10, 2500, true, false),
    ] {
        catalog.insert(ProductInfo {
            product_id: id,
            name: format!("product-{id}"),
            category_id: category,
            unit_price_cents: price,
            weight_based,
            in_stock,
        });
    }
    Arc::new(catalog)
}

fn create_test_manager() -> LifecycleManager {
    let storage = LifecycleStorage::open_in_memory().unwrap();
    LifecycleManager::new(
        storage,
        test_catalog(),
        Arc::new(LogNotifier),
        LifecycleSettings::default(),
    )
}

fn customer_cmd(payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(ActorRole::Customer, "cust-9", payload)
}

fn kitchen_cmd(payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(ActorRole::Shop, "Maria", payload)
}

fn submit_cmd(shop_id: &str) -> OrderCommand {
    customer_cmd(OrderCommandPayload::Submit {
        shop_id: shop_id.to_string(),
        items: vec![SubmittedItem {
            product_id: 1,
            quantity: Quantity::Weight { grams: 500 },
        }],
        requested_time: PickupTime::Asap,
        payment_method: "CARD_ON_PICKUP".to_string(),
        customer_note: None,
        quoted_prep_minutes: 20,
    })
}

/// Submit a fresh order and return its ID
fn submit_order(manager: &LifecycleManager, shop_id: &str) -> String {
    let response = manager.execute_command(submit_cmd(shop_id));
    assert!(response.success, "submit failed: {:?}", response.error);
    response.order_id.unwrap()
}

/// Drive an order to ACCEPTED and return (order_id, pickup_token)
fn accepted_order(manager: &LifecycleManager, shop_id: &str) -> (String, String) {
    let order_id = submit_order(manager, shop_id);
    let response = manager.execute_command(kitchen_cmd(OrderCommandPayload::Accept {
        order_id: order_id.clone(),
        eta_minutes: 30,
        shop_note: None,
    }));
    assert!(response.success);
    let token = manager
        .get_order(&order_id)
        .unwrap()
        .unwrap()
        .pickup_token
        .unwrap();
    (order_id, token)
}

/// The timeline of every order must be a walk of the transition graph
/// starting at PENDING
fn assert_valid_walk(manager: &LifecycleManager, order_id: &str) {
    let events = manager.get_timeline(order_id).unwrap();
    assert!(!events.is_empty());
    assert_eq!(events[0].status, shared::order::OrderStatus::Pending);
    for pair in events.windows(2) {
        assert!(
            shared::order::OrderStatus::can_transition(pair[0].status, pair[1].status),
            "timeline of {} walks an illegal edge {} -> {}",
            order_id,
            pair[0].status,
            pair[1].status
        );
    }
}
