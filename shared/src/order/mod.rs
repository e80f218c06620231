//! Order Lifecycle Module
//!
//! This module provides the wire types for the order lifecycle:
//! - Commands: Requests from actors (customer, shop, sweeper) to mutate orders
//! - Events: Immutable timeline facts recorded after command processing
//! - Order: Computed order record from the event stream
//! - Status: The transition graph

pub mod command;
pub mod event;
pub mod item;
pub mod snapshot;
pub mod status;
pub mod types;

// Re-exports
pub use command::{OrderCommand, OrderCommandPayload, SubmittedItem};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use item::{line_total_cents, order_total_cents, OrderItem, Quantity};
pub use snapshot::Order;
pub use status::OrderStatus;
pub use types::*;
