//! Shared types for the click-and-collect order system
//!
//! This crate holds everything both the server and its clients (customer app,
//! kitchen terminal) agree on at the wire level:
//!
//! - **order**: order model, commands, events, lifecycle status graph
//! - **shop**: shop availability model (admission gate state)
//! - **error**: unified error codes and API error responses
//! - **util**: timestamps, snowflake IDs, pickup tokens

pub mod error;
pub mod order;
pub mod shop;
pub mod util;

// Re-exports
pub use error::{AppError, ErrorCode};
pub use order::{
    CommandError, CommandResponse, Order, OrderCommand, OrderCommandPayload, OrderEvent,
    OrderEventType, OrderItem, OrderStatus,
};
pub use shop::{ShopAvailability, ShopState};
