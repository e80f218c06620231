//! Shop-level models

pub mod availability;

pub use availability::{AvailabilitySnapshot, ShopAvailability, ShopState};
