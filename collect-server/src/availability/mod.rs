//! Shop availability and admission gating
//!
//! - **controller**: per-shop state (open/busy/paused/vacation) with lazy
//!   timer expiry and the `canAdmit` gate
//! - **capacity**: trailing-hour admission window, checked-and-recorded
//!   atomically
//! - **reservations**: offer cart-hold ledger with per-reservation expiry

pub mod capacity;
pub mod controller;
pub mod reservations;

pub use capacity::CapacityWindow;
pub use controller::{Admission, AvailabilityController};
pub use reservations::{Reservation, ReservationLedger};
