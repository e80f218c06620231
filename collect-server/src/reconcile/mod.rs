//! Physical-world reconciliation
//!
//! Two independent concerns:
//! - **weight**: weighed goods rarely match the requested grams exactly;
//!   overcharging needs customer consent, undercharging never blocks.
//! - **stock**: items can go out of stock between submission and acceptance;
//!   the customer resolves each flagged item with a substitution or removal.

pub mod stock;
pub mod weight;

pub use stock::{apply_decisions, propose_candidates, StockError, MAX_CANDIDATES};
pub use weight::{reconcile_weights, requires_review, WeightError};
