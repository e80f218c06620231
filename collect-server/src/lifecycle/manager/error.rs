use crate::lifecycle::storage::StorageError;
use crate::lifecycle::traits::OrderError;
use crate::reconcile::{StockError, WeightError};
use shared::error::ErrorCode;
use shared::order::{CommandError, OrderStatus};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Action {action} conflicts with current status {current} of order {order_id}")]
    StateConflict {
        order_id: String,
        current: OrderStatus,
        action: &'static str,
    },

    #[error("Order {order_id} is already terminal ({current})")]
    AlreadyTerminal {
        order_id: String,
        current: OrderStatus,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Product out of stock: {0}")]
    ProductOutOfStock(i64),

    #[error("Submitted price does not match the catalog (expected {expected}, got {got})")]
    PriceMismatch { expected: i64, got: i64 },

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Weight(#[from] WeightError),

    #[error("Pickup token mismatch")]
    PickupMismatch,

    #[error("Rating score {0} is out of range [1, 5]")]
    RatingOutOfRange(u8),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::StateConflict {
                order_id,
                current,
                action,
            } => ManagerError::StateConflict {
                order_id,
                current,
                action,
            },
            OrderError::AlreadyTerminal { order_id, current } => {
                ManagerError::AlreadyTerminal { order_id, current }
            }
            OrderError::Validation(msg) => ManagerError::Validation(msg),
            OrderError::Stock(e) => ManagerError::Stock(e),
            OrderError::Weight(e) => ManagerError::Weight(e),
            OrderError::PickupMismatch => ManagerError::PickupMismatch,
            OrderError::RatingOutOfRange(score) => ManagerError::RatingOutOfRange(score),
            OrderError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

fn stock_error_code(err: &StockError) -> ErrorCode {
    match err {
        StockError::IncompleteDecision(_) => ErrorCode::IncompleteDecision,
        StockError::ItemNotFlagged(_) => ErrorCode::ItemNotFlagged,
        StockError::DuplicateDecision(_) => ErrorCode::ValidationFailed,
        StockError::InvalidSubstitute { .. } => ErrorCode::InvalidSubstitute,
    }
}

fn weight_error_code(err: &WeightError) -> ErrorCode {
    match err {
        WeightError::UnknownItem(_) => ErrorCode::OrderItemNotFound,
        WeightError::NotWeightBased(_) => ErrorCode::NotWeightBased,
        WeightError::ZeroRequested(_) => ErrorCode::WeightCheckInvalid,
    }
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        let code = match &err {
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, "Storage error during command processing");
                ErrorCode::StorageError
            }
            ManagerError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            ManagerError::StateConflict { .. } => ErrorCode::StateConflict,
            ManagerError::AlreadyTerminal { .. } => ErrorCode::OrderAlreadyTerminal,
            ManagerError::Validation(_) => ErrorCode::ValidationFailed,
            ManagerError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            ManagerError::ProductOutOfStock(_) => ErrorCode::ProductOutOfStock,
            ManagerError::PriceMismatch { .. } => ErrorCode::PriceMismatch,
            ManagerError::Stock(e) => stock_error_code(e),
            ManagerError::Weight(e) => weight_error_code(e),
            ManagerError::PickupMismatch => ErrorCode::PickupTokenMismatch,
            ManagerError::RatingOutOfRange(_) => ErrorCode::RatingOutOfRange,
            ManagerError::Internal(_) => ErrorCode::InternalError,
        };
        CommandError::new(code, message)
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
