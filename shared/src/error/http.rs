//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::ShopNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (state machine races and terminal states)
            Self::AlreadyExists
            | Self::StateConflict
            | Self::OrderAlreadyTerminal
            | Self::DuplicateCommand => StatusCode::CONFLICT,

            // 403 Forbidden (pickup proof rejected)
            Self::PickupTokenMismatch => StatusCode::FORBIDDEN,

            // 422 Unprocessable (admission gate rejections)
            Self::ShopClosed
            | Self::ShopPaused
            | Self::ShopOnVacation
            | Self::CapacityExceeded => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::StorageError
            | Self::ConfigError
            | Self::NotificationFailed
            | Self::PaymentGatewayError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
