//! Unified error codes for the click-and-collect system
//!
//! This module defines all error codes used across the server, the customer
//! app, and the kitchen terminal. Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Admission errors (shop availability / capacity)
//! - 3xxx: Order lifecycle errors
//! - 4xxx: Stock resolution errors
//! - 5xxx: Weight reconciliation errors
//! - 6xxx: Pickup errors
//! - 7xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Admission ====================
    /// Shop is closed
    ShopClosed = 2001,
    /// Shop is paused (manual or automatic)
    ShopPaused = 2002,
    /// Shop is on vacation
    ShopOnVacation = 2003,
    /// Hourly order capacity exceeded
    CapacityExceeded = 2004,
    /// Shop not found
    ShopNotFound = 2005,

    // ==================== 3xxx: Order lifecycle ====================
    /// Order not found
    OrderNotFound = 3001,
    /// Action is invalid for the order's current status, or a concurrent
    /// transition won the race
    StateConflict = 3002,
    /// Order is already in a terminal state
    OrderAlreadyTerminal = 3003,
    /// Order item not found
    OrderItemNotFound = 3004,
    /// Order has no items
    OrderEmpty = 3005,
    /// Duplicate command (idempotency replay)
    DuplicateCommand = 3006,
    /// Rating score outside [1, 5]
    RatingOutOfRange = 3007,

    // ==================== 4xxx: Stock resolution ====================
    /// Decision set does not cover every flagged item
    IncompleteDecision = 4001,
    /// Decision references an item that was not flagged
    ItemNotFlagged = 4002,
    /// Replacement product is invalid (unknown, out of stock, wrong category)
    InvalidSubstitute = 4003,

    // ==================== 5xxx: Weight reconciliation ====================
    /// Weight check input is invalid (zero requested grams, unknown item)
    WeightCheckInvalid = 5001,
    /// Item is not sold by weight
    NotWeightBased = 5002,

    // ==================== 6xxx: Pickup ====================
    /// Presented pickup token does not match the stored proof
    PickupTokenMismatch = 6001,

    // ==================== 7xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 7001,
    /// Submitted price does not match the catalog price
    PriceMismatch = 7002,
    /// Product is out of stock
    ProductOutOfStock = 7003,
    /// Category not found
    CategoryNotFound = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Notification delivery failed (non-fatal)
    NotificationFailed = 9101,
    /// Payment gateway error
    PaymentGatewayError = 9102,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Admission
            ErrorCode::ShopClosed => "Shop is closed",
            ErrorCode::ShopPaused => "Shop is not taking orders right now",
            ErrorCode::ShopOnVacation => "Shop is on vacation",
            ErrorCode::CapacityExceeded => "Shop has reached its hourly order limit",
            ErrorCode::ShopNotFound => "Shop not found",

            // Order lifecycle
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::StateConflict => "Action is not valid for the order's current status",
            ErrorCode::OrderAlreadyTerminal => "Order is already closed",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::DuplicateCommand => "Command was already processed",
            ErrorCode::RatingOutOfRange => "Rating score must be between 1 and 5",

            // Stock resolution
            ErrorCode::IncompleteDecision => "A decision is required for every flagged item",
            ErrorCode::ItemNotFlagged => "Item is not flagged as unavailable",
            ErrorCode::InvalidSubstitute => "Replacement product is not a valid substitute",

            // Weight
            ErrorCode::WeightCheckInvalid => "Weight check input is invalid",
            ErrorCode::NotWeightBased => "Item is not sold by weight",

            // Pickup
            ErrorCode::PickupTokenMismatch => "Pickup code does not match",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::PriceMismatch => "Price does not match the catalog",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::CategoryNotFound => "Category not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NotificationFailed => "Notification delivery failed",
            ErrorCode::PaymentGatewayError => "Payment gateway error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use ErrorCode::*;
        let code = match value {
            0 => Success,
            1 => Unknown,
            2 => ValidationFailed,
            3 => NotFound,
            4 => AlreadyExists,
            5 => InvalidRequest,
            6 => InvalidFormat,
            7 => RequiredField,
            8 => ValueOutOfRange,
            2001 => ShopClosed,
            2002 => ShopPaused,
            2003 => ShopOnVacation,
            2004 => CapacityExceeded,
            2005 => ShopNotFound,
            3001 => OrderNotFound,
            3002 => StateConflict,
            3003 => OrderAlreadyTerminal,
            3004 => OrderItemNotFound,
            3005 => OrderEmpty,
            3006 => DuplicateCommand,
            3007 => RatingOutOfRange,
            4001 => IncompleteDecision,
            4002 => ItemNotFlagged,
            4003 => InvalidSubstitute,
            5001 => WeightCheckInvalid,
            5002 => NotWeightBased,
            6001 => PickupTokenMismatch,
            7001 => ProductNotFound,
            7002 => PriceMismatch,
            7003 => ProductOutOfStock,
            7004 => CategoryNotFound,
            9001 => InternalError,
            9002 => StorageError,
            9003 => NetworkError,
            9004 => TimeoutError,
            9005 => ConfigError,
            9101 => NotificationFailed,
            9102 => PaymentGatewayError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
