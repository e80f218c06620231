//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 2xxx: Admission errors
/// - 3xxx: Order lifecycle errors
/// - 4xxx: Stock resolution errors
/// - 5xxx: Weight reconciliation errors
/// - 6xxx: Pickup errors
/// - 7xxx: Catalog errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Admission errors (2xxx)
    Admission,
    /// Order lifecycle errors (3xxx)
    Order,
    /// Stock resolution errors (4xxx)
    Stock,
    /// Weight reconciliation errors (5xxx)
    Weight,
    /// Pickup errors (6xxx)
    Pickup,
    /// Catalog errors (7xxx)
    Catalog,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            2000..3000 => Self::Admission,
            3000..4000 => Self::Order,
            4000..5000 => Self::Stock,
            5000..6000 => Self::Weight,
            6000..7000 => Self::Pickup,
            7000..8000 => Self::Catalog,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Admission => "admission",
            Self::Order => "order",
            Self::Stock => "stock",
            Self::Weight => "weight",
            Self::Pickup => "pickup",
            Self::Catalog => "catalog",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::ShopPaused.category(), ErrorCategory::Admission);
        assert_eq!(ErrorCode::StateConflict.category(), ErrorCategory::Order);
        assert_eq!(
            ErrorCode::IncompleteDecision.category(),
            ErrorCategory::Stock
        );
        assert_eq!(
            ErrorCode::PickupTokenMismatch.category(),
            ErrorCategory::Pickup
        );
        assert_eq!(ErrorCode::StorageError.category(), ErrorCategory::System);
    }
}
