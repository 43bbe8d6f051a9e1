//! # Error Types
//!
//! Domain-specific error types for apotek-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  apotek-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                           │
//! │  ├── AllocationError  - Lot allocation run failures                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  apotek-pos errors (separate crate)                                     │
//! │  └── PosError         - Flow and collaborator-store failures            │
//! │                                                                         │
//! │  apotek-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → PosError → Frontend                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (lot number, product ID, quantities)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Combo cannot be found or is inactive.
    #[error("Combo not found: {0}")]
    ComboNotFound(String),

    /// Insufficient stock in a lot to cover a requested quantity.
    ///
    /// ## When This Occurs
    /// - Selecting more units from a lot than it holds
    /// - Confirming an allocation against a lot that was sold down meanwhile
    #[error("Insufficient stock in lot {lot_number}: available {available}, requested {requested}")]
    InsufficientLotStock {
        lot_number: String,
        available: i64,
        requested: i64,
    },

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Allocation error (wraps AllocationError).
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Allocation Error
// =============================================================================

/// Failures of the lot allocation state machine.
///
/// All of these are recoverable from the operator's point of view: the run
/// stays where it is and the operator corrects the selection, except for the
/// construction errors which reject the run up front.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// Requested combo-set count is zero, negative, or above the cap.
    #[error("Set count must be between 1 and {max}, got {requested}")]
    InvalidSetCount { requested: i64, max: i64 },

    /// The run has already finished; no further steps are possible.
    #[error("Allocation run is already complete")]
    AlreadyComplete,

    /// The run has not finished yet; confirm() was called too early.
    #[error("Allocation run is not complete: {remaining} item(s) still unallocated")]
    NotComplete { remaining: usize },

    /// No selection exists for the current item, so it cannot be advanced.
    #[error("No lot selected for product {product_id} (requires {required} unit(s))")]
    SelectionIncomplete { product_id: String, required: i64 },

    /// Selections exist but their sum does not match the required quantity.
    ///
    /// Advance is rejected with no state change; the operator adjusts the
    /// selection and retries.
    #[error(
        "Quantity mismatch for product {product_id}: allocated {allocated}, requires exactly {required}"
    )]
    QuantityMismatch {
        product_id: String,
        required: i64,
        allocated: i64,
    },

    /// A selection quantity falls outside `[1, min(lot on-hand, required)]`.
    #[error("Selection quantity {requested} out of range [1, {max}] for lot {lot_number}")]
    QuantityOutOfRange {
        lot_number: String,
        requested: i64,
        max: i64,
    },

    /// The lot does not belong to the current item's product, or has no stock.
    #[error("Lot {lot_number} is not eligible for product {product_id}")]
    LotNotEligible {
        lot_number: String,
        product_id: String,
    },

    /// A split selection would push the item's total over the requirement.
    #[error(
        "Splitting {requested} more unit(s) onto lot {lot_number} would exceed the required {required}"
    )]
    SplitExceedsRequirement {
        lot_number: String,
        requested: i64,
        required: i64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with AllocationError.
pub type AllocationResult<T> = Result<T, AllocationError>;

// =============================================================================
// Unit Tests
// =============================================================================
