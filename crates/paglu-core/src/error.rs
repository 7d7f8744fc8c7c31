//! # Error Types
//!
//! Domain-specific error types for paglu-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  paglu-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  paglu-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  paglu-shop errors                                                     │
//! │  └── ShopError        - What the REST layer sees (code + message)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ShopError ← DbError               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, status, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The service layer
/// translates them into user-facing messages with an error code.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity exceeds the stock captured on the cart line.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart page: change quantity to 5
    ///      │
    ///      ▼
    /// Line stock: 3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 left in stock"
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cancelling an order that is already cancelled.
    #[error("Order already cancelled")]
    OrderAlreadyCancelled,

    /// The order's status does not allow the requested transition.
    ///
    /// ## When This Occurs
    /// - Cancelling a delivered order
    /// - Moving a cancelled order back to processing
    /// - Skipping a step (Processing → Delivered)
    #[error("Order cannot move from {from} to {to}")]
    InvalidOrderTransition { from: String, to: String },

    /// No pending registration for this email (never issued or swept).
    #[error("OTP expired or invalid.")]
    OtpNotFound,

    /// The submitted code does not match the issued one.
    #[error("Invalid OTP.")]
    OtpMismatch,

    /// The code matched but its lifetime has passed.
    #[error("OTP expired.")]
    OtpExpired,

    /// Signup finalization before the OTP was verified.
    #[error("Email not verified yet.")]
    EmailNotVerified,

    /// Unknown, already used, or expired password-reset token.
    #[error("Invalid or expired token")]
    InvalidResetToken,

    /// A price or total no longer fits in a decimal amount.
    #[error("Order amount is too large")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid email, non-numeric OTP).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., email already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates a `Required` error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
