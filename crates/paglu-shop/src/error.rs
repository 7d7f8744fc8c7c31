//! # Shop Error Type
//!
//! Unified error type for the service layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Paglu                                  │
//! │                                                                         │
//! │  Storefront                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  POST /orders/:id/cancel                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Shop::cancel_order()  ->  ShopResult<Order>                     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::NotFound ───────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Rule broken? ─── CoreError::OrderAlreadyCancelled ── ShopError ►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "BUSINESS_LOGIC", "message": "Order already cancelled" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use paglu_core::CoreError;
use paglu_db::DbError;

/// Error returned from every `Shop` operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Resource already exists (409)
    Conflict,

    /// Business rule rejected the request (422)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Signup verification failed (bad, unknown or expired OTP)
    OtpError,

    /// Verification email could not be sent
    MailError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ShopError {
    /// Creates a new shop error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ShopError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ShopError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ShopError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ShopError::new(ErrorCode::Internal, message)
    }
}

/// Result type for shop operations.
pub type ShopResult<T> = Result<T, ShopError>;

/// Converts database errors to shop errors.
impl From<DbError> for ShopError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ShopError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ShopError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ShopError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ShopError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ShopError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ShopError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::InvalidData { column, reason } => {
                error!(column = %column, reason = %reason, "Stored data failed to decode");
                ShopError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                error!("Database operation failed: {}", e);
                ShopError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to shop errors.
impl From<CoreError> for ShopError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { available, .. } => {
                return ShopError::new(
                    ErrorCode::InsufficientStock,
                    format!("Only {} left in stock", available),
                );
            }
            CoreError::EmptyCart => ErrorCode::CartError,
            CoreError::AmountOverflow | CoreError::InvalidResetToken => ErrorCode::ValidationError,
            CoreError::OrderAlreadyCancelled | CoreError::InvalidOrderTransition { .. } => {
                ErrorCode::BusinessLogic
            }
            CoreError::OtpNotFound
            | CoreError::OtpMismatch
            | CoreError::OtpExpired
            | CoreError::EmailNotVerified => ErrorCode::OtpError,
            CoreError::Validation(e) => return ShopError::validation(e.to_string()),
        };
        ShopError::new(code, err.to_string())
    }
}

impl From<paglu_core::ValidationError> for ShopError {
    fn from(err: paglu_core::ValidationError) -> Self {
        ShopError::validation(err.to_string())
    }
}

impl std::fmt::Display for ShopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ShopError {}
