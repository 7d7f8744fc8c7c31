//! # Validation Module
//!
//! Input validation for the storefront and admin console.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Types                                                        │
//! │  └── Percent rejects values outside [0, 100] on construction           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Quantities, prices, catalog entries, emails, addresses, codes     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite                                                       │
//! │  └── NOT NULL / UNIQUE / foreign keys                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use paglu_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("asha@example.com").unwrap();
//! validate_quantity(2).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Address, LineItem, Product};
use crate::{OTP_LENGTH, RESET_TOKEN_BYTES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart page: quantity stepper                                           │
/// │                                                                         │
/// │  User sets quantity: 0                                                 │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty < 1? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       └── OK → Cart::update_quantity checks stock next                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use paglu_core::money::Money;
/// use paglu_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_minor(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_major(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level (zero allowed, negative rejected).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates the numeric fields of a line before it is priced.
///
/// Discount and GST need no check here: a `Percent` is always in range.
pub fn validate_line_item(line: &LineItem) -> ValidationResult<()> {
    if line.product_id.trim().is_empty() {
        return Err(ValidationError::required("product_id"));
    }
    validate_quantity(line.quantity)?;
    validate_price(line.unit_price)?;
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::required("title"));
    }

    if title.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category or subcategory name (required, at most 100 characters).
pub fn validate_catalog_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a product before it is written to the catalog.
///
/// ## Rules
/// - Title per [`validate_product_title`]
/// - A category is required
/// - Price not negative, stock not negative
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_title(&product.title)?;

    if product.category_id.trim().is_empty() {
        return Err(ValidationError::required("category_id"));
    }

    validate_price(product.price)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Validates a new password (required, at most 128 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates the shape of a password-reset token: lowercase hex of the
/// expected length.
pub fn validate_reset_token(token: &str) -> ValidationResult<()> {
    let well_formed = token.len() == RESET_TOKEN_BYTES * 2
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "token".to_string(),
            reason: format!("must be {} hex characters", RESET_TOKEN_BYTES * 2),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Deliberately loose: one `@`, a non-empty local part, and a dotted domain.
///
/// ## Example
/// ```rust
/// use paglu_core::validation::validate_email;
///
/// assert!(validate_email("asha@example.com").is_ok());
/// assert!(validate_email("asha@localhost").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid("not an email address"));
    }

    let dotted = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !dotted {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(())
}

/// Validates a phone number: 7 to 15 digits, allowing `+`, spaces and dashes.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, dashes and +".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: "7".to_string(),
            max: "15".to_string(),
        });
    }

    Ok(())
}

/// Validates a shipping address: every field present, email and phone well-formed.
pub fn validate_address(address: &Address) -> ValidationResult<()> {
    let required = [
        ("first_name", &address.first_name),
        ("last_name", &address.last_name),
        ("address", &address.address),
        ("city", &address.city),
        ("state", &address.state),
        ("zip_code", &address.zip_code),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::required(field));
        }
    }

    validate_email(&address.email)?;
    validate_phone(&address.phone)?;

    Ok(())
}

/// Validates the shape of a submitted OTP: exactly six ASCII digits.
pub fn validate_otp_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("otp"));
    }

    if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: format!("must be {} digits", OTP_LENGTH),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string (order ids, product ids).
///
/// ## Example
/// ```rust
/// use paglu_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
