//! # paglu-core: Pure Business Logic for the Paglu Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart
//! consolidation engine, both order total calculators, the order status
//! state machine and the signup OTP bookkeeping, as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Paglu Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Storefront UI  /  Admin Console UI                  │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Orders ──► Order Details  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST (not part of this workspace)      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    paglu-shop (services)                        │   │
//! │  │    add_to_cart, checkout, cancel_order, send_otp, etc.          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ paglu-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │   cart   │ │ pricing  │ │  order   │ │   otp    │          │   │
//! │  │   │  Cart    │ │ GST      │ │  Status  │ │ OtpStore │          │   │
//! │  │   │ LineItem │ │ Checkout │ │  Cancel  │ │  Sweep   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    paglu-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and checkout types (Product, LineItem, Variant, Address)
//! - [`money`] - `Money` and `Percent` over exact decimals
//! - [`cart`] - Cart consolidation engine
//! - [`pricing`] - Itemized (GST) and checkout-summary totals
//! - [`order`] - Order snapshot and status state machine
//! - [`wishlist`] - Per-user wishlist
//! - [`address`] - Saved address book
//! - [`account`] - Customer roles and password-reset tokens
//! - [`otp`] - Pending signup registrations with expiry
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use paglu_core::money::Money;
//! use paglu_core::pricing::{summarize_discounted_subtotal, CheckoutPolicy};
//!
//! let summary =
//!     summarize_discounted_subtotal(Money::from_major(90), &CheckoutPolicy::default()).unwrap();
//!
//! // 90 is not above the free-shipping threshold
//! assert_eq!(summary.shipping, Money::from_major(15));
//! assert_eq!(summary.total.to_string(), "112.20");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod address;
pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod otp;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use paglu_core::Cart` instead of
// `use paglu_core::cart::Cart`

pub use account::{CustomerAccount, CustomerRole, ResetToken};
pub use address::AddressBook;
pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use order::{Order, OrderStatus, PaymentMethod, PaymentReference, PaymentStatus};
pub use otp::{OtpStore, PendingRegistration};
pub use pricing::{CheckoutPolicy, CheckoutSummary, ItemizedTotals, LineBreakdown};
pub use types::*;
pub use wishlist::Wishlist;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Payment id recorded for cash-on-delivery orders.
///
/// Gateway payments carry the gateway's payment id instead.
pub const COD_PAYMENT_ID: &str = "COD";

/// How long a signup OTP stays valid, in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 5 * 60;

/// Number of digits in a signup OTP.
pub const OTP_LENGTH: usize = 6;

/// How long a password-reset link stays valid, in minutes.
pub const RESET_TOKEN_TTL_MINS: i64 = 15;

/// Random bytes in a password-reset token (hex-encoded to twice this length).
pub const RESET_TOKEN_BYTES: usize = 32;
