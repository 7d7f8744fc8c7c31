//! # Orders
//!
//! An order is an immutable snapshot of a cart taken at checkout. After
//! creation only `status` and `payment_status` change.
//!
//! ## Status State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Pending ──► Processing ──► Shipped ──► Delivered                     │
//! │      │            │             │        (terminal)                     │
//! │      │            │             │                                       │
//! │      └────────────┴─────────────┴──────► Cancelled                     │
//! │                                          (terminal)                     │
//! │                                                                         │
//! │   Order::place() starts at Processing.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{compute_checkout_summary, compute_itemized_total, CheckoutPolicy, ItemizedTotals};
use crate::types::{Address, LineItem};
use crate::validation::validate_address;
use crate::COD_PAYMENT_ID;

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and Cancelled accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `self → next` is an edge of the state machine.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
                | (Shipped, Cancelled)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Whether the payment has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(ValidationError::InvalidFormat {
                field: "payment_status".to_string(),
                reason: format!("unknown payment status '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid to the courier on delivery.
    CashOnDelivery,
    /// Paid online; the gateway returned a payment id.
    Gateway,
}

/// How an order was paid, as recorded on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentReference {
    pub method: PaymentMethod,
    /// Gateway payment id, or `"COD"` for cash on delivery.
    pub payment_id: String,
}

impl PaymentReference {
    pub fn cash_on_delivery() -> Self {
        PaymentReference {
            method: PaymentMethod::CashOnDelivery,
            payment_id: COD_PAYMENT_ID.to_string(),
        }
    }

    /// A completed gateway payment. The id is opaque to us.
    pub fn gateway(payment_id: impl Into<String>) -> Result<Self, ValidationError> {
        let payment_id = payment_id.into();
        if payment_id.trim().is_empty() {
            return Err(ValidationError::required("payment_id"));
        }
        Ok(PaymentReference {
            method: PaymentMethod::Gateway,
            payment_id,
        })
    }

    /// Payment status an order starts with.
    ///
    /// Gateway payments arrive already captured; cash is collected later.
    pub fn initial_status(&self) -> PaymentStatus {
        match self.method {
            PaymentMethod::Gateway => PaymentStatus::Success,
            PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Lines copied from the cart at checkout (frozen).
    pub items: Vec<LineItem>,
    /// Payable amount from the checkout-summary model, rounded to 2 dp.
    pub total: Money,
    pub payment: PaymentReference,
    /// Shipping address at checkout (frozen).
    pub address: Address,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Places an order from the cart's current contents.
    ///
    /// ## Flow
    /// ```text
    /// Cart (non-empty) ──► validate address ──► checkout summary ──► Order
    ///                                                               status: Processing
    /// ```
    ///
    /// The cart itself is not modified; clearing it is the caller's job.
    pub fn place(
        cart: &Cart,
        payment: PaymentReference,
        address: Address,
        policy: &CheckoutPolicy,
    ) -> CoreResult<Order> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_address(&address)?;

        let summary = compute_checkout_summary(&cart.items, policy)?;
        let now = Utc::now();

        Ok(Order {
            id: Uuid::new_v4().to_string(),
            user_id: cart.user_id.clone(),
            items: cart.items.clone(),
            total: summary.total.rounded(),
            payment_status: payment.initial_status(),
            payment,
            address,
            status: OrderStatus::Processing,
            created_at: now,
            updated_at: now,
        })
    }

    /// Cancels the order.
    ///
    /// ## Errors
    /// - `OrderAlreadyCancelled` when already cancelled
    /// - `InvalidOrderTransition` when delivered
    ///
    /// On error the order is unchanged.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.status {
            OrderStatus::Cancelled => Err(CoreError::OrderAlreadyCancelled),
            from if !from.can_transition_to(OrderStatus::Cancelled) => {
                Err(CoreError::InvalidOrderTransition {
                    from: from.to_string(),
                    to: OrderStatus::Cancelled.to_string(),
                })
            }
            _ => {
                self.set_status(OrderStatus::Cancelled);
                Ok(())
            }
        }
    }

    /// Moves the order along one edge of the state machine.
    pub fn advance_to(&mut self, next: OrderStatus) -> CoreResult<()> {
        if next == OrderStatus::Cancelled {
            return self.cancel();
        }

        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidOrderTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.set_status(next);
        Ok(())
    }

    /// Records a payment status change (admin console).
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        if self.payment_status != status {
            self.payment_status = status;
            self.updated_at = Utc::now();
        }
    }

    /// Itemized (GST) totals of the frozen lines, for the order details page.
    pub fn itemized_totals(&self) -> CoreResult<ItemizedTotals> {
        compute_itemized_total(&self.items)
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
