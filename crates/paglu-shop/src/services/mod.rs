//! # Shop Services
//!
//! [`Shop`] is the single entry point an HTTP layer calls. Each submodule
//! adds one group of operations to it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             Shop                                        │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │   Database   │  │ CheckoutPolicy│  │  Arc<dyn     │                  │
//! │  │  (pool)      │  │ (read-only)   │  │   Mailer>    │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! │  ┌──────────────────────────────────┐                                   │
//! │  │  Arc<tokio::Mutex<OtpStore>>     │◄──── OTP sweeper task             │
//! │  └──────────────────────────────────┘                                   │
//! │                                                                         │
//! │  cart.rs      get_cart, add_to_cart, update/remove/clear, cart_summary  │
//! │  checkout.rs  checkout                                                  │
//! │  orders.rs    list, details, cancel, admin status updates               │
//! │  wishlist.rs  wishlist, add, remove                                     │
//! │  addresses.rs saved_addresses, save_address, delete_address             │
//! │  signup.rs    send_otp, verify_otp, finalize_signup                     │
//! │  catalog.rs   browse, approval, stock, category/product admin          │
//! │  accounts.rs  user list, roles, delete, password reset                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations are read-modify-write against the store with no version
//! check; concurrent writers for one user race and the last save wins.

mod accounts;
mod addresses;
mod cart;
mod catalog;
mod checkout;
mod orders;
mod signup;
mod wishlist;

pub use catalog::ProductInput;
pub use orders::OrderDetails;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ShopConfig;
use crate::error::{ShopError, ShopResult};
use crate::mailer::Mailer;
use paglu_core::{CheckoutPolicy, Customer, OtpStore};
use paglu_db::Database;

/// Storefront and admin console services.
#[derive(Clone)]
pub struct Shop {
    db: Database,
    policy: CheckoutPolicy,
    otp: Arc<Mutex<OtpStore>>,
    mailer: Arc<dyn Mailer>,
}

impl Shop {
    pub fn new(
        db: Database,
        policy: CheckoutPolicy,
        otp_store: OtpStore,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Shop {
            db,
            policy,
            otp: Arc::new(Mutex::new(otp_store)),
            mailer,
        }
    }

    /// Builds the shop from loaded configuration.
    pub fn from_config(db: Database, config: &ShopConfig, mailer: Arc<dyn Mailer>) -> Self {
        Shop::new(db, config.checkout, OtpStore::new(config.otp_ttl()), mailer)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    /// Shared handle to the pending-signup store (for the sweeper).
    pub fn otp_store(&self) -> Arc<Mutex<OtpStore>> {
        Arc::clone(&self.otp)
    }

    async fn require_customer(&self, customer_id: &str) -> ShopResult<Customer> {
        self.db
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| ShopError::not_found("User", customer_id))
    }
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================
