//! # Cart Services
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │ Summary  │     │ (frozen) │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           update_cart_quantity                    │             │
//! │       │           remove_from_cart                        │             │
//! │       │                                                   │             │
//! │       └────────── clear_cart ◄──────── checkout clears ◄──┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation loads the cart, applies the engine operation and saves
//! only if something changed.

use tracing::debug;

use super::Shop;
use crate::error::{ShopError, ShopResult};
use paglu_core::pricing::compute_checkout_summary;
use paglu_core::{Cart, CheckoutSummary, Variant};

impl Shop {
    /// Returns the user's cart, creating it on first access.
    pub async fn get_cart(&self, user_id: &str) -> ShopResult<Cart> {
        Ok(self.db.carts().get_or_create(user_id).await?)
    }

    /// Adds a product to the cart.
    ///
    /// ## Behavior
    /// - Same product, color and size already in the cart: quantities add up
    /// - Otherwise a new line is appended with the product's current price
    /// - `quantity` defaults to 1
    pub async fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: Option<i64>,
        variant: Variant,
    ) -> ShopResult<Cart> {
        debug!(
            user_id = %user_id,
            product_id = %product_id,
            quantity = ?quantity,
            color = %variant.color,
            size = %variant.size,
            "add_to_cart"
        );

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", product_id))?;

        if !product.is_approved {
            return Err(ShopError::validation("Product is not available for sale"));
        }

        let mut cart = self.db.carts().get_or_create(user_id).await?;
        cart.add_item(&product, quantity, variant)?;
        self.db.carts().save(&cart).await?;

        Ok(cart)
    }

    /// Sets a line's quantity. Unknown lines are left alone.
    pub async fn update_cart_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        variant: &Variant,
        quantity: i64,
    ) -> ShopResult<Cart> {
        debug!(user_id = %user_id, product_id = %product_id, quantity, "update_cart_quantity");

        let mut cart = self.db.carts().get_or_create(user_id).await?;
        if cart.update_quantity(product_id, variant, quantity)? {
            self.db.carts().save(&cart).await?;
        }

        Ok(cart)
    }

    /// Removes a line. Removing something not in the cart is a no-op.
    pub async fn remove_from_cart(
        &self,
        user_id: &str,
        product_id: &str,
        variant: &Variant,
    ) -> ShopResult<Cart> {
        debug!(user_id = %user_id, product_id = %product_id, "remove_from_cart");

        let mut cart = self.db.carts().get_or_create(user_id).await?;
        if cart.remove_item(product_id, variant) > 0 {
            self.db.carts().save(&cart).await?;
        }

        Ok(cart)
    }

    pub async fn clear_cart(&self, user_id: &str) -> ShopResult<Cart> {
        debug!(user_id = %user_id, "clear_cart");

        let mut cart = self.db.carts().get_or_create(user_id).await?;
        if !cart.is_empty() {
            cart.clear();
            self.db.carts().save(&cart).await?;
        }

        Ok(cart)
    }

    /// Shipping, checkout tax and total for the current cart.
    pub async fn cart_summary(&self, user_id: &str) -> ShopResult<CheckoutSummary> {
        let cart = self.db.carts().get_or_create(user_id).await?;
        Ok(compute_checkout_summary(&cart.items, &self.policy)?)
    }
}
