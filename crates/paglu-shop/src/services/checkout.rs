//! # Checkout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(user, payment, address, save_address)                        │
//! │                                                                         │
//! │  1. Load cart                                                           │
//! │  2. Order::place()        empty cart / bad address → rejected          │
//! │                           total = checkout summary, rounded            │
//! │                           status Processing                            │
//! │                           payment Success (gateway) | Pending (COD)    │
//! │  3. save_address?         add to address book unless already saved     │
//! │  4. Insert order                                                        │
//! │  5. Clear cart                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The steps are separate writes; a failure part-way leaves the earlier
//! ones in place.

use tracing::info;

use super::Shop;
use crate::error::ShopResult;
use paglu_core::{Address, Order, PaymentReference};

impl Shop {
    /// Places an order for everything in the user's cart.
    pub async fn checkout(
        &self,
        user_id: &str,
        payment: PaymentReference,
        address: Address,
        save_address: bool,
    ) -> ShopResult<Order> {
        let mut cart = self.db.carts().get_or_create(user_id).await?;
        let order = Order::place(&cart, payment, address, &self.policy)?;

        if save_address {
            self.require_customer(user_id).await?;
            let mut book = self.db.customers().address_book(user_id).await?;
            if let Some(saved) = book.save_if_new(order.address.clone()) {
                self.db.customers().add_address(user_id, saved).await?;
            }
        }

        self.db.orders().insert(&order).await?;

        cart.clear();
        self.db.carts().save(&cart).await?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total,
            payment_status = %order.payment_status,
            "Order placed"
        );

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::{address, customer, harness, product};
    use paglu_core::{Money, OrderStatus, PaymentStatus, Variant};

    #[tokio::test]
    async fn test_cod_checkout() {
        let h = harness().await;
        let tee = product(&h.shop, "Tee", 10).await;
        h.shop
            .add_to_cart("u1", &tee.id, Some(1), Variant::new("red", "M"))
            .await
            .unwrap();

        let order = h
            .shop
            .checkout("u1", PaymentReference::cash_on_delivery(), address(), false)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment.payment_id, "COD");
        assert_eq!(order.total, Money::from_minor(11220));
        assert_eq!(order.items.len(), 1);

        assert!(h.shop.get_cart("u1").await.unwrap().is_empty());
        let stored = h.shop.db().orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.items, order.items);
    }

    #[tokio::test]
    async fn test_gateway_checkout_is_paid() {
        let h = harness().await;
        let tee = product(&h.shop, "Tee", 10).await;
        h.shop
            .add_to_cart("u1", &tee.id, Some(2), Variant::new("red", "M"))
            .await
            .unwrap();

        let payment = PaymentReference::gateway("pay_Nx81").unwrap();
        let order = h.shop.checkout("u1", payment, address(), false).await.unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Success);
        assert_eq!(order.total, Money::from_minor(19440));
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let h = harness().await;
        let err = h
            .shop
            .checkout("u1", PaymentReference::cash_on_delivery(), address(), false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_bad_address_keeps_cart() {
        let h = harness().await;
        let tee = product(&h.shop, "Tee", 10).await;
        h.shop
            .add_to_cart("u1", &tee.id, None, Variant::new("red", "M"))
            .await
            .unwrap();

        let mut bad = address();
        bad.city = String::new();
        let err = h
            .shop
            .checkout("u1", PaymentReference::cash_on_delivery(), bad, false)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(h.shop.get_cart("u1").await.unwrap().item_count(), 1);
        assert!(h.shop.list_orders("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_address_only_once() {
        let h = harness().await;
        let c = customer(&h.shop, "asha@example.com").await;
        let tee = product(&h.shop, "Tee", 10).await;

        for _ in 0..2 {
            h.shop
                .add_to_cart(&c.id, &tee.id, None, Variant::new("red", "M"))
                .await
                .unwrap();
            h.shop
                .checkout(&c.id, PaymentReference::cash_on_delivery(), address(), true)
                .await
                .unwrap();
        }

        let saved = h.shop.saved_addresses(&c.id).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].address, address());
        assert_eq!(h.shop.list_orders(&c.id).await.unwrap().len(), 2);
    }
}
