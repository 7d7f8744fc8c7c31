//! # Order Services
//!
//! Customer order history, cancellation, and the admin console's status
//! tracking. Transition rules live in `paglu_core::Order`; this module
//! loads, applies and writes back.
//!
//! ## Status Transitions
//! ```text
//! Pending ──► Processing ──► Shipped ──► Delivered
//!    │             │            │
//!    └─────────────┴────────────┴──────► Cancelled
//! ```

use serde::Serialize;
use tracing::info;

use super::Shop;
use crate::error::{ShopError, ShopResult};
use paglu_core::{ItemizedTotals, Order, OrderStatus, PaymentStatus};
use paglu_db::OrderFilter;

/// An order with its itemized (GST) breakdown, for the order details page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order: Order,
    pub totals: ItemizedTotals,
}

impl Shop {
    /// The user's orders, newest first.
    pub async fn list_orders(&self, user_id: &str) -> ShopResult<Vec<Order>> {
        Ok(self.db.orders().list_for_user(user_id).await?)
    }

    pub async fn order_details(&self, order_id: &str) -> ShopResult<OrderDetails> {
        let order = self.load_order(order_id).await?;
        let totals = order.itemized_totals()?;
        Ok(OrderDetails { order, totals })
    }

    /// Cancels an order.
    ///
    /// ## Errors
    /// - `NOT_FOUND` for an unknown order
    /// - `BUSINESS_LOGIC` when already cancelled or delivered (order unchanged)
    pub async fn cancel_order(&self, order_id: &str) -> ShopResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.cancel()?;

        self.db
            .orders()
            .update_status(&order.id, order.status, order.updated_at)
            .await?;

        info!(order_id = %order.id, user_id = %order.user_id, "Order cancelled");
        Ok(order)
    }

    // =========================================================================
    // Admin Console
    // =========================================================================

    pub async fn list_all_orders(&self, filter: &OrderFilter) -> ShopResult<Vec<Order>> {
        Ok(self.db.orders().list_all(filter).await?)
    }

    /// Moves an order to `status` along a legal edge.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> ShopResult<Order> {
        let mut order = self.load_order(order_id).await?;
        let from = order.status;
        order.advance_to(status)?;

        self.db
            .orders()
            .update_status(&order.id, order.status, order.updated_at)
            .await?;

        info!(order_id = %order.id, from = %from, to = %order.status, "Order status updated");
        Ok(order)
    }

    pub async fn update_payment_status(
        &self,
        order_id: &str,
        payment_status: PaymentStatus,
    ) -> ShopResult<Order> {
        let mut order = self.load_order(order_id).await?;
        order.set_payment_status(payment_status);

        self.db
            .orders()
            .update_payment_status(&order.id, order.payment_status, order.updated_at)
            .await?;

        info!(order_id = %order.id, payment_status = %payment_status, "Payment status updated");
        Ok(order)
    }

    async fn load_order(&self, order_id: &str) -> ShopResult<Order> {
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::{address, harness, product, Harness};
    use paglu_core::{Money, PaymentReference, Variant};

    async fn placed(h: &Harness, user_id: &str, qty: i64) -> Order {
        let tee = product(&h.shop, &format!("Tee {}", qty), 10).await;
        h.shop
            .add_to_cart(user_id, &tee.id, Some(qty), Variant::new("red", "M"))
            .await
            .unwrap();
        h.shop
            .checkout(user_id, PaymentReference::cash_on_delivery(), address(), false)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_order_details_use_itemized_model() {
        let h = harness().await;
        let order = placed(&h, "u1", 2).await;

        let details = h.shop.order_details(&order.id).await.unwrap();
        assert_eq!(details.totals.subtotal, Money::from_major(200));
        assert_eq!(details.totals.total_discount, Money::from_major(20));
        assert_eq!(details.totals.total_tax, Money::from_major(9));
        assert_eq!(details.totals.grand_total, Money::from_major(189));
    }

    #[tokio::test]
    async fn test_cancel_processing_then_again() {
        let h = harness().await;
        let order = placed(&h, "u1", 1).await;

        let cancelled = h.shop.cancel_order(&order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = h.shop.cancel_order(&order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Order already cancelled");
    }

    #[tokio::test]
    async fn test_cancel_delivered_is_rejected() {
        let h = harness().await;
        let order = placed(&h, "u1", 1).await;

        h.shop
            .update_order_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        h.shop
            .update_order_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap();

        let err = h.shop.cancel_order(&order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let stored = h.shop.order_details(&order.id).await.unwrap().order;
        assert_eq!(stored.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_illegal_status_jump() {
        let h = harness().await;
        let order = placed(&h, "u1", 1).await;

        let err = h
            .shop
            .update_order_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_admin_listing_and_payment_status() {
        let h = harness().await;
        let a = placed(&h, "u1", 1).await;
        placed(&h, "u2", 1).await;

        h.shop
            .update_payment_status(&a.id, PaymentStatus::Success)
            .await
            .unwrap();

        let all = h.shop.list_all_orders(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let paid = OrderFilter {
            payment_status: Some(PaymentStatus::Success),
            ..OrderFilter::default()
        };
        let paid = h.shop.list_all_orders(&paid).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, a.id);

        assert_eq!(h.shop.list_orders("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_payment_status_timestamp_matches_stored_row() {
        let h = harness().await;
        let order = placed(&h, "u1", 1).await;

        let paid = h
            .shop
            .update_payment_status(&order.id, PaymentStatus::Success)
            .await
            .unwrap();
        let stored = h.shop.order_details(&order.id).await.unwrap().order;
        assert_eq!(stored.payment_status, PaymentStatus::Success);
        assert_eq!(stored.updated_at, paid.updated_at);

        // same status again: nothing moves
        let again = h
            .shop
            .update_payment_status(&order.id, PaymentStatus::Success)
            .await
            .unwrap();
        assert_eq!(again.updated_at, paid.updated_at);
        let stored = h.shop.order_details(&order.id).await.unwrap().order;
        assert_eq!(stored.updated_at, paid.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let h = harness().await;
        let err = h.shop.cancel_order("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
