//! # Order Repository
//!
//! Placed orders. Lines and the shipping address are frozen JSON documents;
//! only `status` and `payment_status` are ever updated.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. CHECKOUT                                                           │
//! │     └── insert(&order)          status: processing                     │
//! │                                                                         │
//! │  2. CUSTOMER                                                           │
//! │     └── list_for_user()         newest first                           │
//! │     └── update_status(cancelled) after Order::cancel()                 │
//! │                                                                         │
//! │  3. ADMIN CONSOLE                                                      │
//! │     └── list_all(filter)                                               │
//! │     └── update_status() / update_payment_status()                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use super::{from_json, parse_money, to_json};
use crate::error::{DbError, DbResult};
use paglu_core::{Order, OrderStatus, PaymentMethod, PaymentReference, PaymentStatus};

const ORDER_COLUMNS: &str = r#"
    id, user_id, items, total, payment_method, payment_id, address,
    status, payment_status, created_at, updated_at
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRecord {
    id: String,
    user_id: String,
    items: String,
    total: String,
    payment_method: PaymentMethod,
    payment_id: String,
    address: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = DbError;

    fn try_from(r: OrderRecord) -> DbResult<Self> {
        Ok(Order {
            items: from_json("orders.items", &r.items)?,
            total: parse_money("orders.total", &r.total)?,
            address: from_json("orders.address", &r.address)?,
            payment: PaymentReference {
                method: r.payment_method,
                payment_id: r.payment_id,
            },
            id: r.id,
            user_id: r.user_id,
            status: r.status,
            payment_status: r.payment_status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn to_orders(records: Vec<OrderRecord>) -> DbResult<Vec<Order>> {
    records.into_iter().map(Order::try_from).collect()
}

/// Admin console filter for [`OrderRepository::list_all`]. Empty = all orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub user_id: Option<String>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts a placed order.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(
            id = %order.id,
            user_id = %order.user_id,
            total = %order.total,
            "Inserting order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, items, total, payment_method, payment_id, address,
                status, payment_status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(to_json("orders.items", &order.items)?)
        .bind(order.total.amount().to_string())
        .bind(order.payment.method)
        .bind(&order.payment.payment_id)
        .bind(to_json("orders.address", &order.address)?)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let record = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Order::try_from).transpose()
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            ORDER_COLUMNS
        );
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        to_orders(records)
    }

    /// Lists orders across all users, newest first (admin console).
    pub async fn list_all(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM orders
            WHERE (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR payment_status = ?2)
              AND (?3 IS NULL OR user_id = ?3)
            ORDER BY created_at DESC, rowid DESC
            "#,
            ORDER_COLUMNS
        );
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(filter.status)
            .bind(filter.payment_status)
            .bind(filter.user_id.as_deref())
            .fetch_all(&self.pool)
            .await?;

        to_orders(records)
    }

    /// Writes a new fulfilment status.
    ///
    /// Transition rules are checked by `Order::advance_to` / `Order::cancel`
    /// before this is called.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(updated_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Writes a new payment status.
    pub async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, payment_status = %payment_status, "Updating payment status");

        let result =
            sqlx::query("UPDATE orders SET payment_status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(payment_status)
                .bind(updated_at)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{seeded_product, test_db};
    use paglu_core::{Address, Cart, CheckoutPolicy, Variant};

    fn address() -> Address {
        Address {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            zip_code: "411001".to_string(),
        }
    }

    async fn place(db: &crate::Database, user_id: &str, payment: PaymentReference) -> Order {
        let product = seeded_product(db, "Kurta").await;
        let mut cart = Cart::new(user_id);
        cart.add_item(&product, Some(1), Variant::new("red", "M")).unwrap();

        let order = Order::place(&cart, payment, address(), &CheckoutPolicy::default()).unwrap();
        db.orders().insert(&order).await.unwrap();
        order
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let order = place(&db, "u1", PaymentReference::cash_on_delivery()).await;

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.items, order.items);
        assert_eq!(loaded.address, order.address);
        assert_eq!(loaded.total, order.total);
        assert_eq!(loaded.payment.payment_id, "COD");
        assert_eq!(loaded.status, OrderStatus::Processing);
        assert_eq!(loaded.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = test_db().await;
        let first = place(&db, "u1", PaymentReference::cash_on_delivery()).await;
        let second = place(&db, "u1", PaymentReference::gateway("pay_1").unwrap()).await;
        place(&db, "u2", PaymentReference::cash_on_delivery()).await;

        let orders = db.orders().list_for_user("u1").await.unwrap();
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn test_list_all_with_filter() {
        let db = test_db().await;
        let cod = place(&db, "u1", PaymentReference::cash_on_delivery()).await;
        place(&db, "u2", PaymentReference::gateway("pay_2").unwrap()).await;

        assert_eq!(db.orders().list_all(&OrderFilter::default()).await.unwrap().len(), 2);

        let pending = OrderFilter {
            payment_status: Some(PaymentStatus::Pending),
            ..OrderFilter::default()
        };
        let orders = db.orders().list_all(&pending).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, cod.id);

        let shipped = OrderFilter {
            status: Some(OrderStatus::Shipped),
            ..OrderFilter::default()
        };
        assert!(db.orders().list_all(&shipped).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_updates() {
        let db = test_db().await;
        let order = place(&db, "u1", PaymentReference::cash_on_delivery()).await;

        db.orders()
            .update_status(&order.id, OrderStatus::Shipped, Utc::now())
            .await
            .unwrap();
        db.orders()
            .update_payment_status(&order.id, PaymentStatus::Success, Utc::now())
            .await
            .unwrap();

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Shipped);
        assert_eq!(loaded.payment_status, PaymentStatus::Success);
        assert_eq!(loaded.items, order.items);
    }

    #[tokio::test]
    async fn test_update_missing_order() {
        let db = test_db().await;
        let err = db
            .orders()
            .update_status("missing", OrderStatus::Cancelled, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
