//! # Cart Repository
//!
//! One cart document per user. Lines are stored as a JSON array on the
//! cart row; the consolidation rules live in `paglu_core::Cart`.
//!
//! ## Read-Modify-Write
//! ```text
//! get_or_create(user) ──► Cart ──► cart.add_item(..) ──► save(&cart)
//! ```
//! There is no version check between the read and the write; the last
//! writer wins.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{from_json, to_json};
use crate::error::{DbError, DbResult};
use paglu_core::Cart;

#[derive(Debug, Clone, sqlx::FromRow)]
struct CartRecord {
    user_id: String,
    items: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = DbError;

    fn try_from(r: CartRecord) -> DbResult<Self> {
        Ok(Cart {
            items: from_json("carts.items", &r.items)?,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Returns the user's cart, creating an empty one on first access.
    pub async fn get_or_create(&self, user_id: &str) -> DbResult<Cart> {
        let now = Utc::now();

        let created = sqlx::query(
            r#"
            INSERT OR IGNORE INTO carts (user_id, items, created_at, updated_at)
            VALUES (?1, '[]', ?2, ?2)
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if created.rows_affected() > 0 {
            debug!(user_id = %user_id, "Created cart");
        }

        let record = sqlx::query_as::<_, CartRecord>(
            "SELECT user_id, items, created_at, updated_at FROM carts WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Cart::try_from(record)
    }

    /// Writes the cart back, replacing its lines.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        debug!(user_id = %cart.user_id, lines = cart.items.len(), "Saving cart");

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id) DO UPDATE SET
                items = excluded.items,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&cart.user_id)
        .bind(to_json("carts.items", &cart.items)?)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
