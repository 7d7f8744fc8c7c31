//! # Wishlist Repository
//!
//! One row per (user, product). The primary key makes a second add a no-op,
//! matching `Wishlist::add`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use paglu_core::wishlist::WishlistEntry;
use paglu_core::Wishlist;

#[derive(Debug, Clone, sqlx::FromRow)]
struct WishlistEntryRecord {
    product_id: String,
    added_at: DateTime<Utc>,
}

/// Repository for wishlist database operations.
#[derive(Debug, Clone)]
pub struct WishlistRepository {
    pool: SqlitePool,
}

impl WishlistRepository {
    /// Creates a new WishlistRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WishlistRepository { pool }
    }

    /// Loads a user's wishlist, oldest entry first. Unknown users get an empty list.
    pub async fn get(&self, user_id: &str) -> DbResult<Wishlist> {
        let records = sqlx::query_as::<_, WishlistEntryRecord>(
            r#"
            SELECT product_id, added_at
            FROM wishlist_entries
            WHERE user_id = ?1
            ORDER BY added_at, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut wishlist = Wishlist::new(user_id);
        wishlist.entries = records
            .into_iter()
            .map(|r| WishlistEntry {
                product_id: r.product_id,
                added_at: r.added_at,
            })
            .collect();

        Ok(wishlist)
    }

    /// Saves a product. Returns `false` if it was already on the list.
    pub async fn add(&self, user_id: &str, product_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO wishlist_entries (user_id, product_id, added_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let added = result.rows_affected() > 0;
        debug!(user_id = %user_id, product_id = %product_id, added, "Wishlist add");

        Ok(added)
    }

    /// Removes a product. Returns `false` if it wasn't on the list.
    pub async fn remove(&self, user_id: &str, product_id: &str) -> DbResult<bool> {
        let result =
            sqlx::query("DELETE FROM wishlist_entries WHERE user_id = ?1 AND product_id = ?2")
                .bind(user_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::fixtures::{seeded_product, test_db};

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = test_db().await;
        let product = seeded_product(&db, "Scarf").await;

        assert!(db.wishlists().add("u1", &product.id).await.unwrap());
        assert!(!db.wishlists().add("u1", &product.id).await.unwrap());

        let list = db.wishlists().get("u1").await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.contains(&product.id));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_db().await;
        let a = seeded_product(&db, "Scarf").await;
        let b = seeded_product(&db, "Stole").await;
        db.wishlists().add("u1", &a.id).await.unwrap();
        db.wishlists().add("u1", &b.id).await.unwrap();

        assert!(db.wishlists().remove("u1", &a.id).await.unwrap());
        assert!(!db.wishlists().remove("u1", &a.id).await.unwrap());

        let list = db.wishlists().get("u1").await.unwrap();
        assert_eq!(list.entries.len(), 1);
        assert_eq!(list.entries[0].product_id, b.id);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = test_db().await;
        let err = db.wishlists().add("u1", "missing").await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_for_new_user() {
        let db = test_db().await;
        let list = db.wishlists().get("nobody").await.unwrap();
        assert!(list.is_empty());
        assert_eq!(list.user_id, "nobody");
    }
}
