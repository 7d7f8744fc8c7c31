//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Shop service                                                          │
//! │       │                                                                 │
//! │       │  db.orders().list_for_user("user-1")                           │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── sqlx::query_as::<_, OrderRecord>(SQL)   ← flat row                │
//! │  └── Order::try_from(record)                 ← JSON + decimals decoded │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  paglu_core::Order                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository reads rows into a `*Record` struct (`sqlx::FromRow`) and
//! converts it to the core type, so decoding failures surface as
//! [`DbError::InvalidData`] instead of panics.
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - Categories and subcategories
//! - [`product::ProductRepository`] - Catalog products
//! - [`cart::CartRepository`] - One cart document per user
//! - [`order::OrderRepository`] - Placed orders and status updates
//! - [`wishlist::WishlistRepository`] - Saved products
//! - [`customer::CustomerRepository`] - Customers and saved addresses

pub mod cart;
pub mod category;
pub mod customer;
pub mod order;
pub mod product;
pub mod wishlist;

use paglu_core::{Money, Percent};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DbError, DbResult};

/// Parses a TEXT decimal column into `Money`.
pub(crate) fn parse_money(column: &str, raw: &str) -> DbResult<Money> {
    raw.parse::<Money>()
        .map_err(|e| DbError::invalid_data(column, e))
}

/// Parses a TEXT decimal column into `Percent` (range-checked).
pub(crate) fn parse_percent(column: &str, raw: &str) -> DbResult<Percent> {
    raw.parse::<Percent>()
        .map_err(|e| DbError::invalid_data(column, e))
}

/// Decodes a JSON document column.
pub(crate) fn from_json<T: DeserializeOwned>(column: &str, raw: &str) -> DbResult<T> {
    serde_json::from_str(raw).map_err(|e| DbError::invalid_data(column, e))
}

/// Encodes a value as a JSON document column.
pub(crate) fn to_json<T: Serialize + ?Sized>(column: &str, value: &T) -> DbResult<String> {
    serde_json::to_string(value).map_err(|e| DbError::invalid_data(column, e))
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use paglu_core::{Category, Money, Percent, Product};
    use uuid::Uuid;

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            image: None,
            created_at: Utc::now(),
        }
    }

    /// Approved product: price 100, 10% off, 5% GST, stock 10.
    pub fn product(category_id: &str, title: &str) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.to_string(),
            subcategory_id: None,
            owner_id: None,
            title: title.to_string(),
            description: "Soft cotton".to_string(),
            features: vec!["Machine wash".to_string()],
            stock: 10,
            sizes: vec!["M".to_string(), "L".to_string()],
            colors: vec!["red".to_string()],
            price: Money::from_major(100),
            discount: Percent::from_whole(10).unwrap(),
            gst: Percent::from_whole(5).unwrap(),
            on_sale: false,
            images: vec!["https://img.example/1.jpg".to_string()],
            is_approved: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a category and one approved product, returning the product.
    pub async fn seeded_product(db: &Database, title: &str) -> Product {
        let cat = category(&format!("Cat {}", Uuid::new_v4()));
        db.categories().insert(&cat).await.unwrap();
        let product = product(&cat.id, title);
        db.products().insert(&product).await.unwrap();
        product
    }
}
