//! # Product Repository
//!
//! Catalog products.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products row                        paglu_core::Product               │
//! │  ─────────────                       ───────────────────               │
//! │  price     TEXT "1299.00"    ──►     Money                             │
//! │  discount  TEXT "12.5"       ──►     Percent (range-checked)           │
//! │  sizes     TEXT '["M","L"]'  ──►     Vec<String>                       │
//! │  images    TEXT '["a.jpg"]'  ──►     Vec<String> (first = primary)     │
//! │  is_approved INTEGER 0/1     ──►     bool                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{from_json, parse_money, parse_percent, to_json};
use crate::error::{DbError, DbResult};
use paglu_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    id, category_id, subcategory_id, owner_id, title, description, features, stock,
    sizes, colors, price, discount, gst, on_sale, images, is_approved,
    created_at, updated_at
"#;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRecord {
    id: String,
    category_id: String,
    subcategory_id: Option<String>,
    owner_id: Option<String>,
    title: String,
    description: String,
    features: String,
    stock: i64,
    sizes: String,
    colors: String,
    price: String,
    discount: String,
    gst: String,
    on_sale: bool,
    images: String,
    is_approved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DbError;

    fn try_from(r: ProductRecord) -> DbResult<Self> {
        Ok(Product {
            features: from_json("products.features", &r.features)?,
            sizes: from_json("products.sizes", &r.sizes)?,
            colors: from_json("products.colors", &r.colors)?,
            images: from_json("products.images", &r.images)?,
            price: parse_money("products.price", &r.price)?,
            discount: parse_percent("products.discount", &r.discount)?,
            gst: parse_percent("products.gst", &r.gst)?,
            id: r.id,
            category_id: r.category_id,
            subcategory_id: r.subcategory_id,
            owner_id: r.owner_id,
            title: r.title,
            description: r.description,
            stock: r.stock,
            on_sale: r.on_sale,
            is_approved: r.is_approved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn to_products(records: Vec<ProductRecord>) -> DbResult<Vec<Product>> {
    records.into_iter().map(Product::try_from).collect()
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, title = %product.title, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, subcategory_id, owner_id, title, description, features, stock,
                sizes, colors, price, discount, gst, on_sale, images, is_approved,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.subcategory_id)
        .bind(&product.owner_id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(to_json("products.features", &product.features)?)
        .bind(product.stock)
        .bind(to_json("products.sizes", &product.sizes)?)
        .bind(to_json("products.colors", &product.colors)?)
        .bind(product.price.amount().to_string())
        .bind(product.discount.value().to_string())
        .bind(product.gst.value().to_string())
        .bind(product.on_sale)
        .bind(to_json("products.images", &product.images)?)
        .bind(product.is_approved)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID, approved or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Product::try_from).transpose()
    }

    /// Rewrites every editable column of an existing product.
    ///
    /// `id`, `owner_id` and `created_at` are kept; `updated_at` is taken
    /// from the argument.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, title = %product.title, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = ?2, subcategory_id = ?3, title = ?4, description = ?5,
                features = ?6, stock = ?7, sizes = ?8, colors = ?9, price = ?10,
                discount = ?11, gst = ?12, on_sale = ?13, images = ?14,
                is_approved = ?15, updated_at = ?16
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.category_id)
        .bind(&product.subcategory_id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(to_json("products.features", &product.features)?)
        .bind(product.stock)
        .bind(to_json("products.sizes", &product.sizes)?)
        .bind(to_json("products.colors", &product.colors)?)
        .bind(product.price.amount().to_string())
        .bind(product.discount.value().to_string())
        .bind(product.gst.value().to_string())
        .bind(product.on_sale)
        .bind(to_json("products.images", &product.images)?)
        .bind(product.is_approved)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product. Returns `false` if it did not exist.
    ///
    /// Wishlist entries for the product go with it; cart and order lines
    /// are snapshots and stay.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Gets a product only if it is approved (storefront product page).
    pub async fn get_approved(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ?1 AND is_approved = 1",
            PRODUCT_COLUMNS
        );
        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Product::try_from).transpose()
    }

    /// Lists every product, approved or not, newest first (admin console).
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products ORDER BY created_at DESC, rowid DESC",
            PRODUCT_COLUMNS
        );
        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        to_products(records)
    }

    /// Lists approved products, newest first, optionally within one category.
    pub async fn list_approved(&self, category_id: Option<&str>) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM products
            WHERE is_approved = 1
              AND (?1 IS NULL OR category_id = ?1)
            ORDER BY created_at DESC, rowid DESC
            "#,
            PRODUCT_COLUMNS
        );
        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        to_products(records)
    }

    /// Lists products awaiting approval (admin console).
    pub async fn list_pending_approval(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE is_approved = 0 ORDER BY created_at, rowid",
            PRODUCT_COLUMNS
        );
        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        to_products(records)
    }

    /// Approves or withdraws a product.
    pub async fn set_approval(&self, id: &str, approved: bool) -> DbResult<()> {
        debug!(id = %id, approved, "Setting product approval");

        let result = sqlx::query(
            "UPDATE products SET is_approved = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(approved)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets the stock level (must not be negative).
    pub async fn update_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock, "Updating stock");

        let result = sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products filed under a category.
    pub async fn count_in_category(&self, category_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts products filed under a subcategory.
    pub async fn count_in_subcategory(&self, subcategory_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE subcategory_id = ?1")
                .bind(subcategory_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Counts all products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{category, product, test_db};
    use paglu_core::{Money, Percent};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_insert_and_get_round_trips_decimals_and_lists() {
        let db = test_db().await;
        let cat = category("Women");
        db.categories().insert(&cat).await.unwrap();

        let mut p = product(&cat.id, "Linen Kurta");
        p.price = Money::from_minor(129_950);
        p.gst = Percent::new(Decimal::new(125, 1)).unwrap();
        db.products().insert(&p).await.unwrap();

        let got = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(got.price, p.price);
        assert_eq!(got.gst, p.gst);
        assert_eq!(got.sizes, vec!["M", "L"]);
        assert_eq!(got.primary_image(), Some("https://img.example/1.jpg"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_approved_filters() {
        let db = test_db().await;
        let women = category("Women");
        let men = category("Men");
        db.categories().insert(&women).await.unwrap();
        db.categories().insert(&men).await.unwrap();

        let a = product(&women.id, "Saree");
        let b = product(&men.id, "Shirt");
        let mut hidden = product(&women.id, "Draft");
        hidden.is_approved = false;
        for p in [&a, &b, &hidden] {
            db.products().insert(p).await.unwrap();
        }

        assert_eq!(db.products().list_approved(None).await.unwrap().len(), 2);

        let women_only = db.products().list_approved(Some(&women.id)).await.unwrap();
        assert_eq!(women_only.len(), 1);
        assert_eq!(women_only[0].title, "Saree");

        let pending = db.products().list_pending_approval().await.unwrap();
        assert_eq!(pending.len(), 1);

        db.products().set_approval(&hidden.id, true).await.unwrap();
        assert_eq!(db.products().list_approved(Some(&women.id)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let women = category("Women");
        let men = category("Men");
        db.categories().insert(&women).await.unwrap();
        db.categories().insert(&men).await.unwrap();
        let p = product(&women.id, "Saree");
        db.products().insert(&p).await.unwrap();

        let mut edited = p.clone();
        edited.title = "Silk Saree".to_string();
        edited.category_id = men.id.clone();
        edited.price = Money::from_major(2499);
        edited.colors = vec!["gold".to_string()];
        edited.updated_at = Utc::now();
        db.products().update(&edited).await.unwrap();

        let got = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(got.title, "Silk Saree");
        assert_eq!(got.category_id, men.id);
        assert_eq!(got.price, Money::from_major(2499));
        assert_eq!(got.colors, vec!["gold"]);
        assert_eq!(got.created_at, p.created_at);
        assert_eq!(db.products().count_in_category(&men.id).await.unwrap(), 1);
        assert_eq!(db.products().count_in_category(&women.id).await.unwrap(), 0);

        let mut ghost = edited.clone();
        ghost.id = "missing".to_string();
        assert!(matches!(
            db.products().update(&ghost).await,
            Err(DbError::NotFound { .. })
        ));

        assert!(db.products().delete(&p.id).await.unwrap());
        assert!(!db.products().delete(&p.id).await.unwrap());
        assert!(db.products().get_by_id(&p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_approved_and_list_all() {
        let db = test_db().await;
        let cat = category("Kids");
        db.categories().insert(&cat).await.unwrap();
        let shown = product(&cat.id, "Cap");
        let mut draft = product(&cat.id, "Draft");
        draft.is_approved = false;
        db.products().insert(&shown).await.unwrap();
        db.products().insert(&draft).await.unwrap();

        assert!(db.products().get_approved(&shown.id).await.unwrap().is_some());
        assert!(db.products().get_approved(&draft.id).await.unwrap().is_none());
        assert_eq!(db.products().list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_stock() {
        let db = test_db().await;
        let cat = category("Kids");
        db.categories().insert(&cat).await.unwrap();
        let p = product(&cat.id, "Cap");
        db.products().insert(&p).await.unwrap();

        db.products().update_stock(&p.id, 3).await.unwrap();
        assert_eq!(db.products().get_by_id(&p.id).await.unwrap().unwrap().stock, 3);

        assert!(db.products().update_stock(&p.id, -1).await.is_err());
        assert!(matches!(
            db.products().update_stock("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
