//! # Category Repository
//!
//! Categories and their subcategories.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use paglu_core::{Category, Subcategory};

#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRecord {
    id: String,
    name: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            name: r.name,
            image: r.image,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SubcategoryRecord {
    id: String,
    category_id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<SubcategoryRecord> for Subcategory {
    fn from(r: SubcategoryRecord) -> Self {
        Subcategory {
            id: r.id,
            category_id: r.category_id,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category. Names are unique.
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, image, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.image)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Category::from))
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, image, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Category::from).collect())
    }

    /// Renames a category or replaces its image.
    pub async fn update(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2, image = ?3 WHERE id = ?1")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.image)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    /// Deletes a category and its subcategories. Returns `false` if absent.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while products still
    /// reference it.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Inserts a subcategory under an existing category.
    pub async fn insert_subcategory(&self, subcategory: &Subcategory) -> DbResult<()> {
        debug!(
            id = %subcategory.id,
            category_id = %subcategory.category_id,
            "Inserting subcategory"
        );

        sqlx::query(
            r#"
            INSERT INTO subcategories (id, category_id, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&subcategory.id)
        .bind(&subcategory.category_id)
        .bind(&subcategory.name)
        .bind(subcategory.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists the subcategories of a category by name.
    pub async fn list_subcategories(&self, category_id: &str) -> DbResult<Vec<Subcategory>> {
        let records = sqlx::query_as::<_, SubcategoryRecord>(
            r#"
            SELECT id, category_id, name, created_at
            FROM subcategories
            WHERE category_id = ?1
            ORDER BY name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Subcategory::from).collect())
    }

    pub async fn get_subcategory(&self, id: &str) -> DbResult<Option<Subcategory>> {
        let record = sqlx::query_as::<_, SubcategoryRecord>(
            "SELECT id, category_id, name, created_at FROM subcategories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Subcategory::from))
    }

    /// Renames a subcategory or moves it to another category.
    pub async fn update_subcategory(&self, subcategory: &Subcategory) -> DbResult<()> {
        debug!(
            id = %subcategory.id,
            category_id = %subcategory.category_id,
            "Updating subcategory"
        );

        let result =
            sqlx::query("UPDATE subcategories SET category_id = ?2, name = ?3 WHERE id = ?1")
                .bind(&subcategory.id)
                .bind(&subcategory.category_id)
                .bind(&subcategory.name)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Subcategory", &subcategory.id));
        }

        Ok(())
    }

    /// Deletes a subcategory. Returns `false` if absent.
    pub async fn delete_subcategory(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting subcategory");

        let result = sqlx::query("DELETE FROM subcategories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts categories (the seed binary uses this to skip reseeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
