//! # Catalog Services
//!
//! Storefront browsing plus the admin console's catalog management.
//!
//! ## Product Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_product ──► pending (is_approved = false)                       │
//! │                        │                                                │
//! │                        │ set_product_approval(true)                     │
//! │                        ▼                                                │
//! │                     approved ──► list_products / product / add_to_cart  │
//! │                        │                                                │
//! │                        │ set_product_approval(false)                    │
//! │                        ▼                                                │
//! │                     pending again                                       │
//! │                                                                         │
//! │  Categories and subcategories cannot be deleted while products are     │
//! │  filed under them (CONFLICT).                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::Shop;
use crate::error::{ErrorCode, ShopError, ShopResult};
use paglu_core::validation::{validate_catalog_name, validate_product, validate_stock};
use paglu_core::{Category, Money, Percent, Product, Subcategory};

/// What an admin or seller submits when creating or editing a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub stock: i64,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub price: Money,
    #[serde(default)]
    pub discount: Percent,
    #[serde(default)]
    pub gst: Percent,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductInput {
    fn apply_to(self, product: &mut Product) {
        product.category_id = self.category_id.trim().to_string();
        product.subcategory_id = self.subcategory_id.filter(|s| !s.trim().is_empty());
        product.title = self.title.trim().to_string();
        product.description = self.description;
        product.features = self.features;
        product.stock = self.stock;
        product.sizes = self.sizes;
        product.colors = self.colors;
        product.price = self.price;
        product.discount = self.discount;
        product.gst = self.gst;
        product.on_sale = self.on_sale;
        product.images = self.images;
    }
}

impl Shop {
    // =========================================================================
    // Storefront
    // =========================================================================

    pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        Ok(self.db.categories().list().await?)
    }

    pub async fn list_subcategories(&self, category_id: &str) -> ShopResult<Vec<Subcategory>> {
        Ok(self.db.categories().list_subcategories(category_id).await?)
    }

    /// Approved products, newest first, optionally within one category.
    pub async fn list_products(&self, category_id: Option<&str>) -> ShopResult<Vec<Product>> {
        Ok(self.db.products().list_approved(category_id).await?)
    }

    /// The product page. Unapproved products are not found.
    pub async fn product(&self, product_id: &str) -> ShopResult<Product> {
        self.db
            .products()
            .get_approved(product_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", product_id))
    }

    // =========================================================================
    // Admin: Products
    // =========================================================================

    pub async fn list_all_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.db.products().list_all().await?)
    }

    /// Products waiting for approval, oldest first.
    pub async fn pending_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.db.products().list_pending_approval().await?)
    }

    pub async fn set_product_approval(&self, product_id: &str, approved: bool) -> ShopResult<Product> {
        self.db.products().set_approval(product_id, approved).await?;
        info!(product_id = %product_id, approved, "Product approval changed");
        self.require_product(product_id).await
    }

    pub async fn update_stock(&self, product_id: &str, stock: i64) -> ShopResult<Product> {
        validate_stock(stock)?;
        self.db.products().update_stock(product_id, stock).await?;
        debug!(product_id = %product_id, stock, "Stock updated");
        self.require_product(product_id).await
    }

    /// Lists a new product. It stays hidden until approved.
    pub async fn create_product(
        &self,
        owner_id: Option<&str>,
        input: ProductInput,
    ) -> ShopResult<Product> {
        if let Some(owner_id) = owner_id {
            self.require_customer(owner_id).await?;
        }

        let now = Utc::now();
        let mut product = Product {
            id: Uuid::new_v4().to_string(),
            category_id: String::new(),
            subcategory_id: None,
            owner_id: owner_id.map(str::to_string),
            title: String::new(),
            description: String::new(),
            features: Vec::new(),
            stock: 0,
            sizes: Vec::new(),
            colors: Vec::new(),
            price: Money::zero(),
            discount: Percent::default(),
            gst: Percent::default(),
            on_sale: false,
            images: Vec::new(),
            is_approved: false,
            created_at: now,
            updated_at: now,
        };
        input.apply_to(&mut product);
        self.check_product(&product).await?;

        self.db.products().insert(&product).await?;
        info!(product_id = %product.id, title = %product.title, "Product created");
        Ok(product)
    }

    /// Replaces a product's details. Approval, owner and creation time stay.
    pub async fn update_product(&self, product_id: &str, input: ProductInput) -> ShopResult<Product> {
        let mut product = self.require_product(product_id).await?;
        input.apply_to(&mut product);
        product.updated_at = Utc::now();
        self.check_product(&product).await?;

        self.db.products().update(&product).await?;
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, product_id: &str) -> ShopResult<()> {
        if !self.db.products().delete(product_id).await? {
            return Err(ShopError::not_found("Product", product_id));
        }
        info!(product_id = %product_id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Admin: Categories
    // =========================================================================

    pub async fn create_category(&self, name: &str, image: Option<String>) -> ShopResult<Category> {
        validate_catalog_name(name)?;

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            image,
            created_at: Utc::now(),
        };
        self.db.categories().insert(&category).await?;

        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        name: &str,
        image: Option<String>,
    ) -> ShopResult<Category> {
        validate_catalog_name(name)?;

        let mut category = self.require_category(category_id).await?;
        category.name = name.trim().to_string();
        category.image = image;
        self.db.categories().update(&category).await?;

        Ok(category)
    }

    /// Deletes a category and its subcategories.
    ///
    /// ## Errors
    /// - `NOT_FOUND` for an unknown category
    /// - `CONFLICT` while products are filed under it
    pub async fn delete_category(&self, category_id: &str) -> ShopResult<()> {
        self.require_category(category_id).await?;

        let in_use = self.db.products().count_in_category(category_id).await?;
        if in_use > 0 {
            return Err(ShopError::new(
                ErrorCode::Conflict,
                format!("Category still has {} products", in_use),
            ));
        }

        self.db.categories().delete(category_id).await?;
        info!(category_id = %category_id, "Category deleted");
        Ok(())
    }

    pub async fn create_subcategory(&self, category_id: &str, name: &str) -> ShopResult<Subcategory> {
        validate_catalog_name(name)?;
        self.require_category(category_id).await?;

        let subcategory = Subcategory {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        self.db.categories().insert_subcategory(&subcategory).await?;

        Ok(subcategory)
    }

    /// Renames a subcategory or moves it under another category.
    pub async fn update_subcategory(
        &self,
        subcategory_id: &str,
        category_id: &str,
        name: &str,
    ) -> ShopResult<Subcategory> {
        validate_catalog_name(name)?;
        self.require_category(category_id).await?;

        let mut subcategory = self.require_subcategory(subcategory_id).await?;
        subcategory.category_id = category_id.to_string();
        subcategory.name = name.trim().to_string();
        self.db.categories().update_subcategory(&subcategory).await?;

        Ok(subcategory)
    }

    pub async fn delete_subcategory(&self, subcategory_id: &str) -> ShopResult<()> {
        self.require_subcategory(subcategory_id).await?;

        let in_use = self.db.products().count_in_subcategory(subcategory_id).await?;
        if in_use > 0 {
            return Err(ShopError::new(
                ErrorCode::Conflict,
                format!("Subcategory still has {} products", in_use),
            ));
        }

        self.db.categories().delete_subcategory(subcategory_id).await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn require_product(&self, product_id: &str) -> ShopResult<Product> {
        self.db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", product_id))
    }

    async fn require_category(&self, category_id: &str) -> ShopResult<Category> {
        self.db
            .categories()
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Category", category_id))
    }

    async fn require_subcategory(&self, subcategory_id: &str) -> ShopResult<Subcategory> {
        self.db
            .categories()
            .get_subcategory(subcategory_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Subcategory", subcategory_id))
    }

    /// Field rules, then the category (and subcategory, if any) must exist
    /// and agree.
    async fn check_product(&self, product: &Product) -> ShopResult<()> {
        validate_product(product)?;
        self.require_category(&product.category_id).await?;

        if let Some(subcategory_id) = &product.subcategory_id {
            let subcategory = self.require_subcategory(subcategory_id).await?;
            if subcategory.category_id != product.category_id {
                return Err(ShopError::validation(
                    "Subcategory does not belong to the product's category",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{customer, harness, product};

    fn input(category_id: &str, title: &str) -> ProductInput {
        ProductInput {
            category_id: category_id.to_string(),
            subcategory_id: None,
            title: title.to_string(),
            description: "Handloom cotton".to_string(),
            features: vec!["Breathable".to_string()],
            stock: 7,
            sizes: vec!["Free".to_string()],
            colors: vec!["indigo".to_string()],
            price: Money::from_major(1200),
            discount: Percent::from_whole(20).unwrap(),
            gst: Percent::from_whole(5).unwrap(),
            on_sale: true,
            images: vec!["https://img.example/kurta.jpg".to_string()],
        }
    }

    #[tokio::test]
    async fn test_storefront_sees_only_approved() {
        let h = harness().await;
        let tee = product(&h.shop, "Tee", 10).await;
        let cap = product(&h.shop, "Cap", 10).await;
        h.shop.set_product_approval(&cap.id, false).await.unwrap();

        let listed = h.shop.list_products(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, tee.id);
        assert_eq!(h.shop.list_products(Some(&cap.category_id)).await.unwrap().len(), 0);

        assert_eq!(h.shop.product(&tee.id).await.unwrap().title, "Tee");
        let err = h.shop.product(&cap.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let pending = h.shop.pending_products().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, cap.id);
        assert_eq!(h.shop.list_all_products().await.unwrap().len(), 2);

        let approved = h.shop.set_product_approval(&cap.id, true).await.unwrap();
        assert!(approved.is_approved);
        assert!(h.shop.pending_products().await.unwrap().is_empty());

        let err = h.shop.set_product_approval("missing", true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_stock() {
        let h = harness().await;
        let tee = product(&h.shop, "Tee", 10).await;

        let updated = h.shop.update_stock(&tee.id, 0).await.unwrap();
        assert_eq!(updated.stock, 0);

        let err = h.shop.update_stock(&tee.id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = h.shop.update_stock("missing", 3).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_category_and_subcategory_admin() {
        let h = harness().await;
        let women = h.shop.create_category("  Women ", None).await.unwrap();
        assert_eq!(women.name, "Women");

        let err = h.shop.create_category("Women", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        let err = h.shop.create_category("   ", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let renamed = h
            .shop
            .update_category(&women.id, "Womenswear", Some("https://img.example/w.jpg".into()))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Womenswear");

        let sarees = h.shop.create_subcategory(&women.id, "Sarees").await.unwrap();
        let kurtas = h.shop.create_subcategory(&women.id, "Kurtas").await.unwrap();
        let names: Vec<_> = h
            .shop
            .list_subcategories(&women.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Kurtas", "Sarees"]);

        let moved = h
            .shop
            .update_subcategory(&kurtas.id, &women.id, "Kurta Sets")
            .await
            .unwrap();
        assert_eq!(moved.name, "Kurta Sets");

        h.shop.delete_subcategory(&sarees.id).await.unwrap();
        let err = h.shop.delete_subcategory(&sarees.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = h.shop.create_subcategory("missing", "Shoes").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        h.shop.delete_category(&women.id).await.unwrap();
        assert!(h.shop.list_categories().await.unwrap().is_empty());
        let err = h.shop.delete_category(&women.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_categories_in_use_cannot_be_deleted() {
        let h = harness().await;
        let cat = h.shop.create_category("Men", None).await.unwrap();
        let shirts = h.shop.create_subcategory(&cat.id, "Shirts").await.unwrap();

        let mut shirt = input(&cat.id, "Oxford Shirt");
        shirt.subcategory_id = Some(shirts.id.clone());
        let created = h.shop.create_product(None, shirt).await.unwrap();

        let err = h.shop.delete_category(&cat.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        let err = h.shop.delete_subcategory(&shirts.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        h.shop.delete_product(&created.id).await.unwrap();
        h.shop.delete_subcategory(&shirts.id).await.unwrap();
        h.shop.delete_category(&cat.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_product_create_update_delete() {
        let h = harness().await;
        let seller = customer(&h.shop, "seller@example.com").await;
        let cat = h.shop.create_category("Women", None).await.unwrap();

        let created = h
            .shop
            .create_product(Some(&seller.id), input(&cat.id, "  Kurta "))
            .await
            .unwrap();
        assert_eq!(created.title, "Kurta");
        assert_eq!(created.owner_id.as_deref(), Some(seller.id.as_str()));
        assert!(!created.is_approved);
        assert!(h.shop.list_products(None).await.unwrap().is_empty());

        h.shop.set_product_approval(&created.id, true).await.unwrap();

        let mut edit = input(&cat.id, "Kurta Set");
        edit.stock = 2;
        let updated = h.shop.update_product(&created.id, edit).await.unwrap();
        assert_eq!(updated.title, "Kurta Set");
        assert_eq!(updated.stock, 2);
        assert!(updated.is_approved);
        assert_eq!(updated.owner_id, created.owner_id);
        assert_eq!(updated.created_at, created.created_at);

        let stored = h.shop.product(&created.id).await.unwrap();
        assert_eq!(stored.title, "Kurta Set");

        h.shop.delete_product(&created.id).await.unwrap();
        let err = h.shop.delete_product(&created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        let err = h.shop.update_product(&created.id, input(&cat.id, "x")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_product_input_is_checked() {
        let h = harness().await;
        let women = h.shop.create_category("Women", None).await.unwrap();
        let men = h.shop.create_category("Men", None).await.unwrap();
        let shirts = h.shop.create_subcategory(&men.id, "Shirts").await.unwrap();

        let err = h.shop.create_product(None, input("missing", "Kurta")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = h.shop.create_product(None, input(&women.id, " ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut negative = input(&women.id, "Kurta");
        negative.stock = -1;
        let err = h.shop.create_product(None, negative).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut mismatched = input(&women.id, "Kurta");
        mismatched.subcategory_id = Some(shirts.id.clone());
        let err = h.shop.create_product(None, mismatched).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = h
            .shop
            .create_product(Some("ghost"), input(&women.id, "Kurta"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert!(h.shop.list_all_products().await.unwrap().is_empty());
    }
}
