//! # Domain Types
//!
//! Catalog and checkout types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Product      │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  category_id    │──►│  product_id     │       │
//! │  │  name           │   │  price, gst     │   │  unit_price     │       │
//! │  │  Subcategory[]  │   │  sizes, colors  │   │  variant        │       │
//! │  └─────────────────┘   └─────────────────┘   │  quantity       │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Variant      │   │    Address      │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  color ("" ok)  │   │  name, phone    │   │  email (unique) │       │
//! │  │  size  ("" ok)  │   │  city, zip      │   │  role           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! A cart never holds two lines with the same `(product_id, color, size)`.
//! Two variants of one product are two lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::account::CustomerRole;
use crate::money::{Money, Percent};

// =============================================================================
// Variant
// =============================================================================

/// The selected color and size of a line.
///
/// The empty string is the valid "not chosen" value for either component,
/// so a product without sizes still has a well-defined line identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
}

impl Variant {
    /// Creates a variant from color and size.
    pub fn new(color: impl Into<String>, size: impl Into<String>) -> Self {
        Variant {
            color: color.into(),
            size: size.into(),
        }
    }

    /// No color and no size.
    pub fn none() -> Self {
        Variant::default()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A top-level catalog category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A subcategory under a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub category_id: String,

    pub subcategory_id: Option<String>,

    /// The customer who listed the product, if any.
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Display name on the storefront.
    pub title: String,

    pub description: String,

    /// Bullet points shown on the product page.
    pub features: Vec<String>,

    /// Units on hand.
    pub stock: i64,

    /// Sizes the customer may choose from (empty = no size choice).
    pub sizes: Vec<String>,

    /// Colors the customer may choose from (empty = no color choice).
    pub colors: Vec<String>,

    /// Undiscounted unit price.
    pub price: Money,

    /// Discount percentage off `price`.
    pub discount: Percent,

    /// GST percentage charged on the discounted price.
    pub gst: Percent,

    pub on_sale: bool,

    /// Image URLs; the first one is the primary image.
    pub images: Vec<String>,

    /// Only approved products are sold on the storefront.
    pub is_approved: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the first image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Unit price after the product discount.
    #[inline]
    pub fn discounted_price(&self) -> Money {
        self.price.less_percent(self.discount)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of a cart or an order.
///
/// ## Snapshot Pattern
/// Name, price, discount and GST are copied from the product when the line
/// is created. Later catalog edits don't change lines already in a cart or
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,

    /// Product title at the time the line was created.
    pub name: String,

    pub image: Option<String>,

    /// Undiscounted per-unit price.
    pub unit_price: Money,

    #[serde(default)]
    pub discount: Percent,

    #[serde(default)]
    pub gst: Percent,

    pub quantity: i64,

    /// Stock captured when the line was created (None = unknown).
    pub stock: Option<i64>,

    #[serde(flatten)]
    pub variant: Variant,
}

impl LineItem {
    /// Builds a line from the product's current catalog data.
    pub fn from_product(product: &Product, quantity: i64, variant: Variant) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.title.clone(),
            image: product.primary_image().map(str::to_string),
            unit_price: product.price,
            discount: product.discount,
            gst: product.gst,
            quantity,
            stock: Some(product.stock),
            variant,
        }
    }

    /// True when this line has the given identity.
    #[inline]
    pub fn matches(&self, product_id: &str, variant: &Variant) -> bool {
        self.product_id == product_id
            && self.variant.color == variant.color
            && self.variant.size == variant.size
    }

    /// True when both lines share `(product_id, color, size)`.
    #[inline]
    pub fn same_line(&self, other: &LineItem) -> bool {
        self.matches(&other.product_id, &other.variant)
    }

    /// Unit price after the line discount.
    #[inline]
    pub fn discounted_unit_price(&self) -> Money {
        self.unit_price.less_percent(self.discount)
    }
}

// =============================================================================
// Address
// =============================================================================

/// A shipping address.
///
/// Two addresses are the same when every field matches; this drives
/// duplicate detection in the address book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// An address saved to a customer's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavedAddress {
    pub id: String,
    #[serde(flatten)]
    pub address: Address,
}

// =============================================================================
// Customer
// =============================================================================

/// A registered storefront customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub user_name: String,
    pub email: String,
    /// Argon2 PHC string. Never sent to the frontend.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub is_verified: bool,
    #[serde(default)]
    pub role: CustomerRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// A product with stock 10, price 100, discount 10%, GST 5%.
#[cfg(test)]
pub(crate) fn sample_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        category_id: "cat-1".to_string(),
        subcategory_id: None,
        owner_id: None,
        title: format!("Product {}", id),
        description: String::new(),
        features: vec![],
        stock: 10,
        sizes: vec!["M".to_string(), "L".to_string()],
        colors: vec!["red".to_string()],
        price: Money::from_major(100),
        discount: Percent::from_whole(10).unwrap(),
        gst: Percent::from_whole(5).unwrap(),
        on_sale: false,
        images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        is_approved: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
