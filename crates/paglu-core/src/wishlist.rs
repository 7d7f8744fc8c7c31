//! # Wishlist
//!
//! A per-user list of saved products, unique by product id, newest last.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WishlistEntry {
    pub product_id: String,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

/// A customer's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Wishlist {
    pub user_id: String,
    pub entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn new(user_id: impl Into<String>) -> Self {
        Wishlist {
            user_id: user_id.into(),
            entries: Vec::new(),
        }
    }

    /// Adds a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product_id: &str, now: DateTime<Utc>) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.entries.push(WishlistEntry {
            product_id: product_id.to_string(),
            added_at: now,
        });
        true
    }

    /// Removes a product. Returns `false` if it wasn't saved.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes() {
        let mut list = Wishlist::new("u1");
        let now = Utc::now();

        assert!(list.add("p1", now));
        assert!(!list.add("p1", now));
        assert!(list.add("p2", now));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut list = Wishlist::new("u1");
        list.add("p1", Utc::now());

        assert!(list.remove("p1"));
        assert!(!list.remove("p1"));
        assert!(list.is_empty());
    }
}
