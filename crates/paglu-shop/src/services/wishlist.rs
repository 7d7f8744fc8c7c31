//! Wishlist services.

use tracing::debug;

use super::Shop;
use crate::error::{ShopError, ShopResult};
use paglu_core::Wishlist;

impl Shop {
    pub async fn wishlist(&self, user_id: &str) -> ShopResult<Wishlist> {
        Ok(self.db.wishlists().get(user_id).await?)
    }

    /// Saves a product to the wishlist; saving it twice is a no-op.
    pub async fn add_to_wishlist(&self, user_id: &str, product_id: &str) -> ShopResult<Wishlist> {
        if self.db.products().get_by_id(product_id).await?.is_none() {
            return Err(ShopError::not_found("Product", product_id));
        }

        let added = self.db.wishlists().add(user_id, product_id).await?;
        debug!(user_id = %user_id, product_id = %product_id, added, "add_to_wishlist");

        self.wishlist(user_id).await
    }

    pub async fn remove_from_wishlist(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> ShopResult<Wishlist> {
        self.db.wishlists().remove(user_id, product_id).await?;
        self.wishlist(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorCode;
    use crate::services::fixtures::{harness, product};

    #[tokio::test]
    async fn test_wishlist_dedupes() {
        let h = harness().await;
        let scarf = product(&h.shop, "Scarf", 5).await;

        h.shop.add_to_wishlist("u1", &scarf.id).await.unwrap();
        let list = h.shop.add_to_wishlist("u1", &scarf.id).await.unwrap();
        assert_eq!(list.len(), 1);

        let list = h.shop.remove_from_wishlist("u1", &scarf.id).await.unwrap();
        assert!(list.is_empty());
        let list = h.shop.remove_from_wishlist("u1", &scarf.id).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let h = harness().await;
        let err = h.shop.add_to_wishlist("u1", "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
