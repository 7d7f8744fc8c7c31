//! Saved address services.
//!
//! Addresses belong to a registered customer. Saving an address that is
//! already in the book (every field equal) does nothing.

use tracing::debug;

use super::Shop;
use crate::error::ShopResult;
use paglu_core::validation::validate_address;
use paglu_core::{Address, SavedAddress};

impl Shop {
    pub async fn saved_addresses(&self, customer_id: &str) -> ShopResult<Vec<SavedAddress>> {
        self.require_customer(customer_id).await?;
        Ok(self.db.customers().list_addresses(customer_id).await?)
    }

    /// Adds an address to the book unless an identical one is saved.
    pub async fn save_address(
        &self,
        customer_id: &str,
        address: Address,
    ) -> ShopResult<Vec<SavedAddress>> {
        validate_address(&address)?;
        self.require_customer(customer_id).await?;

        let mut book = self.db.customers().address_book(customer_id).await?;
        match book.save_if_new(address) {
            Some(saved) => self.db.customers().add_address(customer_id, saved).await?,
            None => debug!(customer_id = %customer_id, "Address already saved"),
        }

        Ok(book.addresses)
    }

    /// Deletes a saved address. Unknown ids are ignored.
    pub async fn delete_address(
        &self,
        customer_id: &str,
        address_id: &str,
    ) -> ShopResult<Vec<SavedAddress>> {
        self.require_customer(customer_id).await?;

        let deleted = self
            .db
            .customers()
            .delete_address(customer_id, address_id)
            .await?;
        debug!(customer_id = %customer_id, address_id = %address_id, deleted, "delete_address");

        Ok(self.db.customers().list_addresses(customer_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorCode;
    use crate::services::fixtures::{address, customer, harness};

    #[tokio::test]
    async fn test_save_list_delete() {
        let h = harness().await;
        let c = customer(&h.shop, "asha@example.com").await;

        let book = h.shop.save_address(&c.id, address()).await.unwrap();
        assert_eq!(book.len(), 1);
        let book = h.shop.save_address(&c.id, address()).await.unwrap();
        assert_eq!(book.len(), 1);

        let mut other = address();
        other.city = "Goa".to_string();
        let book = h.shop.save_address(&c.id, other).await.unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(h.shop.saved_addresses(&c.id).await.unwrap(), book);

        let remaining = h.shop.delete_address(&c.id, &book[0].id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].address.city, "Goa");

        let remaining = h.shop.delete_address(&c.id, "missing").await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let h = harness().await;
        let c = customer(&h.shop, "asha@example.com").await;

        let mut bad = address();
        bad.email = "not-an-email".to_string();
        let err = h.shop.save_address(&c.id, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let h = harness().await;
        let err = h.shop.saved_addresses("ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "User not found: ghost");
    }
}
