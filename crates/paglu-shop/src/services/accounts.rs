//! # Accounts
//!
//! The admin console's user list and role management, plus forgotten
//! password recovery.
//!
//! ## Password Reset
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  request_password_reset(email)                                         │
//! │     ├── unknown email           → NOT_FOUND                            │
//! │     ├── 32 random bytes, hex    → stored with expiry (15 min)          │
//! │     └── Mailer::send_password_reset                                    │
//! │                                                                         │
//! │  reset_password(token, new_password)                                   │
//! │     ├── token unknown / expired → VALIDATION_ERROR                     │
//! │     └── argon2 hash stored, token cleared (single use)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::Utc;
use tracing::{info, warn};

use super::signup::hash_password;
use super::Shop;
use crate::error::{ErrorCode, ShopError, ShopResult};
use paglu_core::validation::{validate_email, validate_password, validate_reset_token};
use paglu_core::{
    CoreError, Customer, CustomerAccount, CustomerRole, ResetToken, RESET_TOKEN_BYTES,
    RESET_TOKEN_TTL_MINS,
};

impl Shop {
    // =========================================================================
    // Admin Console
    // =========================================================================

    /// Every customer, oldest first, with whether they own a product.
    pub async fn list_users(&self) -> ShopResult<Vec<CustomerAccount>> {
        Ok(self.db.customers().list_accounts().await?)
    }

    pub async fn update_user_role(&self, user_id: &str, role: CustomerRole) -> ShopResult<Customer> {
        self.db.customers().update_role(user_id, role).await?;
        info!(user_id = %user_id, role = %role, "User role changed");
        self.require_customer(user_id).await
    }

    /// Removes a customer with their saved addresses. Their products stay,
    /// without an owner.
    pub async fn delete_user(&self, user_id: &str) -> ShopResult<()> {
        if !self.db.customers().delete(user_id).await? {
            return Err(ShopError::not_found("User", user_id));
        }
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Emails a reset token. A later request replaces an earlier token.
    pub async fn request_password_reset(&self, email: &str) -> ShopResult<()> {
        let email = email.trim();
        validate_email(email)?;

        let customer = self
            .db
            .customers()
            .find_by_email(email)
            .await?
            .ok_or_else(|| ShopError::not_found("User", email))?;

        let token = ResetToken::issue(generate_reset_token(), Utc::now());
        self.db.customers().set_reset_token(&customer.id, &token).await?;

        self.mailer
            .send_password_reset(email, &token.token, RESET_TOKEN_TTL_MINS)
            .map_err(|e| {
                warn!(email = %email, error = %e, "Password reset email failed");
                ShopError::new(ErrorCode::MailError, "Failed to send password reset email")
            })?;

        info!(user_id = %customer.id, expires_at = %token.expires_at, "Password reset requested");
        Ok(())
    }

    /// Sets a new password for the holder of a live token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ShopResult<()> {
        validate_password(new_password)?;
        let token = token.trim();
        if validate_reset_token(token).is_err() {
            return Err(CoreError::InvalidResetToken.into());
        }

        let (customer, stored) = self
            .db
            .customers()
            .find_by_reset_token(token)
            .await?
            .ok_or(CoreError::InvalidResetToken)?;
        stored.redeem(token, Utc::now())?;

        let password_hash = hash_password(new_password)?;
        self.db
            .customers()
            .update_password(&customer.id, &password_hash)
            .await?;

        info!(user_id = %customer.id, "Password reset");
        Ok(())
    }
}

/// 32 random bytes as lowercase hex.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
