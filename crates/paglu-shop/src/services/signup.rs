//! # Email OTP Signup
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  send_otp(name, email, password?)                                      │
//! │     ├── email taken?            → CONFLICT "Email already exists"      │
//! │     ├── hash password (argon2)                                         │
//! │     ├── code 100000..=999999    → OtpStore::issue (TTL)                │
//! │     └── Mailer::send_verification_code                                 │
//! │                                                                         │
//! │  verify_otp(email, code)                                               │
//! │     └── OtpStore::verify        unknown / mismatch / expired           │
//! │                                                                         │
//! │  finalize_signup(email, name?, password?)                              │
//! │     ├── entry verified?         → OTP_ERROR "Email not verified yet."  │
//! │     ├── insert Customer { is_verified: true }                          │
//! │     └── drop the entry                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Shop;
use crate::error::{ErrorCode, ShopError, ShopResult};
use paglu_core::validation::validate_email;
use paglu_core::{CoreError, Customer, CustomerRole};

impl Shop {
    /// Starts a signup by emailing a one-time code.
    pub async fn send_otp(
        &self,
        user_name: &str,
        email: &str,
        password: Option<&str>,
    ) -> ShopResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ShopError::validation("Email is required to send OTP."));
        }
        validate_email(email)?;

        if self.db.customers().exists_by_email(email).await? {
            return Err(ShopError::new(ErrorCode::Conflict, "Email already exists"));
        }

        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(p) => Some(hash_password(p)?),
            None => None,
        };

        let code = generate_code();
        let ttl_minutes = {
            let mut store = self.otp.lock().await;
            let entry = store.issue(email, user_name, password_hash, &code, Utc::now());
            debug!(email = %email, expires_at = %entry.expires_at, "OTP issued");
            store.ttl().num_minutes()
        };

        self.mailer
            .send_verification_code(email, user_name, &code, ttl_minutes)
            .map_err(|e| {
                warn!(email = %email, error = %e, "Verification email failed");
                ShopError::new(ErrorCode::MailError, "Failed to send verification email")
            })?;

        info!(email = %email, "Verification email sent");
        Ok(())
    }

    /// Checks the code the user typed in.
    pub async fn verify_otp(&self, email: &str, code: &str) -> ShopResult<()> {
        let email = email.trim();
        self.otp
            .lock()
            .await
            .verify(email, code.trim(), Utc::now())?;

        info!(email = %email, "Email verified");
        Ok(())
    }

    /// Creates the customer for a verified email.
    ///
    /// `user_name` and `password` override what was given to `send_otp`;
    /// a password must come from one or the other.
    pub async fn finalize_signup(
        &self,
        email: &str,
        user_name: Option<&str>,
        password: Option<&str>,
    ) -> ShopResult<Customer> {
        let email = email.trim();

        let pending = {
            let store = self.otp.lock().await;
            match store.get(email) {
                Some(entry) if entry.verified => entry.clone(),
                _ => return Err(CoreError::EmailNotVerified.into()),
            }
        };

        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(p) => hash_password(p)?,
            None => pending
                .password_hash
                .ok_or_else(|| ShopError::validation("password is required"))?,
        };

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            user_name: user_name
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(pending.user_name),
            email: pending.email,
            password_hash,
            is_verified: true,
            role: CustomerRole::User,
            created_at: Utc::now(),
        };
        self.db.customers().insert(&customer).await?;

        if self.otp.lock().await.take_verified(email).is_err() {
            debug!(email = %email, "Pending signup already swept");
        }

        info!(customer_id = %customer.id, email = %customer.email, "Registration complete");
        Ok(customer)
    }
}

/// Six-digit code in `100000..=999999`.
fn generate_code() -> String {
    (OsRng.next_u32() % 900_000 + 100_000).to_string()
}

pub(super) fn hash_password(password: &str) -> ShopResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ShopError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}
