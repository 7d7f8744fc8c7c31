//! # Accounts
//!
//! Roles for the admin console and password-reset tokens.
//!
//! ## Password Reset Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  forgot password ──► ResetToken::issue(token, now)                     │
//! │                        expires_at = now + 15 min                        │
//! │                        stored on the customer row, link emailed        │
//! │                                                                         │
//! │  reset submitted ──► ResetToken::redeem(presented, now)                │
//! │                        wrong token      → InvalidResetToken            │
//! │                        now >= expiry    → InvalidResetToken            │
//! │                        ok               → new hash stored, token gone  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Customer;
use crate::RESET_TOKEN_TTL_MINS;

// =============================================================================
// Customer Role
// =============================================================================

/// What a customer may do in the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerRole {
    #[default]
    User,
    SubAdmin,
    Admin,
}

impl CustomerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerRole::User => "user",
            CustomerRole::SubAdmin => "sub-admin",
            CustomerRole::Admin => "admin",
        }
    }
}

impl fmt::Display for CustomerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(CustomerRole::User),
            "sub-admin" | "sub_admin" => Ok(CustomerRole::SubAdmin),
            "admin" => Ok(CustomerRole::Admin),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// A customer as the admin console lists them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerAccount {
    #[serde(flatten)]
    #[ts(flatten)]
    pub customer: Customer,
    /// True when the customer owns at least one catalog product.
    pub is_active: bool,
}

// =============================================================================
// Reset Token
// =============================================================================

/// A single-use password-reset token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Issues `token`, valid for [`RESET_TOKEN_TTL_MINS`] from `now`.
    pub fn issue(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        ResetToken {
            token: token.into(),
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINS),
        }
    }

    /// The token is accepted only strictly before `expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Checks a presented token. Mismatch and expiry give the same error.
    pub fn redeem(&self, presented: &str, now: DateTime<Utc>) -> CoreResult<()> {
        if self.token != presented || !self.is_valid_at(now) {
            return Err(CoreError::InvalidResetToken);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        for role in [CustomerRole::User, CustomerRole::SubAdmin, CustomerRole::Admin] {
            assert_eq!(role.as_str().parse::<CustomerRole>().unwrap(), role);
        }
        assert_eq!("SUB_ADMIN".parse::<CustomerRole>().unwrap(), CustomerRole::SubAdmin);
        assert!("owner".parse::<CustomerRole>().is_err());
        assert_eq!(CustomerRole::default(), CustomerRole::User);

        let json = serde_json::to_string(&CustomerRole::SubAdmin).unwrap();
        assert_eq!(json, "\"sub-admin\"");
    }

    #[test]
    fn test_reset_token_lifetime() {
        let now = Utc::now();
        let token = ResetToken::issue("abc", now);

        assert_eq!(token.expires_at, now + Duration::minutes(15));
        assert!(token.redeem("abc", now + Duration::minutes(14)).is_ok());
        assert!(matches!(
            token.redeem("abc", token.expires_at),
            Err(CoreError::InvalidResetToken)
        ));
        assert!(matches!(
            token.redeem("abd", now),
            Err(CoreError::InvalidResetToken)
        ));
    }

    #[test]
    fn test_account_serializes_flat() {
        let account = CustomerAccount {
            customer: Customer {
                id: "c1".to_string(),
                user_name: "asha".to_string(),
                email: "asha@example.com".to_string(),
                password_hash: "$argon2id$secret".to_string(),
                is_verified: true,
                role: CustomerRole::Admin,
                created_at: Utc::now(),
            },
            is_active: false,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["email"], "asha@example.com");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["is_active"], false);
        assert!(json.get("password_hash").is_none());
    }
}
