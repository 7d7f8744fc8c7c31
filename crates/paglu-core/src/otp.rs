//! # Signup OTP Store
//!
//! Pending registrations keyed by email, each with a one-time code and an
//! expiry. The clock is injected (`now`) so the store stays pure.
//!
//! ## Signup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  send_otp ──► issue()           entry { code, expires_at, unverified } │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  verify_otp ─► verify()         unknown   → OtpNotFound                │
//! │                  │              wrong code → OtpMismatch               │
//! │                  │              expired   → entry dropped, OtpExpired  │
//! │                  ▼                                                      │
//! │  finalize ──► take_verified()   unverified → EmailNotVerified          │
//! │                                 verified   → entry removed, returned   │
//! │                                                                         │
//! │  background ► sweep_expired()   drops every expired entry              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::OTP_TTL_SECS;

/// A signup waiting for email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    pub email: String,
    pub user_name: String,
    /// Argon2 hash of the password given at `send_otp`, if any.
    pub password_hash: Option<String>,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl PendingRegistration {
    /// The code is still accepted at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Time-bounded map of pending registrations.
#[derive(Debug, Clone)]
pub struct OtpStore {
    entries: HashMap<String, PendingRegistration>,
    ttl: Duration,
}

impl OtpStore {
    /// Creates a store whose codes live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        OtpStore {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Records a new code for `email`, replacing any earlier one.
    pub fn issue(
        &mut self,
        email: &str,
        user_name: &str,
        password_hash: Option<String>,
        code: &str,
        now: DateTime<Utc>,
    ) -> &PendingRegistration {
        let entry = PendingRegistration {
            email: email.to_string(),
            user_name: user_name.to_string(),
            password_hash,
            code: code.to_string(),
            expires_at: now + self.ttl,
            verified: false,
        };
        match self.entries.entry(email.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        }
    }

    /// Checks `code` for `email` and marks the entry verified.
    pub fn verify(&mut self, email: &str, code: &str, now: DateTime<Utc>) -> CoreResult<()> {
        let entry = self.entries.get_mut(email).ok_or(CoreError::OtpNotFound)?;

        if entry.code != code {
            return Err(CoreError::OtpMismatch);
        }

        if entry.is_expired(now) {
            self.entries.remove(email);
            return Err(CoreError::OtpExpired);
        }

        entry.verified = true;
        Ok(())
    }

    /// Removes and returns a verified entry.
    ///
    /// Unverified or missing entries fail with `EmailNotVerified` and are
    /// left in place.
    pub fn take_verified(&mut self, email: &str) -> CoreResult<PendingRegistration> {
        match self.entries.get(email) {
            Some(entry) if entry.verified => {
                self.entries.remove(email).ok_or(CoreError::EmailNotVerified)
            }
            _ => Err(CoreError::EmailNotVerified),
        }
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    pub fn get(&self, email: &str) -> Option<&PendingRegistration> {
        self.entries.get(email)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OtpStore {
    /// Five-minute codes.
    fn default() -> Self {
        OtpStore::new(Duration::seconds(OTP_TTL_SECS))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(email: &str, code: &str, now: DateTime<Utc>) -> OtpStore {
        let mut store = OtpStore::default();
        store.issue(email, "asha", Some("hash".to_string()), code, now);
        store
    }

    #[test]
    fn test_issue_sets_expiry() {
        let now = Utc::now();
        let store = store_with("a@x.com", "123456", now);

        let entry = store.get("a@x.com").unwrap();
        assert_eq!(entry.expires_at, now + Duration::seconds(300));
        assert!(!entry.verified);
    }

    #[test]
    fn test_verify_unknown_email() {
        let mut store = OtpStore::default();
        let err = store.verify("a@x.com", "123456", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::OtpNotFound));
    }

    #[test]
    fn test_verify_wrong_code_keeps_entry() {
        let now = Utc::now();
        let mut store = store_with("a@x.com", "123456", now);

        let err = store.verify("a@x.com", "654321", now).unwrap_err();
        assert!(matches!(err, CoreError::OtpMismatch));
        assert!(store.get("a@x.com").is_some());
    }

    #[test]
    fn test_verify_expired_drops_entry() {
        let now = Utc::now();
        let mut store = store_with("a@x.com", "123456", now);
        let later = now + Duration::seconds(301);

        let err = store.verify("a@x.com", "123456", later).unwrap_err();
        assert!(matches!(err, CoreError::OtpExpired));
        assert!(store.is_empty());
    }

    #[test]
    fn test_verify_at_exact_expiry_succeeds() {
        let now = Utc::now();
        let mut store = store_with("a@x.com", "123456", now);

        store
            .verify("a@x.com", "123456", now + Duration::seconds(300))
            .unwrap();
        assert!(store.get("a@x.com").unwrap().verified);
    }

    #[test]
    fn test_take_verified() {
        let now = Utc::now();
        let mut store = store_with("a@x.com", "123456", now);

        assert!(matches!(
            store.take_verified("a@x.com"),
            Err(CoreError::EmailNotVerified)
        ));
        assert_eq!(store.len(), 1);

        store.verify("a@x.com", "123456", now).unwrap();
        let entry = store.take_verified("a@x.com").unwrap();
        assert_eq!(entry.user_name, "asha");
        assert!(store.is_empty());
    }

    #[test]
    fn test_reissue_replaces_code() {
        let now = Utc::now();
        let mut store = store_with("a@x.com", "123456", now);
        store.issue("a@x.com", "asha", None, "999999", now);

        assert!(store.verify("a@x.com", "123456", now).is_err());
        assert!(store.verify("a@x.com", "999999", now).is_ok());
    }

    #[test]
    fn test_sweep_expired() {
        let now = Utc::now();
        let mut store = OtpStore::new(Duration::seconds(60));
        store.issue("old@x.com", "", None, "111111", now - Duration::seconds(120));
        store.issue("new@x.com", "", None, "222222", now);

        assert_eq!(store.sweep_expired(now), 1);
        assert!(store.get("old@x.com").is_none());
        assert!(store.get("new@x.com").is_some());
        assert_eq!(store.sweep_expired(now), 0);
    }
}
