//! Outgoing email.
//!
//! Delivery is an external collaborator; the shop only needs somewhere to
//! hand a verification code or a reset token. [`LogMailer`] writes them to
//! the log.

use tracing::info;

/// Mail delivery failure.
#[derive(Debug, thiserror::Error)]
#[error("Failed to send mail to {to}: {reason}")]
pub struct MailError {
    pub to: String,
    pub reason: String,
}

/// Sends signup verification codes and password-reset links.
pub trait Mailer: Send + Sync {
    fn send_verification_code(
        &self,
        to: &str,
        user_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), MailError>;

    fn send_password_reset(&self, to: &str, token: &str, valid_minutes: i64)
        -> Result<(), MailError>;
}

/// Logs the message instead of delivering it (development).
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_verification_code(
        &self,
        to: &str,
        user_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), MailError> {
        info!(
            to = %to,
            user_name = %user_name,
            code = %code,
            valid_minutes,
            "Verification email"
        );
        Ok(())
    }

    fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        valid_minutes: i64,
    ) -> Result<(), MailError> {
        info!(to = %to, token = %token, valid_minutes, "Password reset email");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// A delivered message.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Sent {
        pub to: String,
        pub user_name: String,
        pub code: String,
    }

    /// Records messages; can be told to fail.
    #[derive(Debug, Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<Sent>>,
        /// (to, token) for each reset email.
        pub resets: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn last_code_for(&self, to: &str) -> Option<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|s| s.to == to)
                .map(|s| s.code.clone())
        }

        pub fn last_reset_token_for(&self, to: &str) -> Option<String> {
            self.resets
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(addr, _)| addr == to)
                .map(|(_, token)| token.clone())
        }

        fn check(&self, to: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError {
                    to: to.to_string(),
                    reason: "smtp down".to_string(),
                });
            }
            Ok(())
        }
    }

    impl Mailer for RecordingMailer {
        fn send_verification_code(
            &self,
            to: &str,
            user_name: &str,
            code: &str,
            _valid_minutes: i64,
        ) -> Result<(), MailError> {
            self.check(to)?;
            self.sent.lock().unwrap().push(Sent {
                to: to.to_string(),
                user_name: user_name.to_string(),
                code: code.to_string(),
            });
            Ok(())
        }

        fn send_password_reset(
            &self,
            to: &str,
            token: &str,
            _valid_minutes: i64,
        ) -> Result<(), MailError> {
            self.check(to)?;
            self.resets
                .lock()
                .unwrap()
                .push((to.to_string(), token.to_string()));
            Ok(())
        }
    }
}
