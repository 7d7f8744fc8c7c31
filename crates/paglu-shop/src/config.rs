//! Shop configuration module.
//!
//! Configuration is loaded from `PAGLU_*` environment variables with
//! fallback to defaults.

use std::env;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paglu_core::{CheckoutPolicy, Money, Percent, OTP_TTL_SECS};
use paglu_db::DbConfig;

/// Shop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// SQLite database file
    pub database_path: String,

    /// Maximum pool connections
    pub db_max_connections: u32,

    /// Lifetime of a signup OTP in seconds
    pub otp_ttl_secs: i64,

    /// How often expired OTPs are swept, in seconds
    pub otp_sweep_interval_secs: u64,

    /// Shipping and checkout tax settings
    pub checkout: CheckoutPolicy,

    /// Display currency code
    pub currency: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            database_path: "./paglu.db".to_string(),
            db_max_connections: 5,
            otp_ttl_secs: OTP_TTL_SECS,
            otp_sweep_interval_secs: 60,
            checkout: CheckoutPolicy::default(),
            currency: "INR".to_string(),
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (env, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShopConfig::default();

        let config = ShopConfig {
            database_path: lookup("PAGLU_DATABASE_PATH").unwrap_or(defaults.database_path),

            db_max_connections: parse_or(&lookup, "PAGLU_DB_MAX_CONNECTIONS", 5)?,

            otp_ttl_secs: parse_or(&lookup, "PAGLU_OTP_TTL_SECS", OTP_TTL_SECS)?,

            otp_sweep_interval_secs: parse_or(&lookup, "PAGLU_OTP_SWEEP_INTERVAL_SECS", 60)?,

            checkout: CheckoutPolicy {
                flat_shipping_fee: money_or(
                    &lookup,
                    "PAGLU_FLAT_SHIPPING_FEE",
                    defaults.checkout.flat_shipping_fee,
                )?,
                free_shipping_threshold: money_or(
                    &lookup,
                    "PAGLU_FREE_SHIPPING_THRESHOLD",
                    defaults.checkout.free_shipping_threshold,
                )?,
                tax_rate: match lookup("PAGLU_CHECKOUT_TAX_PERCENT") {
                    Some(raw) => raw.trim().parse::<Percent>().map_err(|_| {
                        ConfigError::InvalidValue("PAGLU_CHECKOUT_TAX_PERCENT".to_string())
                    })?,
                    None => defaults.checkout.tax_rate,
                },
            },

            currency: lookup("PAGLU_CURRENCY").unwrap_or(defaults.currency),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("PAGLU_DB_MAX_CONNECTIONS".to_string()));
        }
        if config.otp_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue("PAGLU_OTP_TTL_SECS".to_string()));
        }
        if config.otp_sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PAGLU_OTP_SWEEP_INTERVAL_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings for [`paglu_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }

    pub fn otp_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.otp_ttl_secs)
    }

    pub fn otp_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.otp_sweep_interval_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn money_or<F>(lookup: &F, key: &str, default: Money) -> Result<Money, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let amount: Decimal = parse_or(lookup, key, default.amount())?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidValue(key.to_string()));
    }
    Ok(Money::new(amount))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
