//! # paglu-shop: Storefront and Admin Services
//!
//! The service layer between an HTTP front (not part of this workspace) and
//! the core/db crates.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Paglu Services                                   │
//! │                                                                         │
//! │  HTTP handler ───► Shop::<operation>() ───► paglu-core (rules)         │
//! │                           │                                             │
//! │                           ├──────────────► paglu-db (SQLite)            │
//! │                           │                                             │
//! │                           └──────────────► Mailer (OTP, reset emails)   │
//! │                                                                         │
//! │  spawn_otp_sweeper ───► OtpStore::sweep_expired every interval          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `ShopConfig` from `PAGLU_*` environment variables
//! - [`error`] - `ShopError { code, message }`
//! - [`mailer`] - `Mailer` trait and the logging implementation
//! - [`services`] - `Shop` and its operations
//! - [`sweeper`] - Background OTP expiry

pub mod config;
pub mod error;
pub mod mailer;
pub mod services;
pub mod sweeper;

pub use config::{ConfigError, ShopConfig};
pub use error::{ErrorCode, ShopError, ShopResult};
pub use mailer::{LogMailer, MailError, Mailer};
pub use services::{OrderDetails, ProductInput, Shop};
pub use sweeper::spawn_otp_sweeper;
