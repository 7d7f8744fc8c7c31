//! # Paglu Host
//!
//! Boots the storefront services: configuration, database (with
//! migrations) and the OTP sweeper, then waits for shutdown.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PAGLU_* env ──► ShopConfig ──► Database::new ──► Shop                 │
//! │                                                    │                    │
//! │                                                    └──► OTP sweeper     │
//! │                                                                         │
//! │  Ctrl+C / SIGTERM ──► stop sweeper ──► close pool                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use paglu_db::Database;
use paglu_shop::{spawn_otp_sweeper, LogMailer, Shop, ShopConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting Paglu storefront services...");

    let config = ShopConfig::load()?;
    info!(
        db = %config.database_path,
        currency = %config.currency,
        shipping_fee = %config.checkout.flat_shipping_fee,
        free_shipping_above = %config.checkout.free_shipping_threshold,
        tax = %config.checkout.tax_rate,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    let (total, applied) = db.migration_status().await?;
    info!(applied, total, "Database ready");

    let shop = Shop::from_config(db.clone(), &config, Arc::new(LogMailer));
    let sweeper = spawn_otp_sweeper(shop.otp_store(), config.otp_sweep_interval());

    info!("Ready");
    shutdown_signal().await;

    sweeper.abort();
    db.close().await;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
