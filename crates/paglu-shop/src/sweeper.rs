//! Background OTP sweeper.
//!
//! Pending signups expire after the OTP TTL; this task drops them on a fixed
//! interval so abandoned signups do not accumulate.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use paglu_core::OtpStore;

/// Spawns the sweeper. Abort the handle to stop it.
pub fn spawn_otp_sweeper(store: Arc<Mutex<OtpStore>>, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "Starting OTP sweeper");

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = store.lock().await.sweep_expired(Utc::now());
            if removed > 0 {
                debug!(removed, "Swept expired OTPs");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_drops_expired_entries() {
        let store = Arc::new(Mutex::new(OtpStore::default()));
        {
            let mut s = store.lock().await;
            let past = Utc::now() - chrono::Duration::minutes(10);
            s.issue("old@example.com", "old", None, "123456", past);
            s.issue("new@example.com", "new", None, "654321", Utc::now());
        }

        let handle = spawn_otp_sweeper(Arc::clone(&store), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let s = store.lock().await;
        assert!(s.get("old@example.com").is_none());
        assert!(s.get("new@example.com").is_some());
    }
}
