use crate::services::{DataSync, SharedHealthStats};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

// All markets closed: sessions barely change, relax the cadence.
const CLOSED_INTERVAL_MULTIPLIER: u64 = 6;

/// Background refresh of market-session records. The open-market cadence
/// comes from configuration; while every tracked market is closed the loop
/// slows down by `CLOSED_INTERVAL_MULTIPLIER`.
#[instrument(skip(sync, health_stats))]
pub async fn run_market_worker(
    sync: Arc<DataSync>,
    health_stats: SharedHealthStats,
    open_interval_secs: u64,
) {
    info!(
        open_interval_secs,
        closed_interval_secs = open_interval_secs * CLOSED_INTERVAL_MULTIPLIER,
        "Starting market worker"
    );

    let mut iteration_count = 0u64;

    loop {
        iteration_count += 1;
        let mut any_open = false;

        match sync.refresh_market_sessions().await {
            Ok(sessions) => {
                any_open = sessions.iter().any(|s| s.is_market_open);
                info!(
                    iteration = iteration_count,
                    sessions = sessions.len(),
                    any_open,
                    "Market worker: sessions refreshed"
                );

                let mut health = health_stats.write().await;
                health.market_iteration_count = iteration_count;
                health.market_last_check = Some(Utc::now().to_rfc3339());
                health.any_market_open = any_open;
            }
            Err(e) => {
                // Next iteration retries; a failed check never kills the loop.
                error!(iteration = iteration_count, error = %e, "Market worker: refresh failed");
            }
        }

        let interval_secs = if any_open {
            open_interval_secs
        } else {
            open_interval_secs * CLOSED_INTERVAL_MULTIPLIER
        };
        sleep(Duration::from_secs(interval_secs)).await;
    }
}
