//! Stats Log Task

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::OperatorCache;
use crate::tasks::{delayed_interval, tick_or_shutdown};

/// Spawns a task that logs a cache statistics snapshot every `interval`.
pub fn spawn_stats_log_task(
    cache: OperatorCache,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = delayed_interval(interval);

        while tick_or_shutdown(&mut ticker, &mut shutdown).await {
            let stats = cache.stats();
            info!(
                hits = stats.hits,
                misses = stats.misses,
                sets = stats.sets,
                invalidations = stats.invalidations,
                evictions = stats.evictions,
                size = stats.size,
                hit_rate = stats.hit_rate(),
                last_cleanup = ?stats.last_cleanup,
                last_preload = ?stats.last_preload,
                "Cache stats"
            );
        }

        debug!("Stats log task stopped");
    })
}
