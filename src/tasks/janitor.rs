//! Janitor Task
//!
//! Background task that periodically removes expired cache entries so dead
//! entries do not hold memory until their next read.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::OperatorCache;
use crate::tasks::{delayed_interval, tick_or_shutdown};

/// Keys removed per lock acquisition during a sweep.
pub const SWEEP_BATCH_SIZE: usize = 256;

/// Removes every expired entry, one batch per lock acquisition, yielding
/// between batches.
///
/// Returns the number of entries removed.
pub async fn sweep_expired(cache: &OperatorCache) -> usize {
    let expired = cache.expired_keys();
    let mut removed = 0;

    for batch in expired.chunks(SWEEP_BATCH_SIZE) {
        removed += cache.remove_expired(batch);
        tokio::task::yield_now().await;
    }

    cache.mark_cleanup();
    removed
}

/// Spawns a background task that sweeps expired entries every `interval`
/// until `shutdown` turns true.
///
/// # Arguments
/// * `cache` - Shared cache handle
/// * `interval` - Time between sweeps
/// * `shutdown` - Receiver flipped to true on shutdown
///
/// # Example
/// ```ignore
/// let (tx, rx) = watch::channel(false);
/// let handle = spawn_janitor_task(cache.clone(), Duration::from_secs(300), rx);
/// // Later, during shutdown:
/// tx.send(true)?;
/// handle.await?;
/// ```
pub fn spawn_janitor_task(
    cache: OperatorCache,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting janitor task with interval of {:?}", interval);
        let mut ticker = delayed_interval(interval);

        while tick_or_shutdown(&mut ticker, &mut shutdown).await {
            let removed = sweep_expired(&cache).await;

            if removed > 0 {
                info!("Janitor: removed {} expired entries, {} remain", removed, cache.len());
            } else {
                debug!("Janitor: no expired entries found");
            }
        }

        debug!("Janitor task stopped");
    })
}
