//! Background Tasks Module
//!
//! Scheduled jobs that run alongside request handling. Jobs share nothing
//! but the cache handle and a shutdown signal.
//!
//! # Tasks
//! - Janitor: removes expired entries at the configured interval
//! - Preload: warms the cache at startup and at the configured interval
//! - Stats log: logs a statistics snapshot at the configured interval

mod janitor;
mod preload;
mod stats_log;

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::cache::OperatorCache;
use crate::config::Config;
use crate::directory::Preloader;

pub use janitor::{spawn_janitor_task, sweep_expired, SWEEP_BATCH_SIZE};
pub use preload::spawn_preload_task;
pub use stats_log::spawn_stats_log_task;

/// Handles of the running background jobs.
#[derive(Debug)]
pub struct BackgroundTasks {
    shutdown: watch::Sender<bool>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl BackgroundTasks {
    /// Spawns the janitor, preload and stats-log jobs.
    pub fn spawn(cache: OperatorCache, preloader: Preloader, config: &Config) -> Self {
        let (shutdown, rx) = watch::channel(false);

        let handles = vec![
            (
                "janitor",
                spawn_janitor_task(cache.clone(), config.cleanup_interval(), rx.clone()),
            ),
            (
                "preload",
                spawn_preload_task(preloader, config.preload_interval(), rx.clone()),
            ),
            (
                "stats_log",
                spawn_stats_log_task(cache, config.stats_log_interval(), rx),
            ),
        ];

        Self { shutdown, handles }
    }

    /// Signals every job to stop and waits for them to exit.
    pub async fn shutdown(self) {
        info!("Stopping {} background tasks", self.handles.len());
        let _ = self.shutdown.send(true);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                warn!("Background task {} ended abnormally: {}", name, e);
            }
        }
    }
}

/// Interval whose first tick fires one full `period` from now.
pub(crate) fn delayed_interval(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Waits for the next tick. Returns false once shutdown is signalled or the
/// shutdown sender is gone.
pub(crate) async fn tick_or_shutdown(
    ticker: &mut Interval,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    if *shutdown.borrow() {
        return false;
    }

    tokio::select! {
        _ = ticker.tick() => !*shutdown.borrow(),
        changed = shutdown.changed() => changed.is_ok() && !*shutdown.borrow(),
    }
}
