//! Preload Task
//!
//! Runs the preloader once at startup and then on a fixed cadence.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::directory::Preloader;
use crate::tasks::tick_or_shutdown;

/// Spawns the scheduled preload task. The first run starts immediately.
///
/// Shutdown is observed between ticks and between backing-store queries; a
/// query in flight is allowed to finish and its result is dropped.
pub fn spawn_preload_task(
    preloader: Preloader,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting preload task with interval of {:?}", interval);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        while tick_or_shutdown(&mut ticker, &mut shutdown).await {
            let report = preloader.run_until(&shutdown).await;
            if report.cancelled {
                break;
            }
        }

        debug!("Preload task stopped");
    })
}
