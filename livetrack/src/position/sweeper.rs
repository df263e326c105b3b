//! Expiry sweeper - background eviction of long-silent drivers.
//!
//! Reads already hide stale positions; the sweeper bounds memory by
//! physically removing entries once the grace window has also passed.
//! Drivers who go offline without signalling are cleaned up this way.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::store::PositionStore;

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically evicts expired entries from a [`PositionStore`].
pub struct ExpirySweeper {
    store: Arc<PositionStore>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<PositionStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Spawn the sweep loop; it stops when `shutdown` is cancelled.
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            "Expiry sweeper started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut total_evicted: u64 = 0;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let evicted = self.store.evict_expired();
                    if evicted > 0 {
                        total_evicted += evicted as u64;
                        tracing::debug!(
                            evicted,
                            remaining = self.store.len(),
                            "Evicted expired driver positions"
                        );
                    }
                }
            }
        }

        tracing::info!(total_evicted, "Expiry sweeper stopped");
    }
}
