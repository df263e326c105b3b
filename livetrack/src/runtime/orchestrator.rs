//! The runtime orchestrator.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::assignment::AssignmentResolver;
use crate::config::ConfigFile;
use crate::notify::{ForwarderStats, NotificationForwarder, NotificationSink, NotifyError, WebhookSink};
use crate::position::{ExpirySweeper, PositionStore, PositionStoreConfig, DEFAULT_SWEEP_INTERVAL};
use crate::server::AppState;
use crate::time::Clock;
use crate::tracking::LookupConfig;

/// Timeout for a single webhook delivery.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime settings derived from the config file.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub store: PositionStoreConfig,
    pub sweep_interval: Duration,
    pub lookup: LookupConfig,
    pub nearby_limit: usize,
    /// Webhook for lifecycle events; no forwarder runs when `None`.
    pub webhook_url: Option<String>,
    pub notify_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}

impl RuntimeConfig {
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let tracking = &config.tracking;
        Self {
            store: PositionStoreConfig {
                stale_after: Duration::from_secs(tracking.stale_after_secs),
                evict_grace: Duration::from_secs(tracking.evict_grace_secs),
                event_capacity: config.notify.queue_capacity,
            },
            sweep_interval: Duration::from_secs(tracking.sweep_interval_secs),
            lookup: LookupConfig {
                resolve_timeout: Duration::from_millis(tracking.lookup_timeout_ms),
            },
            nearby_limit: tracking.nearby_limit,
            webhook_url: config.notify.webhook_url.clone(),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Owns the position store and the daemons that maintain it.
///
/// # Lifecycle
///
/// 1. `start()` creates the store and spawns the expiry sweeper (and the
///    notification forwarder when a webhook is configured)
/// 2. [`app_state`](Self::app_state) hands the store to the HTTP layer
/// 3. `shutdown()` cancels every daemon and waits for them
pub struct LiveTrackRuntime {
    config: RuntimeConfig,
    store: Arc<PositionStore>,
    sweeper_handle: Option<JoinHandle<()>>,
    forwarder_handles: Vec<JoinHandle<ForwarderStats>>,
    shutdown_token: CancellationToken,
}

impl LiveTrackRuntime {
    /// Start with the system clock.
    ///
    /// # Errors
    ///
    /// Fails if the webhook client cannot be built.
    pub fn start(config: RuntimeConfig) -> Result<Self, NotifyError> {
        let store = Arc::new(PositionStore::new(config.store.clone()));
        Self::start_with_store(config, store)
    }

    /// Start with an explicit clock.
    pub fn start_with_clock(
        config: RuntimeConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NotifyError> {
        let store = Arc::new(PositionStore::with_clock(config.store.clone(), clock));
        Self::start_with_store(config, store)
    }

    fn start_with_store(
        config: RuntimeConfig,
        store: Arc<PositionStore>,
    ) -> Result<Self, NotifyError> {
        info!(
            stale_after_secs = config.store.stale_after.as_secs(),
            evict_grace_secs = config.store.evict_grace.as_secs(),
            "Starting LiveTrack runtime"
        );

        let shutdown_token = CancellationToken::new();
        let interval = if config.sweep_interval.is_zero() {
            DEFAULT_SWEEP_INTERVAL
        } else {
            config.sweep_interval
        };
        let sweeper_handle =
            Some(ExpirySweeper::new(Arc::clone(&store), interval).start(shutdown_token.clone()));

        let mut runtime = Self {
            config,
            store,
            sweeper_handle,
            forwarder_handles: Vec::new(),
            shutdown_token,
        };

        if let Some(url) = runtime.config.webhook_url.clone() {
            let sink = WebhookSink::new(url.as_str(), runtime.config.notify_timeout)?;
            info!(url = sink.url(), "Forwarding driver events to webhook");
            runtime.attach_sink(sink);
        }

        Ok(runtime)
    }

    /// Forward lifecycle events to `sink` until shutdown.
    ///
    /// Each attached sink gets its own forwarder and subscription.
    pub fn attach_sink<S: NotificationSink>(&mut self, sink: S) {
        let forwarder = NotificationForwarder::new(sink, self.store.subscribe());
        self.forwarder_handles
            .push(forwarder.start(self.shutdown_token.clone()));
    }

    pub fn store(&self) -> Arc<PositionStore> {
        Arc::clone(&self.store)
    }

    /// Handler state over this runtime's store.
    pub fn app_state<R: AssignmentResolver>(&self, resolver: R) -> Arc<AppState<R>> {
        AppState::new(
            Arc::clone(&self.store),
            resolver,
            self.config.lookup.clone(),
            self.config.nearby_limit,
        )
    }

    /// Token cancelled on shutdown; hand it to the HTTP server.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Cancel all daemons and wait for them to finish.
    ///
    /// Returns the final stats of every forwarder that shut down cleanly.
    pub async fn shutdown(mut self) -> Vec<ForwarderStats> {
        info!("Shutting down LiveTrack runtime");
        self.shutdown_token.cancel();

        if let Some(handle) = self.sweeper_handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("Expiry sweeper task panicked: {}", e);
            }
        }
        let mut forwarder_stats = Vec::with_capacity(self.forwarder_handles.len());
        for handle in self.forwarder_handles.drain(..) {
            match handle.await {
                Ok(stats) => {
                    info!(
                        delivered = stats.delivered,
                        failed = stats.failed,
                        "Notification forwarder shut down"
                    );
                    forwarder_stats.push(stats);
                }
                Err(e) => tracing::error!("Notification forwarder task panicked: {}", e),
            }
        }

        info!(drivers_tracked = self.store.len(), "LiveTrack runtime stopped");
        forwarder_stats
    }
}
