//! Forwarder daemon: store events → notification sink.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::NotificationSink;
use crate::position::PositionEvent;

/// Counters reported when the forwarder stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// Drains the store's event channel into a [`NotificationSink`].
///
/// Delivery is sequential, so a slow sink causes the channel to lag; lagged
/// events are counted as dropped and the forwarder carries on.
pub struct NotificationForwarder<S> {
    sink: S,
    events: broadcast::Receiver<PositionEvent>,
}

impl<S: NotificationSink> NotificationForwarder<S> {
    pub fn new(sink: S, events: broadcast::Receiver<PositionEvent>) -> Self {
        Self { sink, events }
    }

    /// Spawn the forwarding loop. It stops on cancellation or when the store
    /// is dropped.
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<ForwarderStats> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(mut self, shutdown: CancellationToken) -> ForwarderStats {
        tracing::info!("Notification forwarder started");
        let mut stats = ForwarderStats::default();

        loop {
            let event = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = self.events.recv() => received,
            };

            match event {
                Ok(event) => match self.sink.deliver(&event).await {
                    Ok(()) => {
                        stats.delivered += 1;
                        tracing::debug!(
                            event = event.name(),
                            driver_id = %event.driver_id(),
                            "Notification delivered"
                        );
                    }
                    Err(e) => {
                        stats.failed += 1;
                        tracing::warn!(
                            event = event.name(),
                            driver_id = %event.driver_id(),
                            error = %e,
                            "Notification delivery failed"
                        );
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    stats.dropped += skipped;
                    tracing::warn!(skipped, "Notification forwarder lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }

        tracing::info!(
            delivered = stats.delivered,
            failed = stats.failed,
            dropped = stats.dropped,
            "Notification forwarder stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::notify::NotifyError;
    use crate::position::{DriverId, PositionStore};

    #[derive(Clone, Default)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl NotificationSink for RecordingSink {
        async fn deliver(&self, event: &PositionEvent) -> Result<(), NotifyError> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", event.name(), event.driver_id()));
            if self.fail {
                Err(NotifyError::Rejected { status: 503 })
            } else {
                Ok(())
            }
        }
    }

    async fn wait_for(seen: &Arc<Mutex<Vec<String>>>, count: usize) {
        for _ in 0..100 {
            if seen.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn driver(id: &str) -> DriverId {
        DriverId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn test_forwards_lifecycle_events_only() {
        let store = PositionStore::default();
        let sink = RecordingSink::default();
        let shutdown = CancellationToken::new();
        let handle = NotificationForwarder::new(sink.clone(), store.subscribe()).start(shutdown.clone());

        let now = store.now();
        store.upsert(driver("D1"), 1.0, 1.0, now).unwrap();
        store.upsert(driver("D1"), 1.1, 1.1, now).unwrap();
        store.remove(&driver("D1"));

        wait_for(&sink.seen, 2).await;
        shutdown.cancel();
        let stats = handle.await.unwrap();

        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec!["driver_online:D1".to_string(), "driver_offline:D1".to_string()]
        );
        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test]
    async fn test_failures_are_counted_and_skipped() {
        let store = PositionStore::default();
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let shutdown = CancellationToken::new();
        let handle = NotificationForwarder::new(sink.clone(), store.subscribe()).start(shutdown.clone());

        store.upsert(driver("D1"), 1.0, 1.0, store.now()).unwrap();
        store.upsert(driver("D2"), 1.0, 1.0, store.now()).unwrap();

        wait_for(&sink.seen, 2).await;
        shutdown.cancel();
        let stats = handle.await.unwrap();

        assert_eq!(stats.failed, 2);
        assert_eq!(stats.delivered, 0);
    }

    #[tokio::test]
    async fn test_stops_when_store_dropped() {
        let store = PositionStore::default();
        let handle = NotificationForwarder::new(RecordingSink::default(), store.subscribe())
            .start(CancellationToken::new());

        drop(store);

        let stats = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("forwarder did not stop")
            .unwrap();
        assert_eq!(stats, ForwarderStats::default());
    }
}
