//! Event delivery.
//!
//! The engine hands finished event batches to an [`EventPublisher`]. Delivery
//! is fire-and-forget: a publisher must never block the cycle loop or fail
//! it. [`BroadcastPublisher`] fans events out over a
//! [`tokio::sync::broadcast`] channel so any number of observers (transport
//! layer, infrastructure provisioning, loggers) can subscribe.

use tokio::sync::broadcast;
use tracing::trace;

use crate::event::EngineEvent;

/// Capacity of the broadcast channel for engine events.
///
/// A subscriber that falls behind by more than this many events receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest event.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Sink for engine events.
pub trait EventPublisher: Send + Sync {
    /// Deliver a single event.
    fn publish(&self, event: &EngineEvent);

    /// Deliver a batch of events in order.
    fn publish_all(&self, events: &[EngineEvent]) {
        for event in events {
            self.publish(event);
        }
    }
}

/// Publisher that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPublisher;

impl EventPublisher for NoOpPublisher {
    fn publish(&self, _event: &EngineEvent) {}
}

/// Publisher backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<EngineEvent>,
}

impl BroadcastPublisher {
    /// Create a publisher with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: &EngineEvent) {
        // send fails only when nobody is subscribed, which is normal.
        let receivers = self.tx.send(event.clone()).unwrap_or(0);
        trace!(event = event.name(), receivers, "Event published");
    }
}
