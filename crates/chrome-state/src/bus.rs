//! Navigation event bus
//!
//! Multi-subscriber broadcast of [`NavEvent`]s. Every subscriber sees every
//! event, but nothing orders one subscriber's reaction relative to
//! another's; components that need ordering go through a single
//! coordinator subscription.

use chrome_core::NavEvent;
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Broadcast bus for navigation events
#[derive(Debug, Clone)]
pub struct NavigationBus {
    tx: broadcast::Sender<NavEvent>,
}

impl NavigationBus {
    /// Create a bus with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Create a bus buffering `capacity` events per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: NavEvent) -> usize {
        tracing::trace!(event = event.name(), "publishing navigation event");
        // No subscribers is fine: nobody needs to react yet.
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<NavEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NavigationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = NavigationBus::new();
        assert_eq!(bus.publish(NavEvent::FullRefreshed), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let bus = NavigationBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(NavEvent::FullRefreshed), 2);
        assert!(matches!(a.recv().await.unwrap(), NavEvent::FullRefreshed));
        assert!(matches!(b.recv().await.unwrap(), NavEvent::FullRefreshed));
    }

    #[test]
    fn test_subscriber_count() {
        let bus = NavigationBus::new();
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
