//! # Broadcast bus for runtime events.
//!
//! Thin wrapper over [`tokio::sync::broadcast`]. Publishing never blocks and
//! gives no delivery guarantee: if nobody is subscribed the event is dropped,
//! and a subscriber that lags past the ring-buffer capacity observes
//! `RecvError::Lagged(n)` and skips the n oldest events.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (the sender is `Arc`-backed); every component that wants to
/// publish holds its own clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given ring-buffer capacity (clamped to ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current subscribers; never blocks.
    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Creates an independent receiver observing events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::now(EventKind::DayRolledOver));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::DayRolledOver);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = Bus::new(1);
        bus.publish(Event::now(EventKind::StreamLost));
    }
}
