//! Notification plumbing for the TCP client.
//!
//! Subscribers observe the connection through a `tokio::sync::broadcast`
//! channel rather than a callback registry: events are consumed on the
//! subscriber's own task, so a subscriber can never reenter
//! connect/disconnect on the context that raised the event.
//!
//! Both event kinds travel on one channel, which gives them a stable total
//! order: `StateChanged(true)` is observed before any payload of that
//! generation, and `StateChanged(false)` after the last one.

use tokio::sync::broadcast;

/// Default capacity for the subscriber notification channel.
/// Allows bursty receive scenarios without dropping events.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// An event observed on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Connectivity transition: `true` on successful connect, `false` once
    /// the transport is fully closed. Subscribers observing `false` may
    /// assume the transport is inert.
    StateChanged(bool),
    /// Bytes read from the transport, decoded as UTF-8 text. Chunking
    /// follows stream semantics: a single peer write may arrive as several
    /// events, and several writes may coalesce into one.
    DataReceived(String),
}

/// Broadcast hub for connection events.
///
/// Cloneable and cheap to share; all clones publish into the same channel.
/// Subscribers may attach or detach before or during a connection. A slow
/// subscriber that falls more than the channel capacity behind loses the
/// oldest events (`RecvError::Lagged`), never the newest.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<LinkEvent>,
}

impl EventHub {
    /// Creates a hub with the default channel capacity (256 events).
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Registers a new subscriber.
    ///
    /// The receiver only observes events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.tx.subscribe()
    }

    /// Returns the count of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Publishing with zero subscribers is not an error; the event is
    /// simply dropped.
    pub fn emit(&self, event: LinkEvent) {
        match self.tx.send(event) {
            Ok(n) => tracing::trace!("Event delivered to {} subscriber(s)", n),
            Err(_) => tracing::trace!("Event emitted with no subscribers"),
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriber_count", &self.tx.receiver_count())
            .finish()
    }
}
