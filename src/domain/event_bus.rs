//! Fan-out of order events to realtime connections.
//!
//! The service layer publishes one [`OrderEvent`] per committed change.
//! Each realtime connection owns an [`EventFeed`] and sees every event
//! published after it subscribed, in publication order.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::OrderEvent;

/// Publisher side. Cloning shares the same channel.
///
/// Publishing never waits on subscribers. The channel is a bounded ring:
/// a feed that falls more than `capacity` events behind loses the oldest
/// ones and is told how many it missed.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<OrderEvent>,
}

/// One item read from an [`EventFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    /// The next event in publication order.
    Event(OrderEvent),
    /// The feed fell behind and this many events were dropped for it.
    Missed(u64),
}

/// Subscriber side, one per realtime connection.
#[derive(Debug)]
pub struct EventFeed {
    receiver: broadcast::Receiver<OrderEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` undelivered events per
    /// feed. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Hands `event` to every live feed and returns how many there were.
    /// With no feeds the event is dropped.
    pub fn publish(&self, event: OrderEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Opens a feed that starts with the next published event.
    #[must_use]
    pub fn subscribe(&self) -> EventFeed {
        EventFeed {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of open feeds, i.e. connected realtime clients.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventFeed {
    /// Waits for the next item. Returns `None` once every [`EventBus`]
    /// handle is gone.
    pub async fn next(&mut self) -> Option<FeedItem> {
        match self.receiver.recv().await {
            Ok(event) => Some(FeedItem::Event(event)),
            Err(RecvError::Lagged(missed)) => Some(FeedItem::Missed(missed)),
            Err(RecvError::Closed) => None,
        }
    }

    /// Returns the next item if one is already queued.
    pub fn try_next(&mut self) -> Option<FeedItem> {
        match self.receiver.try_recv() {
            Ok(event) => Some(FeedItem::Event(event)),
            Err(TryRecvError::Lagged(missed)) => Some(FeedItem::Missed(missed)),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }
}
