//! In-memory pub/sub channel for tests/dev.

use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use relaychat_core::RelayError;

use crate::bus::Subscription;

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out of string payloads.
///
/// - No IO
/// - Every live subscriber gets its own copy
/// - Late subscribers miss earlier payloads
/// - A subscriber that falls more than `capacity` payloads behind is cut off
#[derive(Debug, Clone)]
pub struct InMemoryChannel {
    tx: broadcast::Sender<String>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to all current subscribers, returning how many received it.
    pub fn publish(&self, payload: String) -> usize {
        // No subscribers is not an error: the payload is simply dropped.
        self.tx.send(payload).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription {
        let stream = BroadcastStream::new(self.tx.subscribe()).map(|item| {
            item.map_err(|e: BroadcastStreamRecvError| {
                RelayError::subscription(format!("subscriber lagged: {e}"))
            })
        });
        Subscription::new(stream)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let ch = InMemoryChannel::new();
        let mut a = ch.subscribe();
        let mut b = ch.subscribe();

        assert_eq!(ch.publish("[1]".to_string()), 2);

        assert_eq!(a.recv().await, Some(Ok("[1]".to_string())));
        assert_eq!(b.recv().await, Some(Ok("[1]".to_string())));
    }

    #[tokio::test]
    async fn late_subscriber_sees_no_replay() {
        let ch = InMemoryChannel::new();
        assert_eq!(ch.publish("early".to_string()), 0);

        let mut late = ch.subscribe();
        ch.publish("later".to_string());

        assert_eq!(late.recv().await, Some(Ok("later".to_string())));
    }

    #[tokio::test]
    async fn lagging_subscriber_is_cut_off() {
        let ch = InMemoryChannel::with_capacity(1);
        let mut slow = ch.subscribe();
        ch.publish("one".to_string());
        ch.publish("two".to_string());

        assert!(matches!(
            slow.recv().await,
            Some(Err(RelayError::SubscriptionFailure(_)))
        ));
    }

    #[tokio::test]
    async fn dropping_subscription_releases_receiver() {
        let ch = InMemoryChannel::new();
        let sub = ch.subscribe();
        assert_eq!(ch.subscriber_count(), 1);
        drop(sub);
        assert_eq!(ch.subscriber_count(), 0);
    }
}
