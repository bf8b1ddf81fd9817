use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;

use relaychat_core::{Message, MessageId, RelayError, RelayResult, encode_batch};
use relaychat_events::{InMemoryChannel, Subscription};

use super::{FastStore, decode_entries};

/// In-memory fast store.
///
/// Intended for tests/dev. Entries are kept as raw strings so tests can plant
/// malformed ones, and the whole store can be switched "offline" to exercise
/// the durable fallback.
#[derive(Debug)]
pub struct InMemoryFastStore {
    counter: AtomicI64,
    entries: RwLock<Vec<String>>,
    channel: InMemoryChannel,
    online: AtomicBool,
}

impl InMemoryFastStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away (`false`) or coming back (`true`).
    ///
    /// Existing subscriptions are unaffected; new calls fail with `StoreUnavailable`.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Append a raw entry without encoding it.
    pub fn push_raw(&self, raw: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(raw.into());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.channel.subscriber_count()
    }

    fn ensure_online(&self) -> RelayResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RelayError::unavailable("in-memory fast store is offline"))
        }
    }
}

impl Default for InMemoryFastStore {
    fn default() -> Self {
        Self {
            counter: AtomicI64::new(0),
            entries: RwLock::new(Vec::new()),
            channel: InMemoryChannel::new(),
            online: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl FastStore for InMemoryFastStore {
    async fn next_id(&self) -> RelayResult<MessageId> {
        self.ensure_online()?;
        Ok(MessageId::new(self.counter.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn append(&self, message: &Message) -> RelayResult<()> {
        self.ensure_online()?;
        let raw = message.to_json()?;
        self.entries
            .write()
            .map_err(|_| RelayError::unavailable("lock poisoned"))?
            .push(raw);
        Ok(())
    }

    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        self.ensure_online()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| RelayError::unavailable("lock poisoned"))?;
        Ok(decode_entries(entries.iter()))
    }

    async fn publish(&self, message: &Message) -> RelayResult<()> {
        self.ensure_online()?;
        let payload = encode_batch(std::slice::from_ref(message))?;
        let receivers = self.channel.publish(payload);
        tracing::debug!(message_id = %message.id, receivers, "published to in-memory channel");
        Ok(())
    }

    async fn subscribe(&self) -> RelayResult<Subscription> {
        self.ensure_online()?;
        Ok(self.channel.subscribe())
    }
}
