//! Fast store boundary: atomic counter, append-only list and pub/sub channel.
//!
//! The fast store is the preferred read path and the broadcast transport. It
//! is **not** transactional: each operation below is an independent round-trip
//! and none of them is atomic with another, or with the durable store.
//!
//! ## Layout
//!
//! | Concept | Key | Value |
//! |---|---|---|
//! | Counter | `id` | integer, incremented per message |
//! | History | `messages` (list) | one JSON-encoded message per entry |
//! | Broadcast | `messages` (channel) | JSON array holding one message |

use std::sync::Arc;

use async_trait::async_trait;

use relaychat_core::{Message, MessageId, RelayResult};
use relaychat_events::Subscription;

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis_store;

pub use in_memory::InMemoryFastStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisFastStore;

/// Key names used inside the fast store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastStoreKeys {
    pub counter: String,
    pub list: String,
    pub channel: String,
}

impl Default for FastStoreKeys {
    fn default() -> Self {
        Self {
            counter: "id".to_string(),
            list: "messages".to_string(),
            channel: "messages".to_string(),
        }
    }
}

/// Ephemeral key/value + list + pub/sub store.
///
/// ## Contract
///
/// - `next_id`: atomic increment; values are never reused (counter persistence is the
///   store's job, the adapter holds no state)
/// - `append`: tail append, list order == append order
/// - `list_all`: whole list in append order; `StoreUnavailable` if unreachable; entries
///   that fail to decode are skipped one by one
/// - `publish`: one-element batch to current subscribers only (no replay)
/// - `subscribe`: `StoreUnavailable` if the subscribe call itself fails
#[async_trait]
pub trait FastStore: Send + Sync {
    async fn next_id(&self) -> RelayResult<MessageId>;

    async fn append(&self, message: &Message) -> RelayResult<()>;

    async fn list_all(&self) -> RelayResult<Vec<Message>>;

    async fn publish(&self, message: &Message) -> RelayResult<()>;

    async fn subscribe(&self) -> RelayResult<Subscription>;
}

#[async_trait]
impl<T> FastStore for Arc<T>
where
    T: FastStore + ?Sized,
{
    async fn next_id(&self) -> RelayResult<MessageId> {
        (**self).next_id().await
    }

    async fn append(&self, message: &Message) -> RelayResult<()> {
        (**self).append(message).await
    }

    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        (**self).list_all().await
    }

    async fn publish(&self, message: &Message) -> RelayResult<()> {
        (**self).publish(message).await
    }

    async fn subscribe(&self) -> RelayResult<Subscription> {
        (**self).subscribe().await
    }
}

/// Decode raw list entries, dropping (and logging) the ones that are malformed.
///
/// A single bad entry must not hide the rest of the history.
pub fn decode_entries<I, S>(entries: I) -> Vec<Message>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match Message::from_json(raw.as_ref()) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed history entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_entry_is_dropped_others_kept() {
        let good_1 = r#"{"id":1,"name":"a","email":"","date":"01/01/2024 00:00:00","topic":"","content":"x"}"#;
        let good_2 = r#"{"id":3,"name":"c","email":"","date":"01/01/2024 00:00:02","topic":"","content":"z"}"#;
        let decoded = decode_entries([good_1, "{\"id\":2,\"name\":", good_2]);

        let ids: Vec<i64> = decoded.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn default_layout_matches_documented_keys() {
        let keys = FastStoreKeys::default();
        assert_eq!(keys.counter, "id");
        assert_eq!(keys.list, "messages");
        assert_eq!(keys.channel, "messages");
    }
}
