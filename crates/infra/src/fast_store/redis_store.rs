//! Redis-backed fast store (optional, `redis` feature).
//!
//! Every call opens its own multiplexed connection; subscriptions get a
//! dedicated pub/sub connection owned by the returned [`Subscription`], so
//! dropping the subscription closes the connection.
//!
//! Note: Redis pub/sub is fire-and-forget. A viewer that is not subscribed at
//! publish time never sees that payload; late joiners read the list instead.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio_stream::StreamExt;
use tracing::instrument;

use relaychat_core::{Message, MessageId, RelayError, RelayResult, encode_batch};
use relaychat_events::Subscription;

use super::{FastStore, FastStoreKeys, decode_entries};

#[derive(Debug, Clone)]
pub struct RedisFastStore {
    client: redis::Client,
    keys: FastStoreKeys,
}

impl RedisFastStore {
    pub fn new(redis_url: impl AsRef<str>) -> RelayResult<Self> {
        Self::with_keys(redis_url, FastStoreKeys::default())
    }

    pub fn with_keys(redis_url: impl AsRef<str>, keys: FastStoreKeys) -> RelayResult<Self> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| map_redis_error("open", e))?;
        Ok(Self { client, keys })
    }

    async fn connection(&self) -> RelayResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("connect", e))
    }
}

#[async_trait]
impl FastStore for RedisFastStore {
    #[instrument(skip(self), fields(key = %self.keys.counter), err)]
    async fn next_id(&self) -> RelayResult<MessageId> {
        let mut conn = self.connection().await?;
        let id: i64 = conn
            .incr(&self.keys.counter, 1)
            .await
            .map_err(|e| map_redis_error("incr", e))?;
        Ok(MessageId::new(id))
    }

    #[instrument(skip(self, message), fields(key = %self.keys.list, message_id = %message.id), err)]
    async fn append(&self, message: &Message) -> RelayResult<()> {
        let payload = message.to_json()?;
        let mut conn = self.connection().await?;
        let _: i64 = conn
            .rpush(&self.keys.list, payload)
            .await
            .map_err(|e| map_redis_error("rpush", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(key = %self.keys.list), err)]
    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        let mut conn = self.connection().await?;
        // Raw bytes: a non-UTF-8 entry must be skipped alone, not fail the whole read.
        let raw: Vec<Vec<u8>> = conn
            .lrange(&self.keys.list, 0, -1)
            .await
            .map_err(|e| map_redis_error("lrange", e))?;

        let entries = raw.into_iter().filter_map(|bytes| match String::from_utf8(bytes) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "skipping non UTF-8 history entry");
                None
            }
        });
        Ok(decode_entries(entries))
    }

    #[instrument(skip(self, message), fields(channel = %self.keys.channel, message_id = %message.id), err)]
    async fn publish(&self, message: &Message) -> RelayResult<()> {
        let payload = encode_batch(std::slice::from_ref(message))?;
        let mut conn = self.connection().await?;
        let receivers: i64 = conn
            .publish(&self.keys.channel, payload)
            .await
            .map_err(|e| map_redis_error("publish", e))?;
        tracing::debug!(receivers, "published");
        Ok(())
    }

    #[instrument(skip(self), fields(channel = %self.keys.channel), err)]
    async fn subscribe(&self) -> RelayResult<Subscription> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| map_redis_error("pubsub connect", e))?;
        pubsub
            .subscribe(&self.keys.channel)
            .await
            .map_err(|e| map_redis_error("subscribe", e))?;

        let payloads = pubsub.into_on_message().filter_map(|msg| {
            match msg.get_payload::<String>() {
                Ok(payload) => Some(Ok(payload)),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping undecodable pub/sub payload");
                    None
                }
            }
        });

        // The message stream only ends when the pub/sub connection goes away.
        let closed = tokio_stream::once(Err(RelayError::subscription(
            "redis pub/sub connection closed",
        )));

        Ok(Subscription::new(payloads.chain(closed)))
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> RelayError {
    if err.kind() == redis::ErrorKind::TypeError {
        RelayError::decode(format!("redis {operation}: {err}"))
    } else {
        RelayError::unavailable(format!("redis {operation}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_maps_to_decode_error() {
        let err = redis::RedisError::from((redis::ErrorKind::TypeError, "WRONGTYPE"));
        assert!(matches!(
            map_redis_error("lrange", err),
            RelayError::DecodeError(_)
        ));
    }

    #[test]
    fn connection_failure_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            map_redis_error("connect", redis::RedisError::from(io)),
            RelayError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn malformed_url_is_rejected_at_construction() {
        assert!(matches!(
            RedisFastStore::new("not a url"),
            Err(RelayError::StoreUnavailable(_))
        ));
    }
}
