use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use relaychat_core::{Message, MessageId, RelayError, RelayResult};

use super::MessageStore;

/// In-memory durable store.
///
/// Intended for tests/dev. Keyed by id like the real table, so duplicate ids
/// are rejected with `WriteError`.
#[derive(Debug)]
pub struct InMemoryMessageStore {
    rows: RwLock<BTreeMap<MessageId, Message>>,
    online: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_online(&self) -> RelayResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RelayError::unavailable("in-memory message store is offline"))
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            online: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn ensure_schema(&self) -> RelayResult<()> {
        self.ensure_online()
    }

    async fn insert(&self, message: &Message) -> RelayResult<()> {
        self.ensure_online()?;
        let mut rows = self
            .rows
            .write()
            .map_err(|_| RelayError::write("lock poisoned"))?;

        if rows.contains_key(&message.id) {
            return Err(RelayError::write(format!(
                "duplicate message id {}",
                message.id
            )));
        }
        rows.insert(message.id, message.clone());
        Ok(())
    }

    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        self.ensure_online()?;
        let rows = self
            .rows
            .read()
            .map_err(|_| RelayError::unavailable("lock poisoned"))?;
        Ok(rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use relaychat_core::NewMessage;

    use super::*;

    fn numbered(id: i64, content: &str) -> Message {
        NewMessage::now("n", "e", "t", content).with_id(MessageId::new(id))
    }

    #[tokio::test]
    async fn lists_in_id_order_regardless_of_insert_order() {
        let store = InMemoryMessageStore::new();
        store.insert(&numbered(2, "b")).await.unwrap();
        store.insert(&numbered(1, "a")).await.unwrap();

        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|m| m.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_write_error() {
        let store = InMemoryMessageStore::new();
        store.insert(&numbered(1, "a")).await.unwrap();

        let err = store.insert(&numbered(1, "again")).await.unwrap_err();
        assert!(matches!(err, RelayError::WriteError(_)));
    }

    #[tokio::test]
    async fn offline_store_is_unavailable() {
        let store = InMemoryMessageStore::new();
        store.set_online(false);
        assert!(matches!(
            store.insert(&numbered(1, "a")).await,
            Err(RelayError::StoreUnavailable(_))
        ));
    }
}
