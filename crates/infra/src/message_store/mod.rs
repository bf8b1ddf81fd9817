//! Durable message store boundary.
//!
//! The durable store is the system of record and the fallback read path for
//! history. Inserting here never undoes fast store writes that already
//! happened; see [`crate::chat_service`] for the resulting consistency gap.

use std::sync::Arc;

use async_trait::async_trait;

use relaychat_core::{Message, RelayResult};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryMessageStore;
pub use postgres::PostgresMessageStore;

/// Durable, append-only message persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Idempotently create the storage layout. Called once at startup.
    async fn ensure_schema(&self) -> RelayResult<()>;

    /// Persist a numbered message keyed by its id.
    async fn insert(&self, message: &Message) -> RelayResult<()>;

    /// All persisted messages, ascending by id.
    async fn list_all(&self) -> RelayResult<Vec<Message>>;
}

#[async_trait]
impl<T> MessageStore for Arc<T>
where
    T: MessageStore + ?Sized,
{
    async fn ensure_schema(&self) -> RelayResult<()> {
        (**self).ensure_schema().await
    }

    async fn insert(&self, message: &Message) -> RelayResult<()> {
        (**self).insert(message).await
    }

    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        (**self).list_all().await
    }
}
