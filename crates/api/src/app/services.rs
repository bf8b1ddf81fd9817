//! Store wiring.
//!
//! Two modes, selected by `USE_PERSISTENT_STORES`:
//! - in-memory (default): both stores live in process, nothing to start
//! - persistent: Redis fast store + Postgres message store

use std::sync::Arc;

use relaychat_core::RelayResult;
use relaychat_infra::fast_store::RedisFastStore;
use relaychat_infra::{
    ChatService, FastStore, InMemoryFastStore, InMemoryMessageStore, MessageStore,
    PostgresMessageStore, Settings,
};

pub type DynChatService = ChatService<Arc<dyn FastStore>, Arc<dyn MessageStore>>;

/// Shared handler state, cloned into every request via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub chat: Arc<DynChatService>,
}

impl AppServices {
    pub fn new(fast: Arc<dyn FastStore>, durable: Arc<dyn MessageStore>) -> Self {
        Self {
            chat: Arc::new(ChatService::new(fast, durable)),
        }
    }
}

pub async fn build_services(settings: &Settings) -> RelayResult<AppServices> {
    if settings.use_persistent_stores {
        build_persistent_services(settings).await
    } else {
        tracing::info!("using in-memory stores");
        Ok(build_in_memory_services())
    }
}

pub fn build_in_memory_services() -> AppServices {
    AppServices::new(
        Arc::new(InMemoryFastStore::new()),
        Arc::new(InMemoryMessageStore::new()),
    )
}

async fn build_persistent_services(settings: &Settings) -> RelayResult<AppServices> {
    let fast = RedisFastStore::new(&settings.fast_store_url)?;

    let durable = PostgresMessageStore::connect(&settings.durable_store_url).await?;
    durable.ensure_schema().await?;

    tracing::info!("using redis fast store and postgres message store");
    Ok(AppServices::new(Arc::new(fast), Arc::new(durable)))
}
