//! Ingestion and history orchestration.
//!
//! `ChatService` composes a [`FastStore`] and a [`MessageStore`]. It contains
//! no IO itself; everything goes through the injected adapters, so the same
//! code runs against Redis/Postgres and against the in-memory pair.
//!
//! ## Ingestion Flow
//!
//! ```text
//! NewMessage (date = now)
//!   ↓
//! 1. next_id()            ── fails → Err, nothing written
//!   ↓
//! 2. append()             ── fails → logged, continue
//!   ↓
//! 3. publish()            ── fails → logged, continue
//!   ↓
//! 4. insert()             ── fails → Err (caller answers 500)
//! ```
//!
//! A message is only ever written under a counter id, so the fast and
//! durable copies always agree on it and no id is handed out twice.
//!
//! Steps 2–4 are independent round-trips to two different stores. When step 4
//! fails, live viewers and the fast history have already seen the message
//! while the durable store has not. Nothing is rolled back.
//!
//! ## History
//!
//! The fast store is authoritative whenever it answers, even with an empty
//! list. The durable store is only consulted when the fast read errors.

use tracing::instrument;

use relaychat_core::{Message, NewMessage, RelayResult};
use relaychat_events::Subscription;

use crate::fast_store::FastStore;
use crate::message_store::MessageStore;

/// Outcome of a successful ingestion.
///
/// `appended`/`published` report the fast-path steps, which are allowed to
/// fail without failing the ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub message: Message,
    pub appended: bool,
    pub published: bool,
}

/// Which store served a history read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Fast,
    Durable,
}

impl HistorySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Durable => "durable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub messages: Vec<Message>,
    pub source: HistorySource,
}

/// Message ingestion and history retrieval over a fast/durable store pair.
#[derive(Debug, Clone)]
pub struct ChatService<F, M> {
    fast: F,
    durable: M,
}

impl<F, M> ChatService<F, M>
where
    F: FastStore,
    M: MessageStore,
{
    pub fn new(fast: F, durable: M) -> Self {
        Self { fast, durable }
    }

    /// Number, fan out and persist one message.
    ///
    /// Fails when no id can be obtained or the durable insert fails.
    #[instrument(skip(self, draft), fields(message_id), err)]
    pub async fn ingest(&self, draft: NewMessage) -> RelayResult<IngestReport> {
        let id = self.fast.next_id().await.inspect_err(|e| {
            tracing::warn!(error = %e, "id counter unavailable; message rejected");
        })?;
        tracing::Span::current().record("message_id", id.get());

        let message = draft.with_id(id);

        let appended = match self.fast.append(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "fast history append failed");
                false
            }
        };

        let published = match self.fast.publish(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "broadcast publish failed");
                false
            }
        };

        if let Err(e) = self.durable.insert(&message).await {
            tracing::error!(
                error = %e,
                appended,
                published,
                "durable insert failed after fast-path writes"
            );
            return Err(e);
        }

        Ok(IngestReport {
            message,
            appended,
            published,
        })
    }

    /// Full history, preferring the fast store.
    #[instrument(skip(self), err)]
    pub async fn history(&self) -> RelayResult<History> {
        match self.fast.list_all().await {
            Ok(messages) => Ok(History {
                messages,
                source: HistorySource::Fast,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "fast history unavailable; falling back to durable store");
                let messages = self.durable.list_all().await?;
                Ok(History {
                    messages,
                    source: HistorySource::Durable,
                })
            }
        }
    }

    /// Open a broadcast subscription on the fast store.
    pub async fn subscribe(&self) -> RelayResult<Subscription> {
        self.fast.subscribe().await
    }
}
