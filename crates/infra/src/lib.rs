//! Infrastructure layer: store adapters, configuration, ingestion/history orchestration.

pub mod chat_service;
pub mod config;
pub mod fast_store;
pub mod message_store;


pub use chat_service::{ChatService, History, HistorySource, IngestReport};
pub use config::{ConfigError, Settings};
pub use fast_store::{FastStore, InMemoryFastStore};
pub use message_store::{InMemoryMessageStore, MessageStore, PostgresMessageStore};
