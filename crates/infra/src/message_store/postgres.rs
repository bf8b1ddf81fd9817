//! Postgres-backed message store.
//!
//! ## Schema
//!
//! A single `messages` relation. `date` is a `TIMESTAMP` column; the
//! `MM/DD/YYYY HH:MM:SS` text form is converted at the boundary.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RelayError |
//! |------------|------------|
//! | `Io`, `Tls`, `PoolTimedOut`, `PoolClosed`, `Protocol` | `StoreUnavailable` |
//! | `Database` (any SQLSTATE, e.g. `23505` duplicate id) | `WriteError` |
//! | `ColumnDecode`, `Decode`, `ColumnNotFound` | `DecodeError` |
//! | Other | `WriteError` |
//!
//! Ids always come from the fast store counter; the column default is never
//! used for chat messages.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use relaychat_core::date::{format_naive, parse_date};
use relaychat_core::{Message, MessageId, RelayError, RelayResult};

use super::MessageStore;

const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255),
    email VARCHAR(255),
    date TIMESTAMP,
    topic VARCHAR(255),
    content TEXT
)
"#;

/// Postgres-backed durable store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresMessageStore {
    pool: Arc<PgPool>,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> RelayResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    #[instrument(skip(self), err)]
    async fn ensure_schema(&self) -> RelayResult<()> {
        sqlx::query(CREATE_MESSAGES_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        tracing::info!("messages table ready");
        Ok(())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id), err)]
    async fn insert(&self, message: &Message) -> RelayResult<()> {
        let date = stored_date(&message.date)?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, name, email, date, topic, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.get())
        .bind(&message.name)
        .bind(&message.email)
        .bind(date)
        .bind(&message.topic)
        .bind(&message.content)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(row_count), err)]
    async fn list_all(&self) -> RelayResult<Vec<Message>> {
        // `id::BIGINT` keeps tables created with a plain SERIAL column readable.
        let rows = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, name, email, date, topic, content
            FROM messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        Span::current().record("row_count", rows.len());

        Ok(rows
            .iter()
            .filter_map(|row| match message_from_row(row) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable message row");
                    None
                }
            })
            .collect())
    }
}

fn stored_date(date: &str) -> RelayResult<NaiveDateTime> {
    parse_date(date).map_err(|e| RelayError::write(e.to_string()))
}

// Nullable text columns come back as empty strings.
fn message_from_row(row: &PgRow) -> Result<Message, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let date: Option<NaiveDateTime> = row.try_get("date")?;

    Ok(Message {
        id: MessageId::new(id),
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        email: row.try_get::<Option<String>, _>("email")?.unwrap_or_default(),
        date: date.map(format_naive).unwrap_or_default(),
        topic: row.try_get::<Option<String>, _>("topic")?.unwrap_or_default(),
        content: row.try_get::<Option<String>, _>("content")?.unwrap_or_default(),
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RelayError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            RelayError::write(format!(
                "database error in {operation} ({code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Protocol(_) => {
            RelayError::unavailable(format!("postgres unreachable in {operation}: {err}"))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => {
            RelayError::decode(format!("row decode failed in {operation}: {err}"))
        }
        _ => RelayError::write(format!("sqlx error in {operation}: {err}")),
    }
}
