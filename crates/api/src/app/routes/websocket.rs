//! Broadcast handler: one WebSocket viewer, one fast store subscription.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! Connecting ──upgrade rejected──▶ Closed
//!     ↓
//! Upgraded ──subscribe failed──▶ close frame, Closed
//!     ↓
//! Subscribed / Streaming ──payload──▶ text frame (verbatim)
//!     ↓
//! Closed  (subscription error or end, send failure, client close)
//! ```
//!
//! The task spawned by `on_upgrade` owns both the socket and the
//! subscription, so they are released together. There is no retry.

use std::sync::Arc;

use axum::{
    extract::{
        Extension,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use relaychat_core::RelayError;

use crate::app::services::AppServices;

/// GET /websocket
pub async fn websocket(
    Extension(services): Extension<Arc<AppServices>>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> axum::response::Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            let err = RelayError::upgrade(rejection.body_text());
            tracing::warn!(error = %err, "websocket handshake rejected");
            return rejection.into_response();
        }
    };

    ws.on_failed_upgrade(|e: axum::Error| {
        let err = RelayError::upgrade(e.to_string());
        tracing::warn!(error = %err, "websocket upgrade failed");
    })
    .on_upgrade(move |socket| stream_to_viewer(services, socket))
}

async fn stream_to_viewer(services: Arc<AppServices>, mut socket: WebSocket) {
    let connection_id = Uuid::now_v7();

    let mut subscription = match services.chat.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!(%connection_id, error = %e, "viewer subscription failed");
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };
    tracing::info!(%connection_id, "viewer connected");

    let (mut sender, mut receiver) = socket.split();

    let reason = loop {
        tokio::select! {
            next = subscription.recv() => match next {
                Some(Ok(payload)) => {
                    if let Err(e) = sender.send(Message::Text(payload)).await {
                        break format!("send failed: {e}");
                    }
                }
                Some(Err(e)) => break e.to_string(),
                None => break "subscription ended".to_string(),
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break "client closed".to_string(),
                Some(Err(e)) => break format!("receive failed: {e}"),
                // Inbound data frames are ignored; pings are answered by axum.
                Some(Ok(_)) => {}
            },
        }
    };

    let _ = sender.close().await;
    tracing::info!(%connection_id, %reason, "viewer disconnected");
}
