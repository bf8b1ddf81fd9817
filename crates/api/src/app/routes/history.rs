use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::errors::relay_error_to_response;
use crate::app::services::AppServices;

/// GET /history
///
/// JSON array of every message, fast store first, durable store on failure.
pub async fn history(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.chat.history().await {
        Ok(history) => {
            tracing::debug!(
                source = history.source.as_str(),
                count = history.messages.len(),
                "history served"
            );
            Json(history.messages).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "history unavailable from both stores");
            relay_error_to_response(e)
        }
    }
}
