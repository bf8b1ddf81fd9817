use std::sync::Arc;

use axum::{Form, extract::Extension, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use relaychat_core::NewMessage;

use crate::app::errors::relay_error_to_response;
use crate::app::services::AppServices;

/// Form body of `POST /send`. Missing fields are empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SendForm {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub content: String,
}

/// POST /send
///
/// 200 with an empty body once the message is durably stored, even if the
/// fast-path writes failed. 500 when the id counter or the durable store fails.
pub async fn send(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<SendForm>,
) -> axum::response::Response {
    let draft = NewMessage::now(form.name, form.email, form.topic, form.content);

    match services.chat.ingest(draft).await {
        Ok(report) => {
            tracing::info!(
                message_id = %report.message.id,
                appended = report.appended,
                published = report.published,
                "message ingested"
            );
            StatusCode::OK.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "message ingestion failed");
            relay_error_to_response(e)
        }
    }
}
