use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use relaychat_core::RelayError;

/// Synchronous paths answer every store failure with a generic 500.
pub fn relay_error_to_response(err: RelayError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_become_internal_server_error() {
        let res = relay_error_to_response(RelayError::write("duplicate key"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
