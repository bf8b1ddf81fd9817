use axum::{
    Router,
    routing::{get, post},
};

pub mod history;
pub mod send;
pub mod system;
pub mod websocket;

/// Chat endpoints, mounted under the configured route prefix.
pub fn router() -> Router {
    Router::new()
        .route("/send", post(send::send))
        .route("/history", get(history::history))
        .route("/websocket", get(websocket::websocket))
}
