//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the shared `ChatService`
//! - `routes/`: HTTP handlers, one file per endpoint family
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Chat routes are mounted under `route_prefix`; an empty prefix mounts them
/// at the root. `GET /` and `GET /health` are always at the root.
pub fn build_app(services: AppServices, route_prefix: &str) -> Router {
    let services = Arc::new(services);

    let chat = routes::router();
    let mounted = if route_prefix.is_empty() {
        chat
    } else {
        Router::new().nest(route_prefix, chat)
    };

    mounted
        .route("/", get(routes::history::history))
        .route("/health", get(routes::system::health))
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::cors))
}
