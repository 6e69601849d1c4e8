//! Kicks API - JSON REST backend for the Kicks store.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope responses (`{success, message, ...}`)
//! - Bearer-token verification against the identity provider's JWKS endpoint
//! - Firestore REST API for the `products` and `users` collections
//! - Google Cloud Storage for product images (public or V4 signed URLs)
//!
//! The document store and object store sit behind traits so the route layer
//! can be contract-tested with in-memory fakes (see `crates/integration-tests`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod google;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

use config::{MAX_IMAGE_BYTES, MAX_IMAGES};
use state::AppState;

/// Build the application router with the standard middleware stack.
///
/// Sentry tower layers are added by the binary, not here, so tests can build
/// the same router without a Sentry client.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors_layer(state.config());

    // Multipart product uploads: up to 5 images of 5 MiB plus text fields
    let body_limit = MAX_IMAGES * MAX_IMAGE_BYTES + 64 * 1024;

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
