//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors; added by the binary)
//! 2. `TraceLayer` (request tracing)
//! 3. Body limit (multipart image uploads)
//! 4. CORS (browser clients on the configured origin)
//! 5. Request ID (add unique ID to each request)
//! 6. Security headers (helmet-equivalent hardening)
//!
//! Authentication and authorization run per-route via the [`Identity`] and
//! [`RequireAdmin`] extractors, not as router-wide layers, so public product
//! routes stay token-free.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{ADMIN_PERMISSION, Identity, RequireAdmin};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::config::ApiConfig;

/// Build the CORS layer.
///
/// Browser contract: an exact allowed origin with credentials, the
/// `Authorization` header accepted and exposed. Without a configured origin
/// the layer stays permissive but credential-less.
#[must_use]
pub fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .expose_headers([header::AUTHORIZATION]);

    match config
        .cors_allowed_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => cors.allow_origin(origin).allow_credentials(true),
        None => cors.allow_origin(tower_http::cors::Any),
    }
}
