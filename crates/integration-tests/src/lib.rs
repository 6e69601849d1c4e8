//! Integration test harness for the Kicks API.
//!
//! Builds the real router with the real middleware stack, but swaps the
//! remote backends for in-memory fakes:
//!
//! - [`memory::MemoryStore`] stands in for the document store
//! - [`memory::MemoryStorage`] stands in for the image bucket
//! - the token verifier runs against a fixed test key set, and
//!   [`tokens`] mints matching RS256 tokens
//!
//! Requests go through `tower::ServiceExt::oneshot`, so tests exercise
//! routing, extractors, and envelopes without binding a socket.

#![allow(clippy::unwrap_used)]

pub mod memory;
pub mod tokens;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use kicks_api::auth::TokenVerifier;
use kicks_api::config::{ApiConfig, AuthConfig, GoogleConfig};
use kicks_api::state::AppState;

use memory::{MemoryStorage, MemoryStore};

/// Bucket name used by the in-memory storage fake.
pub const TEST_BUCKET: &str = "kicks-test.appspot.com";

/// Token audience the test verifier requires.
pub const TEST_AUDIENCE: &str = "https://api.kicks.example";

/// Token issuer the test verifier requires.
pub const TEST_ISSUER: &str = "https://tenant.auth0.test/";

/// Configuration for the test application.
#[must_use]
pub fn test_config() -> ApiConfig {
    ApiConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        auth: AuthConfig {
            jwks_uri: format!("{TEST_ISSUER}.well-known/jwks.json"),
            audience: TEST_AUDIENCE.to_string(),
            issuer: TEST_ISSUER.to_string(),
            algorithm: jsonwebtoken::Algorithm::RS256,
        },
        google: GoogleConfig {
            project_id: "kicks-test".to_string(),
            credentials_path: None,
            client_email: Some("svc@kicks-test.iam.gserviceaccount.com".to_string()),
            private_key: Some(SecretString::from("unused")),
        },
        storage_bucket: TEST_BUCKET.to_string(),
        cors_allowed_origin: None,
        signed_urls: false,
        signed_url_ttl: Duration::from_secs(604_800),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Build the application router over fresh in-memory backends.
///
/// Returns the fakes alongside the router so tests can seed documents and
/// inspect writes.
#[must_use]
pub fn test_app() -> (Router, Arc<MemoryStore>, Arc<MemoryStorage>) {
    test_app_with(test_config())
}

/// Like [`test_app`], but with image URLs served as signed URLs.
#[must_use]
pub fn test_app_signed_urls() -> (Router, Arc<MemoryStore>, Arc<MemoryStorage>) {
    let mut config = test_config();
    config.signed_urls = true;
    test_app_with(config)
}

fn test_app_with(config: ApiConfig) -> (Router, Arc<MemoryStore>, Arc<MemoryStorage>) {
    let store = Arc::new(MemoryStore::default());
    let storage = Arc::new(MemoryStorage::new(TEST_BUCKET));
    let verifier = TokenVerifier::with_static_keys(&config.auth, tokens::jwks());

    let state = AppState::new(config, store.clone(), storage.clone(), verifier);
    (kicks_api::app(state), store, storage)
}

/// Send a request through the router and decode the response.
///
/// Non-JSON bodies (the health check) come back as a JSON string value.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// Request without a body or token.
#[must_use]
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// JSON request carrying a bearer token.
#[must_use]
pub fn authed_json(method: Method, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Bodyless request carrying a bearer token.
#[must_use]
pub fn authed(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}
