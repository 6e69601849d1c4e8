//! Request ID middleware for request tracing and correlation.
//!
//! Every request gets an id that is recorded in the current tracing span,
//! tagged on the Sentry scope, and echoed in the response headers. An
//! inbound `x-request-id` from a proxy is kept only if it looks like a
//! sane id; anything else is replaced with a fresh UUID v4 so log fields
//! never carry arbitrary client-chosen bytes.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id kept verbatim.
const MAX_ID_LEN: usize = 128;

/// Inbound ids must be short printable ASCII.
fn acceptable_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| acceptable_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    // Record in current span for structured logging
    Span::current().record("request_id", &request_id);

    // Set in Sentry scope for error correlation
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Add to response headers so clients can reference the request ID
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_ids_kept_only_when_printable() {
        assert!(acceptable_id("5b2c3d4e-aa01-4b7f-9c1d-2e3f4a5b6c7d"));
        assert!(acceptable_id("cf-ray-8a1b2c3d"));

        assert!(!acceptable_id(""));
        assert!(!acceptable_id("with space"));
        assert!(!acceptable_id("tab\there"));
        assert!(!acceptable_id(&"x".repeat(MAX_ID_LEN + 1)));
    }
}
