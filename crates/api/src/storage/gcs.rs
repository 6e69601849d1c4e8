//! Google Cloud Storage client.
//!
//! Uploads go through the JSON/upload API on `storage.googleapis.com`.
//! Public URLs use the Firebase-style download endpoint. Signed URLs follow
//! the V4 query-string scheme (`GOOG4-RSA-SHA256`); the RSA signature itself
//! comes from the IAM Credentials `signBlob` call so no local key material
//! is needed beyond the access token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::instrument;

use super::{ObjectStorage, StorageError};
use crate::google::TokenProvider;

/// V4 signing algorithm identifier.
const GOOG_ALGORITHM: &str = "GOOG4-RSA-SHA256";

/// Host serving signed and direct object reads.
const STORAGE_HOST: &str = "storage.googleapis.com";

/// RFC 3986 strict encoding: everything except unreserved characters.
const STRICT_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Client for a single Cloud Storage bucket.
pub struct GcsClient {
    client: reqwest::Client,
    bucket: String,
    tokens: Arc<TokenProvider>,
}

impl GcsClient {
    /// Create a client for the given bucket.
    #[must_use]
    pub fn new(bucket: &str, tokens: Arc<TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bucket: bucket.to_string(),
            tokens,
        }
    }

    async fn bearer(&self) -> Result<String, StorageError> {
        Ok(self.tokens.token().await?)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Ask IAM Credentials to RSA-SHA256 sign a payload with the service
    /// account's key. Returns the signature bytes.
    async fn sign_blob(&self, payload: &str) -> Result<Vec<u8>, StorageError> {
        let email = self.tokens.client_email().to_string();
        let url = format!(
            "https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/{email}:signBlob"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(self.bearer().await?)
            .json(&json!({"payload": BASE64.encode(payload)}))
            .send()
            .await?;

        let response = Self::check(response).await?;
        let body: Value = response.json().await?;
        let signed = body
            .get("signedBlob")
            .and_then(Value::as_str)
            .ok_or_else(|| StorageError::Sign("signBlob response missing signedBlob".to_string()))?;

        BASE64
            .decode(signed)
            .map_err(|e| StorageError::Sign(format!("invalid signedBlob encoding: {e}")))
    }
}

#[async_trait]
impl ObjectStorage for GcsClient {
    #[instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), StorageError> {
        let url = format!(
            "https://{STORAGE_HOST}/upload/storage/v1/b/{}/o",
            self.bucket
        );

        let response = self
            .client
            .post(url)
            .query(&[("uploadType", "media"), ("name", name)])
            .bearer_auth(self.bearer().await?)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        // Object names in the JSON API path are fully encoded ('/' included)
        let encoded = utf8_percent_encode(name, STRICT_ENCODE).to_string();
        let url = format!(
            "https://{STORAGE_HOST}/storage/v1/b/{}/o/{encoded}",
            self.bucket
        );

        let response = self
            .client
            .delete(url)
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        let encoded = utf8_percent_encode(name, STRICT_ENCODE);
        format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o/{encoded}?alt=media",
            self.bucket
        )
    }

    async fn signed_url(&self, name: &str, ttl: Duration) -> Result<String, StorageError> {
        let now = chrono::Utc::now();
        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let datestamp = now.format("%Y%m%d").to_string();

        let credential_scope = format!("{datestamp}/auto/storage/goog4_request");
        let credential = format!("{}/{credential_scope}", self.tokens.client_email());

        let resource = canonical_resource(&self.bucket, name);
        let query = canonical_query(&credential, &timestamp, ttl.as_secs());
        let request = canonical_request(&resource, &query);
        let to_sign = string_to_sign(&timestamp, &credential_scope, &request);

        let signature = self.sign_blob(&to_sign).await?;
        let signature_hex = hex(&signature);

        Ok(format!(
            "https://{STORAGE_HOST}{resource}?{query}&X-Goog-Signature={signature_hex}"
        ))
    }
}

/// Canonical resource path: `/{bucket}/{object}` with the object encoded
/// segment-wise (slashes kept).
fn canonical_resource(bucket: &str, name: &str) -> String {
    let encoded: Vec<String> = name
        .split('/')
        .map(|segment| utf8_percent_encode(segment, STRICT_ENCODE).to_string())
        .collect();
    format!("/{bucket}/{}", encoded.join("/"))
}

/// Canonical query string with parameters in lexicographic order.
fn canonical_query(credential: &str, timestamp: &str, expires_secs: u64) -> String {
    let encoded_credential = utf8_percent_encode(credential, STRICT_ENCODE);
    format!(
        "X-Goog-Algorithm={GOOG_ALGORITHM}\
         &X-Goog-Credential={encoded_credential}\
         &X-Goog-Date={timestamp}\
         &X-Goog-Expires={expires_secs}\
         &X-Goog-SignedHeaders=host"
    )
}

/// V4 canonical request for a signed GET with only the host header.
fn canonical_request(resource: &str, query: &str) -> String {
    format!("GET\n{resource}\n{query}\nhost:{STORAGE_HOST}\n\nhost\nUNSIGNED-PAYLOAD")
}

/// The string the service account actually signs.
fn string_to_sign(timestamp: &str, credential_scope: &str, canonical_request: &str) -> String {
    let hashed = hex(&Sha256::digest(canonical_request.as_bytes()));
    format!("{GOOG_ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed}")
}

/// Lowercase hex encoding.
fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_resource_encodes_segments() {
        let resource = canonical_resource("kicks.appspot.com", "a1b2c3d4_image-0");
        assert_eq!(resource, "/kicks.appspot.com/a1b2c3d4_image-0");

        // Slashes separate path segments; other specials are encoded
        let nested = canonical_resource("kicks.appspot.com", "dir/name with space");
        assert_eq!(nested, "/kicks.appspot.com/dir/name%20with%20space");
    }

    #[test]
    fn test_canonical_query_order_and_encoding() {
        let query = canonical_query(
            "svc@kicks.iam.gserviceaccount.com/20260828/auto/storage/goog4_request",
            "20260828T120000Z",
            604_800,
        );

        // Slash and @ in the credential must be percent-encoded
        assert!(query.contains("X-Goog-Credential=svc%40kicks.iam.gserviceaccount.com%2F20260828"));
        assert!(query.starts_with("X-Goog-Algorithm=GOOG4-RSA-SHA256&"));
        assert!(query.ends_with("&X-Goog-SignedHeaders=host"));
        assert!(query.contains("&X-Goog-Expires=604800&"));
    }

    #[test]
    fn test_string_to_sign_shape() {
        let request = canonical_request("/bucket/object", "X-Goog-Algorithm=GOOG4-RSA-SHA256");
        let to_sign = string_to_sign("20260828T120000Z", "20260828/auto/storage/goog4_request", &request);

        let lines: Vec<&str> = to_sign.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.first().copied(), Some(GOOG_ALGORITHM));
        assert_eq!(lines.get(1).copied(), Some("20260828T120000Z"));
        // Final line is the hex SHA-256 of the canonical request
        assert_eq!(lines.get(3).map(|line| line.len()), Some(64));
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(hex(&[0x00, 0xff, 0x10]), "00ff10");
    }
}
